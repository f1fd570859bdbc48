pub mod client;

use std::sync::Arc;

use actix_web::{http::header, web, HttpResponse};
use chrono::Utc;
use client::LinkedInClient;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::shared::http_error::{ApiError, ApiResult, HttpError};
use crate::shared::middleware::bearer_auth::AuthenticatedUser;
use crate::shared::token::{issue_token, verify_token, TokenKind};
use crate::users::model::user::LinkedInProfile;
use crate::AppState;

#[derive(ToSchema, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectRto {
  pub url: String,
}

#[derive(IntoParams, Debug, Deserialize)]
pub struct CallbackQuery {
  pub code: Option<String>,
  pub state: Option<String>,
  /// Set by LinkedIn when the member declines the consent screen.
  pub error: Option<String>,
}

fn linkedin_client(data: &AppState) -> ApiResult<Arc<dyn LinkedInClient>> {
  data.linkedin.clone().ok_or_else(|| {
    ApiError::Unavailable(String::from(
      "LinkedIn integration is not configured",
    ))
  })
}

fn redirect_to_profile(frontend_url: &str, outcome: &str) -> HttpResponse {
  HttpResponse::Found()
    .append_header((
      header::LOCATION,
      format!(
        "{}/profile?linkedin={outcome}",
        frontend_url.trim_end_matches('/')
      ),
    ))
    .finish()
}

#[utoipa::path(
  get,
  path = "/api/linkedin/connect",
  tag = "linkedin",
  security(("bearer_auth" = [])),
  responses(
    (status = 200, description = "LinkedIn authorization URL to open in the browser", body = ConnectRto),
    (status = 401, description = "Missing or invalid token", body = HttpError),
    (status = 503, description = "LinkedIn credentials not configured", body = HttpError)
  )
)]
pub async fn connect(
  data: web::Data<AppState>,
  user: web::ReqData<AuthenticatedUser>,
) -> ApiResult<HttpResponse> {
  let client = linkedin_client(&data)?;
  let state =
    issue_token(&data.config.jwt_secret, user.id(), TokenKind::LinkedinState)?;
  let url = client.authorization_url(&state)?;

  Ok(HttpResponse::Ok().json(ConnectRto {
    url: url.to_string(),
  }))
}

#[utoipa::path(
  get,
  path = "/api/linkedin/callback",
  tag = "linkedin",
  params(CallbackQuery),
  responses(
    (status = 302, description = "Back to the frontend profile page"),
    (status = 400, description = "Missing code or invalid state", body = HttpError),
    (status = 502, description = "LinkedIn rejected the exchange", body = HttpError),
    (status = 503, description = "LinkedIn credentials not configured", body = HttpError)
  )
)]
pub async fn callback(
  data: web::Data<AppState>,
  query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
  let client = linkedin_client(&data)?;

  if let Some(error) = &query.error {
    info!(error = %error, "linkedin consent declined");
    return Ok(redirect_to_profile(&data.config.frontend_url, "denied"));
  }

  let code = query
    .code
    .as_deref()
    .ok_or_else(|| ApiError::bad_request("Missing authorization code"))?;
  let state = query
    .state
    .as_deref()
    .ok_or_else(|| ApiError::bad_request("Missing state"))?;
  let claims =
    verify_token(&data.config.jwt_secret, state, TokenKind::LinkedinState)
      .map_err(|error| {
        warn!(error = %error, "linkedin callback with a bad state");
        ApiError::bad_request("Invalid or expired state")
      })?;

  let access_token = client.exchange_code(code).await?;
  let user_info = client.user_info(&access_token.access_token).await?;

  let profile = LinkedInProfile {
    sub: user_info.sub,
    name: user_info.name,
    email: user_info.email,
    picture: user_info.picture,
    connected_at: Utc::now(),
  };
  if !data.users.set_linkedin(&claims.sub, profile).await? {
    return Err(ApiError::not_found("User not found"));
  }

  info!(user = %claims.sub, "linkedin account linked");
  Ok(redirect_to_profile(&data.config.frontend_url, "connected"))
}

#[cfg(test)]
mod tests {
  use actix_web::{http::StatusCode, test, App};
  use url::Url;

  use super::client::{AccessToken, LinkedInError, MockLinkedInClient, UserInfo};
  use super::*;
  use crate::configure_app;
  use crate::helpers::tests::{bearer, json_request, seed_user, TestContext};

  fn linked_client() -> MockLinkedInClient {
    let mut client = MockLinkedInClient::new();
    client.expect_authorization_url().returning(|state| {
      Ok(
        Url::parse_with_params(
          "https://www.linkedin.com/oauth/v2/authorization",
          &[("state", state)],
        )
        .unwrap(),
      )
    });
    client
  }

  fn state_from(url: &str) -> String {
    Url::parse(url)
      .unwrap()
      .query_pairs()
      .find(|(key, _)| key == "state")
      .map(|(_, value)| value.into_owned())
      .unwrap()
  }

  #[actix_web::test]
  async fn test_connect_then_callback_links_profile() {
    let mut client = linked_client();
    client
      .expect_exchange_code()
      .withf(|code| code == "auth-code")
      .returning(|_| {
        Ok(AccessToken {
          access_token: String::from("li-token"),
          expires_in: Some(3600),
        })
      });
    client
      .expect_user_info()
      .withf(|token| token == "li-token")
      .returning(|_| {
        Ok(UserInfo {
          sub: String::from("li-sub"),
          name: Some(String::from("Ada Lovelace")),
          email: Some(String::from("ada@example.com")),
          picture: None,
        })
      });

    let ctx = TestContext::with_linkedin(client);
    let user = seed_user(&ctx, "ada@example.com", "password123", true).await;
    let app =
      test::init_service(App::new().configure(configure_app(ctx.state.clone())))
        .await;

    let request = json_request(test::TestRequest::get(), "/api/linkedin/connect")
      .insert_header(bearer(&ctx, &user.id))
      .to_request();
    let connect: ConnectRto = test::call_and_read_body_json(&app, request).await;
    let state = state_from(&connect.url);

    let request = test::TestRequest::get()
      .uri(&format!("/api/linkedin/callback?code=auth-code&state={state}"))
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
      response.headers().get(header::LOCATION).unwrap(),
      "http://localhost:5173/profile?linkedin=connected"
    );

    let users = ctx.users.read().unwrap();
    let profile = users[0].linkedin.as_ref().expect("linked profile");
    assert_eq!(profile.sub, "li-sub");
    assert_eq!(profile.name.as_deref(), Some("Ada Lovelace"));
  }

  #[actix_web::test]
  async fn test_callback_rejects_forged_state() {
    let ctx = TestContext::with_linkedin(linked_client());
    let user = seed_user(&ctx, "eve@example.com", "password123", false).await;
    let app =
      test::init_service(App::new().configure(configure_app(ctx.state.clone())))
        .await;

    // A session token must not be accepted as OAuth state.
    let session =
      issue_token(&ctx.state.config.jwt_secret, &user.id, TokenKind::Session)
        .unwrap();
    let request = test::TestRequest::get()
      .uri(&format!("/api/linkedin/callback?code=x&state={session}"))
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(ctx.users.read().unwrap()[0].linkedin.is_none());
  }

  #[actix_web::test]
  async fn test_callback_requires_code() {
    let ctx = TestContext::with_linkedin(linked_client());
    let app =
      test::init_service(App::new().configure(configure_app(ctx.state.clone())))
        .await;

    let request = test::TestRequest::get()
      .uri("/api/linkedin/callback?state=abc")
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[actix_web::test]
  async fn test_declined_consent_redirects() {
    let ctx = TestContext::with_linkedin(linked_client());
    let app =
      test::init_service(App::new().configure(configure_app(ctx.state.clone())))
        .await;

    let request = test::TestRequest::get()
      .uri("/api/linkedin/callback?error=user_cancelled_login")
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
      response.headers().get(header::LOCATION).unwrap(),
      "http://localhost:5173/profile?linkedin=denied"
    );
  }

  #[actix_web::test]
  async fn test_failed_exchange_is_bad_gateway() {
    let mut client = linked_client();
    client
      .expect_exchange_code()
      .returning(|_| Err(LinkedInError::Status(reqwest::StatusCode::UNAUTHORIZED)));

    let ctx = TestContext::with_linkedin(client);
    let user = seed_user(&ctx, "bob@example.com", "password123", false).await;
    let app =
      test::init_service(App::new().configure(configure_app(ctx.state.clone())))
        .await;

    let state =
      issue_token(&ctx.state.config.jwt_secret, &user.id, TokenKind::LinkedinState)
        .unwrap();
    let request = test::TestRequest::get()
      .uri(&format!("/api/linkedin/callback?code=bad&state={state}"))
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
  }

  #[actix_web::test]
  async fn test_unconfigured_integration_is_unavailable() {
    let ctx = TestContext::new();
    let user = seed_user(&ctx, "carl@example.com", "password123", false).await;
    let app =
      test::init_service(App::new().configure(configure_app(ctx.state.clone())))
        .await;

    let request = json_request(test::TestRequest::get(), "/api/linkedin/connect")
      .insert_header(bearer(&ctx, &user.id))
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
  }
}
