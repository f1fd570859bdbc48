use actix_web::{
  body::MessageBody,
  dev::{ServiceRequest, ServiceResponse},
  http::header::Header,
  middleware::Next,
  web, Error, HttpMessage,
};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use tracing::debug;

use crate::shared::http_error::{ApiError, ApiResult};
use crate::shared::token::{verify_token, TokenKind};
use crate::users::rto::user_rto::UserRto;
use crate::AppState;

pub const NO_TOKEN: &str = "No token provided";
pub const INVALID_TOKEN: &str = "Invalid or expired token";
pub const UNKNOWN_USER: &str = "User no longer exists";
pub const NOT_OWNER: &str = "You can only modify your own profile";

/// The user behind a verified session token, read by handlers through
/// `web::ReqData<AuthenticatedUser>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserRto);

impl AuthenticatedUser {
  pub fn id(&self) -> &str {
    &self.0.id
  }

  /// Rejects writes to another user's resources.
  pub fn ensure_owner(&self, user_id: &str) -> ApiResult<()> {
    if self.id() == user_id {
      Ok(())
    } else {
      Err(ApiError::forbidden(NOT_OWNER))
    }
  }
}

pub async fn require_session(
  req: ServiceRequest,
  next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
  match authenticate(&req).await {
    Ok(user) => {
      req.extensions_mut().insert(user);
      Ok(next.call(req).await?.map_into_left_body())
    }
    Err(error) => {
      debug!(path = %req.path(), reason = %error, "request rejected");
      Ok(req.error_response(error).map_into_right_body())
    }
  }
}

async fn authenticate(req: &ServiceRequest) -> ApiResult<AuthenticatedUser> {
  let data = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| ApiError::Unavailable(String::from("Application state missing")))?;

  let authorization = Authorization::<Bearer>::parse(req)
    .map_err(|_| ApiError::unauthorized(NO_TOKEN))?;

  let claims = verify_token(
    &data.config.jwt_secret,
    authorization.as_ref().token(),
    TokenKind::Session,
  )
  .map_err(|_| ApiError::unauthorized(INVALID_TOKEN))?;

  let user = data
    .users
    .find_profile(&claims.sub)
    .await?
    .ok_or_else(|| ApiError::unauthorized(UNKNOWN_USER))?;

  Ok(AuthenticatedUser(UserRto::from(user)))
}
