mod auth;
mod doc;
mod helpers;
mod linkedin;
mod opinions;
mod servicios;
mod shared;
mod technologies;
mod users;

use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::Governor;
use actix_web::middleware::{from_fn, Logger};
use actix_web::{guard, http::header, web, App, HttpServer};
use doc::ApiDoc;
use dotenv::dotenv;
use linkedin::client::{HttpLinkedInClient, LinkedInClient};
use opinions::repository::opinion_repository::{
  MongoOpinionRepository, OpinionRepository,
};
use servicios::repository::tipo_servicio_repository::{
  MongoTipoServicioRepository, TipoServicioRepository,
};
use shared::config::Config;
use shared::database::MongoDatabase;
use shared::hash_worker::{HashWorker, Hasher};
use shared::health_check::{check_health, HealthCheck, HealthCheckImpl};
use shared::http_error::ApiError;
use shared::middleware::bearer_auth::require_session;
use shared::rate_limit::RateLimits;
use technologies::repository::technology_repository::{
  MongoTechnologyRepository, TechnologyRepository,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use users::repository::user_repository::{MongoUserRepository, UserRepository};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};
use utoipa_swagger_ui::SwaggerUi;

/// Shared by every handler through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
  pub config: Config,
  pub rate_limits: RateLimits,
  pub users: Arc<dyn UserRepository>,
  pub opinions: Arc<dyn OpinionRepository>,
  pub tipos_servicio: Arc<dyn TipoServicioRepository>,
  pub technologies: Arc<dyn TechnologyRepository>,
  pub hasher: Arc<dyn Hasher>,
  /// `None` when the LinkedIn credentials are not configured.
  pub linkedin: Option<Arc<dyn LinkedInClient>>,
  pub health_check: Arc<dyn HealthCheck>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenv().ok();
  if let Err(error) = fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .try_init()
  {
    eprintln!("tracing init failed: {error}");
  }

  let config = Config::from_env().map_err(std::io::Error::other)?;
  let rate_limits =
    RateLimits::new(&config).map_err(std::io::Error::other)?;

  let database = MongoDatabase::connect(&config)
    .await
    .map_err(std::io::Error::other)?;
  // The unique indexes back the duplicate checks in the handlers.
  database
    .ensure_indexes()
    .await
    .map_err(std::io::Error::other)?;

  let hasher = HashWorker::new(config.hash_threads, config.bcrypt_cost)
    .map_err(std::io::Error::other)?;

  let linkedin = match config.linkedin.clone() {
    Some(linkedin_config) => Some(Arc::new(
      HttpLinkedInClient::new(linkedin_config)
        .map_err(std::io::Error::other)?,
    ) as Arc<dyn LinkedInClient>),
    None => None,
  };

  let server_address = config.host.clone();
  let frontend_url = config.frontend_url.clone();
  let state = web::Data::new(AppState {
    users: Arc::new(MongoUserRepository::new(&database)),
    opinions: Arc::new(MongoOpinionRepository::new(&database)),
    tipos_servicio: Arc::new(MongoTipoServicioRepository::new(&database)),
    technologies: Arc::new(MongoTechnologyRepository::new(&database)),
    hasher: Arc::new(hasher),
    linkedin,
    health_check: Arc::new(HealthCheckImpl::new(Arc::new(database))),
    rate_limits,
    config,
  });

  info!("Listening on http://{}", server_address);
  HttpServer::new(move || {
    let cors = Cors::default()
      .allowed_origin(&frontend_url)
      .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
      .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
      .max_age(3600);

    App::new()
      .wrap(Logger::default())
      .wrap(cors)
      .configure(configure_app(state.clone()))
  })
  .bind(server_address)?
  .run()
  .await
}

/// Registers state, extractor settings and every route. Shared by `main` and
/// the tests so both serve the same routing table.
fn configure_app(
  state: web::Data<AppState>,
) -> impl FnOnce(&mut web::ServiceConfig) {
  move |config: &mut web::ServiceConfig| {
    // Only the credential endpoints are rate limited. The limiters live in
    // the state so every worker shares them.
    let register_limit = Governor::new(&state.rate_limits.register);
    let login_limit = Governor::new(&state.rate_limits.login);

    config
      .app_data(state)
      .app_data(web::JsonConfig::default().error_handler(|error, _| {
        ApiError::bad_request(error.to_string()).into()
      }))
      .app_data(web::QueryConfig::default().error_handler(|error, _| {
        ApiError::bad_request(error.to_string()).into()
      }))
      .route("/health", web::get().to(check_health))
      .service(
        SwaggerUi::new("/swagger-ui/{_:.*}")
          .url("/api-docs/openapi.json", ApiDoc::openapi()),
      )
      .service(Scalar::with_url("/scalar", ApiDoc::openapi()))
      .service(
        web::scope("/api")
          .service(
            web::scope("/users")
              .service(
                web::resource("/register")
                  .wrap(register_limit)
                  .route(web::post().to(auth::register)),
              )
              .service(
                web::resource("/login")
                  .wrap(login_limit)
                  .route(web::post().to(auth::login)),
              )
              .service(
                web::resource("").route(web::get().to(users::list_users)),
              )
              .service(
                web::resource("/freelancers")
                  .route(web::get().to(users::list_freelancers)),
              )
              .service(
                web::resource("/me")
                  .wrap(from_fn(require_session))
                  .route(web::get().to(users::me)),
              )
              .service(
                web::resource("/{id}")
                  .guard(guard::Put())
                  .wrap(from_fn(require_session))
                  .route(web::put().to(users::update_user)),
              )
              .service(
                web::resource("/{id}").route(web::get().to(users::get_user)),
              )
              .service(
                web::resource("/{id}/servicios")
                  .wrap(from_fn(require_session))
                  .route(web::post().to(servicios::add_servicio)),
              )
              .service(
                web::resource("/{id}/servicios/{servicio_id}")
                  .wrap(from_fn(require_session))
                  .route(web::delete().to(servicios::remove_servicio)),
              ),
          )
          .service(
            web::scope("/opinions")
              .service(
                web::resource("")
                  .wrap(from_fn(require_session))
                  .route(web::post().to(opinions::create_opinion)),
              )
              .service(
                web::resource("/user/{id}")
                  .route(web::get().to(opinions::list_user_opinions)),
              ),
          )
          .service(
            web::scope("/tipos-servicio")
              .service(
                web::resource("")
                  .guard(guard::Post())
                  .wrap(from_fn(require_session))
                  .route(web::post().to(servicios::create_tipo_servicio)),
              )
              .service(
                web::resource("")
                  .route(web::get().to(servicios::list_tipos_servicio)),
              ),
          )
          .service(
            web::scope("/technologies")
              .service(
                web::resource("")
                  .guard(guard::Post())
                  .wrap(from_fn(require_session))
                  .route(web::post().to(technologies::create_technology)),
              )
              .service(
                web::resource("")
                  .route(web::get().to(technologies::list_technologies)),
              ),
          )
          .service(
            web::scope("/linkedin")
              .service(
                web::resource("/connect")
                  .wrap(from_fn(require_session))
                  .route(web::get().to(linkedin::connect)),
              )
              .service(
                web::resource("/callback")
                  .route(web::get().to(linkedin::callback)),
              ),
          ),
      );
  }
}

#[cfg(test)]
mod tests {
  use actix_web::{
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
  };

  use super::*;
  use crate::auth::rto::session_rto::SessionRto;
  use crate::helpers::tests::{json_request, TestContext};
  use crate::shared::health_check::HealthCheckStats;
  use crate::users::rto::user_rto::UserRto;

  #[actix_rt::test]
  async fn test_register_login_and_fetch_profile() {
    let ctx = TestContext::new();
    let app =
      test::init_service(App::new().configure(configure_app(ctx.state.clone())))
        .await;

    // 1) Register
    let request = json_request(test::TestRequest::post(), "/api/users/register")
      .set_json(serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "password": "analytical-engine"
      }))
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
      .headers()
      .get(header::LOCATION)
      .and_then(|value| value.to_str().ok())
      .map(String::from);
    let registered: SessionRto = test::read_body_json(response).await;
    assert_eq!(
      location,
      Some(format!("/api/users/{}", registered.user.id))
    );

    // 2) Login
    let request = json_request(test::TestRequest::post(), "/api/users/login")
      .set_json(serde_json::json!({
        "email": "ada@example.com",
        "password": "analytical-engine"
      }))
      .to_request();
    let session: SessionRto = test::call_and_read_body_json(&app, request).await;

    // 3) Current user
    let request = test::TestRequest::get()
      .uri("/api/users/me")
      .insert_header((
        header::AUTHORIZATION,
        format!("Bearer {}", session.token),
      ))
      .to_request();
    let me: UserRto = test::call_and_read_body_json(&app, request).await;
    assert_eq!(me.id, registered.user.id);
    assert!(!me.is_freelancer);
  }

  #[actix_rt::test]
  async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();
    let app =
      test::init_service(App::new().configure(configure_app(ctx.state.clone())))
        .await;

    let request = json_request(test::TestRequest::post(), "/api/users/login")
      .set_payload("{ not json")
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[actix_rt::test]
  async fn test_health_reports_last_probe() {
    let ctx = TestContext::new();
    let app =
      test::init_service(App::new().configure(configure_app(ctx.state.clone())))
        .await;

    let request = test::TestRequest::get().uri("/health").to_request();
    let stats: HealthCheckStats =
      test::call_and_read_body_json(&app, request).await;
    assert_eq!(stats.database_status, "connected");
  }

  /// State whose credential limiters allow a single request per peer.
  fn strict_limits(ctx: &TestContext) -> web::Data<AppState> {
    let config = Config {
      rate_limit_per_second: 1,
      rate_limit_burst: 1,
      ..ctx.state.config.clone()
    };
    let rate_limits = RateLimits::new(&config).expect("rate limits");
    web::Data::new(AppState {
      config,
      rate_limits,
      ..(**ctx.state).clone()
    })
  }

  fn login_request() -> test::TestRequest {
    json_request(test::TestRequest::post(), "/api/users/login")
      .set_json(serde_json::json!({
        "email": "nobody@example.com",
        "password": "password123"
      }))
  }

  fn register_request() -> test::TestRequest {
    json_request(test::TestRequest::post(), "/api/users/register")
      .set_json(serde_json::json!({
        "name": "Grace Hopper",
        "email": "grace@example.com",
        "password": "compiler-cobol"
      }))
  }

  // The limiter rejects with an error rather than a response.
  async fn status_of<S, R, B>(app: &S, request: R) -> StatusCode
  where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
  {
    match test::try_call_service(app, request).await {
      Ok(response) => response.status(),
      Err(error) => error.as_response_error().status_code(),
    }
  }

  #[actix_rt::test]
  async fn test_login_is_rate_limited() {
    let ctx = TestContext::new();
    let app = test::init_service(
      App::new().configure(configure_app(strict_limits(&ctx))),
    )
    .await;

    let mut statuses = Vec::new();
    for _ in 0..2 {
      statuses.push(status_of(&app, login_request().to_request()).await);
    }
    assert_eq!(
      statuses,
      vec![StatusCode::UNAUTHORIZED, StatusCode::TOO_MANY_REQUESTS]
    );
  }

  #[actix_rt::test]
  async fn test_rate_limit_is_shared_across_workers() {
    let ctx = TestContext::new();
    let state = strict_limits(&ctx);
    // HttpServer runs the app factory once per worker.
    let first_worker =
      test::init_service(App::new().configure(configure_app(state.clone())))
        .await;
    let second_worker =
      test::init_service(App::new().configure(configure_app(state))).await;

    assert_eq!(
      status_of(&first_worker, login_request().to_request()).await,
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      status_of(&second_worker, login_request().to_request()).await,
      StatusCode::TOO_MANY_REQUESTS
    );
  }

  #[actix_rt::test]
  async fn test_register_and_login_have_separate_budgets() {
    let ctx = TestContext::new();
    let app = test::init_service(
      App::new().configure(configure_app(strict_limits(&ctx))),
    )
    .await;

    assert_eq!(
      status_of(&app, register_request().to_request()).await,
      StatusCode::CREATED
    );
    assert_eq!(
      status_of(&app, login_request().to_request()).await,
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      status_of(&app, login_request().to_request()).await,
      StatusCode::TOO_MANY_REQUESTS
    );
  }
}
