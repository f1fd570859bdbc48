#[cfg(test)]
pub mod tests {
  use std::{
    net::SocketAddr,
    str::FromStr,
    sync::{Arc, RwLock},
  };

  use actix_web::{
    http::header::{self, HeaderName},
    test::TestRequest,
    web,
  };
  use chrono::Utc;
  use fake::{faker::name::raw::Name, locales::EN, Fake};
  use nanoid::nanoid;

  use crate::linkedin::client::{LinkedInClient, MockLinkedInClient};
  use crate::opinions::{
    model::opinion::Opinion,
    repository::opinion_repository::tests::InMemoryOpinionRepository,
  };
  use crate::servicios::{
    model::tipo_servicio::TipoServicio,
    repository::tipo_servicio_repository::tests::InMemoryTipoServicioRepository,
  };
  use crate::shared::config::Config;
  use crate::shared::hash_worker::{HashWorker, Hasher};
  use crate::shared::health_check::{HealthCheckStats, MockHealthCheck};
  use crate::shared::rate_limit::RateLimits;
  use crate::shared::token::{issue_token, TokenKind};
  use crate::technologies::{
    model::technology::Technology,
    repository::technology_repository::tests::InMemoryTechnologyRepository,
  };
  use crate::users::{
    model::user::{User, UserLinks},
    repository::user_repository::tests::InMemoryUserRepository,
  };
  use crate::AppState;

  const TEST_COST: u32 = 4;

  /// Application state backed by in-memory repositories, with handles on the
  /// stored rows so tests can seed and inspect them.
  pub struct TestContext {
    pub state: web::Data<AppState>,
    pub users: Arc<RwLock<Vec<User>>>,
    pub opinions: Arc<RwLock<Vec<Opinion>>>,
    pub technologies: Arc<RwLock<Vec<Technology>>>,
    pub tipos_servicio: Arc<RwLock<Vec<TipoServicio>>>,
  }

  impl TestContext {
    pub fn new() -> Self {
      Self::build(None, None)
    }

    pub fn with_hasher(hasher: Arc<dyn Hasher>) -> Self {
      Self::build(Some(hasher), None)
    }

    pub fn with_linkedin(client: MockLinkedInClient) -> Self {
      Self::build(None, Some(client))
    }

    fn build(
      hasher: Option<Arc<dyn Hasher>>,
      linkedin: Option<MockLinkedInClient>,
    ) -> Self {
      let users = InMemoryUserRepository::new();
      let opinions = InMemoryOpinionRepository::new();
      let technologies = InMemoryTechnologyRepository::new();
      let tipos_servicio = InMemoryTipoServicioRepository::new();

      let mut health_check = MockHealthCheck::new();
      health_check.expect_collect().returning(|| {
        Some(HealthCheckStats {
          database_status: String::from("connected"),
          database_name: String::from("conectar_test"),
        })
      });

      let hasher = hasher.unwrap_or_else(|| {
        Arc::new(HashWorker::new(2, TEST_COST).expect("hash worker"))
      });

      let config = test_config();
      let rate_limits = RateLimits::new(&config).expect("rate limits");

      Self {
        users: users.users.clone(),
        opinions: opinions.opinions.clone(),
        technologies: technologies.technologies.clone(),
        tipos_servicio: tipos_servicio.tipos.clone(),
        state: web::Data::new(AppState {
          config,
          rate_limits,
          users: Arc::new(users),
          opinions: Arc::new(opinions),
          tipos_servicio: Arc::new(tipos_servicio),
          technologies: Arc::new(technologies),
          hasher,
          linkedin: linkedin
            .map(|client| Arc::new(client) as Arc<dyn LinkedInClient>),
          health_check: Arc::new(health_check),
        }),
      }
    }
  }

  pub fn test_config() -> Config {
    Config {
      host: String::from("127.0.0.1:0"),
      mongo_uri: String::from("mongodb://localhost:27017"),
      mongo_database: String::from("conectar_test"),
      jwt_secret: nanoid!(),
      bcrypt_cost: TEST_COST,
      hash_threads: 2,
      frontend_url: String::from("http://localhost:5173"),
      linkedin: None,
      rate_limit_per_second: 1000,
      rate_limit_burst: 1000,
    }
  }

  /// Stores a user whose password hashes to `password`. Freelancers get a
  /// tarifa so the stored row satisfies the profile invariant.
  pub async fn seed_user(
    ctx: &TestContext,
    email: &str,
    password: &str,
    is_freelancer: bool,
  ) -> User {
    let password_hash = ctx
      .state
      .hasher
      .hash_password(password)
      .await
      .expect("hash seeded password");
    let now = Utc::now();
    let user = User {
      id: nanoid!(),
      name: Name(EN).fake(),
      email: email.to_string(),
      password_hash,
      is_freelancer,
      tarifa: is_freelancer.then_some(30.0),
      bio: None,
      links: UserLinks::default(),
      availability: None,
      technologies: Vec::new(),
      servicios: Vec::new(),
      opinions: Vec::new(),
      linkedin: None,
      created_at: now,
      updated_at: now,
    };
    ctx.users.write().unwrap().push(user.clone());
    user
  }

  pub fn bearer(ctx: &TestContext, user_id: &str) -> (HeaderName, String) {
    let token = issue_token(
      &ctx.state.config.jwt_secret,
      user_id,
      TokenKind::Session,
    )
    .expect("session token");
    (header::AUTHORIZATION, format!("Bearer {token}"))
  }

  /// The rate limiter keys on the peer address, so every request built here
  /// carries one.
  pub fn json_request(request: TestRequest, uri: &str) -> TestRequest {
    request
      .uri(uri)
      .peer_addr(SocketAddr::from_str("127.0.0.1:12345").unwrap())
      .insert_header((header::CONTENT_TYPE, "application/json"))
  }
}
