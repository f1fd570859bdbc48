pub mod dto;
pub mod rto;

use actix_web::http::header;
use actix_web::{web, HttpResponse, HttpResponseBuilder};
use chrono::Utc;
use dto::{login_dto::LoginDto, register_dto::RegisterDto};
use nanoid::nanoid;
use rto::session_rto::SessionRto;
use tracing::info;
use validator::Validate;

use crate::shared::http_error::{ApiError, ApiResult, HttpError};
use crate::shared::token::{issue_token, TokenKind};
use crate::technologies::resolve_names;
use crate::users::model::user::{User, UserLinks};
use crate::users::repository::user_repository::{
  FindOneProperty, DUPLICATE_EMAIL,
};
use crate::users::rto::user_rto::UserRto;
use crate::AppState;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

#[utoipa::path(
  post,
  path = "/api/users/register",
  tag = "auth",
  request_body = RegisterDto,
  responses(
    (status = 201, description = "User created, session issued", body = SessionRto),
    (status = 400, description = "Validation failed or email already registered"),
    (status = 429, description = "Too many attempts")
  )
)]
pub async fn register(
  data: web::Data<AppState>,
  dto: web::Json<RegisterDto>,
) -> ApiResult<HttpResponse> {
  dto.validate()?;

  let dto = dto.into_inner();
  let email = normalize_email(&dto.email);
  if data
    .users
    .find_one(FindOneProperty::Email(&email))
    .await?
    .is_some()
  {
    return Err(ApiError::bad_request(DUPLICATE_EMAIL));
  }

  let technologies = match &dto.technologies {
    Some(names) => resolve_names(data.technologies.as_ref(), names).await?,
    None => Vec::new(),
  };
  let password_hash = data.hasher.hash_password(&dto.password).await?;
  let user = User::from(dto, email, password_hash, technologies);

  // The unique index still rejects a concurrent registration of the email.
  data.users.create(user.clone()).await?;
  info!(user = %user.id, freelancer = user.is_freelancer, "user registered");

  let mut response = HttpResponse::Created();
  response.append_header((header::LOCATION, format!("/api/users/{}", &user.id)));
  session_response(&data, user, response)
}

#[utoipa::path(
  post,
  path = "/api/users/login",
  tag = "auth",
  request_body = LoginDto,
  responses(
    (status = 200, description = "Session issued", body = SessionRto),
    (status = 400, description = "Validation failed"),
    (status = 401, description = "Wrong email or password", body = HttpError),
    (status = 429, description = "Too many attempts")
  )
)]
pub async fn login(
  data: web::Data<AppState>,
  dto: web::Json<LoginDto>,
) -> ApiResult<HttpResponse> {
  dto.validate()?;

  let Some(user) = data
    .users
    .find_one(FindOneProperty::Email(&normalize_email(&dto.email)))
    .await?
  else {
    // Spend one bcrypt round so an unknown email costs as much as a wrong
    // password.
    data.hasher.hash_password(&dto.password).await?;
    return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
  };

  if !data
    .hasher
    .verify_password(&dto.password, &user.password_hash)
    .await?
  {
    return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
  }

  info!(user = %user.id, "user logged in");
  session_response(&data, user, HttpResponse::Ok())
}

fn session_response(
  data: &AppState,
  user: User,
  mut response: HttpResponseBuilder,
) -> ApiResult<HttpResponse> {
  let token = issue_token(&data.config.jwt_secret, &user.id, TokenKind::Session)?;
  Ok(response.json(SessionRto {
    token,
    user: UserRto::from(user),
  }))
}

impl User {
  fn from(
    dto: RegisterDto,
    email: String,
    password_hash: String,
    technologies: Vec<String>,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: nanoid!(),
      name: dto.name.trim().to_string(),
      email,
      password_hash,
      is_freelancer: dto.is_freelancer,
      tarifa: dto.tarifa,
      bio: dto.bio,
      links: dto.links.map(UserLinks::from).unwrap_or_default(),
      availability: dto.availability,
      technologies,
      servicios: Vec::new(),
      opinions: Vec::new(),
      linkedin: None,
      created_at: now,
      updated_at: now,
    }
  }
}
