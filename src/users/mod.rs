pub mod dto;
pub mod model;
pub mod repository;
pub mod rto;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use dto::update_user_dto::UpdateUserDto;
use model::user::{ProfileUpdate, User, UserLinks};
use repository::user_repository::{FindOneProperty, DUPLICATE_EMAIL};
use rto::user_rto::UserRto;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;
use validator::Validate;

use crate::auth::normalize_email;
use crate::shared::http_error::{ApiError, ApiResult, HttpError};
use crate::shared::middleware::bearer_auth::AuthenticatedUser;
use crate::technologies::{model::technology::normalize, resolve_names};
use crate::AppState;

#[derive(IntoParams, Debug, Deserialize)]
pub struct FreelancerQuery {
  /// Only freelancers tagged with this technology.
  pub technology: Option<String>,
}

fn to_rtos(users: Vec<User>) -> Vec<UserRto> {
  users.into_iter().map(UserRto::from).collect()
}

#[utoipa::path(
  get,
  path = "/api/users",
  tag = "users",
  responses((status = 200, description = "Every user, by name", body = Vec<UserRto>))
)]
pub async fn list_users(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
  let users = data.users.find_all().await?;
  Ok(HttpResponse::Ok().json(to_rtos(users)))
}

#[utoipa::path(
  get,
  path = "/api/users/freelancers",
  tag = "users",
  params(FreelancerQuery),
  responses((status = 200, description = "Freelancers, by name", body = Vec<UserRto>))
)]
pub async fn list_freelancers(
  data: web::Data<AppState>,
  query: web::Query<FreelancerQuery>,
) -> ApiResult<HttpResponse> {
  let technology = query.technology.as_deref().and_then(normalize);
  let users = data.users.find_freelancers(technology.as_deref()).await?;
  Ok(HttpResponse::Ok().json(to_rtos(users)))
}

#[utoipa::path(
  get,
  path = "/api/users/me",
  tag = "users",
  security(("bearer_auth" = [])),
  responses(
    (status = 200, description = "The caller", body = UserRto),
    (status = 401, description = "Missing or invalid token", body = HttpError)
  )
)]
pub async fn me(user: web::ReqData<AuthenticatedUser>) -> HttpResponse {
  HttpResponse::Ok().json(&user.0)
}

#[utoipa::path(
  get,
  path = "/api/users/{id}",
  tag = "users",
  params(("id" = String, Path, description = "User id")),
  responses(
    (status = 200, description = "The user", body = UserRto),
    (status = 404, description = "User not found", body = HttpError)
  )
)]
pub async fn get_user(
  data: web::Data<AppState>,
  path: web::Path<String>,
) -> ApiResult<HttpResponse> {
  let user = data
    .users
    .find_profile(&path)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;
  Ok(HttpResponse::Ok().json(UserRto::from(user)))
}

#[utoipa::path(
  put,
  path = "/api/users/{id}",
  tag = "users",
  params(("id" = String, Path, description = "User id, must be the caller")),
  request_body = UpdateUserDto,
  security(("bearer_auth" = [])),
  responses(
    (status = 200, description = "Updated profile", body = UserRto),
    (status = 400, description = "Validation failed, missing tarifa or email taken"),
    (status = 401, description = "Missing or invalid token", body = HttpError),
    (status = 403, description = "Not the caller's profile", body = HttpError),
    (status = 404, description = "User not found", body = HttpError)
  )
)]
pub async fn update_user(
  data: web::Data<AppState>,
  caller: web::ReqData<AuthenticatedUser>,
  path: web::Path<String>,
  dto: web::Json<UpdateUserDto>,
) -> ApiResult<HttpResponse> {
  let user_id = path.into_inner();
  caller.ensure_owner(&user_id)?;
  dto.validate()?;

  let current = data
    .users
    .find_profile(&user_id)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;
  let dto = dto.into_inner();

  let email = match dto.email.as_deref().map(normalize_email) {
    Some(email) if email != current.email => {
      if data
        .users
        .find_one(FindOneProperty::Email(&email))
        .await?
        .is_some()
      {
        return Err(ApiError::bad_request(DUPLICATE_EMAIL));
      }
      email
    }
    _ => current.email.clone(),
  };

  let password_hash = match &dto.password {
    Some(password) => Some(data.hasher.hash_password(password).await?),
    None => None,
  };

  let technologies = match &dto.technologies {
    Some(names) => resolve_names(data.technologies.as_ref(), names).await?,
    None => current.technologies.clone(),
  };

  let update = merge(current, dto, email, password_hash, technologies)?;
  let changed_password = update.password_hash.is_some();
  let user = data
    .users
    .update_profile(&user_id, update)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

  info!(user = %user.id, changed_password, "profile updated");
  Ok(HttpResponse::Ok().json(UserRto::from(user)))
}

/// Overlays the request on the stored profile and checks the freelancer
/// invariant on the result.
fn merge(
  current: User,
  dto: UpdateUserDto,
  email: String,
  password_hash: Option<String>,
  technologies: Vec<String>,
) -> ApiResult<ProfileUpdate> {
  let is_freelancer = dto.is_freelancer.unwrap_or(current.is_freelancer);
  let tarifa = dto.tarifa.or(current.tarifa);
  if is_freelancer && tarifa.is_none() {
    return Err(ApiError::bad_request("Tarifa is required for freelancers"));
  }

  Ok(ProfileUpdate {
    name: dto
      .name
      .map(|name| name.trim().to_string())
      .unwrap_or(current.name),
    email,
    password_hash,
    is_freelancer,
    tarifa,
    bio: dto.bio.or(current.bio),
    links: dto.links.map(UserLinks::from).unwrap_or(current.links),
    availability: dto.availability.or(current.availability),
    technologies,
    updated_at: Utc::now(),
  })
}
