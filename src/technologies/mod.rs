pub mod dto;
pub mod model;
pub mod repository;
pub mod rto;

use actix_web::{web, HttpResponse};
use dto::create_technology_dto::CreateTechnologyDto;
use model::technology::{normalize, Technology};
use nanoid::nanoid;
use repository::technology_repository::TechnologyRepository;
use rto::technology_rto::TechnologyRto;
use tracing::info;
use validator::Validate;

use crate::shared::http_error::{ApiError, ApiResult, HttpError};
use crate::shared::repository::RepositoryError;
use crate::AppState;

/// Returns the catalog entry for `name`, creating it when missing. The flag
/// tells whether it was created by this call.
pub async fn find_or_create(
  technologies: &dyn TechnologyRepository,
  name: &str,
) -> ApiResult<(Technology, bool)> {
  let name = normalize(name)
    .ok_or_else(|| ApiError::bad_request("Technology name must not be blank"))?;

  if let Some(existing) = technologies.find_by_name(&name).await? {
    return Ok((existing, false));
  }

  let technology = Technology {
    id: nanoid!(),
    name,
  };
  match technologies.create(technology.clone()).await {
    Ok(()) => {
      info!(technology = %technology.name, "technology created");
      Ok((technology, true))
    }
    // Lost a race against a concurrent insert of the same name.
    Err(RepositoryError::Duplicate(_)) => technologies
      .find_by_name(&technology.name)
      .await?
      .map(|existing| (existing, false))
      .ok_or_else(|| ApiError::not_found("Technology not found")),
    Err(error) => Err(error.into()),
  }
}

/// Normalizes, deduplicates and registers every name in the catalog.
pub async fn resolve_names(
  technologies: &dyn TechnologyRepository,
  names: &[String],
) -> ApiResult<Vec<String>> {
  let mut resolved: Vec<String> = Vec::with_capacity(names.len());
  for name in names {
    let (technology, _) = find_or_create(technologies, name).await?;
    if !resolved.contains(&technology.name) {
      resolved.push(technology.name);
    }
  }
  Ok(resolved)
}

#[utoipa::path(
  get,
  path = "/api/technologies",
  tag = "technologies",
  responses(
    (status = 200, description = "Technology catalog sorted by name", body = Vec<TechnologyRto>)
  )
)]
pub async fn list_technologies(
  data: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
  let technologies = data.technologies.find_all().await?;
  Ok(HttpResponse::Ok().json(
    technologies
      .into_iter()
      .map(TechnologyRto::from)
      .collect::<Vec<_>>(),
  ))
}

#[utoipa::path(
  post,
  path = "/api/technologies",
  tag = "technologies",
  request_body = CreateTechnologyDto,
  security(("bearer_auth" = [])),
  responses(
    (status = 201, description = "Technology created", body = TechnologyRto),
    (status = 200, description = "Technology already existed", body = TechnologyRto),
    (status = 400, description = "Invalid name", body = HttpError),
    (status = 401, description = "Missing or invalid token", body = HttpError)
  )
)]
pub async fn create_technology(
  data: web::Data<AppState>,
  dto: web::Json<CreateTechnologyDto>,
) -> ApiResult<HttpResponse> {
  dto.validate()?;

  let (technology, created) =
    find_or_create(data.technologies.as_ref(), &dto.name).await?;
  let rto = TechnologyRto::from(technology);
  if created {
    Ok(HttpResponse::Created().json(rto))
  } else {
    Ok(HttpResponse::Ok().json(rto))
  }
}
