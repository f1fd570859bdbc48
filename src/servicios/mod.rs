pub mod dto;
pub mod model;
pub mod repository;
pub mod rto;

use actix_web::{web, HttpResponse};
use dto::{
  create_servicio_dto::CreateServicioDto,
  create_tipo_servicio_dto::CreateTipoServicioDto,
};
use model::tipo_servicio::TipoServicio;
use nanoid::nanoid;
use repository::tipo_servicio_repository::DUPLICATE_TIPO_SERVICIO;
use rto::tipo_servicio_rto::TipoServicioRto;
use tracing::info;
use validator::Validate;

use crate::shared::http_error::{ApiError, ApiResult, HttpError};
use crate::shared::middleware::bearer_auth::AuthenticatedUser;
use crate::users::model::user::Servicio;
use crate::AppState;

#[utoipa::path(
  get,
  path = "/api/tipos-servicio",
  tag = "servicios",
  responses(
    (status = 200, description = "Service type catalog", body = Vec<TipoServicioRto>)
  )
)]
pub async fn list_tipos_servicio(
  data: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
  let tipos = data.tipos_servicio.find_all().await?;
  Ok(HttpResponse::Ok().json(
    tipos
      .into_iter()
      .map(TipoServicioRto::from)
      .collect::<Vec<_>>(),
  ))
}

#[utoipa::path(
  post,
  path = "/api/tipos-servicio",
  tag = "servicios",
  request_body = CreateTipoServicioDto,
  security(("bearer_auth" = [])),
  responses(
    (status = 201, description = "Service type created", body = TipoServicioRto),
    (status = 400, description = "Invalid or duplicate name", body = HttpError),
    (status = 401, description = "Missing or invalid token", body = HttpError)
  )
)]
pub async fn create_tipo_servicio(
  data: web::Data<AppState>,
  dto: web::Json<CreateTipoServicioDto>,
) -> ApiResult<HttpResponse> {
  dto.validate()?;

  let dto = dto.into_inner();
  let key = TipoServicio::key_for(&dto.name)
    .ok_or_else(|| ApiError::bad_request("Name must not be blank"))?;
  if data.tipos_servicio.find_by_key(&key).await?.is_some() {
    return Err(ApiError::bad_request(DUPLICATE_TIPO_SERVICIO));
  }
  let tipo = TipoServicio {
    id: nanoid!(),
    name: dto.name.trim().to_string(),
    key,
    description: dto.description,
  };

  data.tipos_servicio.create(tipo.clone()).await?;
  info!(tipo = %tipo.name, "service type created");
  Ok(HttpResponse::Created().json(TipoServicioRto::from(tipo)))
}

#[utoipa::path(
  post,
  path = "/api/users/{id}/servicios",
  tag = "servicios",
  params(("id" = String, Path, description = "Freelancer id, must be the caller")),
  request_body = CreateServicioDto,
  security(("bearer_auth" = [])),
  responses(
    (status = 201, description = "Offering added to the profile", body = Servicio),
    (status = 400, description = "Invalid offering"),
    (status = 401, description = "Missing or invalid token", body = HttpError),
    (status = 403, description = "Not the caller's profile", body = HttpError),
    (status = 404, description = "Unknown service type", body = HttpError)
  )
)]
pub async fn add_servicio(
  data: web::Data<AppState>,
  user: web::ReqData<AuthenticatedUser>,
  path: web::Path<String>,
  dto: web::Json<CreateServicioDto>,
) -> ApiResult<HttpResponse> {
  let user_id = path.into_inner();
  user.ensure_owner(&user_id)?;
  dto.validate()?;

  if !user.0.is_freelancer {
    return Err(ApiError::bad_request("Only freelancers can offer services"));
  }
  if data
    .tipos_servicio
    .find_by_id(&dto.tipo_servicio)
    .await?
    .is_none()
  {
    return Err(ApiError::not_found("Service type not found"));
  }

  let dto = dto.into_inner();
  let servicio = Servicio {
    id: nanoid!(),
    tipo_servicio: dto.tipo_servicio,
    description: dto.description,
    price: dto.price,
  };
  if !data.users.push_servicio(&user_id, servicio.clone()).await? {
    return Err(ApiError::not_found("User not found"));
  }
  Ok(HttpResponse::Created().json(servicio))
}

#[utoipa::path(
  delete,
  path = "/api/users/{id}/servicios/{servicio_id}",
  tag = "servicios",
  params(
    ("id" = String, Path, description = "Freelancer id, must be the caller"),
    ("servicio_id" = String, Path, description = "Offering id")
  ),
  security(("bearer_auth" = [])),
  responses(
    (status = 204, description = "Offering removed"),
    (status = 401, description = "Missing or invalid token", body = HttpError),
    (status = 403, description = "Not the caller's profile", body = HttpError),
    (status = 404, description = "Offering not found", body = HttpError)
  )
)]
pub async fn remove_servicio(
  data: web::Data<AppState>,
  user: web::ReqData<AuthenticatedUser>,
  path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
  let (user_id, servicio_id) = path.into_inner();
  user.ensure_owner(&user_id)?;

  if !data.users.pull_servicio(&user_id, &servicio_id).await? {
    return Err(ApiError::not_found("Service not found"));
  }
  Ok(HttpResponse::NoContent().finish())
}
