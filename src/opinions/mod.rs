pub mod dto;
pub mod model;
pub mod repository;
pub mod rto;

use actix_web::{http::header, web, HttpResponse};
use chrono::Utc;
use dto::create_opinion_dto::CreateOpinionDto;
use model::opinion::Opinion;
use nanoid::nanoid;
use rto::opinion_rto::OpinionRto;
use tracing::{info, warn};
use validator::Validate;

use crate::shared::http_error::{ApiError, ApiResult, HttpError};
use crate::shared::middleware::bearer_auth::AuthenticatedUser;
use crate::AppState;

#[utoipa::path(
  post,
  path = "/api/opinions",
  tag = "opinions",
  request_body = CreateOpinionDto,
  security(("bearer_auth" = [])),
  responses(
    (status = 201, description = "Opinion stored and linked to the recipient", body = OpinionRto),
    (status = 400, description = "Invalid rating or comment, or a self review"),
    (status = 401, description = "Missing or invalid token", body = HttpError),
    (status = 404, description = "Recipient not found", body = HttpError)
  )
)]
pub async fn create_opinion(
  data: web::Data<AppState>,
  author: web::ReqData<AuthenticatedUser>,
  dto: web::Json<CreateOpinionDto>,
) -> ApiResult<HttpResponse> {
  // Length limits apply to the comment as stored.
  let mut dto = dto.into_inner();
  dto.comment = dto.comment.trim().to_string();
  dto.validate()?;

  if dto.recipient == author.id() {
    return Err(ApiError::bad_request("You cannot review yourself"));
  }
  if data.users.find_profile(&dto.recipient).await?.is_none() {
    return Err(ApiError::not_found("Recipient not found"));
  }

  let opinion = Opinion {
    id: nanoid!(),
    author: author.id().to_string(),
    recipient: dto.recipient,
    rating: dto.rating,
    comment: dto.comment,
    created_at: Utc::now(),
  };

  data.opinions.create(opinion.clone()).await?;
  // Not transactional: a recipient deleted in between keeps a dangling opinion.
  if !data
    .users
    .add_opinion(&opinion.recipient, &opinion.id)
    .await?
  {
    warn!(opinion = %opinion.id, "recipient vanished before the opinion was linked");
  }

  info!(opinion = %opinion.id, recipient = %opinion.recipient, rating = opinion.rating, "opinion created");
  Ok(
    HttpResponse::Created()
      .append_header((
        header::LOCATION,
        format!("/api/opinions/user/{}", &opinion.recipient),
      ))
      .json(OpinionRto::from(opinion)),
  )
}

#[utoipa::path(
  get,
  path = "/api/opinions/user/{id}",
  tag = "opinions",
  params(("id" = String, Path, description = "Recipient user id")),
  responses(
    (status = 200, description = "Opinions received by the user, newest first", body = Vec<OpinionRto>),
    (status = 404, description = "User not found", body = HttpError)
  )
)]
pub async fn list_user_opinions(
  data: web::Data<AppState>,
  path: web::Path<String>,
) -> ApiResult<HttpResponse> {
  let user_id = path.into_inner();
  if data.users.find_profile(&user_id).await?.is_none() {
    return Err(ApiError::not_found("User not found"));
  }

  let opinions = data.opinions.find_by_recipient(&user_id).await?;
  Ok(HttpResponse::Ok().json(
    opinions
      .into_iter()
      .map(OpinionRto::from)
      .collect::<Vec<_>>(),
  ))
}
