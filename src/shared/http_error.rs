use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::linkedin::client::LinkedInError;
use crate::shared::hash_worker::HashWorkerError;
use crate::shared::repository::RepositoryError;

/// Body of every non-validation error response.
#[derive(ToSchema, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpError {
  pub message: String,
}

impl From<&str> for HttpError {
  fn from(message: &str) -> Self {
    Self {
      message: message.to_string(),
    }
  }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Validation failed: {0}")]
  Validation(#[from] ValidationErrors),
  #[error("{0}")]
  BadRequest(String),
  #[error("{0}")]
  Unauthorized(String),
  #[error("{0}")]
  Forbidden(String),
  #[error("{0}")]
  NotFound(String),
  #[error("{0}")]
  Unavailable(String),
  #[error("LinkedIn error: {0}")]
  LinkedIn(#[from] LinkedInError),
  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
  #[error("Hash worker error: {0}")]
  Hash(#[from] HashWorkerError),
  #[error("Token error: {0}")]
  Token(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::BadRequest(message.into())
  }

  pub fn unauthorized(message: impl Into<String>) -> Self {
    Self::Unauthorized(message.into())
  }

  pub fn forbidden(message: impl Into<String>) -> Self {
    Self::Forbidden(message.into())
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::NotFound(message.into())
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      Self::Forbidden(_) => StatusCode::FORBIDDEN,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      Self::LinkedIn(_) => StatusCode::BAD_GATEWAY,
      Self::Repository(RepositoryError::Duplicate(_)) => StatusCode::BAD_REQUEST,
      Self::Repository(_) | Self::Hash(_) | Self::Token(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let mut builder = HttpResponse::build(self.status_code());
    match self {
      Self::Validation(errors) => builder.json(errors),
      Self::Repository(RepositoryError::Duplicate(message)) => {
        builder.json(HttpError::from(message.as_str()))
      }
      Self::LinkedIn(error) => {
        error!(error = %error, "linkedin exchange failed");
        builder.json(HttpError::from("LinkedIn request failed"))
      }
      Self::Repository(_) | Self::Hash(_) | Self::Token(_) => {
        error!(error = %self, "request failed");
        builder.json(HttpError::from("Internal server error"))
      }
      _ => builder.json(HttpError {
        message: self.to_string(),
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;
  use validator::ValidationError;

  async fn body_of(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.error_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[actix_web::test]
  async fn test_client_errors_expose_their_message() {
    let (status, body) = body_of(ApiError::not_found("User not found")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
  }

  #[actix_web::test]
  async fn test_internal_errors_are_redacted() {
    let error = ApiError::Repository(RepositoryError::Mongo(
      mongodb::error::Error::custom("connection refused at 10.0.0.3"),
    ));
    let (status, body) = body_of(error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
  }

  #[actix_web::test]
  async fn test_duplicates_are_bad_requests() {
    let error = ApiError::Repository(RepositoryError::Duplicate(String::from(
      "Email already registered",
    )));
    let (status, body) = body_of(error).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");
  }

  #[actix_web::test]
  async fn test_validation_errors_keep_field_details() {
    let mut errors = ValidationErrors::new();
    errors.add("rating", ValidationError::new("range"));
    let (status, body) = body_of(ApiError::from(errors)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("rating").is_some());
  }
}
