use serde::Deserialize;
use utoipa::ToSchema;
use validator_derive::Validate;

#[derive(ToSchema, Debug, Clone, Deserialize, Validate)]
pub struct LoginDto {
  #[validate(email(message = "Email must be a valid address"))]
  pub email: String,
  #[validate(length(
    min = 1,
    message = "Password must have at least 1 characters"
  ))]
  pub password: String,
}
