use serde::Deserialize;
use utoipa::ToSchema;
use validator_derive::Validate;

#[derive(ToSchema, Debug, Clone, Deserialize, Validate)]
pub struct CreateTechnologyDto {
  #[validate(length(
    min = 1,
    max = 50,
    message = "Name must have between 1 and 50 characters"
  ))]
  pub name: String,
}
