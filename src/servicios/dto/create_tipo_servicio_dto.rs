use serde::Deserialize;
use utoipa::ToSchema;
use validator_derive::Validate;

#[derive(ToSchema, Debug, Clone, Deserialize, Validate)]
pub struct CreateTipoServicioDto {
  #[validate(length(
    min = 1,
    max = 80,
    message = "Name must have between 1 and 80 characters"
  ))]
  pub name: String,
  #[validate(length(max = 500))]
  pub description: Option<String>,
}
