use serde::Deserialize;
use utoipa::ToSchema;
use validator::ValidationError;
use validator::Validate as _;
use validator_derive::Validate;

use crate::users::dto::links_dto::LinksDto;

#[derive(ToSchema, Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_tarifa"))]
pub struct RegisterDto {
  #[validate(length(
    min = 1,
    max = 100,
    message = "Name must have between 1 and 100 characters"
  ))]
  pub name: String,
  #[validate(email(message = "Email must be a valid address"))]
  pub email: String,
  // bcrypt only reads the first 72 bytes.
  #[validate(length(
    min = 8,
    max = 72,
    message = "Password must have between 8 and 72 characters"
  ))]
  pub password: String,
  #[serde(default)]
  pub is_freelancer: bool,
  #[validate(range(exclusive_min = 0.0, message = "Tarifa must be positive"))]
  pub tarifa: Option<f64>,
  #[validate(length(max = 2000))]
  pub bio: Option<String>,
  #[validate(nested)]
  pub links: Option<LinksDto>,
  #[validate(length(max = 200))]
  pub availability: Option<String>,
  pub technologies: Option<Vec<String>>,
}

fn validate_tarifa(dto: &RegisterDto) -> Result<(), ValidationError> {
  if dto.is_freelancer && dto.tarifa.is_none() {
    return Err(
      ValidationError::new("tarifa_required")
        .with_message("Tarifa is required for freelancers".into()),
    );
  }
  Ok(())
}
