use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate as _;
use validator_derive::Validate;

use super::links_dto::LinksDto;

/// Partial profile update, absent fields keep their stored value.
#[derive(ToSchema, Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
  #[validate(length(
    min = 1,
    max = 100,
    message = "Name must have between 1 and 100 characters"
  ))]
  pub name: Option<String>,
  #[validate(email(message = "Email must be a valid address"))]
  pub email: Option<String>,
  #[validate(length(
    min = 8,
    max = 72,
    message = "Password must have between 8 and 72 characters"
  ))]
  pub password: Option<String>,
  pub is_freelancer: Option<bool>,
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
