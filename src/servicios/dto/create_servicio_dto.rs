use serde::Deserialize;
use utoipa::ToSchema;
use validator_derive::Validate;

#[derive(ToSchema, Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicioDto {
  #[validate(length(min = 1, message = "Service type is required"))]
  pub tipo_servicio: String,
  #[validate(length(max = 500))]
  pub description: Option<String>,
  #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
  pub price: f64,
}
