use serde::Deserialize;
use utoipa::ToSchema;
use validator_derive::Validate;

#[derive(ToSchema, Debug, Clone, Deserialize, Validate)]
pub struct CreateOpinionDto {
  #[validate(length(min = 1, message = "Recipient is required"))]
  pub recipient: String,
  #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
  pub rating: u8,
  #[validate(length(
    min = 1,
    max = 1000,
    message = "Comment must have between 1 and 1000 characters"
  ))]
  pub comment: String,
}
