use serde::Deserialize;
use utoipa::ToSchema;
use validator_derive::Validate;

use crate::users::model::user::UserLinks;

#[derive(ToSchema, Debug, Clone, Default, Deserialize, Validate)]
pub struct LinksDto {
  #[validate(url(message = "LinkedIn must be a valid URL"))]
  pub linkedin: Option<String>,
  #[validate(url(message = "GitHub must be a valid URL"))]
  pub github: Option<String>,
  #[validate(url(message = "Portfolio must be a valid URL"))]
  pub portfolio: Option<String>,
}

impl From<LinksDto> for UserLinks {
  fn from(dto: LinksDto) -> Self {
    Self {
      linkedin: dto.linkedin,
      github: dto.github,
      portfolio: dto.portfolio,
    }
  }
}
