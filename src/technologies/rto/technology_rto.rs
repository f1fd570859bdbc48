use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::technologies::model::technology::Technology;

#[derive(ToSchema, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyRto {
  pub id: String,
  pub name: String,
}

impl From<Technology> for TechnologyRto {
  fn from(technology: Technology) -> Self {
    Self {
      id: technology.id,
      name: technology.name,
    }
  }
}
