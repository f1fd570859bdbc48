use serde::{Deserialize, Serialize};

use crate::technologies::model::technology::normalize;

/// A service category of the catalog, e.g. "Desarrollo web".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipoServicio {
  #[serde(rename = "_id")]
  pub id: String,
  pub name: String,
  /// Normalized name, unique across the catalog.
  pub key: String,
  pub description: Option<String>,
}

impl TipoServicio {
  pub fn key_for(name: &str) -> Option<String> {
    normalize(name)
  }
}
