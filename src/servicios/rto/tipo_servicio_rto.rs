use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::servicios::model::tipo_servicio::TipoServicio;

#[derive(ToSchema, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipoServicioRto {
  pub id: String,
  pub name: String,
  pub description: Option<String>,
}

impl From<TipoServicio> for TipoServicioRto {
  fn from(tipo: TipoServicio) -> Self {
    Self {
      id: tipo.id,
      name: tipo.name,
      description: tipo.description,
    }
  }
}
