use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::opinions::model::opinion::Opinion;

#[derive(ToSchema, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpinionRto {
  pub id: String,
  pub author: String,
  pub recipient: String,
  pub rating: u8,
  pub comment: String,
  pub created_at: DateTime<Utc>,
}

impl From<Opinion> for OpinionRto {
  fn from(opinion: Opinion) -> Self {
    Self {
      id: opinion.id,
      author: opinion.author,
      recipient: opinion.recipient,
      rating: opinion.rating,
      comment: opinion.comment,
      created_at: opinion.created_at,
    }
  }
}
