use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opinion {
  #[serde(rename = "_id")]
  pub id: String,
  pub author: String,
  pub recipient: String,
  /// Between 1 and 5.
  pub rating: u8,
  pub comment: String,
  #[serde(with = "chrono_datetime_as_bson_datetime")]
  pub created_at: DateTime<Utc>,
}
