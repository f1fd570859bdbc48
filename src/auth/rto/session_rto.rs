use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::users::rto::user_rto::UserRto;

#[derive(ToSchema, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRto {
  pub token: String,
  pub user: UserRto,
}
