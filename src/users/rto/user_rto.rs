use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::users::model::user::{LinkedInProfile, Servicio, User, UserLinks};

/// Public view of a user. Never carries the password hash.
#[derive(ToSchema, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRto {
  pub id: String,
  pub name: String,
  pub email: String,
  pub is_freelancer: bool,
  pub tarifa: Option<f64>,
  pub bio: Option<String>,
  pub links: UserLinks,
  pub availability: Option<String>,
  pub technologies: Vec<String>,
  pub servicios: Vec<Servicio>,
  pub opinions: Vec<String>,
  pub linkedin: Option<LinkedInProfile>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<User> for UserRto {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      name: user.name,
      email: user.email,
      is_freelancer: user.is_freelancer,
      tarifa: user.tarifa,
      bio: user.bio,
      links: user.links,
      availability: user.availability,
      technologies: user.technologies,
      servicios: user.servicios,
      opinions: user.opinions,
      linkedin: user.linkedin,
      created_at: user.created_at,
      updated_at: user.updated_at,
    }
  }
}
