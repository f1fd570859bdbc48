use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLinks {
  pub linkedin: Option<String>,
  pub github: Option<String>,
  pub portfolio: Option<String>,
}

/// A freelancer's priced offering of a catalog service type.
#[derive(ToSchema, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Servicio {
  pub id: String,
  pub tipo_servicio: String,
  pub description: Option<String>,
  pub price: f64,
}

#[derive(ToSchema, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInProfile {
  pub sub: String,
  pub name: Option<String>,
  pub email: Option<String>,
  pub picture: Option<String>,
  pub connected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  #[serde(rename = "_id")]
  pub id: String,
  pub name: String,
  pub email: String,
  /// Empty when the user was loaded through the password-less projection.
  #[serde(default)]
  pub password_hash: String,
  #[serde(default)]
  pub is_freelancer: bool,
  pub tarifa: Option<f64>,
  pub bio: Option<String>,
  #[serde(default)]
  pub links: UserLinks,
  pub availability: Option<String>,
  #[serde(default)]
  pub technologies: Vec<String>,
  #[serde(default)]
  pub servicios: Vec<Servicio>,
  #[serde(default)]
  pub opinions: Vec<String>,
  pub linkedin: Option<LinkedInProfile>,
  #[serde(with = "chrono_datetime_as_bson_datetime")]
  pub created_at: DateTime<Utc>,
  #[serde(with = "chrono_datetime_as_bson_datetime")]
  pub updated_at: DateTime<Utc>,
}

/// Editable profile fields after merging a request with the stored user.
/// `password_hash` is only written when present.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
  pub name: String,
  pub email: String,
  pub password_hash: Option<String>,
  pub is_freelancer: bool,
  pub tarifa: Option<f64>,
  pub bio: Option<String>,
  pub links: UserLinks,
  pub availability: Option<String>,
  pub technologies: Vec<String>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  pub fn apply(&mut self, update: ProfileUpdate) {
    self.name = update.name;
    self.email = update.email;
    if let Some(password_hash) = update.password_hash {
      self.password_hash = password_hash;
    }
    self.is_freelancer = update.is_freelancer;
    self.tarifa = update.tarifa;
    self.bio = update.bio;
    self.links = update.links;
    self.availability = update.availability;
    self.technologies = update.technologies;
    self.updated_at = update.updated_at;
  }

  /// Clone without the password hash, what a projected lookup returns.
  pub fn without_password(&self) -> Self {
    Self {
      password_hash: String::new(),
      ..self.clone()
    }
  }
}
