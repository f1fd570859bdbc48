use async_trait::async_trait;
use mongodb::{
  bson::{doc, Document},
  options::IndexOptions,
  Client, Database, IndexModel,
};
use tracing::info;

use super::config::Config;
use super::health_check::DatabaseProbe;

pub const USERS: &str = "users";
pub const OPINIONS: &str = "opinions";
pub const TIPOS_SERVICIO: &str = "tipos_servicio";
pub const TECHNOLOGIES: &str = "technologies";

#[derive(Clone)]
pub struct MongoDatabase {
  pub database: Database,
}

impl MongoDatabase {
  pub async fn connect(config: &Config) -> Result<Self, mongodb::error::Error> {
    let client = Client::with_uri_str(&config.mongo_uri).await?;
    let database = client.database(&config.mongo_database);
    info!(database = %config.mongo_database, "mongodb client ready");
    Ok(Self { database })
  }

  /// Creates the indexes backing the uniqueness invariants. Safe to run on
  /// every start, MongoDB ignores indexes that already exist.
  pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
    self.unique_index(USERS, "email").await?;
    self.unique_index(TECHNOLOGIES, "name").await?;
    self.unique_index(TIPOS_SERVICIO, "key").await?;
    self
      .database
      .collection::<Document>(OPINIONS)
      .create_index(IndexModel::builder().keys(doc! { "recipient": 1 }).build())
      .await?;
    Ok(())
  }

  async fn unique_index(
    &self,
    collection: &str,
    field: &str,
  ) -> Result<(), mongodb::error::Error> {
    let index = IndexModel::builder()
      .keys(doc! { field: 1 })
      .options(IndexOptions::builder().unique(true).build())
      .build();
    self
      .database
      .collection::<Document>(collection)
      .create_index(index)
      .await?;
    Ok(())
  }
}

#[async_trait]
impl DatabaseProbe for MongoDatabase {
  async fn ping(&self) -> bool {
    self.database.run_command(doc! { "ping": 1 }).await.is_ok()
  }

  fn name(&self) -> String {
    self.database.name().to_string()
  }
}
