use async_trait::async_trait;
use futures_util::TryStreamExt;
#[cfg(test)]
use mockall::automock;
use mongodb::{bson::doc, Collection};

use crate::{
  servicios::model::tipo_servicio::TipoServicio,
  shared::{
    database::{MongoDatabase, TIPOS_SERVICIO},
    repository::{map_write_error, RepositoryError},
  },
};

pub const DUPLICATE_TIPO_SERVICIO: &str = "Service type already exists";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TipoServicioRepository: Send + Sync {
  /// Sorted by name.
  async fn find_all(&self) -> Result<Vec<TipoServicio>, RepositoryError>;
  async fn find_by_id(
    &self,
    id: &str,
  ) -> Result<Option<TipoServicio>, RepositoryError>;
  /// Looks up by normalized key, see [`TipoServicio::key_for`].
  async fn find_by_key(
    &self,
    key: &str,
  ) -> Result<Option<TipoServicio>, RepositoryError>;
  async fn create(&self, tipo: TipoServicio) -> Result<(), RepositoryError>;
}

pub struct MongoTipoServicioRepository {
  tipos: Collection<TipoServicio>,
}

impl MongoTipoServicioRepository {
  pub fn new(database: &MongoDatabase) -> Self {
    Self {
      tipos: database.database.collection(TIPOS_SERVICIO),
    }
  }
}

#[async_trait]
impl TipoServicioRepository for MongoTipoServicioRepository {
  async fn find_all(&self) -> Result<Vec<TipoServicio>, RepositoryError> {
    let tipos: Vec<TipoServicio> = self
      .tipos
      .find(doc! {})
      .sort(doc! { "key": 1 })
      .await?
      .try_collect()
      .await?;
    Ok(tipos)
  }

  async fn find_by_id(
    &self,
    id: &str,
  ) -> Result<Option<TipoServicio>, RepositoryError> {
    Ok(self.tipos.find_one(doc! { "_id": id }).await?)
  }

  async fn find_by_key(
    &self,
    key: &str,
  ) -> Result<Option<TipoServicio>, RepositoryError> {
    Ok(self.tipos.find_one(doc! { "key": key }).await?)
  }

  async fn create(&self, tipo: TipoServicio) -> Result<(), RepositoryError> {
    self
      .tipos
      .insert_one(&tipo)
      .await
      .map_err(|error| map_write_error(error, DUPLICATE_TIPO_SERVICIO))?;
    Ok(())
  }
}
