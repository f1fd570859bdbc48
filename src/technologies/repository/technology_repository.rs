use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
  shared::{
    database::{MongoDatabase, TECHNOLOGIES},
    repository::{map_write_error, RepositoryError},
  },
  technologies::model::technology::Technology,
};

pub const DUPLICATE_TECHNOLOGY: &str = "Technology already exists";

#[async_trait]
pub trait TechnologyRepository: Send + Sync {
  /// Sorted by name.
  async fn find_all(&self) -> Result<Vec<Technology>, RepositoryError>;
  async fn find_by_name(
    &self,
    name: &str,
  ) -> Result<Option<Technology>, RepositoryError>;
  async fn create(&self, technology: Technology) -> Result<(), RepositoryError>;
}

pub struct MongoTechnologyRepository {
  technologies: Collection<Technology>,
}

impl MongoTechnologyRepository {
  pub fn new(database: &MongoDatabase) -> Self {
    Self {
      technologies: database.database.collection(TECHNOLOGIES),
    }
  }
}

#[async_trait]
impl TechnologyRepository for MongoTechnologyRepository {
  async fn find_all(&self) -> Result<Vec<Technology>, RepositoryError> {
    let technologies: Vec<Technology> = self
      .technologies
      .find(doc! {})
      .sort(doc! { "name": 1 })
      .await?
      .try_collect()
      .await?;
    Ok(technologies)
  }

  async fn find_by_name(
    &self,
    name: &str,
  ) -> Result<Option<Technology>, RepositoryError> {
    Ok(self.technologies.find_one(doc! { "name": name }).await?)
  }

  async fn create(&self, technology: Technology) -> Result<(), RepositoryError> {
    self
      .technologies
      .insert_one(&technology)
      .await
      .map_err(|error| map_write_error(error, DUPLICATE_TECHNOLOGY))?;
    Ok(())
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;
  use std::sync::{Arc, RwLock};

  pub struct InMemoryTechnologyRepository {
    pub technologies: Arc<RwLock<Vec<Technology>>>,
  }

  impl InMemoryTechnologyRepository {
    pub fn new() -> Self {
      Self {
        technologies: Arc::new(RwLock::new(Vec::new())),
      }
    }
  }

  #[async_trait]
  impl TechnologyRepository for InMemoryTechnologyRepository {
    async fn find_all(&self) -> Result<Vec<Technology>, RepositoryError> {
      let mut technologies = self.technologies.read().unwrap().clone();
      technologies.sort_by(|a, b| a.name.cmp(&b.name));
      Ok(technologies)
    }

    async fn find_by_name(
      &self,
      name: &str,
    ) -> Result<Option<Technology>, RepositoryError> {
      let technologies = self.technologies.read().unwrap();
      Ok(technologies.iter().find(|t| t.name == name).cloned())
    }

    async fn create(
      &self,
      technology: Technology,
    ) -> Result<(), RepositoryError> {
      let mut technologies = self.technologies.write().unwrap();
      if technologies.iter().any(|t| t.name == technology.name) {
        return Err(RepositoryError::Duplicate(
          DUPLICATE_TECHNOLOGY.to_string(),
        ));
      }
      technologies.push(technology);
      Ok(())
    }
  }
}
