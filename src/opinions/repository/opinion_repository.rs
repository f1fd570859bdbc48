use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
  opinions::model::opinion::Opinion,
  shared::{
    database::{MongoDatabase, OPINIONS},
    repository::RepositoryError,
  },
};

#[async_trait]
pub trait OpinionRepository: Send + Sync {
  async fn create(&self, opinion: Opinion) -> Result<(), RepositoryError>;
  /// Newest first.
  async fn find_by_recipient(
    &self,
    recipient: &str,
  ) -> Result<Vec<Opinion>, RepositoryError>;
}

pub struct MongoOpinionRepository {
  opinions: Collection<Opinion>,
}

impl MongoOpinionRepository {
  pub fn new(database: &MongoDatabase) -> Self {
    Self {
      opinions: database.database.collection(OPINIONS),
    }
  }
}

#[async_trait]
impl OpinionRepository for MongoOpinionRepository {
  async fn create(&self, opinion: Opinion) -> Result<(), RepositoryError> {
    self.opinions.insert_one(&opinion).await?;
    Ok(())
  }

  async fn find_by_recipient(
    &self,
    recipient: &str,
  ) -> Result<Vec<Opinion>, RepositoryError> {
    let opinions: Vec<Opinion> = self
      .opinions
      .find(doc! { "recipient": recipient })
      .sort(doc! { "createdAt": -1 })
      .await?
      .try_collect()
      .await?;
    Ok(opinions)
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;
  use std::sync::{Arc, RwLock};

  pub struct InMemoryOpinionRepository {
    pub opinions: Arc<RwLock<Vec<Opinion>>>,
  }

  impl InMemoryOpinionRepository {
    pub fn new() -> Self {
      Self {
        opinions: Arc::new(RwLock::new(Vec::new())),
      }
    }
  }

  #[async_trait]
  impl OpinionRepository for InMemoryOpinionRepository {
    async fn create(&self, opinion: Opinion) -> Result<(), RepositoryError> {
      self.opinions.write().unwrap().push(opinion);
      Ok(())
    }

    async fn find_by_recipient(
      &self,
      recipient: &str,
    ) -> Result<Vec<Opinion>, RepositoryError> {
      let mut opinions: Vec<Opinion> = self
        .opinions
        .read()
        .unwrap()
        .iter()
        .filter(|opinion| opinion.recipient == recipient)
        .cloned()
        .collect();
      opinions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
      Ok(opinions)
    }
  }
}
