use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
  bson::{doc, to_bson, DateTime, Document},
  options::{FindOneOptions, FindOptions, ReturnDocument},
  Collection,
};

use crate::{
  shared::{
    database::{MongoDatabase, USERS},
    repository::{map_write_error, RepositoryError},
  },
  users::model::user::{LinkedInProfile, ProfileUpdate, Servicio, User},
};

pub const DUPLICATE_EMAIL: &str = "Email already registered";

pub enum FindOneProperty<'a> {
  Id(&'a str),
  Email(&'a str),
}

impl FindOneProperty<'_> {
  fn to_mongo_key_value(&self) -> Document {
    match self {
      FindOneProperty::Id(id) => doc! { "_id": *id },
      FindOneProperty::Email(email) => doc! { "email": *email },
    }
  }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
  async fn find_one(
    &self,
    property: FindOneProperty<'_>,
  ) -> Result<Option<User>, RepositoryError>;
  /// Same as an id lookup but the password hash never leaves the database.
  async fn find_profile(&self, id: &str)
    -> Result<Option<User>, RepositoryError>;
  async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;
  async fn find_freelancers(
    &self,
    technology: Option<&str>,
  ) -> Result<Vec<User>, RepositoryError>;
  async fn create(&self, user: User) -> Result<(), RepositoryError>;
  async fn update_profile(
    &self,
    id: &str,
    update: ProfileUpdate,
  ) -> Result<Option<User>, RepositoryError>;
  async fn add_opinion(
    &self,
    id: &str,
    opinion_id: &str,
  ) -> Result<bool, RepositoryError>;
  async fn push_servicio(
    &self,
    id: &str,
    servicio: Servicio,
  ) -> Result<bool, RepositoryError>;
  async fn pull_servicio(
    &self,
    id: &str,
    servicio_id: &str,
  ) -> Result<bool, RepositoryError>;
  async fn set_linkedin(
    &self,
    id: &str,
    profile: LinkedInProfile,
  ) -> Result<bool, RepositoryError>;
}

// ### MongoDB implementation ###

pub struct MongoUserRepository {
  users: Collection<User>,
}

impl MongoUserRepository {
  pub fn new(database: &MongoDatabase) -> Self {
    Self {
      users: database.database.collection(USERS),
    }
  }

  async fn find_many(
    &self,
    filter: Document,
  ) -> Result<Vec<User>, RepositoryError> {
    let options = FindOptions::builder()
      .projection(doc! { "passwordHash": 0 })
      .sort(doc! { "name": 1 })
      .build();
    let users: Vec<User> = self
      .users
      .find(filter)
      .with_options(options)
      .await?
      .try_collect()
      .await?;
    Ok(users)
  }

  async fn update_one(
    &self,
    id: &str,
    update: Document,
  ) -> Result<bool, RepositoryError> {
    let result = self.users.update_one(doc! { "_id": id }, update).await?;
    Ok(result.matched_count > 0)
  }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
  async fn find_one(
    &self,
    property: FindOneProperty<'_>,
  ) -> Result<Option<User>, RepositoryError> {
    Ok(self.users.find_one(property.to_mongo_key_value()).await?)
  }

  async fn find_profile(
    &self,
    id: &str,
  ) -> Result<Option<User>, RepositoryError> {
    let options = FindOneOptions::builder()
      .projection(doc! { "passwordHash": 0 })
      .build();
    Ok(
      self
        .users
        .find_one(doc! { "_id": id })
        .with_options(options)
        .await?,
    )
  }

  async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
    self.find_many(doc! {}).await
  }

  async fn find_freelancers(
    &self,
    technology: Option<&str>,
  ) -> Result<Vec<User>, RepositoryError> {
    let mut filter = doc! { "isFreelancer": true };
    if let Some(technology) = technology {
      filter.insert("technologies", technology);
    }
    self.find_many(filter).await
  }

  async fn create(&self, user: User) -> Result<(), RepositoryError> {
    self
      .users
      .insert_one(&user)
      .await
      .map_err(|error| map_write_error(error, DUPLICATE_EMAIL))?;
    Ok(())
  }

  async fn update_profile(
    &self,
    id: &str,
    update: ProfileUpdate,
  ) -> Result<Option<User>, RepositoryError> {
    let mut set = doc! {
      "name": update.name,
      "email": update.email,
      "isFreelancer": update.is_freelancer,
      "tarifa": update.tarifa,
      "bio": update.bio,
      "links": to_bson(&update.links)?,
      "availability": update.availability,
      "technologies": update.technologies,
      "updatedAt": DateTime::from_chrono(update.updated_at),
    };
    if let Some(password_hash) = update.password_hash {
      set.insert("passwordHash", password_hash);
    }

    self
      .users
      .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
      .return_document(ReturnDocument::After)
      .projection(doc! { "passwordHash": 0 })
      .await
      .map_err(|error| map_write_error(error, DUPLICATE_EMAIL))
  }

  async fn add_opinion(
    &self,
    id: &str,
    opinion_id: &str,
  ) -> Result<bool, RepositoryError> {
    self
      .update_one(id, doc! { "$addToSet": { "opinions": opinion_id } })
      .await
  }

  async fn push_servicio(
    &self,
    id: &str,
    servicio: Servicio,
  ) -> Result<bool, RepositoryError> {
    self
      .update_one(id, doc! { "$push": { "servicios": to_bson(&servicio)? } })
      .await
  }

  async fn pull_servicio(
    &self,
    id: &str,
    servicio_id: &str,
  ) -> Result<bool, RepositoryError> {
    let result = self
      .users
      .update_one(
        doc! { "_id": id },
        doc! { "$pull": { "servicios": { "id": servicio_id } } },
      )
      .await?;
    Ok(result.modified_count > 0)
  }

  async fn set_linkedin(
    &self,
    id: &str,
    profile: LinkedInProfile,
  ) -> Result<bool, RepositoryError> {
    let updated_at = DateTime::from_chrono(profile.connected_at);
    self
      .update_one(
        id,
        doc! { "$set": { "linkedin": to_bson(&profile)?, "updatedAt": updated_at } },
      )
      .await
  }
}
