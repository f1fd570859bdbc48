use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database error: {0}")]
  Mongo(#[from] mongodb::error::Error),

  #[error("Serialization error: {0}")]
  Serialization(#[from] mongodb::bson::ser::Error),

  #[error("{0}")]
  Duplicate(String),
}

/// Maps a unique index violation to [`RepositoryError::Duplicate`] and keeps
/// every other driver error as is.
pub fn map_write_error(
  error: mongodb::error::Error,
  duplicate_message: &str,
) -> RepositoryError {
  match error.kind.as_ref() {
    ErrorKind::Write(WriteFailure::WriteError(write_error))
      if write_error.code == DUPLICATE_KEY_CODE =>
    {
      RepositoryError::Duplicate(duplicate_message.to_string())
    }
    // findAndModify reports index violations as a command error.
    ErrorKind::Command(command_error)
      if command_error.code == DUPLICATE_KEY_CODE =>
    {
      RepositoryError::Duplicate(duplicate_message.to_string())
    }
    _ => RepositoryError::Mongo(error),
  }
}
