use async_trait::async_trait;
use bcrypt::{hash, verify, BcryptError};
#[cfg(test)]
use mockall::automock;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HashWorkerError {
  #[error("Bcrypt error: {0}")]
  Bcrypt(#[from] BcryptError),
  #[error("Thread pool error: {0}")]
  ThreadPool(#[from] ThreadPoolBuildError),
  #[error("Channel send error")]
  Send,
  #[error("Channel receive error")]
  Receive,
}

enum WorkOrder {
  Hash(String, flume::Sender<Result<String, HashWorkerError>>),
  Verify(String, String, flume::Sender<Result<bool, HashWorkerError>>),
}

/// Runs bcrypt on a dedicated rayon pool so request handlers never block an
/// actix worker while a password is hashed or verified.
pub struct HashWorker {
  // Dropped before the pool so the run-loops see a closed channel and exit.
  sender: flume::Sender<WorkOrder>,
  _thread_pool: ThreadPool,
}

impl HashWorker {
  pub fn new(num_threads: u32, cost: u32) -> Result<Self, HashWorkerError> {
    let num_threads = num_threads.max(1);
    let thread_pool = ThreadPoolBuilder::new()
      .num_threads(num_threads as usize)
      .thread_name(|index| format!("hash-worker-{index}"))
      .build()?;

    // A default-cost hash takes a few hundred milliseconds, three queued
    // orders per thread keeps the pool busy without unbounded buffering.
    let (tx, rx) = flume::bounded::<WorkOrder>((num_threads * 3) as usize);
    let rx = Arc::new(rx);

    for _ in 0..num_threads {
      thread_pool.spawn({
        let rx = Arc::clone(&rx);
        move || {
          while let Ok(work_order) = rx.recv() {
            match work_order {
              WorkOrder::Hash(password, response) => {
                let _ = response
                  .send(hash(password, cost).map_err(HashWorkerError::from));
              }
              WorkOrder::Verify(password, password_hash, response) => {
                let _ = response.send(
                  verify(password, &password_hash)
                    .map_err(HashWorkerError::from),
                );
              }
            };
          }
        }
      });
    }

    Ok(Self {
      sender: tx,
      _thread_pool: thread_pool,
    })
  }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Hasher: Send + Sync {
  async fn hash_password(
    &self,
    password: &str,
  ) -> Result<String, HashWorkerError>;
  async fn verify_password(
    &self,
    password: &str,
    hash: &str,
  ) -> Result<bool, HashWorkerError>;
}

#[async_trait]
impl Hasher for HashWorker {
  async fn hash_password(
    &self,
    password: &str,
  ) -> Result<String, HashWorkerError> {
    let (response_tx, response_rx) = flume::bounded(1);
    self
      .sender
      .send_async(WorkOrder::Hash(password.to_string(), response_tx))
      .await
      .map_err(|_| HashWorkerError::Send)?;

    response_rx
      .recv_async()
      .await
      .map_err(|_| HashWorkerError::Receive)?
  }

  async fn verify_password(
    &self,
    password: &str,
    hash: &str,
  ) -> Result<bool, HashWorkerError> {
    let (response_tx, response_rx) = flume::bounded(1);
    self
      .sender
      .send_async(WorkOrder::Verify(
        password.to_string(),
        hash.to_string(),
        response_tx,
      ))
      .await
      .map_err(|_| HashWorkerError::Send)?;

    response_rx
      .recv_async()
      .await
      .map_err(|_| HashWorkerError::Receive)?
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use fake::{faker::internet::en::Password, Fake};

  // bcrypt's minimum cost keeps the tests fast.
  const TEST_COST: u32 = 4;

  #[actix_web::test]
  async fn test_hash_and_verify_password() {
    let hash_worker = HashWorker::new(2, TEST_COST).expect("pool");
    let password = Password(12..13).fake::<String>();

    let hashed_password = hash_worker
      .hash_password(&password)
      .await
      .expect("Hashing failed");
    assert_ne!(hashed_password, password);

    let is_valid = hash_worker
      .verify_password(&password, &hashed_password)
      .await
      .expect("Verification failed");
    assert!(is_valid, "The password verification failed");

    let is_invalid = hash_worker
      .verify_password("wrong_password", &hashed_password)
      .await
      .expect("Verification failed for invalid password");
    assert!(!is_invalid, "The password verification should have failed");
  }

  #[actix_web::test]
  async fn test_verify_against_malformed_hash_is_an_error() {
    let hash_worker = HashWorker::new(1, TEST_COST).expect("pool");
    let result = hash_worker.verify_password("secret", "not-a-hash").await;
    assert!(matches!(result, Err(HashWorkerError::Bcrypt(_))));
  }

  #[actix_web::test]
  async fn test_zero_threads_still_serves_requests() {
    let hash_worker = HashWorker::new(0, TEST_COST).expect("pool");
    let hashed = hash_worker.hash_password("secret").await.expect("hash");
    assert!(hashed.starts_with("$2"));
  }
}
