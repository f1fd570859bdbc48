use std::{
  sync::{Arc, RwLock},
  time::Duration,
};

use actix_web::rt::spawn;
use actix_web::rt::time::interval;
use actix_web::{web, HttpResponse, Responder};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::AppState;

const PROBE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(ToSchema, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckStats {
  pub database_status: String,
  pub database_name: String,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
  async fn ping(&self) -> bool;
  fn name(&self) -> String;
}

#[cfg_attr(test, automock)]
pub trait HealthCheck: Send + Sync {
  fn collect(&self) -> Option<HealthCheckStats>;
}

/// Pings the database in the background and serves the last result, so the
/// health endpoint never waits on MongoDB.
pub struct HealthCheckImpl {
  last_health_check_stats: Arc<RwLock<Option<HealthCheckStats>>>,
}

impl HealthCheckImpl {
  pub fn new(probe: Arc<dyn DatabaseProbe>) -> Self {
    let stats_storage: Arc<RwLock<Option<HealthCheckStats>>> =
      Arc::new(RwLock::new(None));

    spawn({
      let stats_storage = stats_storage.clone();
      async move {
        let mut interval = interval(PROBE_INTERVAL);
        loop {
          interval.tick().await;
          let stats = probe_once(probe.as_ref()).await;
          if stats.database_status != "connected" {
            warn!(database = %stats.database_name, "database ping failed");
          }
          if let Ok(mut current) = stats_storage.write() {
            *current = Some(stats);
          }
        }
      }
    });

    Self {
      last_health_check_stats: stats_storage,
    }
  }
}

async fn probe_once(probe: &dyn DatabaseProbe) -> HealthCheckStats {
  HealthCheckStats {
    database_status: String::from(if probe.ping().await {
      "connected"
    } else {
      "unreachable"
    }),
    database_name: probe.name(),
  }
}

impl HealthCheck for HealthCheckImpl {
  fn collect(&self) -> Option<HealthCheckStats> {
    self
      .last_health_check_stats
      .read()
      .ok()
      .and_then(|stats| stats.clone())
  }
}

#[utoipa::path(
  get,
  path = "/health",
  tag = "health",
  responses(
    (status = 200, description = "Last database probe, null before the first one", body = Option<HealthCheckStats>)
  )
)]
pub async fn check_health(data: web::Data<AppState>) -> impl Responder {
  HttpResponse::Ok().json(data.health_check.collect())
}
