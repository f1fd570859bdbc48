use actix_governor::{
  governor::middleware::NoOpMiddleware, GovernorConfig, GovernorConfigBuilder,
  PeerIpKeyExtractor,
};

use crate::shared::config::{Config, ConfigError};

pub type PeerIpLimit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Limiters for the credential endpoints, keyed by peer IP.
///
/// Built once at startup. Cloning shares the underlying limiter, so every
/// worker that wraps a route with `Governor::new(&limits.login)` draws from
/// the same budget. Register and login each get their own budget.
#[derive(Clone)]
pub struct RateLimits {
  pub register: PeerIpLimit,
  pub login: PeerIpLimit,
}

impl RateLimits {
  pub fn new(config: &Config) -> Result<Self, ConfigError> {
    Ok(Self {
      register: peer_ip_limit(config)?,
      login: peer_ip_limit(config)?,
    })
  }
}

fn peer_ip_limit(config: &Config) -> Result<PeerIpLimit, ConfigError> {
  GovernorConfigBuilder::default()
    .requests_per_second(config.rate_limit_per_second)
    .burst_size(config.rate_limit_burst)
    .finish()
    .ok_or_else(|| ConfigError::Invalid {
      key: "RATE_LIMIT_BURST",
      value: config.rate_limit_burst.to_string(),
    })
}
