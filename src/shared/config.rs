use std::{env, str::FromStr, thread};

use bcrypt::DEFAULT_COST;
use thiserror::Error;
use tracing::warn;

const DEV_JWT_SECRET: &str = "DEV_JWT_SECRET";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Invalid value {value:?} for {key}")]
  Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct LinkedInConfig {
  pub client_id: String,
  pub client_secret: String,
  pub redirect_uri: String,
}

#[derive(Clone, Debug)]
pub struct Config {
  pub host: String,
  pub mongo_uri: String,
  pub mongo_database: String,
  pub jwt_secret: String,
  pub bcrypt_cost: u32,
  pub hash_threads: u32,
  pub frontend_url: String,
  pub linkedin: Option<LinkedInConfig>,
  pub rate_limit_per_second: u64,
  pub rate_limit_burst: u32,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
      warn!("JWT_SECRET not set, using the development secret");
      DEV_JWT_SECRET.to_string()
    });

    let default_threads = thread::available_parallelism()
      .map(|count| count.get() as u32)
      .unwrap_or(2);

    Ok(Self {
      host: var_or("HOST", "0.0.0.0:3000"),
      mongo_uri: var_or("MONGO_URI", "mongodb://localhost:27017"),
      mongo_database: var_or("MONGO_DATABASE", "conectar_dev"),
      jwt_secret,
      bcrypt_cost: parse_var("BCRYPT_COST", DEFAULT_COST)?,
      hash_threads: parse_var("HASH_THREADS", default_threads)?,
      frontend_url: var_or("FRONTEND_URL", "http://localhost:5173"),
      linkedin: linkedin_from_env(),
      rate_limit_per_second: nonzero(
        parse_var("RATE_LIMIT_PER_SECOND", 2)?,
        "RATE_LIMIT_PER_SECOND",
      )?,
      rate_limit_burst: nonzero(
        parse_var("RATE_LIMIT_BURST", 5)?,
        "RATE_LIMIT_BURST",
      )?,
    })
  }
}

fn linkedin_from_env() -> Option<LinkedInConfig> {
  match (env::var("LINKEDIN_CLIENT_ID"), env::var("LINKEDIN_CLIENT_SECRET")) {
    (Ok(client_id), Ok(client_secret)) => Some(LinkedInConfig {
      client_id,
      client_secret,
      redirect_uri: var_or(
        "LINKEDIN_REDIRECT_URI",
        "http://localhost:3000/api/linkedin/callback",
      ),
    }),
    _ => {
      warn!("LinkedIn credentials not set, account linking is disabled");
      None
    }
  }
}

fn var_or(key: &str, default: &str) -> String {
  env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
  match env::var(key) {
    Ok(value) => value
      .trim()
      .parse()
      .map_err(|_| ConfigError::Invalid { key, value }),
    Err(_) => Ok(default),
  }
}

fn nonzero<T: PartialEq + Default + ToString>(
  value: T,
  key: &'static str,
) -> Result<T, ConfigError> {
  if value == T::default() {
    return Err(ConfigError::Invalid {
      key,
      value: value.to_string(),
    });
  }
  Ok(value)
}
