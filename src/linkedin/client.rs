use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::shared::config::LinkedInConfig;

const AUTHORIZATION_ENDPOINT: &str =
  "https://www.linkedin.com/oauth/v2/authorization";
const TOKEN_ENDPOINT: &str = "https://www.linkedin.com/oauth/v2/accessToken";
const USERINFO_ENDPOINT: &str = "https://api.linkedin.com/v2/userinfo";
const SCOPE: &str = "openid profile email";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum LinkedInError {
  #[error("HTTP error: {0}")]
  Http(#[from] reqwest::Error),
  #[error("LinkedIn answered with status {0}")]
  Status(StatusCode),
  #[error("Invalid URL: {0}")]
  Url(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
  pub access_token: String,
  pub expires_in: Option<u64>,
}

/// OpenID Connect userinfo claims.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
  pub sub: String,
  pub name: Option<String>,
  pub email: Option<String>,
  pub picture: Option<String>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LinkedInClient: Send + Sync {
  fn authorization_url(&self, state: &str) -> Result<Url, LinkedInError>;
  async fn exchange_code(&self, code: &str)
    -> Result<AccessToken, LinkedInError>;
  async fn user_info(&self, access_token: &str)
    -> Result<UserInfo, LinkedInError>;
}

pub struct HttpLinkedInClient {
  http: reqwest::Client,
  config: LinkedInConfig,
}

impl HttpLinkedInClient {
  pub fn new(config: LinkedInConfig) -> Result<Self, LinkedInError> {
    let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    Ok(Self { http, config })
  }
}

fn ensure_success(
  response: reqwest::Response,
) -> Result<reqwest::Response, LinkedInError> {
  let status = response.status();
  if status.is_success() {
    Ok(response)
  } else {
    Err(LinkedInError::Status(status))
  }
}

#[async_trait]
impl LinkedInClient for HttpLinkedInClient {
  fn authorization_url(&self, state: &str) -> Result<Url, LinkedInError> {
    Ok(Url::parse_with_params(
      AUTHORIZATION_ENDPOINT,
      &[
        ("response_type", "code"),
        ("client_id", self.config.client_id.as_str()),
        ("redirect_uri", self.config.redirect_uri.as_str()),
        ("state", state),
        ("scope", SCOPE),
      ],
    )?)
  }

  async fn exchange_code(
    &self,
    code: &str,
  ) -> Result<AccessToken, LinkedInError> {
    let response = self
      .http
      .post(TOKEN_ENDPOINT)
      .form(&[
        ("grant_type", "authorization_code"),
        ("code", code),
        ("client_id", self.config.client_id.as_str()),
        ("client_secret", self.config.client_secret.as_str()),
        ("redirect_uri", self.config.redirect_uri.as_str()),
      ])
      .send()
      .await?;
    Ok(ensure_success(response)?.json().await?)
  }

  async fn user_info(
    &self,
    access_token: &str,
  ) -> Result<UserInfo, LinkedInError> {
    let response = self
      .http
      .get(USERINFO_ENDPOINT)
      .bearer_auth(access_token)
      .send()
      .await?;
    Ok(ensure_success(response)?.json().await?)
  }
}
