use chrono::Utc;
use jsonwebtoken::{
  decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SESSION_TOKEN_EXPIRY: u64 = 24 * 60 * 60; // 1 day in seconds
pub const LINKEDIN_STATE_EXPIRY: u64 = 10 * 60; // 10 minutes in seconds

/// Separates session tokens from OAuth state tokens signed with the same
/// secret, a state token travels in a URL and must never authenticate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
  Session,
  LinkedinState,
}

impl TokenKind {
  fn expiry(self) -> u64 {
    match self {
      TokenKind::Session => SESSION_TOKEN_EXPIRY,
      TokenKind::LinkedinState => LINKEDIN_STATE_EXPIRY,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
  pub sub: String,
  pub kind: TokenKind,
  pub iat: u64,
  pub exp: u64,
}

#[derive(Debug, Error)]
pub enum TokenError {
  #[error("Invalid or expired token")]
  Invalid(#[from] jsonwebtoken::errors::Error),
  #[error("Token is not a {0:?} token")]
  WrongKind(TokenKind),
}

pub fn issue_token(
  secret: &str,
  user_id: &str,
  kind: TokenKind,
) -> Result<String, jsonwebtoken::errors::Error> {
  let now = Utc::now().timestamp() as u64;
  sign(
    secret,
    &Claims {
      sub: user_id.to_string(),
      kind,
      iat: now,
      exp: now + kind.expiry(),
    },
  )
}

fn sign(
  secret: &str,
  claims: &Claims,
) -> Result<String, jsonwebtoken::errors::Error> {
  encode(
    &Header::new(Algorithm::HS256),
    claims,
    &EncodingKey::from_secret(secret.as_bytes()),
  )
}

/// Checks signature, expiry and kind. Expiry is exact, no clock leeway.
pub fn verify_token(
  secret: &str,
  token: &str,
  expected: TokenKind,
) -> Result<Claims, TokenError> {
  let mut validation = Validation::new(Algorithm::HS256);
  validation.leeway = 0;

  let claims = decode::<Claims>(
    token,
    &DecodingKey::from_secret(secret.as_bytes()),
    &validation,
  )?
  .claims;

  if claims.kind != expected {
    return Err(TokenError::WrongKind(expected));
  }
  Ok(claims)
}
