use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expiry out of range")]
    ExpiryOutOfRange,
    #[error(transparent)]
    Encode(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    exp: usize,
}

/// Issues and verifies HS256 bearer tokens whose subject is the user id.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String, TokenError> {
        let expires = Utc::now().checked_add_signed(self.ttl).ok_or(TokenError::ExpiryOutOfRange)?;
        let exp = usize::try_from(expires.timestamp()).map_err(|_| TokenError::ExpiryOutOfRange)?;
        let claims = Claims { sub: user_id.to_string(), username: username.to_string(), exp };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Resolves a token to its user id. Expired, forged or malformed tokens
    /// all resolve to `None`.
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).ok()?;
        Uuid::parse_str(&data.claims.sub).ok()
    }
}
