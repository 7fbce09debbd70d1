use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use views_types::api::Claims;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("invalid token")]
    InvalidToken,

    #[error("token encoding failed: {0}")]
    Encode(String),
}

/// Settings the issuer is built from. Loaded once at startup and handed in.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    /// `None` issues tokens without an `exp` claim.
    pub ttl: Option<Duration>,
}

/// Mints and checks HS256 bearer tokens bound to an account id.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        if config.ttl.is_some() {
            validation.set_required_spec_claims(&["exp"]);
        } else {
            validation.set_required_spec_claims::<&str>(&[]);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: config.ttl,
        })
    }

    pub fn issue(&self, account_id: Uuid) -> Result<String, TokenError> {
        let now = chrono::Utc::now();
        let exp = match self.ttl {
            Some(ttl) => Some(expiry(now.timestamp(), ttl).ok_or_else(|| {
                TokenError::Encode(format!("ttl of {}s overflows the exp claim", ttl.as_secs()))
            })?),
            None => None,
        };

        let claims = Claims {
            sub: account_id,
            iat: now.timestamp() as usize,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    pub fn parse(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            TokenError::InvalidToken
        })?;

        Ok(data.claims.sub)
    }
}

fn expiry(now: i64, ttl: Duration) -> Option<usize> {
    let exp = u64::try_from(now).ok()?.checked_add(ttl.as_secs())?;
    usize::try_from(exp).ok()
}
