use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::warn;

/// Longer inputs are refused before hashing.
pub const MAX_PASSWORD_BYTES: usize = 1024;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password is empty")]
    Empty,

    #[error("password exceeds {} bytes", MAX_PASSWORD_BYTES)]
    TooLong,

    #[error("invalid argon2 parameters: {0}")]
    Params(String),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored password digest is malformed")]
    MalformedDigest,
}

/// Argon2id password hashing with a fixed cost per instance.
#[derive(Clone)]
pub struct CredentialCodec {
    argon2: Argon2<'static>,
}

impl CredentialCodec {
    /// Codec with the argon2 crate's default (OWASP recommended) cost.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Codec with an explicit cost: memory in KiB, iterations, lanes.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, CredentialError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| CredentialError::Params(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt, returning a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, CredentialError> {
        if password.is_empty() {
            return Err(CredentialError::Empty);
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(CredentialError::TooLong);
        }

        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?
            .to_string();

        Ok(digest)
    }

    /// Check `password` against a stored digest.
    ///
    /// A mismatch is `Ok(false)`. Only a digest that cannot be parsed or
    /// evaluated is an error. The cost parameters embedded in the digest are
    /// used, not this codec's, so digests survive a cost change.
    pub fn verify(&self, digest: &str, password: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(digest).map_err(|_| CredentialError::MalformedDigest)?;

        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => {
                warn!("Password digest could not be evaluated: {}", e);
                Err(CredentialError::MalformedDigest)
            }
        }
    }
}

impl Default for CredentialCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> CredentialCodec {
        CredentialCodec::with_params(8, 1, 1).unwrap()
    }

    #[test]
    fn hash_verify_roundtrip() {
        let codec = cheap();
        let digest = codec.hash("pw123").unwrap();

        assert!(digest.starts_with("$argon2id$"));
        assert!(!digest.contains("pw123"));
        assert!(codec.verify(&digest, "pw123").unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let codec = cheap();
        let digest = codec.hash("pw123").unwrap();

        assert!(!codec.verify(&digest, "wrong").unwrap());
        assert!(!codec.verify(&digest, "").unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let codec = cheap();
        assert_ne!(codec.hash("pw123").unwrap(), codec.hash("pw123").unwrap());
    }

    #[test]
    fn malformed_digest_is_error() {
        let codec = cheap();
        assert!(matches!(
            codec.verify("not-a-phc-string", "pw123"),
            Err(CredentialError::MalformedDigest)
        ));
    }

    #[test]
    fn rejects_unprocessable_input() {
        let codec = cheap();
        assert!(matches!(codec.hash(""), Err(CredentialError::Empty)));

        let long = "a".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(matches!(codec.hash(&long), Err(CredentialError::TooLong)));
    }

    #[test]
    fn verify_uses_digest_params() {
        let digest = cheap().hash("pw123").unwrap();
        let other = CredentialCodec::with_params(16, 2, 1).unwrap();
        assert!(other.verify(&digest, "pw123").unwrap());
    }
}
