//! Credential handling for the views service: password digests and
//! session tokens.

pub mod password;
pub mod token;

pub use password::{CredentialCodec, CredentialError};
pub use token::{TokenConfig, TokenError, TokenIssuer};
