use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use views_crypto::{CredentialCodec, CredentialError, TokenIssuer};
use views_db::{Database, StoreError};
use views_types::api::{LoginCredentials, LoginResponse, NewAccount};
use views_types::models::Account;

use super::{blocking, fresh_id};
use crate::error::ApiError;
use crate::middleware::Identity;
use crate::policy::{Action, AuthorizationPolicy, Resource, enforce};

#[derive(Clone)]
pub struct AccountService {
    db: Arc<Database>,
    codec: CredentialCodec,
    tokens: TokenIssuer,
    policy: Arc<dyn AuthorizationPolicy>,
}

impl AccountService {
    pub fn new(
        db: Arc<Database>,
        codec: CredentialCodec,
        tokens: TokenIssuer,
        policy: Arc<dyn AuthorizationPolicy>,
    ) -> Self {
        Self {
            db,
            codec,
            tokens,
            policy,
        }
    }

    pub async fn signup(&self, new: NewAccount) -> Result<Account, ApiError> {
        let db = self.db.clone();
        let codec = self.codec.clone();

        let account = blocking(move || {
            let digest = codec.hash(&new.password).map_err(|e| match e {
                CredentialError::Empty | CredentialError::TooLong => {
                    ApiError::Validation(e.to_string())
                }
                other => ApiError::internal("hashing password", other),
            })?;
            let account_id = fresh_id()?;

            db.create_account(account_id, &new.username, &new.email, &digest)
                .map_err(|e| match e {
                    StoreError::Conflict => ApiError::Conflict,
                    other => ApiError::internal("creating account", other),
                })
        })
        .await?;

        info!("Account {} created ({})", account.account_id, account.username);
        Ok(account)
    }

    pub async fn login(&self, creds: LoginCredentials) -> Result<LoginResponse, ApiError> {
        let db = self.db.clone();
        let codec = self.codec.clone();
        let tokens = self.tokens.clone();

        blocking(move || {
            let row = db
                .get_account_by_username(&creds.username)
                .map_err(|e| ApiError::internal("looking up account", e))?
                .ok_or(ApiError::NotFound)?;

            let verified = codec
                .verify(&row.password, &creds.password)
                .map_err(|e| ApiError::internal("verifying password", e))?;
            if !verified {
                return Err(ApiError::Credential);
            }

            let account = Account::try_from(row).map_err(|e| ApiError::internal("reading account", e))?;
            let token = tokens
                .issue(account.account_id)
                .map_err(|e| ApiError::internal("issuing token", e))?;

            debug!("Account {} logged in", account.account_id);
            Ok(LoginResponse {
                id: account.account_id,
                username: account.username,
                email: account.email,
                token,
                verified: account.email_verified,
                created_at: account.created_at,
            })
        })
        .await
    }

    pub async fn get(&self, account_id: Uuid) -> Result<Account, ApiError> {
        let db = self.db.clone();
        blocking(move || {
            db.get_account(account_id)
                .map_err(|e| ApiError::internal("fetching account", e))?
                .ok_or(ApiError::NotFound)
        })
        .await
    }

    pub async fn list(&self) -> Result<Vec<Account>, ApiError> {
        let db = self.db.clone();
        blocking(move || {
            db.list_accounts()
                .map_err(|e| ApiError::internal("listing accounts", e))
        })
        .await
    }

    pub async fn delete(&self, caller: Identity, account_id: Uuid) -> Result<(), ApiError> {
        enforce(self.policy.as_ref(), &caller, Resource::account(account_id), Action::Delete)?;

        let db = self.db.clone();
        blocking(move || {
            db.delete_account(account_id).map_err(|e| match e {
                StoreError::NotFound => ApiError::NotFound,
                other => ApiError::internal("deleting account", other),
            })
        })
        .await?;

        info!("Account {} deleted by {}", account_id, caller.account_id);
        Ok(())
    }

    /// Placeholder: there is no verification workflow yet.
    pub fn verify_email(&self, account_id: &str) {
        debug!("Email verification requested for {}; not implemented", account_id);
    }
}
