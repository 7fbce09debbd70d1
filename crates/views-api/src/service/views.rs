use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use views_db::{Database, StoreError};
use views_types::api::NewView;
use views_types::models::View;

use super::{blocking, fresh_id};
use crate::error::ApiError;
use crate::middleware::Identity;
use crate::policy::{Action, AuthorizationPolicy, Resource, enforce};

#[derive(Clone)]
pub struct ViewService {
    db: Arc<Database>,
    policy: Arc<dyn AuthorizationPolicy>,
}

impl ViewService {
    pub fn new(db: Arc<Database>, policy: Arc<dyn AuthorizationPolicy>) -> Self {
        Self { db, policy }
    }

    /// A missing owner surfaces as an internal error, same as any other
    /// store failure.
    pub async fn create(&self, caller: Identity, new: NewView) -> Result<View, ApiError> {
        enforce(self.policy.as_ref(), &caller, Resource::view(new.owner_id), Action::Create)?;

        let db = self.db.clone();
        let view = blocking(move || {
            let view_id = fresh_id()?;
            db.create_view(view_id, &new)
                .map_err(|e| ApiError::internal("creating view", e))
        })
        .await?;

        info!("View {} created for {}", view.view_id, view.user_id);
        Ok(view)
    }

    /// No visibility filtering: anyone holding the id can read a private view.
    pub async fn get_by_id(&self, view_id: Uuid) -> Result<View, ApiError> {
        let db = self.db.clone();
        blocking(move || {
            db.get_view(view_id)
                .map_err(|e| ApiError::internal("fetching view", e))?
                .ok_or(ApiError::NotFound)
        })
        .await
    }

    pub async fn list_all(&self) -> Result<Vec<View>, ApiError> {
        let db = self.db.clone();
        blocking(move || db.list_views().map_err(|e| ApiError::internal("listing views", e))).await
    }

    pub async fn list_public(&self) -> Result<Vec<View>, ApiError> {
        let db = self.db.clone();
        blocking(move || {
            db.list_public_views().map_err(|e| {
                warn!("Listing public views failed: {}", e);
                ApiError::NotFound
            })
        })
        .await
    }

    pub async fn list_by_owner(&self, caller: Identity, owner_id: Uuid) -> Result<Vec<View>, ApiError> {
        enforce(self.policy.as_ref(), &caller, Resource::view(owner_id), Action::List)?;

        let db = self.db.clone();
        blocking(move || {
            db.list_views_by_owner(owner_id).map_err(|e| {
                warn!("Listing views of {} failed: {}", owner_id, e);
                ApiError::NotFound
            })
        })
        .await
    }

    pub async fn delete(&self, caller: Identity, view_id: Uuid) -> Result<(), ApiError> {
        let db = self.db.clone();
        let policy = self.policy.clone();

        blocking(move || {
            let view = db
                .get_view(view_id)
                .map_err(|e| ApiError::internal("fetching view", e))?
                .ok_or(ApiError::NotFound)?;

            enforce(policy.as_ref(), &caller, Resource::view(view.user_id), Action::Delete)?;

            db.delete_view(view_id).map_err(|e| match e {
                StoreError::NotFound => ApiError::NotFound,
                other => ApiError::internal("deleting view", other),
            })
        })
        .await?;

        info!("View {} deleted by {}", view_id, caller.account_id);
        Ok(())
    }
}
