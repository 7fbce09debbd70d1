//! Account and view orchestration. Handlers call into these; these call the
//! store and the credential code. Store calls and password hashing are
//! blocking, so every operation runs its body on the blocking pool.

pub mod accounts;
pub mod views;

use tracing::error;
use uuid::Uuid;

use crate::error::ApiError;

async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal("blocking task failed".into())
    })?
}

fn fresh_id() -> Result<Uuid, ApiError> {
    let id = Uuid::new_v4();
    if id.is_nil() {
        return Err(ApiError::Internal("generated nil uuid".into()));
    }
    Ok(id)
}
