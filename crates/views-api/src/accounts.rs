use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use views_types::api::{LoginRequest, LoginResponse, SignupRequest};
use views_types::models::Account;

use crate::error::ApiError;
use crate::extract::{ValidJson, parse_id};
use crate::middleware::Identity;
use crate::state::AppState;

/// POST /account/signup
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(new): ValidJson<SignupRequest>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.accounts.signup(new).await?))
}

/// POST /account/login
pub async fn login(
    State(state): State<AppState>,
    ValidJson(creds): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    Ok(Json(state.accounts.login(creds).await?))
}

/// GET /account
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(_identity): Extension<Identity>,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(state.accounts.list().await?))
}

/// GET /account/{id}
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(_identity): Extension<Identity>,
) -> Result<Json<Account>, ApiError> {
    let account_id = parse_id(&id)?;
    Ok(Json(state.accounts.get(account_id).await?))
}

/// DELETE /account/{id}
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, ApiError> {
    let account_id = parse_id(&id)?;
    state.accounts.delete(identity, account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /account/verify-email/{id}
pub async fn verify_email(State(state): State<AppState>, Path(id): Path<String>) -> &'static str {
    state.accounts.verify_email(&id);
    "verify email!"
}
