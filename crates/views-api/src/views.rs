use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use views_types::api::CreateViewRequest;
use views_types::models::View;

use crate::error::ApiError;
use crate::extract::{ValidJson, parse_id};
use crate::middleware::Identity;
use crate::state::AppState;

/// GET /view
pub async fn list_views(State(state): State<AppState>) -> Result<Json<Vec<View>>, ApiError> {
    Ok(Json(state.views.list_all().await?))
}

/// GET /view/public
pub async fn list_public_views(State(state): State<AppState>) -> Result<Json<Vec<View>>, ApiError> {
    Ok(Json(state.views.list_public().await?))
}

/// GET /view/{id}
pub async fn get_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<View>, ApiError> {
    let view_id = parse_id(&id)?;
    Ok(Json(state.views.get_by_id(view_id).await?))
}

/// GET /view/user/{id}
pub async fn list_user_views(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<View>>, ApiError> {
    let owner_id = parse_id(&id)?;
    Ok(Json(state.views.list_by_owner(identity, owner_id).await?))
}

/// POST /view
pub async fn create_view(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidJson(new): ValidJson<CreateViewRequest>,
) -> Result<Json<View>, ApiError> {
    Ok(Json(state.views.create(identity, new).await?))
}

/// DELETE /view/{id}
pub async fn delete_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, ApiError> {
    let view_id = parse_id(&id)?;
    state.views.delete(identity, view_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
