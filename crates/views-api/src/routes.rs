use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use tracing::debug;

use crate::middleware::require_auth;
use crate::state::AppState;
use crate::{accounts, views};

/// Every route of the service. Transport layers (tracing, timeouts, CORS)
/// are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/account/signup", post(accounts::signup))
        .route("/account/login", post(accounts::login))
        .route("/account/verify-email/{id}", put(accounts::verify_email))
        .route("/view", get(views::list_views))
        .route("/view/public", get(views::list_public_views))
        .route("/view/{id}", get(views::get_view))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/account", get(accounts::list_accounts))
        .route(
            "/account/{id}",
            get(accounts::get_account).delete(accounts::delete_account),
        )
        .route("/view", post(views::create_view))
        .route("/view/user/{id}", get(views::list_user_views))
        .route("/view/{id}", delete(views::delete_view))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> impl IntoResponse {
    debug!("No route matched");
    (StatusCode::NOT_FOUND, "Oops, 404!")
}
