pub mod accounts;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod policy;
pub mod routes;
pub mod service;
pub mod state;
pub mod views;

pub use error::{ApiError, AuthError};
pub use state::{AppState, AppStateInner};
