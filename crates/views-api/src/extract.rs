use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use views_types::api::Validate;

use crate::error::ApiError;

/// JSON body decoded as `R` and validated into `R::Output`.
///
/// Any decoding failure (bad JSON, wrong content type, missing or unknown
/// field, malformed uuid) and any validation failure is a 400.
pub struct ValidJson<R: Validate>(pub R::Output);

impl<S, R> FromRequest<S> for ValidJson<R>
where
    R: Validate + DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<R>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError::Validation(e.body_text()))?;

        Ok(Self(body.validate()?))
    }
}

/// Empty or malformed path ids are a 400.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    if raw.is_empty() {
        return Err(ApiError::Validation("empty id is not allowed".into()));
    }
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("'{}' is not a valid uuid", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_empty_and_malformed() {
        assert!(matches!(parse_id(""), Err(ApiError::Validation(_))));
        assert!(matches!(parse_id("123"), Err(ApiError::Validation(_))));

        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
