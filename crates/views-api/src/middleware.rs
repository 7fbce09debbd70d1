use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use uuid::Uuid;

use views_crypto::TokenIssuer;

use crate::error::{ApiError, AuthError};
use crate::state::AppState;

/// The authenticated caller, placed in request extensions by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub account_id: Uuid,
}

/// Resolve an optional bearer token to an identity.
pub fn authenticate(tokens: &TokenIssuer, bearer: Option<&str>) -> Result<Identity, AuthError> {
    let token = bearer.ok_or(AuthError::MissingToken)?;
    let account_id = tokens.parse(token).map_err(|_| AuthError::InvalidToken)?;
    Ok(Identity { account_id })
}

/// Extract and validate the bearer token from the Authorization header.
/// Requests without a valid token never reach the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = match &header {
        Ok(TypedHeader(Authorization(bearer))) => Some(bearer.token()),
        Err(rejection) if rejection.is_missing() => None,
        Err(_) => return Err(AuthError::InvalidToken.into()),
    };

    let identity = authenticate(&state.tokens, bearer)?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use views_crypto::TokenConfig;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(TokenConfig {
            secret: "gate-secret".into(),
            ttl: None,
        })
        .unwrap()
    }

    #[test]
    fn valid_token_authenticates() {
        let tokens = issuer();
        let id = Uuid::new_v4();
        let token = tokens.issue(id).unwrap();

        let identity = authenticate(&tokens, Some(&token)).unwrap();
        assert_eq!(identity.account_id, id);
    }

    #[test]
    fn absent_and_bad_tokens_rejected() {
        let tokens = issuer();
        assert!(matches!(authenticate(&tokens, None), Err(AuthError::MissingToken)));
        assert!(matches!(
            authenticate(&tokens, Some("garbage")),
            Err(AuthError::InvalidToken)
        ));
    }
}
