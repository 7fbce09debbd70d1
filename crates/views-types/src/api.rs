use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// -- JWT Claims --

/// Session token claims. `exp` is only present when the issuer was
/// configured with a lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
}

// -- Validation --

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("field `{0}` must not be the nil uuid")]
    NilId(&'static str),
}

/// Turns a decoded request body into the command the service layer accepts.
/// Handlers only ever see the output of `validate`.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, ValidationError>;
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

// -- Accounts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Validate for SignupRequest {
    type Output = NewAccount;

    fn validate(self) -> Result<NewAccount, ValidationError> {
        non_empty("username", &self.username)?;
        non_empty("email", &self.email)?;
        non_empty("password", &self.password)?;
        Ok(NewAccount {
            username: self.username,
            email: self.email,
            password: self.password,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    type Output = LoginCredentials;

    // Empty values are not rejected here: an empty username simply matches
    // no account and an empty password never verifies.
    fn validate(self) -> Result<LoginCredentials, ValidationError> {
        Ok(LoginCredentials {
            username: self.username,
            password: self.password,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

// -- Views --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateViewRequest {
    pub title: String,
    pub paragraph: String,
    pub user_id: Uuid,
    #[serde(default)]
    pub public: bool,
}

#[derive(Debug, Clone)]
pub struct NewView {
    pub title: String,
    pub paragraph: String,
    pub owner_id: Uuid,
    pub public: bool,
}

impl Validate for CreateViewRequest {
    type Output = NewView;

    fn validate(self) -> Result<NewView, ValidationError> {
        non_empty("title", &self.title)?;
        non_empty("paragraph", &self.paragraph)?;
        if self.user_id.is_nil() {
            return Err(ValidationError::NilId("user_id"));
        }
        Ok(NewView {
            title: self.title,
            paragraph: self.paragraph,
            owner_id: self.user_id,
            public: self.public,
        })
    }
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_rejects_each_empty_field() {
        for (body, field) in [
            (r#"{"username":"","email":"a@x.com","password":"pw"}"#, "username"),
            (r#"{"username":"alice","email":"","password":"pw"}"#, "email"),
            (r#"{"username":"alice","email":"a@x.com","password":""}"#, "password"),
        ] {
            let req: SignupRequest = serde_json::from_str(body).unwrap();
            assert_eq!(req.validate().unwrap_err(), ValidationError::EmptyField(field));
        }
    }

    #[test]
    fn signup_rejects_unknown_fields() {
        let body = r#"{"username":"alice","email":"a@x.com","password":"pw","admin":true}"#;
        assert!(serde_json::from_str::<SignupRequest>(body).is_err());
    }

    #[test]
    fn create_view_defaults_to_private() {
        let owner = Uuid::new_v4();
        let body = format!(r#"{{"title":"t","paragraph":"p","user_id":"{owner}"}}"#);
        let req: CreateViewRequest = serde_json::from_str(&body).unwrap();
        let view = req.validate().unwrap();
        assert!(!view.public);
        assert_eq!(view.owner_id, owner);
    }

    #[test]
    fn create_view_rejects_nil_owner() {
        let req = CreateViewRequest {
            title: "t".into(),
            paragraph: "p".into(),
            user_id: Uuid::nil(),
            public: true,
        };
        assert_eq!(req.validate().unwrap_err(), ValidationError::NilId("user_id"));
    }

    #[test]
    fn create_view_rejects_malformed_owner() {
        let body = r#"{"title":"t","paragraph":"p","user_id":"not-a-uuid","public":true}"#;
        assert!(serde_json::from_str::<CreateViewRequest>(body).is_err());
    }

    #[test]
    fn claims_omit_missing_expiry() {
        let claims = Claims { sub: Uuid::new_v4(), iat: 1, exp: None };
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("exp").is_none());
    }
}
