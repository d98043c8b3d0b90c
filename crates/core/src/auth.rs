//! Login and registration payloads.

use serde::Serialize;
use validator::Validate;

use crate::error::CoreError;

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body of `POST /api/register`.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub invitation_code: String,
}

/// Run `validator` rules and fold any failure into [`CoreError::Validation`].
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), CoreError> {
    payload
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn valid_login_passes() {
        let req = LoginRequest {
            email: "user@example.com".into(),
            password: "secret".into(),
        };
        assert!(validate_payload(&req).is_ok());
    }

    #[test]
    fn malformed_email_rejected() {
        let req = LoginRequest {
            email: "not-an-email".into(),
            password: "secret".into(),
        };
        assert_matches!(validate_payload(&req), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_password_rejected() {
        let req = LoginRequest {
            email: "user@example.com".into(),
            password: String::new(),
        };
        assert_matches!(validate_payload(&req), Err(CoreError::Validation(_)));
    }

    #[test]
    fn register_leaves_password_length_to_the_server() {
        let req = RegisterRequest {
            email: "user@example.com".into(),
            password: "abcde".into(),
            invitation_code: "INV-1".into(),
        };
        assert!(validate_payload(&req).is_ok());

        let empty = RegisterRequest {
            password: String::new(),
            ..req
        };
        assert_matches!(validate_payload(&empty), Err(CoreError::Validation(_)));
    }

    #[test]
    fn register_serializes_invitation_code_camel_case() {
        let req = RegisterRequest {
            email: "user@example.com".into(),
            password: "secret1".into(),
            invitation_code: "INV-1".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["invitationCode"], "INV-1");
    }
}
