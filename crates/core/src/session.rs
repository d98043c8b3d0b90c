//! Session model as seen by the client.

use serde::Deserialize;

use crate::types::Credits;

/// Marker rendered while the balance has not been resolved yet.
pub const CREDITS_LOADING_LABEL: &str = "loading...";

/// Body of the current-user endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub credits: Credits,
}

/// Authenticated-user context.
///
/// `credits` is `None` only while unresolved. Once resolved it is never
/// negative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub credits: Option<Credits>,
}

impl Session {
    /// A freshly mounted page: nothing known yet.
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn authenticated(credits: Credits) -> Self {
        Self {
            is_authenticated: true,
            credits: Some(credits.max(0)),
        }
    }

    /// The session check failed; the user must log in again.
    pub fn rejected() -> Self {
        Self {
            is_authenticated: false,
            credits: None,
        }
    }

    /// Whether the balance allows another generation.
    ///
    /// An unresolved balance counts as "no".
    pub fn can_generate(&self) -> bool {
        self.is_authenticated && self.credits.is_some_and(|c| c > 0)
    }

    pub fn credits_label(&self) -> String {
        match self.credits {
            Some(c) => c.to_string(),
            None => CREDITS_LOADING_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_cannot_generate() {
        let session = Session::unresolved();
        assert!(!session.can_generate());
        assert_eq!(session.credits_label(), CREDITS_LOADING_LABEL);
    }

    #[test]
    fn zero_credits_cannot_generate() {
        assert!(!Session::authenticated(0).can_generate());
    }

    #[test]
    fn one_credit_can_generate() {
        assert!(Session::authenticated(1).can_generate());
    }

    #[test]
    fn negative_balance_clamped_to_zero() {
        let session = Session::authenticated(-3);
        assert_eq!(session.credits, Some(0));
        assert!(!session.can_generate());
    }

    #[test]
    fn current_user_ignores_unknown_fields() {
        let user: CurrentUser =
            serde_json::from_str(r#"{"credits": 5, "email": "a@b.c", "id": 9}"#).unwrap();
        assert_eq!(user.credits, 5);
    }
}
