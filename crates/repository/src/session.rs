//! Who is using the app

use crate::error::{RepositoryError, RepositoryResult};
use serde::{Deserialize, Serialize};

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Stable user id
    pub user_id: String,
    /// Account email
    pub email: String,
    /// Premium subscription flag
    #[serde(default)]
    pub premium: bool,
    /// ID token forwarded as a bearer token to the document store
    #[serde(default, skip_serializing)]
    pub id_token: Option<String>,
}

/// Current session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// Browsing without an account
    #[default]
    Guest,
    /// Signed in
    SignedIn(UserIdentity),
}

impl Session {
    /// Session for a signed-in user
    pub fn signed_in(user: UserIdentity) -> Self {
        Self::SignedIn(user)
    }

    /// The signed-in user, if any
    #[must_use]
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            Self::Guest => None,
            Self::SignedIn(user) => Some(user),
        }
    }

    /// Whether hidden gems are unlocked
    #[must_use]
    pub fn is_premium(&self) -> bool {
        self.user().is_some_and(|user| user.premium)
    }

    /// The signed-in user, or [`RepositoryError::Unauthenticated`]
    pub fn require_user(&self) -> RepositoryResult<&UserIdentity> {
        self.user().ok_or(RepositoryError::Unauthenticated)
    }

    /// Name shown on reviews: the email's local part, or "Anonymous".
    #[must_use]
    pub fn display_name(&self) -> String {
        self.user()
            .and_then(|user| user.email.split('@').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("Anonymous")
            .to_string()
    }

    /// Token for authenticated store requests
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.user().and_then(|user| user.id_token.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(premium: bool) -> UserIdentity {
        UserIdentity {
            user_id: "uid-1".into(),
            email: "maya@example.com".into(),
            premium,
            id_token: Some("token".into()),
        }
    }

    #[test]
    fn test_guest() {
        let session = Session::default();
        assert!(!session.is_premium());
        assert!(matches!(session.require_user(), Err(RepositoryError::Unauthenticated)));
        assert_eq!(session.display_name(), "Anonymous");
        assert!(session.bearer_token().is_none());
    }

    #[test]
    fn test_signed_in() {
        let session = Session::signed_in(user(false));
        assert!(!session.is_premium());
        assert_eq!(session.require_user().unwrap().user_id, "uid-1");
        assert_eq!(session.display_name(), "maya");
        assert_eq!(session.bearer_token(), Some("token"));

        assert!(Session::signed_in(user(true)).is_premium());
    }

    #[test]
    fn test_token_not_serialized() {
        let json = serde_json::to_value(user(true)).unwrap();
        assert!(json.get("idToken").is_none());
        assert_eq!(json["userId"], "uid-1");
    }
}
