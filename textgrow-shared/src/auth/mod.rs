/// Identity resolution
///
/// Authentication is delegated entirely to an external identity provider:
/// this service never validates credentials itself. The [`provider`] module
/// defines the verification contract and its implementations; this module
/// holds the per-request principal context and the well-known demo principal
/// used by the feature-flagged fallback mode.
///
/// # Request Extensions
///
/// After successful resolution, the API middleware adds an [`AuthContext`]
/// to the request extensions; handlers extract it with Axum's `Extension`.
///
/// # Example
///
/// ```
/// use textgrow_shared::auth::AuthContext;
/// use uuid::Uuid;
///
/// let auth = AuthContext::new(Uuid::new_v4());
/// assert!(!auth.is_demo());
/// ```

pub mod provider;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed principal id used by the demo fallback mode
///
/// Deliberately the nil UUID so it is recognizable in any log line or table.
pub const DEMO_USER_ID: Uuid = Uuid::nil();

/// Email the demo principal's profile row is provisioned with
pub const DEMO_USER_EMAIL: &str = "demo@textgrow.local";

/// Authentication context added to request extensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates an auth context for a resolved principal
    pub fn new(user_id: Uuid) -> Self {
        AuthContext { user_id }
    }

    /// Whether this request runs as the demo principal
    pub fn is_demo(&self) -> bool {
        self.user_id == DEMO_USER_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_context_detection() {
        assert!(AuthContext::new(DEMO_USER_ID).is_demo());
        assert!(!AuthContext::new(Uuid::new_v4()).is_demo());
    }
}
