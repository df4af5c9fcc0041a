/// Identity provider contract
///
/// The provider owns signup credentials and token issuance; this service
/// only asks it one question: "whose token is this?". Any failure — missing
/// or malformed token, rejection, provider unreachable — is an
/// unauthenticated condition from the API's point of view.
///
/// # Implementations
///
/// - [`HttpIdentityProvider`]: calls the provider's user-info endpoint over
///   HTTPS with the caller's bearer token
/// - [`StaticIdentityProvider`]: fixed token→principal map for tests

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Identity resolution error
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The provider rejected the token
    #[error("invalid authentication credentials: {0}")]
    InvalidToken(String),

    /// The provider could not be reached
    #[error("identity provider unreachable: {0}")]
    Unreachable(String),
}

/// Verifies bearer tokens against the external identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a bearer token to the principal's stable user id
    async fn resolve(&self, token: &str) -> Result<Uuid, IdentityError>;
}

/// Shape of the provider's user-info response
///
/// Only the principal id is consumed; the rest of the body is ignored.
#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
}

/// HTTP-backed identity provider client
///
/// Issues `GET {base_url}/user` with the caller's token as the bearer
/// credential. A 2xx response carrying a user id resolves the principal;
/// everything else fails verification.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityProvider {
    /// Creates a provider client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpIdentityProvider {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Uuid, IdentityError> {
        let url = format!("{}/user", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IdentityError::InvalidToken(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let user: ProviderUser = response
            .json()
            .await
            .map_err(|e| IdentityError::InvalidToken(format!("malformed provider response: {}", e)))?;

        Ok(user.id)
    }
}

/// Fixed token→principal map, for tests
#[derive(Debug, Default)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, Uuid>,
}

impl StaticIdentityProvider {
    /// Creates an empty provider that rejects every token
    pub fn new() -> Self {
        StaticIdentityProvider::default()
    }

    /// Registers a token for a principal
    pub fn with_token(mut self, token: impl Into<String>, user_id: Uuid) -> Self {
        self.tokens.insert(token.into(), user_id);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Uuid, IdentityError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| IdentityError::InvalidToken("unknown token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_resolves_known_token() {
        let user_id = Uuid::new_v4();
        let provider = StaticIdentityProvider::new().with_token("token-1", user_id);

        assert_eq!(provider.resolve("token-1").await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_static_provider_rejects_unknown_token() {
        let provider = StaticIdentityProvider::new();

        let err = provider.resolve("nope").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidToken(_)));
    }

    #[test]
    fn test_identity_error_display() {
        let err = IdentityError::InvalidToken("provider returned 401".to_string());
        assert_eq!(
            err.to_string(),
            "invalid authentication credentials: provider returned 401"
        );
    }
}
