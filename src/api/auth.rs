//! Access tokens
//!
//! Token acquisition itself (the OAuth2 client-credentials exchange) lives
//! outside this crate: callers plug in a [`TokenProvider`]. [`Credentials`]
//! wraps a provider with expiry-aware caching so every request does not hit
//! the identity service.

use crate::error::{Result, ScmError};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Token expiry buffer - refresh tokens this much before they actually expire
/// This prevents using tokens that are about to expire during a request
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL when the provider does not report one (the API issues 15-minute tokens)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// An access token and its remaining lifetime
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_in: Option<Duration>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_in: None,
        }
    }

    pub fn with_expiry(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }
}

/// Source of bearer tokens
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> BoxFuture<'_, Result<AccessToken>>;
}

/// A fixed, pre-issued token
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the token from an environment variable
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(token) if !token.trim().is_empty() => Ok(Self(token.trim().to_string())),
            _ => Err(ScmError::Config(format!(
                "no access token found in ${}",
                var
            ))),
        }
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> BoxFuture<'_, Result<AccessToken>> {
        Box::pin(async move { Ok(AccessToken::new(self.0.clone())) })
    }
}

/// Credentials holder with token caching
#[derive(Clone)]
pub struct Credentials {
    provider: Arc<dyn TokenProvider>,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl Credentials {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Convenience constructor for a fixed token
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(Arc::new(StaticToken::new(token)))
    }

    /// Get an access token for API calls
    /// Security: Checks token expiry before returning cached token
    pub async fn get_token(&self) -> Result<String> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let token = self
            .provider
            .token()
            .await
            .map_err(|e| ScmError::Authentication(format!("failed to get access token: {}", e)))?;

        let ttl = token.expires_in.unwrap_or(DEFAULT_TOKEN_TTL);
        let expires_at = Instant::now() + ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.value.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New token cached, expires in ~{} seconds",
            ttl.saturating_sub(TOKEN_EXPIRY_BUFFER).as_secs()
        );

        Ok(token.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        expires_in: Duration,
    }

    impl TokenProvider for CountingProvider {
        fn token(&self) -> BoxFuture<'_, Result<AccessToken>> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(AccessToken::new(format!("token-{}", n)).with_expiry(self.expires_in))
            })
        }
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            expires_in: Duration::from_secs(900),
        });
        let credentials = Credentials::new(provider.clone());

        assert_eq!(credentials.get_token().await.unwrap(), "token-1");
        assert_eq!(credentials.get_token().await.unwrap(), "token-1");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_lived_token_is_not_reused() {
        // Lifetime shorter than the expiry buffer expires immediately
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            expires_in: Duration::from_secs(30),
        });
        let credentials = Credentials::new(provider.clone());

        credentials.get_token().await.unwrap();
        assert_eq!(credentials.get_token().await.unwrap(), "token-2");
    }

    #[test]
    fn test_missing_env_token_is_config_error() {
        let err = StaticToken::from_env("SCM_SDK_TEST_TOKEN_THAT_IS_NOT_SET").err().unwrap();
        assert!(matches!(err, ScmError::Config(_)));
    }
}
