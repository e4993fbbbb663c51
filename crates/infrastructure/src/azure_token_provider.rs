use std::collections::HashMap;

use aaprov_core::{AppError, AppResult};
use aaprov_domain::TenantCredential;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

/// Public cloud login endpoint.
pub const DEFAULT_LOGIN_ENDPOINT: &str = "https://login.microsoftonline.com";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// OAuth2 client-credentials token source with a per-principal cache.
pub struct AzureTokenProvider {
    http_client: reqwest::Client,
    login_endpoint: String,
    scope: String,
    cached_tokens: RwLock<HashMap<String, CachedToken>>,
    grace_period: Duration,
}

impl AzureTokenProvider {
    /// Creates a token provider for the given resource endpoint.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        login_endpoint: impl Into<String>,
        resource_endpoint: &str,
    ) -> Self {
        Self {
            http_client,
            login_endpoint: login_endpoint.into().trim_end_matches('/').to_owned(),
            scope: format!("{}/.default", resource_endpoint.trim_end_matches('/')),
            cached_tokens: RwLock::new(HashMap::new()),
            grace_period: Duration::minutes(5),
        }
    }

    /// Returns a bearer token, refreshing it when it expires within the grace period.
    pub async fn access_token(&self, credential: &TenantCredential) -> AppResult<String> {
        let key = cache_key(credential);
        {
            let cache = self.cached_tokens.read().await;
            if let Some(token) = cache.get(&key)
                && !token.is_expired(self.grace_period)
            {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.acquire_token(credential).await?;
        let access_token = token.access_token.clone();
        self.cached_tokens.write().await.insert(key, token);
        Ok(access_token)
    }

    /// Drops the cached token of a principal.
    pub async fn invalidate(&self, credential: &TenantCredential) {
        self.cached_tokens
            .write()
            .await
            .remove(&cache_key(credential));
    }

    async fn acquire_token(&self, credential: &TenantCredential) -> AppResult<CachedToken> {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.login_endpoint,
            credential.tenant_id()
        );
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", credential.client_id()),
            ("client_secret", credential.client_secret()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .http_client
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|error| {
                AppError::Credential(format!(
                    "token request for tenant '{}' failed: {error}",
                    credential.tenant_id()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Credential(format!(
                "token request for tenant '{}' failed with status {status}: {body}",
                credential.tenant_id()
            )));
        }

        let token_response = response.json::<TokenResponse>().await.map_err(|error| {
            AppError::Credential(format!("failed to parse token response: {error}"))
        })?;
        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);
        debug!(
            tenant_id = credential.tenant_id(),
            expires_at = %expires_at,
            "acquired management token"
        );

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}

fn cache_key(credential: &TenantCredential) -> String {
    format!("{}/{}", credential.tenant_id(), credential.client_id())
}

#[cfg(test)]
mod tests {
    use aaprov_domain::TenantCredential;
    use chrono::{Duration, Utc};

    use super::{AzureTokenProvider, CachedToken, cache_key};

    #[test]
    fn token_expires_within_grace_period() {
        let token = CachedToken {
            access_token: "token".to_owned(),
            expires_at: Utc::now() + Duration::minutes(10),
        };

        assert!(!token.is_expired(Duration::minutes(5)));
        assert!(token.is_expired(Duration::minutes(15)));
    }

    #[test]
    fn cache_key_separates_principals() {
        let first = TenantCredential::new("tenant", "client-a", "secret")
            .unwrap_or_else(|_| unreachable!());
        let second = TenantCredential::new("tenant", "client-b", "secret")
            .unwrap_or_else(|_| unreachable!());

        assert_ne!(cache_key(&first), cache_key(&second));
    }

    #[tokio::test]
    async fn cached_token_is_reused_without_network() {
        let provider = AzureTokenProvider::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9/",
            "https://management.azure.com/",
        );
        assert_eq!(provider.scope, "https://management.azure.com/.default");

        let credential = TenantCredential::new("tenant", "client", "secret")
            .unwrap_or_else(|_| unreachable!());
        provider.cached_tokens.write().await.insert(
            cache_key(&credential),
            CachedToken {
                access_token: "cached".to_owned(),
                expires_at: Utc::now() + Duration::hours(1),
            },
        );

        let token = provider
            .access_token(&credential)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(token, "cached");

        provider.invalidate(&credential).await;
        assert!(provider.cached_tokens.read().await.is_empty());
    }
}
