use std::sync::Arc;
use std::time::Duration;

use aaprov_application::{
    AccountScope, AccountUpsertRequest, AutomationClient, CloudResource,
    JobScheduleCreateRequest, ResourceDiscoveryClient, ResourceGroup, RunbookUpsertRequest,
    UpsertedResource, UpsertedVariable, VariableUpsertRequest,
};
use aaprov_core::{AppError, AppResult};
use aaprov_domain::{PackageSpec, ScheduleSpec, TenantCredential};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::azure_token_provider::AzureTokenProvider;

mod automation;
mod discovery;
mod payloads;

use payloads::{ArmErrorEnvelope, ArmPage};

/// Public cloud Resource Manager endpoint.
pub const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com";

/// API version for resource group and resource listings.
pub const RESOURCES_API_VERSION: &str = "2021-04-01";

/// API version for automation account resources.
pub const AUTOMATION_API_VERSION: &str = "2023-11-01";

/// Azure Resource Manager REST client for discovery and automation calls.
pub struct ArmManagementClient {
    http_client: reqwest::Client,
    token_provider: Arc<AzureTokenProvider>,
    endpoint: Url,
    max_attempts: u8,
    retry_backoff_ms: u64,
}

impl ArmManagementClient {
    /// Creates a client for the given management endpoint.
    pub fn new(
        http_client: reqwest::Client,
        token_provider: Arc<AzureTokenProvider>,
        endpoint: &str,
        max_attempts: u8,
        retry_backoff_ms: u64,
    ) -> AppResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|error| {
            AppError::Validation(format!("invalid management endpoint '{endpoint}': {error}"))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "management endpoint '{endpoint}' cannot carry resource paths"
            )));
        }

        Ok(Self {
            http_client,
            token_provider,
            endpoint,
            max_attempts: max_attempts.max(1),
            retry_backoff_ms: retry_backoff_ms.max(50),
        })
    }

    fn resource_url(
        &self,
        segments: &[&str],
        api_version: &str,
        filter: Option<&str>,
    ) -> AppResult<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal("management endpoint cannot carry resource paths".to_owned())
            })?
            .pop_if_empty()
            .extend(segments);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-version", api_version);
            if let Some(filter) = filter {
                query.append_pair("$filter", filter);
            }
        }

        Ok(url)
    }

    fn automation_url(&self, scope: &AccountScope, child: Option<(&str, &str)>) -> AppResult<Url> {
        let mut segments = vec![
            "subscriptions",
            scope.subscription_id.as_str(),
            "resourceGroups",
            scope.resource_group_name.as_str(),
            "providers",
            "Microsoft.Automation",
            "automationAccounts",
            scope.account_name.as_str(),
        ];
        if let Some((collection, name)) = child {
            segments.push(collection);
            segments.push(name);
        }

        self.resource_url(&segments, AUTOMATION_API_VERSION, None)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &TenantCredential,
        operation: &str,
        url: &Url,
    ) -> AppResult<T> {
        let response = self
            .send_with_retry(credential, operation, |client| client.get(url.clone()))
            .await?;
        decode_json(response, operation).await
    }

    async fn put_json<B, T>(
        &self,
        credential: &TenantCredential,
        operation: &str,
        url: &Url,
        body: &B,
    ) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .send_with_retry(credential, operation, |client| {
                client.put(url.clone()).json(body)
            })
            .await?;
        decode_json(response, operation).await
    }

    async fn list_all<T: DeserializeOwned>(
        &self,
        credential: &TenantCredential,
        operation: &str,
        first_page: Url,
    ) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next_page = Some(first_page);

        while let Some(url) = next_page.take() {
            debug!(operation, url = %url, "fetching page");
            let page: ArmPage<T> = self.get_json(credential, operation, &url).await?;
            items.extend(page.value);

            next_page = page
                .next_link
                .filter(|link| !link.trim().is_empty())
                .map(|link| {
                    Url::parse(link.as_str()).map_err(|error| {
                        AppError::Upstream(format!(
                            "{operation} returned an invalid next link: {error}"
                        ))
                    })
                })
                .transpose()?;
        }

        Ok(items)
    }

    async fn send_with_retry<F>(
        &self,
        credential: &TenantCredential,
        operation: &str,
        mut build: F,
    ) -> AppResult<reqwest::Response>
    where
        F: FnMut(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_u8;
        let mut last_error: Option<String> = None;

        while attempt < self.max_attempts {
            attempt = attempt.saturating_add(1);
            let token = self.token_provider.access_token(credential).await?;
            let response = build(&self.http_client).bearer_auth(token).send().await;

            match response {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response)
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS =>
                {
                    last_error = Some(format!(
                        "transient HTTP status {} for {operation}",
                        response.status()
                    ));
                }
                Ok(response) => {
                    let status = response.status();
                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        self.token_provider.invalidate(credential).await;
                    }
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
                    return Err(status_error(status, &body, operation));
                }
                Err(error) => {
                    last_error = Some(format!("{operation} transport error: {error}"));
                }
            }

            if attempt < self.max_attempts {
                let delay = self.retry_backoff_ms.saturating_mul(u64::from(attempt));
                warn!(
                    operation,
                    attempt,
                    max_attempts = self.max_attempts,
                    delay_ms = delay,
                    "retrying management call"
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(AppError::Upstream(last_error.unwrap_or_else(|| {
            format!("{operation} failed without response")
        })))
    }
}

async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> AppResult<T> {
    response.json::<T>().await.map_err(|error| {
        AppError::Upstream(format!("{operation} returned an unreadable body: {error}"))
    })
}

fn status_error(status: reqwest::StatusCode, body: &str, operation: &str) -> AppError {
    let detail = match serde_json::from_str::<ArmErrorEnvelope>(body) {
        Ok(envelope) => format!("{}: {}", envelope.error.code, envelope.error.message),
        Err(_) => body.trim().to_owned(),
    };
    let message = format!("{operation} failed with status {status}: {detail}");

    match status {
        reqwest::StatusCode::CONFLICT => AppError::Conflict(message),
        reqwest::StatusCode::NOT_FOUND => AppError::NotFound(message),
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            AppError::Unauthorized(message)
        }
        _ => AppError::Upstream(message),
    }
}
