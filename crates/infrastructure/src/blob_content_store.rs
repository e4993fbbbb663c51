use aaprov_application::ContentStore;
use aaprov_core::{AppError, AppResult};
use aaprov_domain::RunbookSpec;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Public cloud blob endpoint suffix.
pub const DEFAULT_BLOB_ENDPOINT_SUFFIX: &str = "blob.core.windows.net";

/// Reads runbook scripts from blob storage with the runbook's SAS token.
pub struct BlobContentStore {
    http_client: reqwest::Client,
    endpoint_suffix: String,
}

impl BlobContentStore {
    /// Creates a blob content store for the given endpoint suffix.
    #[must_use]
    pub fn new(http_client: reqwest::Client, endpoint_suffix: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint_suffix: endpoint_suffix.into().trim_matches('.').to_owned(),
        }
    }
}

#[async_trait]
impl ContentStore for BlobContentStore {
    async fn read_script(&self, spec: &RunbookSpec) -> AppResult<String> {
        let blob_url = self.blob_url(spec)?;
        let response = self
            .http_client
            .get(format!("{blob_url}{}", spec.sas_token()))
            .send()
            .await
            .map_err(|error| {
                AppError::ContentFetch(format!("blob '{}' request failed: {error}", spec.blob_name()))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ContentFetch(format!(
                "blob '{}' returned status {status}",
                spec.blob_name()
            )));
        }

        let body = response.text().await.map_err(|error| {
            AppError::ContentFetch(format!("blob '{}' body unreadable: {error}", spec.blob_name()))
        })?;
        debug!(
            runbook = spec.runbook_name(),
            blob = spec.blob_name(),
            bytes = body.len(),
            "runbook script fetched"
        );
        Ok(body)
    }

    fn blob_url(&self, spec: &RunbookSpec) -> AppResult<String> {
        let mut url = Url::parse(&format!(
            "https://{}.{}",
            spec.storage_account(),
            self.endpoint_suffix
        ))
        .map_err(|error| {
            AppError::ContentFetch(format!(
                "invalid storage account '{}': {error}",
                spec.storage_account()
            ))
        })?;

        url.path_segments_mut()
            .map_err(|()| {
                AppError::ContentFetch(format!(
                    "storage account '{}' cannot carry blob paths",
                    spec.storage_account()
                ))
            })?
            .pop_if_empty()
            .push(spec.container())
            .extend(spec.blob_name().split('/'));

        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use aaprov_application::ContentStore;
    use aaprov_domain::RunbookSpec;

    use super::{BlobContentStore, DEFAULT_BLOB_ENDPOINT_SUFFIX};

    fn store() -> BlobContentStore {
        BlobContentStore::new(reqwest::Client::new(), DEFAULT_BLOB_ENDPOINT_SUFFIX)
    }

    #[test]
    fn blob_url_keeps_virtual_directories() {
        let spec = RunbookSpec::new(
            "afs_backuprunbook",
            "scriptstore",
            "runbooks",
            "python/afs backup.py",
            "?sv=1",
        )
        .unwrap_or_else(|_| unreachable!());

        let url = store().blob_url(&spec).unwrap_or_else(|_| unreachable!());

        assert_eq!(
            url,
            "https://scriptstore.blob.core.windows.net/runbooks/python/afs%20backup.py"
        );
    }

    #[test]
    fn invalid_storage_account_is_a_fetch_error() {
        let spec = RunbookSpec::new("rb", "bad host", "runbooks", "rb.py", "")
            .unwrap_or_else(|_| unreachable!());

        assert!(store().blob_url(&spec).is_err());
    }
}
