use aaprov_core::AppResult;
use aaprov_domain::RunbookSpec;
use async_trait::async_trait;

/// Port for reading runbook scripts from blob storage.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Reads the script body as UTF-8 text.
    async fn read_script(&self, spec: &RunbookSpec) -> AppResult<String>;

    /// Builds the blob URL without SAS token.
    fn blob_url(&self, spec: &RunbookSpec) -> AppResult<String>;
}
