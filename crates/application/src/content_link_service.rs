use std::sync::Arc;

use aaprov_core::AppResult;
use aaprov_domain::{ContentLink, RunbookSpec};
use tracing::{info, warn};

use crate::provisioning_ports::ContentStore;

/// Builds publishable content links for runbook scripts.
#[derive(Clone)]
pub struct ContentLinkService {
    content_store: Arc<dyn ContentStore>,
}

impl ContentLinkService {
    /// Creates a content link service.
    #[must_use]
    pub fn new(content_store: Arc<dyn ContentStore>) -> Self {
        Self { content_store }
    }

    /// Builds one link per readable runbook script, in input order.
    ///
    /// Scripts that cannot be read or linked are logged and left out.
    pub async fn link_runbooks(&self, specs: &[RunbookSpec]) -> Vec<ContentLink> {
        let mut links = Vec::with_capacity(specs.len());
        for spec in specs {
            match self.link_runbook(spec).await {
                Ok(link) => links.push(link),
                Err(error) => warn!(
                    runbook = spec.runbook_name(),
                    blob = spec.blob_name(),
                    error = %error,
                    "runbook content link skipped"
                ),
            }
        }

        info!(
            requested = specs.len(),
            linked = links.len(),
            "runbook content links generated"
        );
        links
    }

    async fn link_runbook(&self, spec: &RunbookSpec) -> AppResult<ContentLink> {
        let blob_url = self.content_store.blob_url(spec)?;
        let body = self.content_store.read_script(spec).await?;
        ContentLink::for_script(spec, &blob_url, &body)
    }
}
