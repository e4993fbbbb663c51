use std::sync::Arc;

use aaprov_domain::{ContentLink, RunbookSpec, Tenant, TenantResult};
use futures::{FutureExt, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::content_link_service::ContentLinkService;
use crate::provisioning_ports::CredentialProvider;
use crate::provisioning_service::ProvisioningService;
use crate::report_service::{ReportService, ReportSummary};
use crate::target_discovery_service::TargetDiscoveryService;

/// Input of one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRunRequest {
    /// Tenant seeds in processing order.
    pub tenants: Vec<Tenant>,
    /// Runbook scripts to publish into every account.
    pub runbooks: Vec<RunbookSpec>,
}

/// Outcome of one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningRun {
    /// One result per requested tenant, in request order.
    pub tenants: Vec<TenantResult>,
    /// Content links shared by all targets.
    pub content_links: Vec<ContentLink>,
    /// Report outcome when a report sink is configured.
    pub report: Option<ReportSummary>,
}

/// Runs discovery, provisioning and reporting for a batch of tenants.
#[derive(Clone)]
pub struct ProvisioningRunService {
    credential_provider: Arc<dyn CredentialProvider>,
    discovery_service: TargetDiscoveryService,
    content_link_service: ContentLinkService,
    provisioning_service: ProvisioningService,
    report_service: Option<ReportService>,
    tenant_concurrency: usize,
}

impl ProvisioningRunService {
    /// Creates a run service that processes tenants one at a time.
    #[must_use]
    pub fn new(
        credential_provider: Arc<dyn CredentialProvider>,
        discovery_service: TargetDiscoveryService,
        content_link_service: ContentLinkService,
        provisioning_service: ProvisioningService,
    ) -> Self {
        Self {
            credential_provider,
            discovery_service,
            content_link_service,
            provisioning_service,
            report_service: None,
            tenant_concurrency: 1,
        }
    }

    /// Adds report publication at the end of every run.
    #[must_use]
    pub fn with_report_service(mut self, report_service: ReportService) -> Self {
        self.report_service = Some(report_service);
        self
    }

    /// Sets how many tenants are processed at once.
    #[must_use]
    pub fn with_tenant_concurrency(mut self, tenant_concurrency: usize) -> Self {
        self.tenant_concurrency = tenant_concurrency.max(1);
        self
    }

    /// Executes one run. Failures are recorded in the returned results.
    pub async fn run(&self, request: &ProvisioningRunRequest) -> ProvisioningRun {
        info!(
            tenants = request.tenants.len(),
            runbooks = request.runbooks.len(),
            "provisioning run started"
        );

        let content_links = self
            .content_link_service
            .link_runbooks(&request.runbooks)
            .await;

        let tenant_runs: Vec<_> = request
            .tenants
            .iter()
            .map(|tenant| self.run_tenant(tenant, &content_links).boxed())
            .collect();
        let tenants = futures::stream::iter(tenant_runs)
            .buffered(self.tenant_concurrency)
            .collect::<Vec<_>>()
            .await;

        let report = match &self.report_service {
            Some(report_service) => Some(report_service.publish(&tenants).await),
            None => None,
        };

        info!(
            tenants = tenants.len(),
            targets = tenants
                .iter()
                .map(|result| result.targets.len())
                .sum::<usize>(),
            "provisioning run finished"
        );

        ProvisioningRun {
            tenants,
            content_links,
            report,
        }
    }

    async fn run_tenant(&self, tenant: &Tenant, content_links: &[ContentLink]) -> TenantResult {
        let credential = match self.credential_provider.credential_for(&tenant.name).await {
            Ok(credential) => credential,
            Err(error) => {
                warn!(
                    tenant = %tenant.name,
                    error = %error,
                    "tenant skipped, credential unavailable"
                );
                return TenantResult::empty(tenant.name.clone());
            }
        };

        let mut result = self
            .discovery_service
            .discover_tenant(tenant, &credential)
            .await;
        self.provisioning_service
            .provision_tenant(&credential, &mut result, content_links)
            .await;
        result
    }
}
