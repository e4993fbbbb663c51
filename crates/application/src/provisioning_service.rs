use std::future::Future;
use std::sync::Arc;

use aaprov_core::{AppError, AppResult, TenantName};
use aaprov_domain::{
    ContentLink, InstalledPackage, JobScheduleRef, ProvisioningStage, PublishedRunbook,
    RunbookVariable, ScheduleRef, StageOutcome, Target, TenantCredential, TenantResult,
    VariableAssignment,
};
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::provisioning_ports::{
    AccountScope, AccountUpsertRequest, AutomationClient, JobScheduleCreateRequest,
    RunbookUpsertRequest, VariableUpsertRequest,
};

mod account;
mod links;
mod packages;
mod plan;
mod runbooks;
mod schedules;
mod variables;

pub use plan::{
    ACCOUNT_TYPE_TAG, AccountTemplate, DEFAULT_ACCOUNT_SKU, DEFAULT_EXCLUDE_AFS,
    ProvisioningPlan, RunbookTemplate, VARIABLE_DESCRIPTION, VariableTemplate,
};

/// Applies the provisioning stages to discovered targets.
///
/// Each stage runs over every target of a tenant before the next stage
/// starts. A failure is recorded on the affected target as a skipped stage
/// and never stops the other targets or the later stages.
#[derive(Clone)]
pub struct ProvisioningService {
    automation_client: Arc<dyn AutomationClient>,
    plan: Arc<ProvisioningPlan>,
}

impl ProvisioningService {
    /// Creates a provisioning service.
    #[must_use]
    pub fn new(automation_client: Arc<dyn AutomationClient>, plan: ProvisioningPlan) -> Self {
        Self {
            automation_client,
            plan: Arc::new(plan),
        }
    }

    /// Returns the applied plan.
    #[must_use]
    pub fn plan(&self) -> &ProvisioningPlan {
        &self.plan
    }

    /// Runs all stages in order over the tenant's targets.
    pub async fn provision_tenant(
        &self,
        credential: &TenantCredential,
        result: &mut TenantResult,
        content_links: &[ContentLink],
    ) {
        if result.targets.is_empty() {
            debug!(tenant = %result.tenant, "no targets to provision");
            return;
        }

        self.create_accounts(credential, result).await;
        self.update_variables(credential, result).await;
        self.publish_runbooks(credential, result, content_links).await;
        self.create_schedules(credential, result).await;
        self.link_runbooks_to_schedules(credential, result).await;
        self.install_packages(credential, result).await;

        info!(
            tenant = %result.tenant,
            targets = result.targets.len(),
            "tenant provisioning finished"
        );
    }

    async fn for_each_target<'t, F, Fut>(&self, targets: &'t mut [Target], apply: F)
    where
        F: FnMut(&'t mut Target) -> Fut,
        Fut: Future<Output = ()>,
    {
        futures::stream::iter(targets.iter_mut())
            .for_each_concurrent(self.plan.stage_concurrency.max(1), apply)
            .await;
    }
}

fn settle<T>(
    stage: ProvisioningStage,
    tenant: &TenantName,
    target: &Target,
    result: AppResult<T>,
) -> StageOutcome<T> {
    match result {
        Ok(value) => {
            info!(
                tenant = %tenant,
                subscription_id = target.subscription_id(),
                resource_group = target.resource_group_name(),
                automation_account = %target.account_name(),
                stage = stage.as_str(),
                "stage succeeded"
            );
            StageOutcome::Succeeded(value)
        }
        Err(error) => {
            warn!(
                tenant = %tenant,
                subscription_id = target.subscription_id(),
                resource_group = target.resource_group_name(),
                automation_account = %target.account_name(),
                stage = stage.as_str(),
                error = %error,
                "stage skipped"
            );
            StageOutcome::skipped(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests;
