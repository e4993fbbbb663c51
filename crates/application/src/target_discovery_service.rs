use std::sync::Arc;

use aaprov_core::AppResult;
use aaprov_domain::{Subscription, Target, Tenant, TenantCredential, TenantResult};
use tracing::{debug, info, warn};

use crate::provisioning_ports::ResourceDiscoveryClient;

/// Resource group prefix that marks a group as eligible.
pub const DEFAULT_RESOURCE_GROUP_PREFIX: &str = "HEC";

/// Resource type queried inside eligible groups.
pub const DEFAULT_RESOURCE_TYPE: &str = "Microsoft.Storage/storageAccounts";

/// Resource kind that qualifies a group for provisioning.
pub const DEFAULT_RESOURCE_KIND: &str = "FileStorage";

/// Filters applied while scanning subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryPolicy {
    /// Case-sensitive resource group name prefix.
    pub resource_group_prefix: String,
    /// Resource type passed to the server-side filter.
    pub resource_type: String,
    /// Exact resource kind a qualifying resource must have.
    pub resource_kind: String,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            resource_group_prefix: DEFAULT_RESOURCE_GROUP_PREFIX.to_owned(),
            resource_type: DEFAULT_RESOURCE_TYPE.to_owned(),
            resource_kind: DEFAULT_RESOURCE_KIND.to_owned(),
        }
    }
}

/// Finds resource groups that need an automation account.
#[derive(Clone)]
pub struct TargetDiscoveryService {
    discovery_client: Arc<dyn ResourceDiscoveryClient>,
    policy: DiscoveryPolicy,
}

impl TargetDiscoveryService {
    /// Creates a discovery service with the default policy.
    #[must_use]
    pub fn new(discovery_client: Arc<dyn ResourceDiscoveryClient>) -> Self {
        Self {
            discovery_client,
            policy: DiscoveryPolicy::default(),
        }
    }

    /// Replaces the discovery policy.
    #[must_use]
    pub fn with_policy(mut self, policy: DiscoveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Scans every subscription of a tenant.
    ///
    /// A subscription whose listing fails contributes no targets; the others
    /// are still scanned.
    pub async fn discover_tenant(
        &self,
        tenant: &Tenant,
        credential: &TenantCredential,
    ) -> TenantResult {
        let mut result = TenantResult::empty(tenant.name.clone());
        for subscription in &tenant.subscriptions {
            match self.discover_subscription(credential, subscription).await {
                Ok(targets) => result.targets.extend(targets),
                Err(error) => warn!(
                    tenant = %tenant.name,
                    subscription_id = %subscription.id,
                    error = %error,
                    "subscription discovery failed"
                ),
            }
        }

        info!(
            tenant = %tenant.name,
            subscriptions = tenant.subscriptions.len(),
            targets = result.targets.len(),
            "tenant discovery finished"
        );
        result
    }

    async fn discover_subscription(
        &self,
        credential: &TenantCredential,
        subscription: &Subscription,
    ) -> AppResult<Vec<Target>> {
        let resource_groups = self
            .discovery_client
            .list_resource_groups(credential, &subscription.id)
            .await?;

        let mut targets = Vec::new();
        for resource_group in resource_groups {
            if !resource_group
                .name
                .starts_with(&self.policy.resource_group_prefix)
            {
                continue;
            }

            let resource_names = self
                .discovery_client
                .list_resources(
                    credential,
                    &subscription.id,
                    &resource_group.name,
                    &self.policy.resource_type,
                )
                .await?
                .into_iter()
                .filter(|resource| {
                    resource.kind.as_deref() == Some(self.policy.resource_kind.as_str())
                })
                .map(|resource| resource.name)
                .collect::<Vec<_>>();

            if resource_names.is_empty() {
                debug!(
                    subscription_id = %subscription.id,
                    resource_group = %resource_group.name,
                    "no qualifying resources"
                );
                continue;
            }

            match Target::discovered(
                subscription,
                resource_group.name.as_str(),
                resource_group.location,
                resource_names,
            ) {
                Ok(target) => targets.push(target),
                Err(error) => warn!(
                    subscription_id = %subscription.id,
                    resource_group = %resource_group.name,
                    error = %error,
                    "resource group skipped"
                ),
            }
        }

        Ok(targets)
    }
}
