use super::*;

impl ProvisioningService {
    /// Creates or updates the automation account of every target.
    pub async fn create_accounts(&self, credential: &TenantCredential, result: &mut TenantResult) {
        let tenant = &result.tenant;
        self.for_each_target(&mut result.targets, move |target| {
            self.upsert_account(tenant, credential, target)
        })
        .await;
    }

    async fn upsert_account(
        &self,
        tenant: &TenantName,
        credential: &TenantCredential,
        target: &mut Target,
    ) {
        let request = AccountUpsertRequest {
            location: target.location().to_owned(),
            tags: self.plan.account.tags.clone(),
            sku_name: self.plan.account.sku_name.clone(),
        };
        let result = self
            .automation_client
            .upsert_account(credential, &AccountScope::for_target(target), &request)
            .await
            .map(|resource| resource.id);

        let outcome = settle(ProvisioningStage::AccountUpsert, tenant, target, result);
        target.record_account(outcome);
    }
}
