use super::*;

impl ProvisioningService {
    /// Installs the configured script packages into every target's account.
    pub async fn install_packages(&self, credential: &TenantCredential, result: &mut TenantResult) {
        let tenant = &result.tenant;
        self.for_each_target(&mut result.targets, move |target| {
            self.install_target_packages(tenant, credential, target)
        })
        .await;
    }

    async fn install_target_packages(
        &self,
        tenant: &TenantName,
        credential: &TenantCredential,
        target: &mut Target,
    ) {
        let result = self.upsert_packages(credential, target).await;
        let outcome = settle(ProvisioningStage::PackageInstall, tenant, target, result);
        target.record_packages(outcome);
    }

    async fn upsert_packages(
        &self,
        credential: &TenantCredential,
        target: &Target,
    ) -> AppResult<Vec<InstalledPackage>> {
        let scope = AccountScope::for_target(target);
        let mut installed = Vec::with_capacity(self.plan.packages.len());

        for package in &self.plan.packages {
            let resource = self
                .automation_client
                .upsert_package(credential, &scope, package)
                .await
                .map_err(|error| error.context(format!("package '{}'", package.name)))?;

            installed.push(InstalledPackage {
                name: package.name.clone(),
                version: package.version.clone(),
                package_id: resource.id,
            });
        }

        Ok(installed)
    }
}
