use super::*;

impl ProvisioningService {
    /// Creates or updates the configured schedules in every target's account.
    pub async fn create_schedules(&self, credential: &TenantCredential, result: &mut TenantResult) {
        let tenant = &result.tenant;
        self.for_each_target(&mut result.targets, move |target| {
            self.create_target_schedules(tenant, credential, target)
        })
        .await;
    }

    async fn create_target_schedules(
        &self,
        tenant: &TenantName,
        credential: &TenantCredential,
        target: &mut Target,
    ) {
        let result = self.upsert_schedules(credential, target).await;
        let outcome = settle(ProvisioningStage::ScheduleUpsert, tenant, target, result);
        target.record_schedules(outcome);
    }

    async fn upsert_schedules(
        &self,
        credential: &TenantCredential,
        target: &Target,
    ) -> AppResult<Vec<ScheduleRef>> {
        let scope = AccountScope::for_target(target);
        let mut created = Vec::with_capacity(self.plan.schedules.len());

        for schedule in &self.plan.schedules {
            let resource = self
                .automation_client
                .upsert_schedule(credential, &scope, schedule)
                .await
                .map_err(|error| error.context(format!("schedule '{}'", schedule.name())))?;

            created.push(ScheduleRef {
                schedule_name: schedule.name().to_owned(),
                schedule_id: resource.id,
            });
        }

        Ok(created)
    }
}
