use std::collections::BTreeMap;

use super::*;

impl ProvisioningService {
    /// Associates runbooks with schedules in every target's account.
    ///
    /// Association ids are derived from account, runbook and schedule names,
    /// so a rerun hits the existing association, which counts as linked.
    pub async fn link_runbooks_to_schedules(
        &self,
        credential: &TenantCredential,
        result: &mut TenantResult,
    ) {
        let tenant = &result.tenant;
        self.for_each_target(&mut result.targets, move |target| {
            self.link_target_runbooks(tenant, credential, target)
        })
        .await;
    }

    async fn link_target_runbooks(
        &self,
        tenant: &TenantName,
        credential: &TenantCredential,
        target: &mut Target,
    ) {
        let result = self.create_job_schedules(credential, target).await;
        let outcome = settle(ProvisioningStage::RunbookScheduleLink, tenant, target, result);
        target.record_job_schedules(outcome);
    }

    async fn create_job_schedules(
        &self,
        credential: &TenantCredential,
        target: &Target,
    ) -> AppResult<Vec<JobScheduleRef>> {
        let scope = AccountScope::for_target(target);
        let mut linked = Vec::with_capacity(self.plan.links.len());

        for link in &self.plan.links {
            let request = JobScheduleCreateRequest {
                job_schedule_id: link.job_schedule_id(target.account_name()),
                runbook_name: link.runbook_name.clone(),
                schedule_name: link.schedule_name.clone(),
                run_on: None,
                parameters: BTreeMap::new(),
            };

            let already_linked = match self
                .automation_client
                .create_job_schedule(credential, &scope, &request)
                .await
            {
                Ok(_) => false,
                Err(AppError::Conflict(_)) => true,
                Err(error) => {
                    return Err(error.context(format!(
                        "link '{}' -> '{}'",
                        link.runbook_name, link.schedule_name
                    )));
                }
            };

            linked.push(JobScheduleRef {
                job_schedule_id: request.job_schedule_id,
                runbook_name: request.runbook_name,
                schedule_name: request.schedule_name,
                already_linked,
            });
        }

        Ok(linked)
    }
}
