use super::payloads::{
    AccountPayload, ArmResource, ArmVariable, JobSchedulePayload, PackagePayload,
    RunbookPayload, SchedulePayload, VariablePayload,
};
use super::*;

#[async_trait]
impl AutomationClient for ArmManagementClient {
    async fn upsert_account(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        request: &AccountUpsertRequest,
    ) -> AppResult<UpsertedResource> {
        let url = self.automation_url(scope, None)?;
        let payload = AccountPayload::new(scope.account_name.as_str(), request);
        let resource: ArmResource = self
            .put_json(credential, "automation account upsert", &url, &payload)
            .await?;
        Ok(upserted(resource))
    }

    async fn upsert_variable(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        request: &VariableUpsertRequest,
    ) -> AppResult<UpsertedVariable> {
        let url = self.automation_url(scope, Some(("variables", request.name.as_str())))?;
        let variable: ArmVariable = self
            .put_json(
                credential,
                "variable upsert",
                &url,
                &VariablePayload::from(request),
            )
            .await?;

        Ok(UpsertedVariable {
            name: variable.name,
            value: variable
                .properties
                .value
                .unwrap_or_else(|| request.value.clone()),
        })
    }

    async fn upsert_runbook(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        request: &RunbookUpsertRequest,
    ) -> AppResult<UpsertedResource> {
        let url = self.automation_url(scope, Some(("runbooks", request.name.as_str())))?;
        let resource: ArmResource = self
            .put_json(
                credential,
                "runbook upsert",
                &url,
                &RunbookPayload::from(request),
            )
            .await?;
        Ok(upserted(resource))
    }

    async fn upsert_schedule(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        schedule: &ScheduleSpec,
    ) -> AppResult<UpsertedResource> {
        let url = self.automation_url(scope, Some(("schedules", schedule.name())))?;
        let resource: ArmResource = self
            .put_json(
                credential,
                "schedule upsert",
                &url,
                &SchedulePayload::from(schedule),
            )
            .await?;
        Ok(upserted(resource))
    }

    async fn create_job_schedule(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        request: &JobScheduleCreateRequest,
    ) -> AppResult<UpsertedResource> {
        let job_schedule_id = request.job_schedule_id.to_string();
        let url = self.automation_url(scope, Some(("jobSchedules", job_schedule_id.as_str())))?;
        let resource: ArmResource = self
            .put_json(
                credential,
                "job schedule create",
                &url,
                &JobSchedulePayload::from(request),
            )
            .await?;
        Ok(upserted(resource))
    }

    async fn upsert_package(
        &self,
        credential: &TenantCredential,
        scope: &AccountScope,
        package: &PackageSpec,
    ) -> AppResult<UpsertedResource> {
        let url = self.automation_url(scope, Some(("python3Packages", package.name.as_str())))?;
        let resource: ArmResource = self
            .put_json(
                credential,
                "python package upsert",
                &url,
                &PackagePayload::from(package),
            )
            .await?;
        Ok(upserted(resource))
    }
}

fn upserted(resource: ArmResource) -> UpsertedResource {
    UpsertedResource {
        id: resource.id,
        name: resource.name,
    }
}
