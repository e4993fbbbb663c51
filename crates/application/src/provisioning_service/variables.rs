use rand::seq::SliceRandom;
use serde_json::Value;

use super::*;

impl ProvisioningService {
    /// Upserts the configured variables into every target's account.
    pub async fn update_variables(&self, credential: &TenantCredential, result: &mut TenantResult) {
        let tenant = &result.tenant;
        self.for_each_target(&mut result.targets, move |target| {
            self.update_target_variables(tenant, credential, target)
        })
        .await;
    }

    async fn update_target_variables(
        &self,
        tenant: &TenantName,
        credential: &TenantCredential,
        target: &mut Target,
    ) {
        let result = self.upsert_variables(credential, target).await;
        let outcome = settle(ProvisioningStage::VariableUpsert, tenant, target, result);
        target.record_variables(outcome);
    }

    async fn upsert_variables(
        &self,
        credential: &TenantCredential,
        target: &Target,
    ) -> AppResult<Vec<VariableAssignment>> {
        let scope = AccountScope::for_target(target);
        let mut assignments = Vec::with_capacity(self.plan.variables.names.len());

        for name in &self.plan.variables.names {
            let Some(variable) = RunbookVariable::parse(name) else {
                debug!(variable = %name, "ignoring unrecognised variable name");
                continue;
            };

            let request = VariableUpsertRequest {
                name: variable.as_str().to_owned(),
                value: self.variable_value(variable, target)?,
                description: VARIABLE_DESCRIPTION.to_owned(),
                is_encrypted: false,
            };
            let stored = self
                .automation_client
                .upsert_variable(credential, &scope, &request)
                .await
                .map_err(|error| error.context(format!("variable '{}'", request.name)))?;

            assignments.push(VariableAssignment {
                name: stored.name,
                value: stored.value,
            });
        }

        Ok(assignments)
    }

    fn variable_value(&self, variable: RunbookVariable, target: &Target) -> AppResult<String> {
        let value = match variable {
            RunbookVariable::ExcludeAfs => Value::from(self.plan.variables.exclude_afs.as_str()),
            RunbookVariable::ObjectStorage => {
                Value::from(pick_object_storage(target.resource_names())?)
            }
            RunbookVariable::ResourceGroup => Value::from(target.resource_group_name()),
            RunbookVariable::RetentionDays => self
                .plan
                .variables
                .retention_days
                .as_deref()
                .map_or(Value::Null, Value::from),
            RunbookVariable::SubscriptionId => Value::from(target.subscription_id()),
        };

        serde_json::to_string(&value).map_err(|error| {
            AppError::Internal(format!(
                "failed to encode variable '{}': {error}",
                variable.as_str()
            ))
        })
    }
}

/// Picks one qualifying resource name uniformly at random.
pub(super) fn pick_object_storage(resource_names: &[String]) -> AppResult<String> {
    resource_names
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| {
            AppError::Validation("target has no qualifying resources to pick from".to_owned())
        })
}
