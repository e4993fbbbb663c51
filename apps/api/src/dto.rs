use std::collections::BTreeMap;

use aaprov_application::{ProvisioningRun, ReportSummary};
use aaprov_domain::{ProvisioningStage, Target, TenantResult};
use serde::Serialize;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Trigger response: the enriched targets of every requested tenant.
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub tenants: Vec<TenantResultResponse>,
    pub report: Option<ReportSummary>,
}

/// Targets of one tenant, keyed the way downstream consumers read them.
#[derive(Debug, Serialize)]
pub struct TenantResultResponse {
    #[serde(rename = "tenantName")]
    pub tenant_name: String,
    pub data: Vec<TargetResponse>,
}

#[derive(Debug, Serialize)]
pub struct PublishedRunbookResponse {
    pub runbookname: String,
    pub runbookid: String,
}

#[derive(Debug, Serialize)]
pub struct StageStatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// One provisioned target.
#[derive(Debug, Serialize)]
pub struct TargetResponse {
    pub subscription_id: String,
    pub subscription_name: String,
    pub rg_name: String,
    pub resource_name: Vec<String>,
    #[serde(rename = "createdTime")]
    pub created_time: String,
    pub automationaccountname: String,
    pub location: String,
    pub automationaccountid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variableadditionlist: Option<Vec<BTreeMap<String, String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_runbooks: Option<PublishedRunbookResponse>,
    pub state: &'static str,
    pub stages: BTreeMap<&'static str, StageStatusResponse>,
}

impl From<ProvisioningRun> for TriggerResponse {
    fn from(value: ProvisioningRun) -> Self {
        Self {
            tenants: value.tenants.iter().map(TenantResultResponse::from).collect(),
            report: value.report,
        }
    }
}

impl From<&TenantResult> for TenantResultResponse {
    fn from(value: &TenantResult) -> Self {
        Self {
            tenant_name: value.tenant.to_string(),
            data: value.targets.iter().map(TargetResponse::from).collect(),
        }
    }
}

impl From<&Target> for TargetResponse {
    fn from(value: &Target) -> Self {
        Self {
            subscription_id: value.subscription_id().to_owned(),
            subscription_name: value.subscription_name().to_owned(),
            rg_name: value.resource_group_name().to_owned(),
            resource_name: value.resource_names().to_vec(),
            created_time: value.created_time().to_owned(),
            automationaccountname: value.account_name().to_string(),
            location: value.location().to_owned(),
            automationaccountid: value.automation_account_id().map(str::to_owned),
            variableadditionlist: value.variables().value().map(|variables| {
                variables
                    .iter()
                    .map(|variable| BTreeMap::from([(variable.name.clone(), variable.value.clone())]))
                    .collect()
            }),
            published_runbooks: value.last_published_runbook().map(|runbook| {
                PublishedRunbookResponse {
                    runbookname: runbook.runbook_name.clone(),
                    runbookid: runbook.runbook_id.clone(),
                }
            }),
            state: value.state().as_str(),
            stages: ProvisioningStage::ALL
                .iter()
                .map(|stage| {
                    (
                        stage.as_str(),
                        StageStatusResponse {
                            status: value.stage_status(*stage),
                            reason: value.stage_skip_reason(*stage).map(str::to_owned),
                        },
                    )
                })
                .collect(),
        }
    }
}
