use aaprov_core::{AppError, AppResult, TenantName};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AutomationAccountName, Subscription, derive_account_name};

/// Result of one pipeline stage for one target.
///
/// Keeps "never attempted" apart from "attempted and failed", which a bare
/// nullable field cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum StageOutcome<T> {
    /// The stage has not run for this target yet.
    NotAttempted,
    /// The stage completed and produced a value.
    Succeeded(T),
    /// The stage ran but was skipped after a failure.
    Skipped {
        /// Failure description with operation context.
        reason: String,
    },
}

impl<T> Default for StageOutcome<T> {
    fn default() -> Self {
        Self::NotAttempted
    }
}

impl<T> StageOutcome<T> {
    /// Creates a skipped outcome.
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Converts a stage result, keeping the error text as skip reason.
    #[must_use]
    pub fn from_result(result: AppResult<T>) -> Self {
        match result {
            Ok(value) => Self::Succeeded(value),
            Err(error) => Self::skipped(error.to_string()),
        }
    }

    /// Returns whether the stage succeeded.
    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Returns the produced value when the stage succeeded.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            Self::NotAttempted | Self::Skipped { .. } => None,
        }
    }

    /// Returns the skip reason when the stage failed.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        match self {
            Self::Skipped { reason } => Some(reason.as_str()),
            Self::NotAttempted | Self::Succeeded(_) => None,
        }
    }

    /// Returns a stable status label.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::NotAttempted => "not_attempted",
            Self::Succeeded(_) => "succeeded",
            Self::Skipped { .. } => "skipped",
        }
    }
}

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningStage {
    /// Automation account create-or-update.
    AccountUpsert,
    /// Configuration variable create-or-update.
    VariableUpsert,
    /// Runbook publish.
    RunbookPublish,
    /// Schedule create-or-update.
    ScheduleUpsert,
    /// Runbook to schedule association.
    RunbookScheduleLink,
    /// Script package installation.
    PackageInstall,
}

impl ProvisioningStage {
    /// All stages in execution order.
    pub const ALL: [Self; 6] = [
        Self::AccountUpsert,
        Self::VariableUpsert,
        Self::RunbookPublish,
        Self::ScheduleUpsert,
        Self::RunbookScheduleLink,
        Self::PackageInstall,
    ];

    /// Returns stable stage label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountUpsert => "account_upsert",
            Self::VariableUpsert => "variable_upsert",
            Self::RunbookPublish => "runbook_publish",
            Self::ScheduleUpsert => "schedule_upsert",
            Self::RunbookScheduleLink => "runbook_schedule_link",
            Self::PackageInstall => "package_install",
        }
    }
}

/// Furthest state a target reached through consecutive successful stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningState {
    /// Emitted by discovery, no stage succeeded yet.
    Discovered,
    /// Automation account exists.
    AccountUpserted,
    /// Variables injected.
    VariablesSet,
    /// Runbooks published.
    RunbooksPublished,
    /// Schedules created.
    ScheduleCreated,
    /// Runbooks linked to schedules.
    RunbooksLinked,
    /// Packages installed.
    PackagesInstalled,
}

impl ProvisioningState {
    /// Returns stable state label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::AccountUpserted => "account_upserted",
            Self::VariablesSet => "variables_set",
            Self::RunbooksPublished => "runbooks_published",
            Self::ScheduleCreated => "schedule_created",
            Self::RunbooksLinked => "runbooks_linked",
            Self::PackagesInstalled => "packages_installed",
        }
    }
}

/// Runbook published into an automation account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedRunbook {
    /// Runbook name.
    pub runbook_name: String,
    /// Resource id returned by the service.
    pub runbook_id: String,
}

/// Variable stored in an automation account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableAssignment {
    /// Variable name.
    pub name: String,
    /// JSON-encoded value as stored.
    pub value: String,
}

/// Schedule created in an automation account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRef {
    /// Schedule name.
    pub schedule_name: String,
    /// Resource id returned by the service.
    pub schedule_id: String,
}

/// Runbook to schedule association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobScheduleRef {
    /// Deterministic association identifier.
    pub job_schedule_id: Uuid,
    /// Linked runbook.
    pub runbook_name: String,
    /// Linked schedule.
    pub schedule_name: String,
    /// True when the association existed before this run.
    pub already_linked: bool,
}

/// Script package installed into an automation account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Resource id returned by the service.
    pub package_id: String,
}

/// One resource group slated for automation-account provisioning.
///
/// Created by discovery, enriched by each pipeline stage, read-only once the
/// run is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    subscription_id: String,
    subscription_name: String,
    resource_group_name: String,
    resource_names: Vec<String>,
    created_time: String,
    account_name: AutomationAccountName,
    location: String,
    account: StageOutcome<String>,
    variables: StageOutcome<Vec<VariableAssignment>>,
    runbooks: StageOutcome<Vec<PublishedRunbook>>,
    schedules: StageOutcome<Vec<ScheduleRef>>,
    job_schedules: StageOutcome<Vec<JobScheduleRef>>,
    packages: StageOutcome<Vec<InstalledPackage>>,
}

impl Target {
    /// Creates a discovered target, deriving its automation account name.
    pub fn discovered(
        subscription: &Subscription,
        resource_group_name: impl Into<String>,
        location: impl Into<String>,
        resource_names: Vec<String>,
    ) -> AppResult<Self> {
        let resource_group_name = resource_group_name.into();
        if resource_names.is_empty() {
            return Err(AppError::Validation(format!(
                "resource group '{resource_group_name}' has no qualifying resources"
            )));
        }

        let account_name = derive_account_name(resource_group_name.as_str())?;

        Ok(Self {
            subscription_id: subscription.id.clone(),
            subscription_name: subscription.name.clone(),
            resource_group_name,
            resource_names,
            created_time: subscription.created_time.clone(),
            account_name,
            location: location.into(),
            account: StageOutcome::NotAttempted,
            variables: StageOutcome::NotAttempted,
            runbooks: StageOutcome::NotAttempted,
            schedules: StageOutcome::NotAttempted,
            job_schedules: StageOutcome::NotAttempted,
            packages: StageOutcome::NotAttempted,
        })
    }

    /// Returns the subscription id.
    #[must_use]
    pub fn subscription_id(&self) -> &str {
        self.subscription_id.as_str()
    }

    /// Returns the subscription name.
    #[must_use]
    pub fn subscription_name(&self) -> &str {
        self.subscription_name.as_str()
    }

    /// Returns the resource group name.
    #[must_use]
    pub fn resource_group_name(&self) -> &str {
        self.resource_group_name.as_str()
    }

    /// Returns the qualifying resource names. Never empty.
    #[must_use]
    pub fn resource_names(&self) -> &[String] {
        self.resource_names.as_slice()
    }

    /// Returns the subscription creation timestamp.
    #[must_use]
    pub fn created_time(&self) -> &str {
        self.created_time.as_str()
    }

    /// Returns the derived automation account name.
    #[must_use]
    pub fn account_name(&self) -> &AutomationAccountName {
        &self.account_name
    }

    /// Returns the resource group location.
    #[must_use]
    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    /// Returns the account upsert outcome.
    #[must_use]
    pub fn account(&self) -> &StageOutcome<String> {
        &self.account
    }

    /// Returns the automation account id when the upsert succeeded.
    #[must_use]
    pub fn automation_account_id(&self) -> Option<&str> {
        self.account.value().map(String::as_str)
    }

    /// Returns the variable upsert outcome.
    #[must_use]
    pub fn variables(&self) -> &StageOutcome<Vec<VariableAssignment>> {
        &self.variables
    }

    /// Returns the runbook publish outcome.
    #[must_use]
    pub fn runbooks(&self) -> &StageOutcome<Vec<PublishedRunbook>> {
        &self.runbooks
    }

    /// Returns the most recently published runbook.
    #[must_use]
    pub fn last_published_runbook(&self) -> Option<&PublishedRunbook> {
        self.runbooks.value().and_then(|runbooks| runbooks.last())
    }

    /// Returns the schedule upsert outcome.
    #[must_use]
    pub fn schedules(&self) -> &StageOutcome<Vec<ScheduleRef>> {
        &self.schedules
    }

    /// Returns the runbook-schedule link outcome.
    #[must_use]
    pub fn job_schedules(&self) -> &StageOutcome<Vec<JobScheduleRef>> {
        &self.job_schedules
    }

    /// Returns the package install outcome.
    #[must_use]
    pub fn packages(&self) -> &StageOutcome<Vec<InstalledPackage>> {
        &self.packages
    }

    /// Records the account upsert outcome.
    pub fn record_account(&mut self, outcome: StageOutcome<String>) {
        self.account = outcome;
    }

    /// Records the variable upsert outcome.
    pub fn record_variables(&mut self, outcome: StageOutcome<Vec<VariableAssignment>>) {
        self.variables = outcome;
    }

    /// Records the runbook publish outcome.
    pub fn record_runbooks(&mut self, outcome: StageOutcome<Vec<PublishedRunbook>>) {
        self.runbooks = outcome;
    }

    /// Records the schedule upsert outcome.
    pub fn record_schedules(&mut self, outcome: StageOutcome<Vec<ScheduleRef>>) {
        self.schedules = outcome;
    }

    /// Records the runbook-schedule link outcome.
    pub fn record_job_schedules(&mut self, outcome: StageOutcome<Vec<JobScheduleRef>>) {
        self.job_schedules = outcome;
    }

    /// Records the package install outcome.
    pub fn record_packages(&mut self, outcome: StageOutcome<Vec<InstalledPackage>>) {
        self.packages = outcome;
    }

    /// Returns the status label of one stage.
    #[must_use]
    pub fn stage_status(&self, stage: ProvisioningStage) -> &'static str {
        match stage {
            ProvisioningStage::AccountUpsert => self.account.status(),
            ProvisioningStage::VariableUpsert => self.variables.status(),
            ProvisioningStage::RunbookPublish => self.runbooks.status(),
            ProvisioningStage::ScheduleUpsert => self.schedules.status(),
            ProvisioningStage::RunbookScheduleLink => self.job_schedules.status(),
            ProvisioningStage::PackageInstall => self.packages.status(),
        }
    }

    /// Returns the skip reason of one stage, if it failed.
    #[must_use]
    pub fn stage_skip_reason(&self, stage: ProvisioningStage) -> Option<&str> {
        match stage {
            ProvisioningStage::AccountUpsert => self.account.skip_reason(),
            ProvisioningStage::VariableUpsert => self.variables.skip_reason(),
            ProvisioningStage::RunbookPublish => self.runbooks.skip_reason(),
            ProvisioningStage::ScheduleUpsert => self.schedules.skip_reason(),
            ProvisioningStage::RunbookScheduleLink => self.job_schedules.skip_reason(),
            ProvisioningStage::PackageInstall => self.packages.skip_reason(),
        }
    }

    /// Returns the furthest state reached through consecutive successes.
    ///
    /// Later stages still run after a failure, but a target never moves past
    /// its first failed stage.
    #[must_use]
    pub fn state(&self) -> ProvisioningState {
        let reached = [
            (self.account.is_succeeded(), ProvisioningState::AccountUpserted),
            (self.variables.is_succeeded(), ProvisioningState::VariablesSet),
            (self.runbooks.is_succeeded(), ProvisioningState::RunbooksPublished),
            (self.schedules.is_succeeded(), ProvisioningState::ScheduleCreated),
            (self.job_schedules.is_succeeded(), ProvisioningState::RunbooksLinked),
            (self.packages.is_succeeded(), ProvisioningState::PackagesInstalled),
        ];

        reached
            .into_iter()
            .take_while(|(succeeded, _)| *succeeded)
            .last()
            .map_or(ProvisioningState::Discovered, |(_, state)| state)
    }
}

/// Enriched targets of one tenant; one report sheet each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantResult {
    /// Tenant name.
    pub tenant: TenantName,
    /// Targets in discovery order.
    pub targets: Vec<Target>,
}

impl TenantResult {
    /// Creates a tenant result with no targets.
    #[must_use]
    pub fn empty(tenant: TenantName) -> Self {
        Self {
            tenant,
            targets: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ProvisioningStage, ProvisioningState, PublishedRunbook, StageOutcome, Target,
    };
    use crate::Subscription;

    fn subscription() -> Subscription {
        Subscription {
            id: "sub-1".to_owned(),
            name: "opseng".to_owned(),
            created_time: "2024-01-01".to_owned(),
        }
    }

    fn target() -> Target {
        Target::discovered(
            &subscription(),
            "HEC-A-B",
            "westeurope",
            vec!["storage1".to_owned()],
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn discovered_target_derives_account_name() {
        let target = target();
        assert_eq!(target.account_name().as_str(), "aahecabackup0001");
        assert_eq!(target.state(), ProvisioningState::Discovered);
        assert_eq!(target.automation_account_id(), None);
        assert_eq!(
            target.stage_status(ProvisioningStage::AccountUpsert),
            "not_attempted"
        );
    }

    #[test]
    fn target_requires_qualifying_resources() {
        assert!(Target::discovered(&subscription(), "HEC-A", "westeurope", Vec::new()).is_err());
    }

    #[test]
    fn target_rejects_group_without_second_segment() {
        assert!(
            Target::discovered(&subscription(), "HEC", "westeurope", vec!["s".to_owned()])
                .is_err()
        );
    }

    #[test]
    fn state_stops_at_first_failed_stage() {
        let mut target = target();
        target.record_account(StageOutcome::Succeeded("/aa/id".to_owned()));
        target.record_variables(StageOutcome::skipped("boom"));
        target.record_runbooks(StageOutcome::Succeeded(vec![PublishedRunbook {
            runbook_name: "rb".to_owned(),
            runbook_id: "/rb/id".to_owned(),
        }]));

        assert_eq!(target.state(), ProvisioningState::AccountUpserted);
        assert_eq!(target.automation_account_id(), Some("/aa/id"));
        assert_eq!(target.variables().skip_reason(), Some("boom"));
        assert_eq!(
            target.stage_skip_reason(ProvisioningStage::VariableUpsert),
            Some("boom")
        );
        assert_eq!(
            target.stage_skip_reason(ProvisioningStage::AccountUpsert),
            None
        );
    }

    #[test]
    fn last_published_runbook_is_the_most_recent_entry() {
        let mut target = target();
        target.record_runbooks(StageOutcome::Succeeded(vec![
            PublishedRunbook {
                runbook_name: "first".to_owned(),
                runbook_id: "1".to_owned(),
            },
            PublishedRunbook {
                runbook_name: "second".to_owned(),
                runbook_id: "2".to_owned(),
            },
        ]));

        assert_eq!(
            target
                .last_published_runbook()
                .map(|runbook| runbook.runbook_name.as_str()),
            Some("second")
        );
    }

    #[test]
    fn stage_outcome_serializes_with_status_tag() {
        let outcome: StageOutcome<String> = StageOutcome::skipped("denied");
        let encoded = serde_json::to_value(&outcome).unwrap_or_default();
        assert_eq!(encoded["status"], "skipped");
        assert_eq!(encoded["value"]["reason"], "denied");
    }
}
