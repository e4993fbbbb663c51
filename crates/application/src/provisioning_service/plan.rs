use std::collections::BTreeMap;

use aaprov_domain::{PackageSpec, RunbookScheduleLink, RunbookVariable, ScheduleSpec};

/// Account tag key carrying the configured account type.
pub const ACCOUNT_TYPE_TAG: &str = "accounttype";

/// Default automation account SKU.
pub const DEFAULT_ACCOUNT_SKU: &str = "Basic";

/// Default value of the `EXCLUDE_AFS` variable.
pub const DEFAULT_EXCLUDE_AFS: &str = "vol-install-xsc";

/// Description stored on every injected variable.
pub const VARIABLE_DESCRIPTION: &str = "runbook_variable";

/// Account-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTemplate {
    /// Tags applied to every account.
    pub tags: BTreeMap<String, String>,
    /// SKU name.
    pub sku_name: String,
}

impl AccountTemplate {
    /// Creates a template tagging accounts with the given account type.
    #[must_use]
    pub fn with_account_type(account_type: impl Into<String>, sku_name: impl Into<String>) -> Self {
        Self {
            tags: BTreeMap::from([(ACCOUNT_TYPE_TAG.to_owned(), account_type.into())]),
            sku_name: sku_name.into(),
        }
    }
}

impl Default for AccountTemplate {
    fn default() -> Self {
        Self::with_account_type("", DEFAULT_ACCOUNT_SKU)
    }
}

/// Variable names and the configured values among them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableTemplate {
    /// Variable names in upsert order. Unrecognised names are ignored.
    pub names: Vec<String>,
    /// Value of `EXCLUDE_AFS`.
    pub exclude_afs: String,
    /// Value of `RetentionDays`, stored as JSON `null` when absent.
    pub retention_days: Option<String>,
}

impl Default for VariableTemplate {
    fn default() -> Self {
        Self {
            names: RunbookVariable::ALL
                .iter()
                .map(|variable| variable.as_str().to_owned())
                .collect(),
            exclude_afs: DEFAULT_EXCLUDE_AFS.to_owned(),
            retention_days: None,
        }
    }
}

/// Runbook-level settings shared by every published runbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunbookTemplate {
    /// Runtime type.
    pub runbook_type: String,
    /// Runbook description.
    pub description: String,
    /// Tags applied to every runbook.
    pub tags: BTreeMap<String, String>,
    /// Verbose job logging.
    pub log_verbose: bool,
    /// Progress job logging.
    pub log_progress: bool,
    /// Activity trace level.
    pub log_activity_trace: u32,
}

impl Default for RunbookTemplate {
    fn default() -> Self {
        Self {
            runbook_type: "Python3".to_owned(),
            description: "publishing runbook".to_owned(),
            tags: BTreeMap::from([(
                "servicenow_instance".to_owned(),
                "itsm.sap.com".to_owned(),
            )]),
            log_verbose: true,
            log_progress: true,
            log_activity_trace: 0,
        }
    }
}

/// Static configuration applied to every target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisioningPlan {
    /// Account settings.
    pub account: AccountTemplate,
    /// Variable settings.
    pub variables: VariableTemplate,
    /// Runbook settings.
    pub runbook: RunbookTemplate,
    /// Schedules created in every account.
    pub schedules: Vec<ScheduleSpec>,
    /// Runbook-schedule associations created in every account.
    pub links: Vec<RunbookScheduleLink>,
    /// Packages installed in every account.
    pub packages: Vec<PackageSpec>,
    /// Targets processed at once within a stage. `0` and `1` run serially.
    pub stage_concurrency: usize,
}
