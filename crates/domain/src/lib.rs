//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod content;
mod credential;
mod naming;
mod package;
mod schedule;
mod target;
mod tenant;
mod variable;

pub use content::{
    CONTENT_HASH_ALGORITHM, CONTENT_LINK_VERSION, ContentHash, ContentLink, RunbookSpec,
};
pub use credential::TenantCredential;
pub use naming::{
    ACCOUNT_NAME_PREFIX, ACCOUNT_NAME_SUFFIX, AutomationAccountName, derive_account_name,
};
pub use package::PackageSpec;
pub use schedule::{
    AdvancedSchedule, MonthlyOccurrence, RunbookScheduleLink, ScheduleFrequency, ScheduleSpec,
    ScheduleSpecInput,
};
pub use target::{
    InstalledPackage, JobScheduleRef, ProvisioningStage, ProvisioningState, PublishedRunbook,
    ScheduleRef, StageOutcome, Target, TenantResult, VariableAssignment,
};
pub use tenant::{Subscription, Tenant};
pub use variable::RunbookVariable;
