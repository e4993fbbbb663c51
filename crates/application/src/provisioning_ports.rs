mod cloud;
mod content;
mod credentials;
mod report;

pub use cloud::{
    AccountScope, AccountUpsertRequest, AutomationClient, CloudResource,
    JobScheduleCreateRequest, ResourceDiscoveryClient, ResourceGroup, RunbookUpsertRequest,
    UpsertedResource, UpsertedVariable, VariableUpsertRequest,
};
pub use content::ContentStore;
pub use credentials::CredentialProvider;
pub use report::{ReportSheet, ReportSink};
