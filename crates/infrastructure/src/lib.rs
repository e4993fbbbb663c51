//! Azure and filesystem adapters for application ports.

#![forbid(unsafe_code)]

mod arm_management_client;
mod azure_token_provider;
mod blob_content_store;
mod csv_report_sink;
mod env_credential_provider;
mod provisioning_settings;

pub use arm_management_client::{
    AUTOMATION_API_VERSION, ArmManagementClient, DEFAULT_ARM_ENDPOINT, RESOURCES_API_VERSION,
};
pub use azure_token_provider::{AzureTokenProvider, DEFAULT_LOGIN_ENDPOINT};
pub use blob_content_store::{BlobContentStore, DEFAULT_BLOB_ENDPOINT_SUFFIX};
pub use csv_report_sink::{CsvReportSink, DEFAULT_REPORT_OUTPUT_DIR};
pub use env_credential_provider::EnvCredentialProvider;
pub use provisioning_settings::{
    BACKUP_RUNBOOK_NAME, DEFAULT_SCHEDULE_START_TIME, DELETION_RUNBOOK_NAME,
    ProvisioningSettings, RemoteCallSettings,
};
