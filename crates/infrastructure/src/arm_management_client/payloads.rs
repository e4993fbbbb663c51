use std::collections::BTreeMap;

use aaprov_application::{
    AccountUpsertRequest, JobScheduleCreateRequest, RunbookUpsertRequest, VariableUpsertRequest,
};
use aaprov_domain::{AdvancedSchedule, PackageSpec, ScheduleSpec};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ArmPage<T> {
    #[serde(default = "Vec::new")]
    pub(super) value: Vec<T>,
    pub(super) next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ArmResourceGroup {
    pub(super) name: String,
    pub(super) location: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ArmGenericResource {
    pub(super) name: String,
    #[serde(rename = "type")]
    pub(super) resource_type: String,
    pub(super) kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ArmResource {
    pub(super) id: String,
    pub(super) name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ArmVariable {
    pub(super) name: String,
    #[serde(default)]
    pub(super) properties: ArmVariableProperties,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ArmVariableProperties {
    pub(super) value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ArmErrorEnvelope {
    pub(super) error: ArmErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ArmErrorBody {
    pub(super) code: String,
    pub(super) message: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AccountPayload<'a> {
    name: &'a str,
    location: &'a str,
    tags: &'a BTreeMap<String, String>,
    properties: AccountProperties<'a>,
}

#[derive(Debug, Serialize)]
struct AccountProperties<'a> {
    sku: SkuPayload<'a>,
}

#[derive(Debug, Serialize)]
struct SkuPayload<'a> {
    name: &'a str,
}

impl<'a> AccountPayload<'a> {
    pub(super) fn new(account_name: &'a str, request: &'a AccountUpsertRequest) -> Self {
        Self {
            name: account_name,
            location: request.location.as_str(),
            tags: &request.tags,
            properties: AccountProperties {
                sku: SkuPayload {
                    name: request.sku_name.as_str(),
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct VariablePayload<'a> {
    name: &'a str,
    properties: VariableProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VariableProperties<'a> {
    value: &'a str,
    description: &'a str,
    is_encrypted: bool,
}

impl<'a> From<&'a VariableUpsertRequest> for VariablePayload<'a> {
    fn from(request: &'a VariableUpsertRequest) -> Self {
        Self {
            name: request.name.as_str(),
            properties: VariableProperties {
                value: request.value.as_str(),
                description: request.description.as_str(),
                is_encrypted: request.is_encrypted,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RunbookPayload<'a> {
    name: &'a str,
    location: &'a str,
    tags: &'a BTreeMap<String, String>,
    properties: RunbookProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunbookProperties<'a> {
    runbook_type: &'a str,
    log_verbose: bool,
    log_progress: bool,
    description: &'a str,
    log_activity_trace: u32,
    publish_content_link: ContentLinkPayload<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentLinkPayload<'a> {
    uri: &'a str,
    content_hash: ContentHashPayload<'a>,
    version: &'a str,
}

#[derive(Debug, Serialize)]
struct ContentHashPayload<'a> {
    algorithm: &'a str,
    value: &'a str,
}

impl<'a> From<&'a RunbookUpsertRequest> for RunbookPayload<'a> {
    fn from(request: &'a RunbookUpsertRequest) -> Self {
        let content_link = &request.content_link;
        Self {
            name: request.name.as_str(),
            location: request.location.as_str(),
            tags: &request.tags,
            properties: RunbookProperties {
                runbook_type: request.runbook_type.as_str(),
                log_verbose: request.log_verbose,
                log_progress: request.log_progress,
                description: request.description.as_str(),
                log_activity_trace: request.log_activity_trace,
                publish_content_link: ContentLinkPayload {
                    uri: content_link.uri(),
                    content_hash: ContentHashPayload {
                        algorithm: content_link.content_hash().algorithm.as_str(),
                        value: content_link.content_hash().value.as_str(),
                    },
                    version: content_link.version(),
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SchedulePayload<'a> {
    name: &'a str,
    properties: ScheduleProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleProperties<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiry_time: Option<String>,
    interval: u32,
    frequency: &'static str,
    time_zone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    advanced_schedule: Option<AdvancedSchedulePayload<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdvancedSchedulePayload<'a> {
    #[serde(skip_serializing_if = "is_empty_slice")]
    week_days: &'a [String],
    #[serde(skip_serializing_if = "is_empty_slice")]
    month_days: &'a [u8],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    monthly_occurrences: Vec<MonthlyOccurrencePayload<'a>>,
}

fn is_empty_slice<T>(values: &&[T]) -> bool {
    values.is_empty()
}

#[derive(Debug, Serialize)]
struct MonthlyOccurrencePayload<'a> {
    occurrence: i8,
    day: &'a str,
}

impl<'a> From<&'a AdvancedSchedule> for AdvancedSchedulePayload<'a> {
    fn from(schedule: &'a AdvancedSchedule) -> Self {
        Self {
            week_days: &schedule.week_days,
            month_days: &schedule.month_days,
            monthly_occurrences: schedule
                .monthly_occurrences
                .iter()
                .map(|occurrence| MonthlyOccurrencePayload {
                    occurrence: occurrence.occurrence,
                    day: occurrence.day.as_str(),
                })
                .collect(),
        }
    }
}

impl<'a> From<&'a ScheduleSpec> for SchedulePayload<'a> {
    fn from(schedule: &'a ScheduleSpec) -> Self {
        Self {
            name: schedule.name(),
            properties: ScheduleProperties {
                description: schedule.description(),
                start_time: schedule
                    .start_time()
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
                expiry_time: schedule
                    .expiry_time()
                    .map(|expiry| expiry.to_rfc3339_opts(SecondsFormat::Secs, true)),
                interval: schedule.interval(),
                frequency: schedule.frequency().as_str(),
                time_zone: schedule.time_zone(),
                advanced_schedule: schedule.advanced_schedule().map(Into::into),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct JobSchedulePayload<'a> {
    properties: JobScheduleProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JobScheduleProperties<'a> {
    schedule: NamedReference<'a>,
    runbook: NamedReference<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_on: Option<&'a str>,
    parameters: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct NamedReference<'a> {
    name: &'a str,
}

impl<'a> From<&'a JobScheduleCreateRequest> for JobSchedulePayload<'a> {
    fn from(request: &'a JobScheduleCreateRequest) -> Self {
        Self {
            properties: JobScheduleProperties {
                schedule: NamedReference {
                    name: request.schedule_name.as_str(),
                },
                runbook: NamedReference {
                    name: request.runbook_name.as_str(),
                },
                run_on: request.run_on.as_deref(),
                parameters: &request.parameters,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PackagePayload<'a> {
    properties: PackageProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageProperties<'a> {
    content_link: PackageContentLink<'a>,
}

#[derive(Debug, Serialize)]
struct PackageContentLink<'a> {
    uri: &'a str,
    version: &'a str,
}

impl<'a> From<&'a PackageSpec> for PackagePayload<'a> {
    fn from(package: &'a PackageSpec) -> Self {
        Self {
            properties: PackageProperties {
                content_link: PackageContentLink {
                    uri: package.content_uri.as_str(),
                    version: package.version.as_str(),
                },
            },
        }
    }
}
