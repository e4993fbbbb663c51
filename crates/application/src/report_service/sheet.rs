use std::collections::HashSet;

use aaprov_core::{AppError, AppResult};
use aaprov_domain::{ProvisioningStage, StageOutcome, Target, TenantResult};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::provisioning_ports::ReportSheet;

/// Maximum sheet name length accepted by spreadsheet tools.
pub const SHEET_NAME_LIMIT: usize = 31;

/// Report columns, one row per target.
pub const REPORT_COLUMNS: [&str; 21] = [
    "subscription_id",
    "subscription_name",
    "rg_name",
    "resource_name",
    "createdTime",
    "automationaccountname",
    "location",
    "automationaccountid",
    "variableadditionlist",
    "published_runbooks.runbookname",
    "published_runbooks.runbookid",
    "schedules",
    "job_schedules",
    "packages",
    "state",
    "account_upsert",
    "variable_upsert",
    "runbook_publish",
    "schedule_upsert",
    "runbook_schedule_link",
    "package_install",
];

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

pub(super) fn render_workbook(results: &[TenantResult]) -> Vec<ReportSheet> {
    let mut used_names = HashSet::new();
    results
        .iter()
        .map(|result| {
            let name = unique_sheet_name(result.tenant.as_str(), &mut used_names);
            let rows = render_rows(result).unwrap_or_else(|error| {
                warn!(
                    tenant = %result.tenant,
                    sheet = %name,
                    error = %error,
                    "tenant rows not rendered, emitting empty sheet"
                );
                Vec::new()
            });

            ReportSheet {
                name,
                columns: REPORT_COLUMNS.iter().map(|column| (*column).to_owned()).collect(),
                rows,
            }
        })
        .collect()
}

/// Truncates to the sheet name limit and replaces characters sheets reject.
pub(super) fn sheet_base_name(tenant_name: &str) -> String {
    tenant_name
        .chars()
        .map(|character| {
            if FORBIDDEN_SHEET_CHARS.contains(&character) {
                '_'
            } else {
                character
            }
        })
        .take(SHEET_NAME_LIMIT)
        .collect()
}

/// Returns a sheet name not yet in `used_names`, adding a `~N` suffix on collision.
pub(super) fn unique_sheet_name(tenant_name: &str, used_names: &mut HashSet<String>) -> String {
    let base = sheet_base_name(tenant_name);
    let mut candidate = base.clone();
    let mut counter = 2_usize;
    while used_names.contains(&candidate) {
        let suffix = format!("~{counter}");
        let kept = SHEET_NAME_LIMIT.saturating_sub(suffix.chars().count());
        candidate = base.chars().take(kept).chain(suffix.chars()).collect();
        counter += 1;
    }

    used_names.insert(candidate.clone());
    candidate
}

fn render_rows(result: &TenantResult) -> AppResult<Vec<Vec<String>>> {
    result.targets.iter().map(render_row).collect()
}

fn render_row(target: &Target) -> AppResult<Vec<String>> {
    let last_runbook = target.last_published_runbook();
    let mut row = vec![
        target.subscription_id().to_owned(),
        target.subscription_name().to_owned(),
        target.resource_group_name().to_owned(),
        to_json(target.resource_names())?,
        target.created_time().to_owned(),
        target.account_name().to_string(),
        target.location().to_owned(),
        target.automation_account_id().unwrap_or_default().to_owned(),
        variable_cell(target)?,
        last_runbook
            .map(|runbook| runbook.runbook_name.clone())
            .unwrap_or_default(),
        last_runbook
            .map(|runbook| runbook.runbook_id.clone())
            .unwrap_or_default(),
        outcome_cell(target.schedules())?,
        outcome_cell(target.job_schedules())?,
        outcome_cell(target.packages())?,
        target.state().as_str().to_owned(),
    ];
    row.extend(
        ProvisioningStage::ALL
            .iter()
            .map(|stage| target.stage_status(*stage).to_owned()),
    );

    Ok(row)
}

fn variable_cell(target: &Target) -> AppResult<String> {
    let Some(variables) = target.variables().value() else {
        return Ok(String::new());
    };

    let entries = variables
        .iter()
        .map(|variable| {
            let mut entry = Map::new();
            entry.insert(variable.name.clone(), Value::from(variable.value.as_str()));
            Value::Object(entry)
        })
        .collect::<Vec<_>>();
    to_json(&entries)
}

fn outcome_cell<T: Serialize>(outcome: &StageOutcome<Vec<T>>) -> AppResult<String> {
    match outcome.value() {
        Some(values) => to_json(values),
        None => Ok(String::new()),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    serde_json::to_string(value)
        .map_err(|error| AppError::ReportRender(format!("failed to encode report cell: {error}")))
}
