//! aaprov headless provisioning runner.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use aaprov_application::ProvisioningRun;
use aaprov_core::{AppError, AppResult};
use aaprov_domain::ProvisioningState;
use aaprov_infrastructure::{EnvCredentialProvider, ProvisioningSettings};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct WorkerConfig {
    interval: Option<Duration>,
}

/// Aggregate counters of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RunTotals {
    tenants: usize,
    targets: usize,
    fully_provisioned: usize,
    report_failures: usize,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let settings = ProvisioningSettings::from_env()?;
    let run_service = settings.build_run_service(Arc::new(EnvCredentialProvider::from_env()))?;
    let request = settings.run_request();

    info!(
        tenants = request.tenants.len(),
        runbooks = request.runbooks.len(),
        interval_seconds = config.interval.map(|interval| interval.as_secs()),
        "aaprov-worker started"
    );

    loop {
        let run = run_service.run(&request).await;
        let totals = RunTotals::from_run(&run);
        if totals.fully_provisioned == totals.targets && totals.report_failures == 0 {
            info!(
                tenants = totals.tenants,
                targets = totals.targets,
                "provisioning run completed"
            );
        } else {
            warn!(
                tenants = totals.tenants,
                targets = totals.targets,
                fully_provisioned = totals.fully_provisioned,
                report_failures = totals.report_failures,
                "provisioning run completed with failures"
            );
        }

        let Some(interval) = config.interval else {
            return Ok(());
        };
        tokio::time::sleep(interval).await;
    }
}

impl RunTotals {
    fn from_run(run: &ProvisioningRun) -> Self {
        let targets = run.tenants.iter().flat_map(|tenant| tenant.targets.iter());

        Self {
            tenants: run.tenants.len(),
            targets: targets.clone().count(),
            fully_provisioned: targets
                .filter(|target| target.state() == ProvisioningState::PackagesInstalled)
                .count(),
            report_failures: run
                .report
                .as_ref()
                .map_or(0, |report| report.failures.len()),
        }
    }
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        let interval_seconds = parse_optional_env_u64("WORKER_INTERVAL_SECONDS")?;
        if interval_seconds == Some(0) {
            return Err(AppError::Validation(
                "WORKER_INTERVAL_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            interval: interval_seconds.map(Duration::from_secs),
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_optional_env_u64(name: &str) -> AppResult<Option<u64>> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value.trim().parse::<u64>().map(Some).map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use aaprov_application::{ProvisioningRun, ReportSummary, SheetFailure};
    use aaprov_core::TenantName;
    use aaprov_domain::{Subscription, Target, TenantResult};

    use super::RunTotals;

    fn tenant_result(name: &str, groups: &[&str]) -> TenantResult {
        let subscription = Subscription {
            id: "sub-1".to_owned(),
            name: "opseng".to_owned(),
            created_time: "createdtime".to_owned(),
        };
        TenantResult {
            tenant: TenantName::new(name).unwrap_or_else(|_| unreachable!()),
            targets: groups
                .iter()
                .map(|group| {
                    Target::discovered(&subscription, *group, "westeurope", vec!["afs".to_owned()])
                        .unwrap_or_else(|_| unreachable!())
                })
                .collect(),
        }
    }

    #[test]
    fn totals_count_targets_across_tenants() {
        let run = ProvisioningRun {
            tenants: vec![
                tenant_result("T1", &["HEC-A-B", "HEC-C-D"]),
                tenant_result("T2", &[]),
            ],
            content_links: Vec::new(),
            report: Some(ReportSummary {
                sheets_written: vec!["T1".to_owned()],
                failures: vec![SheetFailure {
                    sheet: "T2".to_owned(),
                    reason: "disk full".to_owned(),
                }],
            }),
        };

        let totals = RunTotals::from_run(&run);

        assert_eq!(
            totals,
            RunTotals {
                tenants: 2,
                targets: 2,
                fully_provisioned: 0,
                report_failures: 1,
            }
        );
    }
}
