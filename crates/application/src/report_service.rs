use std::sync::Arc;

use aaprov_domain::TenantResult;
use serde::Serialize;
use tracing::{info, warn};

use crate::provisioning_ports::{ReportSheet, ReportSink};

mod sheet;

pub use sheet::{REPORT_COLUMNS, SHEET_NAME_LIMIT};

/// Sheet that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetFailure {
    /// Sheet name.
    pub sheet: String,
    /// Failure description.
    pub reason: String,
}

/// Outcome of one report publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Names of written sheets, in tenant order.
    pub sheets_written: Vec<String>,
    /// Sheets the sink rejected.
    pub failures: Vec<SheetFailure>,
}

/// Renders provisioning results into one sheet per tenant.
#[derive(Clone)]
pub struct ReportService {
    sink: Arc<dyn ReportSink>,
}

impl ReportService {
    /// Creates a report service.
    #[must_use]
    pub fn new(sink: Arc<dyn ReportSink>) -> Self {
        Self { sink }
    }

    /// Builds the workbook without writing it.
    ///
    /// Every tenant gets a sheet, including tenants without targets.
    #[must_use]
    pub fn build_workbook(&self, results: &[TenantResult]) -> Vec<ReportSheet> {
        sheet::render_workbook(results)
    }

    /// Builds and writes the workbook. A failing sheet never blocks the others.
    pub async fn publish(&self, results: &[TenantResult]) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for sheet in self.build_workbook(results) {
            match self.sink.write_sheet(&sheet).await {
                Ok(()) => summary.sheets_written.push(sheet.name),
                Err(error) => {
                    warn!(sheet = %sheet.name, error = %error, "report sheet not written");
                    summary.failures.push(SheetFailure {
                        sheet: sheet.name,
                        reason: error.to_string(),
                    });
                }
            }
        }

        info!(
            written = summary.sheets_written.len(),
            failed = summary.failures.len(),
            "report published"
        );
        summary
    }
}
