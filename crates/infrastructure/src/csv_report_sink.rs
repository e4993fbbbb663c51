use std::path::PathBuf;

use aaprov_application::{ReportSheet, ReportSink};
use aaprov_core::{AppError, AppResult};
use async_trait::async_trait;
use tracing::info;

/// Default workbook directory.
pub const DEFAULT_REPORT_OUTPUT_DIR: &str = "automationoutput";

/// Writes every report sheet as `<sheet>.csv` inside one workbook directory.
pub struct CsvReportSink {
    output_dir: PathBuf,
}

impl CsvReportSink {
    /// Creates a sink writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Returns the file path of a sheet.
    #[must_use]
    pub fn sheet_path(&self, sheet_name: &str) -> PathBuf {
        self.output_dir.join(format!("{sheet_name}.csv"))
    }
}

#[async_trait]
impl ReportSink for CsvReportSink {
    async fn write_sheet(&self, sheet: &ReportSheet) -> AppResult<()> {
        let contents = render_csv(sheet)?;
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|error| {
                AppError::ReportRender(format!(
                    "failed to create report directory '{}': {error}",
                    self.output_dir.display()
                ))
            })?;

        let path = self.sheet_path(&sheet.name);
        tokio::fs::write(&path, contents).await.map_err(|error| {
            AppError::ReportRender(format!(
                "failed to write sheet '{}' to '{}': {error}",
                sheet.name,
                path.display()
            ))
        })?;

        info!(sheet = %sheet.name, rows = sheet.rows.len(), path = %path.display(), "report sheet written");
        Ok(())
    }
}

fn render_csv(sheet: &ReportSheet) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&sheet.columns).map_err(|error| {
        AppError::ReportRender(format!("sheet '{}' header: {error}", sheet.name))
    })?;

    for row in &sheet.rows {
        writer.write_record(row).map_err(|error| {
            AppError::ReportRender(format!("sheet '{}' row: {error}", sheet.name))
        })?;
    }

    writer
        .into_inner()
        .map_err(|error| AppError::ReportRender(format!("sheet '{}' flush: {error}", sheet.name)))
}
