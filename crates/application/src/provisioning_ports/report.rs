use aaprov_core::AppResult;
use async_trait::async_trait;

/// One rendered report sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSheet {
    /// Sheet name, at most 31 characters.
    pub name: String,
    /// Column headers.
    pub columns: Vec<String>,
    /// Data rows, each with one cell per column.
    pub rows: Vec<Vec<String>>,
}

/// Port for the tabular report writer.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Writes one sheet, replacing any sheet with the same name.
    async fn write_sheet(&self, sheet: &ReportSheet) -> AppResult<()>;
}
