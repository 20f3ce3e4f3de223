use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::remote::{Action, RemoteError, RemoteTransport};

/// Render a history collection as CSV. Headers come from the wire field
/// names, so exported files line up with the backend's sheet columns.
pub fn history_to_csv<T: Serialize>(records: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(record)
            .context("Failed to serialize record to CSV")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {e}"))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Parameters for a backend-rendered PDF report.
#[derive(Debug, Clone, Serialize)]
pub struct PdfRequest {
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    #[serde(rename = "includeBeratBadan")]
    pub include_weight: bool,
    #[serde(rename = "includeTekananDarah")]
    pub include_pressure: bool,
    #[serde(rename = "includeSholat")]
    pub include_prayer: bool,
}

/// Ask the backend to render a PDF report and return the download URL.
///
/// Reports have no offline fallback; any failure propagates.
pub fn request_pdf(
    remote: &dyn RemoteTransport,
    request: &PdfRequest,
) -> Result<String, RemoteError> {
    let payload = serde_json::to_value(request).map_err(|e| RemoteError::Parse(e.to_string()))?;
    let envelope = remote.invoke(Action::GeneratePdf, payload)?;
    envelope
        .pdf_url
        .ok_or_else(|| RemoteError::Parse("response missing pdfUrl".to_string()))
}
