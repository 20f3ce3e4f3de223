use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Operations exposed by the Apps Script backend.
///
/// The wire names are fixed by the deployed script and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Dashboard,
    GetBiodata,
    SaveBiodata,
    WeightHistory,
    SaveWeight,
    PrayerHistory,
    SavePrayer,
    PressureHistory,
    SavePressure,
    GeneratePdf,
}

impl Action {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Dashboard => "getDashboardData",
            Action::GetBiodata => "getBiodata",
            Action::SaveBiodata => "saveBiodata",
            Action::WeightHistory => "getBeratBadanHistory",
            Action::SaveWeight => "saveBeratBadan",
            Action::PrayerHistory => "getSholatHistory",
            Action::SavePrayer => "saveSholat",
            Action::PressureHistory => "getTekananDarahHistory",
            Action::SavePressure => "saveTekananDarah",
            Action::GeneratePdf => "generatePDF",
        }
    }
}

/// Failure modes of a single remote call.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Network failure, timeout, or a non-2xx HTTP status.
    #[error("could not reach server: {0}")]
    Transport(String),
    /// The backend answered with an explicit error status.
    #[error("server rejected request: {0}")]
    Logic(String),
    /// The response body did not match the expected envelope shape.
    #[error("malformed server response: {0}")]
    Parse(String),
}

/// Request body for every call: `{action, data, timestamp}`.
#[derive(Debug, Serialize)]
pub struct RequestBody {
    pub action: &'static str,
    pub data: Value,
    pub timestamp: String,
}

impl RequestBody {
    #[must_use]
    pub fn new(action: Action, data: Value) -> Self {
        RequestBody {
            action: action.as_str(),
            data,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Successful response envelope. `data` carries an action-specific payload;
/// `pdfUrl` is only present on report generation.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "pdfUrl")]
    pub pdf_url: Option<String>,
}

/// Parse a raw response body into a success envelope.
///
/// An explicit `"error"` status becomes [`RemoteError::Logic`] with the
/// backend's message when it sent one. Anything that is not a recognizable
/// envelope becomes [`RemoteError::Parse`].
pub fn parse_envelope(body: &str) -> Result<Envelope, RemoteError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| RemoteError::Parse(e.to_string()))?;
    match envelope.status.as_str() {
        "success" => Ok(envelope),
        "error" => Err(RemoteError::Logic(
            envelope
                .message
                .unwrap_or_else(|| "unknown server error".to_string()),
        )),
        other => Err(RemoteError::Parse(format!("unexpected status '{other}'"))),
    }
}

/// Transport seam for the backend.
///
/// The CLI implements this with reqwest; tests substitute scripted
/// responses. Implementations perform exactly one request per call; the
/// retry and fallback policy lives in the sync layer.
pub trait RemoteTransport {
    fn invoke(&self, action: Action, data: Value) -> Result<Envelope, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_wire_names() {
        assert_eq!(Action::Dashboard.as_str(), "getDashboardData");
        assert_eq!(Action::WeightHistory.as_str(), "getBeratBadanHistory");
        assert_eq!(Action::SaveWeight.as_str(), "saveBeratBadan");
        assert_eq!(Action::PrayerHistory.as_str(), "getSholatHistory");
        assert_eq!(Action::SavePrayer.as_str(), "saveSholat");
        assert_eq!(Action::PressureHistory.as_str(), "getTekananDarahHistory");
        assert_eq!(Action::SavePressure.as_str(), "saveTekananDarah");
        assert_eq!(Action::GeneratePdf.as_str(), "generatePDF");
    }

    #[test]
    fn test_request_body_shape() {
        let body = RequestBody::new(Action::SaveWeight, json!({"tanggal": "2024-01-05"}));
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["action"], "saveBeratBadan");
        assert_eq!(value["data"]["tanggal"], "2024-01-05");
        // RFC 3339 timestamp
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_parse_envelope_success() {
        let envelope = parse_envelope(r#"{"status":"success","data":[1,2,3]}"#).unwrap();
        assert_eq!(envelope.data, json!([1, 2, 3]));
        assert!(envelope.message.is_none());
        assert!(envelope.pdf_url.is_none());
    }

    #[test]
    fn test_parse_envelope_success_without_data() {
        let envelope = parse_envelope(r#"{"status":"success"}"#).unwrap();
        assert!(envelope.data.is_null());
    }

    #[test]
    fn test_parse_envelope_error_status() {
        let err = parse_envelope(r#"{"status":"error","message":"sheet not found"}"#).unwrap_err();
        match err {
            RemoteError::Logic(msg) => assert_eq!(msg, "sheet not found"),
            other => panic!("expected Logic, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_envelope_error_without_message() {
        let err = parse_envelope(r#"{"status":"error"}"#).unwrap_err();
        match err {
            RemoteError::Logic(msg) => assert_eq!(msg, "unknown server error"),
            other => panic!("expected Logic, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_envelope_malformed() {
        assert!(matches!(
            parse_envelope("<html>sign in</html>"),
            Err(RemoteError::Parse(_))
        ));
        assert!(matches!(
            parse_envelope(r#"{"status":"maybe"}"#),
            Err(RemoteError::Parse(_))
        ));
        assert!(matches!(
            parse_envelope(r#"{"data":[]}"#),
            Err(RemoteError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_envelope_pdf_url() {
        let envelope =
            parse_envelope(r#"{"status":"success","pdfUrl":"https://example.com/r.pdf"}"#).unwrap();
        assert_eq!(envelope.pdf_url.as_deref(), Some("https://example.com/r.pdf"));
    }
}
