//! JSON shapes of the `/upload` and `/analyze` endpoints.
//!
//! Every field the backend may omit is defaulted so that an error-only body
//! (`{"error": "..."}`) still decodes.

use crate::core::models::{AnalysisParams, AnalysisRequest};
use crate::core::types::AnalysisKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Row of the preview table, keyed by column name
pub type PreviewRow = Map<String, Value>;

/// Body returned by `POST /upload`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub dtypes: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default)]
    pub stats: TableStats,
    #[serde(default)]
    pub preview: Vec<PreviewRow>,
}

/// Shape counts of the uploaded table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableStats {
    #[serde(default)]
    pub rows: u64,
    #[serde(default)]
    pub columns: u64,
    /// Per-column count of missing cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_values: Option<HashMap<String, u64>>,
}

/// Body sent to `POST /analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequestBody {
    pub session_id: String,
    pub analysis_type: AnalysisKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_column: Option<String>,
}

impl From<&AnalysisRequest> for AnalyzeRequestBody {
    fn from(request: &AnalysisRequest) -> Self {
        let mut body = Self {
            session_id: request.session_id.as_str().to_string(),
            analysis_type: request.kind(),
            column: None,
            x_column: None,
            y_column: None,
        };
        match &request.params {
            AnalysisParams::Summary | AnalysisParams::Correlation => {}
            AnalysisParams::Histogram { column } => body.column = Some(column.clone()),
            AnalysisParams::Scatter { x_column, y_column } => {
                body.x_column = Some(x_column.clone());
                body.y_column = Some(y_column.clone());
            }
        }
        body
    }
}

/// Body returned by `POST /analyze`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// column -> statistic -> value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Map<String, Value>>,
    /// column -> column -> coefficient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SessionId;
    use serde_json::json;

    #[test]
    fn test_error_only_upload_decodes() {
        let resp: UploadResponse = serde_json::from_value(json!({"error": "No file part"})).unwrap();
        assert_eq!(resp.error.as_deref(), Some("No file part"));
        assert!(resp.session_id.is_none());
        assert!(resp.columns.is_empty());
    }

    #[test]
    fn test_full_upload_decodes() {
        let resp: UploadResponse = serde_json::from_value(json!({
            "success": true,
            "session_id": "abc",
            "columns": ["A", "B"],
            "dtypes": {"A": "int64", "B": "object"},
            "preview": [{"A": 1, "B": null}],
            "stats": {"rows": 10, "columns": 2, "missing_values": {"A": 0, "B": 3}}
        }))
        .unwrap();
        assert_eq!(resp.session_id.as_deref(), Some("abc"));
        assert_eq!(resp.stats.rows, 10);
        assert_eq!(resp.stats.missing_values.unwrap()["B"], 3);
        assert_eq!(resp.preview[0]["B"], Value::Null);
    }

    #[test]
    fn test_request_body_fields_per_variant() {
        let hist = AnalysisRequest {
            session_id: SessionId::new("s1"),
            params: AnalysisParams::Histogram {
                column: "Revenue".into(),
            },
        };
        let value = serde_json::to_value(AnalyzeRequestBody::from(&hist)).unwrap();
        assert_eq!(
            value,
            json!({"session_id": "s1", "analysis_type": "histogram", "column": "Revenue"})
        );

        let scatter = AnalysisRequest {
            session_id: SessionId::new("s1"),
            params: AnalysisParams::Scatter {
                x_column: "A".into(),
                y_column: "B".into(),
            },
        };
        let value = serde_json::to_value(AnalyzeRequestBody::from(&scatter)).unwrap();
        assert_eq!(
            value,
            json!({"session_id": "s1", "analysis_type": "scatter", "x_column": "A", "y_column": "B"})
        );

        let summary = AnalysisRequest {
            session_id: SessionId::new("s1"),
            params: AnalysisParams::Summary,
        };
        let value = serde_json::to_value(AnalyzeRequestBody::from(&summary)).unwrap();
        assert_eq!(value, json!({"session_id": "s1", "analysis_type": "summary"}));
    }

    #[test]
    fn test_summary_keeps_column_order() {
        let resp: AnalyzeResponse =
            serde_json::from_str(r#"{"summary": {"zeta": {"mean": 1}, "alpha": {"mean": 2}}}"#)
                .unwrap();
        let keys: Vec<&String> = resp.summary.as_ref().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
