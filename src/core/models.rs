use crate::core::session::SessionId;
use crate::core::types::AnalysisKind;
use crate::core::wire::AnalyzeResponse;
use crate::error::{DashError, DashResult};
use serde_json::{Map, Value};

/// Variant-specific parameters of an analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisParams {
    Summary,
    Correlation,
    Histogram { column: String },
    Scatter { x_column: String, y_column: String },
}

impl AnalysisParams {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Self::Summary => AnalysisKind::Summary,
            Self::Correlation => AnalysisKind::Correlation,
            Self::Histogram { .. } => AnalysisKind::Histogram,
            Self::Scatter { .. } => AnalysisKind::Scatter,
        }
    }
}

/// A validated analysis request
///
/// Only built by the analysis flow, after it checked that a session exists
/// and that the required column selections are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub session_id: SessionId,
    pub params: AnalysisParams,
}

impl AnalysisRequest {
    pub fn kind(&self) -> AnalysisKind {
        self.params.kind()
    }
}

/// Per-column statistics, in server order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryStats {
    pub columns: Vec<ColumnSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub stats: Vec<(String, Value)>,
}

/// Square correlation matrix keyed by column name on both axes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[row][col]`; `None` where the server sent no number
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied().flatten()
    }
}

/// Decoded outcome of a successful analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Summary(SummaryStats),
    Correlation {
        matrix: CorrelationMatrix,
        plot_url: Option<String>,
    },
    Histogram {
        column: String,
        plot_url: Option<String>,
    },
    Scatter {
        x_column: String,
        y_column: String,
        plot_url: Option<String>,
    },
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Self::Summary(_) => AnalysisKind::Summary,
            Self::Correlation { .. } => AnalysisKind::Correlation,
            Self::Histogram { .. } => AnalysisKind::Histogram,
            Self::Scatter { .. } => AnalysisKind::Scatter,
        }
    }

    /// Interpret a response for the request that produced it
    ///
    /// A response carrying `error` becomes a `Server` error. A response that
    /// lacks the payload its variant needs becomes a `Transport` error.
    pub fn from_response(params: &AnalysisParams, response: AnalyzeResponse) -> DashResult<Self> {
        if let Some(error) = response.error {
            return Err(DashError::Server(error));
        }
        match params {
            AnalysisParams::Summary => {
                let summary = response
                    .summary
                    .ok_or_else(|| malformed("summary response has no summary"))?;
                Ok(Self::Summary(decode_summary(summary)?))
            }
            AnalysisParams::Correlation => {
                let correlation = response
                    .correlation
                    .ok_or_else(|| malformed("correlation response has no matrix"))?;
                Ok(Self::Correlation {
                    matrix: decode_correlation(correlation)?,
                    plot_url: response.plot_url,
                })
            }
            AnalysisParams::Histogram { column } => Ok(Self::Histogram {
                column: column.clone(),
                plot_url: response.plot_url,
            }),
            AnalysisParams::Scatter { x_column, y_column } => Ok(Self::Scatter {
                x_column: x_column.clone(),
                y_column: y_column.clone(),
                plot_url: response.plot_url,
            }),
        }
    }
}

fn malformed(detail: &str) -> DashError {
    tracing::error!("malformed analysis response: {detail}");
    DashError::transport("An error occurred during analysis")
}

fn decode_summary(summary: Map<String, Value>) -> DashResult<SummaryStats> {
    let mut columns = Vec::with_capacity(summary.len());
    for (column, stats) in summary {
        let Value::Object(stats) = stats else {
            return Err(malformed("summary entry is not an object"));
        };
        columns.push(ColumnSummary {
            column,
            stats: stats.into_iter().collect(),
        });
    }
    Ok(SummaryStats { columns })
}

fn decode_correlation(correlation: Map<String, Value>) -> DashResult<CorrelationMatrix> {
    let columns: Vec<String> = correlation.keys().cloned().collect();
    let mut values = Vec::with_capacity(columns.len());
    for row in &columns {
        let Some(Value::Object(cells)) = correlation.get(row) else {
            return Err(malformed("correlation row is not an object"));
        };
        values.push(
            columns
                .iter()
                .map(|col| cells.get(col).and_then(Value::as_f64))
                .collect(),
        );
    }
    Ok(CorrelationMatrix { columns, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(value: Value) -> AnalyzeResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_error_field_is_server_error() {
        let err = AnalysisResult::from_response(
            &AnalysisParams::Correlation,
            response(json!({"error": "Need at least 2 numeric columns for correlation"})),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DashError::server("Need at least 2 numeric columns for correlation")
        );
    }

    #[test]
    fn test_missing_payload_is_transport_error() {
        let err = AnalysisResult::from_response(&AnalysisParams::Summary, response(json!({})))
            .unwrap_err();
        assert!(matches!(err, DashError::Transport(_)));
    }

    #[test]
    fn test_correlation_decodes_square_matrix() {
        let result = AnalysisResult::from_response(
            &AnalysisParams::Correlation,
            response(json!({
                "correlation": {"A": {"A": 1.0, "B": 0.5}, "B": {"A": 0.5, "B": 1.0}},
                "plot_url": "/static/images/s1_correlation.png"
            })),
        )
        .unwrap();
        let AnalysisResult::Correlation { matrix, plot_url } = result else {
            panic!("expected correlation");
        };
        assert_eq!(matrix.columns, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(matrix.get(0, 1), Some(0.5));
        assert_eq!(matrix.get(1, 1), Some(1.0));
        assert_eq!(plot_url.as_deref(), Some("/static/images/s1_correlation.png"));
    }

    #[test]
    fn test_correlation_null_cell_is_none() {
        let result = AnalysisResult::from_response(
            &AnalysisParams::Correlation,
            response(json!({"correlation": {"A": {"A": null}}})),
        )
        .unwrap();
        let AnalysisResult::Correlation { matrix, .. } = result else {
            panic!("expected correlation");
        };
        assert_eq!(matrix.get(0, 0), None);
    }

    #[test]
    fn test_plot_results_carry_request_columns() {
        let result = AnalysisResult::from_response(
            &AnalysisParams::Scatter {
                x_column: "A".into(),
                y_column: "B".into(),
            },
            response(json!({"success": true, "plot_url": "/static/images/s1_scatter.png"})),
        )
        .unwrap();
        assert_eq!(result.kind(), AnalysisKind::Scatter);
        assert_eq!(
            result,
            AnalysisResult::Scatter {
                x_column: "A".into(),
                y_column: "B".into(),
                plot_url: Some("/static/images/s1_scatter.png".into()),
            }
        );
    }
}
