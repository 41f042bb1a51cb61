use crate::core::{AnalysisResult, CorrelationMatrix, SummaryStats};
use crate::render::format::{
    MISSING, cache_busted, correlation_color, format_coefficient, format_stat,
};
use crate::render::view::{
    CardView, CorrelationCard, ImageView, MatrixCell, MatrixRow, PlotCard, SummaryCard,
    SummaryTableView,
};

/// Render the card for one analysis result
///
/// `timestamp_millis` is appended to every image reference so a plot that
/// the server regenerated under the same URL is fetched again.
pub fn render_card(result: &AnalysisResult, timestamp_millis: i64) -> CardView {
    let image = |plot_url: &Option<String>, alt: String| {
        plot_url.as_ref().map(|url| ImageView {
            src: cache_busted(url, timestamp_millis),
            alt,
        })
    };
    match result {
        AnalysisResult::Summary(stats) => CardView::Summary(render_summary(stats)),
        AnalysisResult::Correlation { matrix, plot_url } => {
            let mut card = render_correlation(matrix);
            card.image = image(plot_url, "Correlation Matrix".to_string());
            CardView::Correlation(card)
        }
        AnalysisResult::Histogram { column, plot_url } => CardView::Histogram(PlotCard {
            columns: vec![column.clone()],
            image: image(plot_url, format!("Histogram of {column}")),
        }),
        AnalysisResult::Scatter {
            x_column,
            y_column,
            plot_url,
        } => CardView::Scatter(PlotCard {
            columns: vec![x_column.clone(), y_column.clone()],
            image: image(plot_url, "Scatter Plot".to_string()),
        }),
    }
}

pub fn render_summary(stats: &SummaryStats) -> SummaryCard {
    SummaryCard {
        tables: stats
            .columns
            .iter()
            .map(|col| SummaryTableView {
                column: col.column.clone(),
                rows: col
                    .stats
                    .iter()
                    .map(|(stat, value)| (stat.clone(), format_stat(value)))
                    .collect(),
            })
            .collect(),
    }
}

pub fn render_correlation(matrix: &CorrelationMatrix) -> CorrelationCard {
    let rows = matrix
        .columns
        .iter()
        .enumerate()
        .map(|(r, column)| MatrixRow {
            column: column.clone(),
            cells: (0..matrix.columns.len())
                .map(|c| match matrix.get(r, c) {
                    Some(v) => MatrixCell {
                        text: format_coefficient(v),
                        background: Some(correlation_color(v)),
                    },
                    None => MatrixCell {
                        text: MISSING.to_string(),
                        background: None,
                    },
                })
                .collect(),
        })
        .collect();
    CorrelationCard {
        columns: matrix.columns.clone(),
        rows,
        image: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnalysisParams, AnalyzeResponse};
    use crate::render::format::POSITIVE_TINT;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn decode(params: AnalysisParams, body: serde_json::Value) -> AnalysisResult {
        let response: AnalyzeResponse = serde_json::from_value(body).unwrap();
        AnalysisResult::from_response(&params, response).unwrap()
    }

    #[test]
    fn test_correlation_cell_text_and_tint() {
        let result = decode(
            AnalysisParams::Correlation,
            json!({"correlation": {"A": {"A": 1.0, "B": 0.5}, "B": {"A": 0.5, "B": 1.0}}}),
        );
        let CardView::Correlation(card) = render_card(&result, 1) else {
            panic!("expected correlation card");
        };
        let cell = card.cell("A", "B").unwrap();
        assert_eq!(cell.text, "0.50");
        let bg = cell.background.unwrap();
        assert_eq!((bg.r, bg.g, bg.b), POSITIVE_TINT);
        assert_eq!(bg.a, 0.5);
        assert_eq!(card.cell("B", "B").unwrap().text, "1.00");
        assert!(card.image.is_none());
    }

    #[test]
    fn test_correlation_image_is_cache_busted() {
        let result = decode(
            AnalysisParams::Correlation,
            json!({"correlation": {"A": {"A": 1.0}}, "plot_url": "/static/images/s_correlation.png"}),
        );
        let CardView::Correlation(card) = render_card(&result, 1700000000000) else {
            panic!("expected correlation card");
        };
        assert_eq!(
            card.image,
            Some(ImageView {
                src: "/static/images/s_correlation.png?t=1700000000000".into(),
                alt: "Correlation Matrix".into(),
            })
        );
    }

    #[test]
    fn test_summary_tables() {
        let result = decode(
            AnalysisParams::Summary,
            json!({"summary": {"Revenue": {"count": 5, "mean": 1234.5, "top": "n/a", "std": null}}}),
        );
        let CardView::Summary(card) = render_card(&result, 0) else {
            panic!("expected summary card");
        };
        assert_eq!(
            card.tables,
            vec![SummaryTableView {
                column: "Revenue".into(),
                rows: vec![
                    ("count".into(), "5.0000".into()),
                    ("mean".into(), "1234.5000".into()),
                    ("top".into(), "n/a".into()),
                    ("std".into(), "null".into()),
                ],
            }]
        );
    }

    #[test]
    fn test_plot_cards() {
        let hist = decode(
            AnalysisParams::Histogram { column: "Revenue".into() },
            json!({"plot_url": "/static/images/s_histogram.png"}),
        );
        let CardView::Histogram(card) = render_card(&hist, 5) else {
            panic!("expected histogram card");
        };
        assert_eq!(card.columns, vec!["Revenue".to_string()]);
        let image = card.image.unwrap();
        assert_eq!(image.src, "/static/images/s_histogram.png?t=5");
        assert_eq!(image.alt, "Histogram of Revenue");

        let scatter = decode(
            AnalysisParams::Scatter { x_column: "A".into(), y_column: "B".into() },
            json!({}),
        );
        let CardView::Scatter(card) = render_card(&scatter, 5) else {
            panic!("expected scatter card");
        };
        assert_eq!(card.columns, vec!["A".to_string(), "B".to_string()]);
        assert!(card.image.is_none());
    }
}
