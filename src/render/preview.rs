use crate::core::{ColumnSelector, ColumnSet, UploadResponse};
use crate::render::format::format_cell;
use crate::render::view::{PreviewView, SelectorView, TableView};

/// Render the preview section
///
/// With `None` this produces the empty state: nothing revealed, no table,
/// no picker options. With a payload every part is rebuilt from scratch:
/// header from `columns`, one row per preview record, and the three pickers
/// each offering exactly the numeric columns.
pub fn render_preview(
    payload: Option<&UploadResponse>,
    columns: Option<&ColumnSet>,
    fallback_filename: &str,
) -> PreviewView {
    let Some(payload) = payload else {
        return PreviewView {
            visible: false,
            filename: String::new(),
            row_count: 0,
            column_count: 0,
            table: TableView::default(),
            missing: None,
            selectors: ColumnSelector::ALL.map(SelectorView::empty),
        };
    };

    let header = payload.columns.clone();
    let rows = payload
        .preview
        .iter()
        .map(|record| header.iter().map(|c| format_cell(record.get(c))).collect())
        .collect();

    let missing = payload.stats.missing_values.as_ref().map(|counts| {
        header
            .iter()
            .map(|c| (c.clone(), counts.get(c).copied().unwrap_or(0)))
            .collect()
    });

    let numeric = columns.map(ColumnSet::numeric).unwrap_or_default();
    let selectors = ColumnSelector::ALL.map(|selector| SelectorView {
        selector,
        placeholder: selector.placeholder(),
        options: numeric.to_vec(),
    });

    let filename = payload
        .filename
        .clone()
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| fallback_filename.to_string());

    PreviewView {
        visible: true,
        filename,
        row_count: payload.stats.rows,
        column_count: payload.stats.columns,
        table: TableView { header, rows },
        missing,
        selectors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    fn payload() -> UploadResponse {
        serde_json::from_value(json!({
            "session_id": "s1",
            "columns": ["A", "B"],
            "dtypes": {"A": "int64", "B": "object"},
            "filename": "data.csv",
            "stats": {"rows": 2, "columns": 2},
            "preview": [{"A": 1, "B": "x"}, {"A": null}]
        }))
        .unwrap()
    }

    fn column_set(payload: &UploadResponse) -> ColumnSet {
        ColumnSet::derive(payload.columns.clone(), &payload.dtypes)
    }

    #[test]
    fn test_empty_state_is_hidden() {
        let view = render_preview(None, None, "ignored.csv");
        assert!(!view.visible);
        assert!(view.table.header.is_empty());
        assert!(view.selectors.iter().all(|s| s.options.is_empty()));
    }

    #[test]
    fn test_table_and_placeholders() {
        let payload = payload();
        let view = render_preview(Some(&payload), Some(&column_set(&payload)), "local.csv");
        assert!(view.visible);
        assert_eq!(view.filename, "data.csv");
        assert_eq!((view.row_count, view.column_count), (2, 2));
        assert_eq!(view.table.header, vec!["A", "B"]);
        assert_eq!(
            view.table.rows,
            vec![vec!["1".to_string(), "x".to_string()], vec!["N/A".to_string(), "N/A".to_string()]]
        );
        assert_eq!(view.missing, None);
    }

    #[test]
    fn test_selectors_offer_numeric_columns_only() {
        let payload = payload();
        let view = render_preview(Some(&payload), Some(&column_set(&payload)), "local.csv");
        for selector in ColumnSelector::ALL {
            assert_eq!(view.selector(selector).options, vec!["A".to_string()]);
            assert_eq!(view.selector(selector).placeholder, selector.placeholder());
        }
    }

    #[test]
    fn test_filename_fallback_and_missing_counts() {
        let mut payload = payload();
        payload.filename = None;
        payload.stats.missing_values = Some(HashMap::from([("B".to_string(), 1)]));
        let view = render_preview(Some(&payload), Some(&column_set(&payload)), "local.csv");
        assert_eq!(view.filename, "local.csv");
        assert_eq!(
            view.missing,
            Some(vec![("A".to_string(), 0), ("B".to_string(), 1)])
        );
    }
}
