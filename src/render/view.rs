//! View descriptions produced by the renderers.
//!
//! These are plain data; the terminal adapter draws them. Anything a
//! download has to read back ("what is currently rendered") is read from
//! here, never recomputed from the server payload.

use crate::core::{AnalysisKind, ColumnSelector};
use crate::render::format::Rgba;

/// Page sections that can be brought into view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Upload,
    Preview,
    Analysis,
    Results,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Options of one column picker; the empty placeholder option is implied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorView {
    pub selector: ColumnSelector,
    pub placeholder: &'static str,
    pub options: Vec<String>,
}

impl SelectorView {
    pub fn empty(selector: ColumnSelector) -> Self {
        Self {
            selector,
            placeholder: selector.placeholder(),
            options: Vec::new(),
        }
    }
}

/// Preview section plus the pickers it populates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    /// Preview and analysis sections are only revealed for real data
    pub visible: bool,
    pub filename: String,
    pub row_count: u64,
    pub column_count: u64,
    pub table: TableView,
    /// Per-column missing counts, when the server reported them
    pub missing: Option<Vec<(String, u64)>>,
    pub selectors: [SelectorView; 3],
}

impl PreviewView {
    pub fn selector(&self, selector: ColumnSelector) -> &SelectorView {
        &self.selectors[selector_index(selector)]
    }
}

pub(crate) fn selector_index(selector: ColumnSelector) -> usize {
    match selector {
        ColumnSelector::Histogram => 0,
        ColumnSelector::ScatterX => 1,
        ColumnSelector::ScatterY => 2,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
}

/// One statistic table of the summary card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTableView {
    pub column: String,
    /// (statistic, rendered value)
    pub rows: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryCard {
    pub tables: Vec<SummaryTableView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixCell {
    pub text: String,
    pub background: Option<Rgba>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub column: String,
    pub cells: Vec<MatrixCell>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationCard {
    pub columns: Vec<String>,
    pub rows: Vec<MatrixRow>,
    pub image: Option<ImageView>,
}

impl CorrelationCard {
    pub fn cell(&self, row: &str, col: &str) -> Option<&MatrixCell> {
        let col_idx = self.columns.iter().position(|c| c == col)?;
        self.rows
            .iter()
            .find(|r| r.column == row)
            .and_then(|r| r.cells.get(col_idx))
    }
}

/// Histogram or scatter card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotCard {
    /// Column(s) the plot was requested for, in axis order
    pub columns: Vec<String>,
    pub image: Option<ImageView>,
}

/// A freshly rendered card, ready to replace its slot
#[derive(Debug, Clone, PartialEq)]
pub enum CardView {
    Summary(SummaryCard),
    Correlation(CorrelationCard),
    Histogram(PlotCard),
    Scatter(PlotCard),
}

impl CardView {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Self::Summary(_) => AnalysisKind::Summary,
            Self::Correlation(_) => AnalysisKind::Correlation,
            Self::Histogram(_) => AnalysisKind::Histogram,
            Self::Scatter(_) => AnalysisKind::Scatter,
        }
    }
}

/// The results area
///
/// Cards keep their last rendered content while hidden; only `shown` is
/// visible, so at most one card is on screen at any time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultCards {
    pub visible: bool,
    shown: Option<AnalysisKind>,
    summary: Option<SummaryCard>,
    correlation: Option<CorrelationCard>,
    histogram: Option<PlotCard>,
    scatter: Option<PlotCard>,
}

impl ResultCards {
    /// Hide every card, replace the target card's markup and show it
    pub fn show(&mut self, card: CardView) {
        let kind = card.kind();
        self.shown = None;
        match card {
            CardView::Summary(c) => self.summary = Some(c),
            CardView::Correlation(c) => self.correlation = Some(c),
            CardView::Histogram(c) => self.histogram = Some(c),
            CardView::Scatter(c) => self.scatter = Some(c),
        }
        self.shown = Some(kind);
        self.visible = true;
    }

    pub fn shown(&self) -> Option<AnalysisKind> {
        self.shown
    }

    pub fn is_visible(&self, kind: AnalysisKind) -> bool {
        self.visible && self.shown == Some(kind)
    }

    /// Kinds currently on screen; never more than one
    pub fn visible_cards(&self) -> Vec<AnalysisKind> {
        AnalysisKind::ALL
            .into_iter()
            .filter(|k| self.is_visible(*k))
            .collect()
    }

    pub fn summary(&self) -> Option<&SummaryCard> {
        self.summary.as_ref()
    }

    pub fn correlation(&self) -> Option<&CorrelationCard> {
        self.correlation.as_ref()
    }

    pub fn histogram(&self) -> Option<&PlotCard> {
        self.histogram.as_ref()
    }

    pub fn scatter(&self) -> Option<&PlotCard> {
        self.scatter.as_ref()
    }

    /// Image currently rendered in the card of `kind`
    pub fn image(&self, kind: AnalysisKind) -> Option<&ImageView> {
        match kind {
            AnalysisKind::Summary => None,
            AnalysisKind::Correlation => self.correlation.as_ref()?.image.as_ref(),
            AnalysisKind::Histogram => self.histogram.as_ref()?.image.as_ref(),
            AnalysisKind::Scatter => self.scatter.as_ref()?.image.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot(src: &str) -> PlotCard {
        PlotCard {
            columns: vec!["A".into()],
            image: Some(ImageView {
                src: src.into(),
                alt: "Histogram of A".into(),
            }),
        }
    }

    #[test]
    fn test_single_visible_card() {
        let mut cards = ResultCards::default();
        assert!(cards.visible_cards().is_empty());

        cards.show(CardView::Histogram(plot("/h.png")));
        assert_eq!(cards.visible_cards(), vec![AnalysisKind::Histogram]);

        cards.show(CardView::Summary(SummaryCard::default()));
        assert_eq!(cards.visible_cards(), vec![AnalysisKind::Summary]);
        // Hidden cards keep their content.
        assert_eq!(cards.image(AnalysisKind::Histogram).unwrap().src, "/h.png");
    }

    #[test]
    fn test_show_replaces_card() {
        let mut cards = ResultCards::default();
        cards.show(CardView::Scatter(plot("/one.png")));
        cards.show(CardView::Scatter(plot("/two.png")));
        assert_eq!(cards.image(AnalysisKind::Scatter).unwrap().src, "/two.png");
        assert_eq!(cards.image(AnalysisKind::Summary), None);
    }
}
