pub mod format;
pub mod preview;
pub mod results;
pub mod view;

pub use preview::render_preview;
pub use results::render_card;
pub use view::{
    CardView, CorrelationCard, ImageView, PlotCard, PreviewView, ResultCards, Section,
    SelectorView, SummaryCard, SummaryTableView, TableView,
};
