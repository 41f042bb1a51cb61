pub mod analysis_panel;
pub mod file_prompt;
pub mod message_bar;
pub mod preview_panel;
pub mod results_panel;

pub use analysis_panel::{AnalysisItem, AnalysisPanel};
pub use file_prompt::FilePrompt;
pub use message_bar::MessageBar;
pub use preview_panel::PreviewPanel;
pub use results_panel::ResultsPanel;
