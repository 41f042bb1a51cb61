use crate::core::AnalysisKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All user-level actions in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Action {
    // Navigation
    FocusNext,
    FocusPrev,
    ScrollUp,
    ScrollDown,
    OptionNext,
    OptionPrev,

    // Files
    OpenFilePrompt,
    Upload,
    Download,

    // Analysis
    RunSummary,
    RunCorrelation,
    RunHistogram,
    RunScatter,

    // View
    ToggleHelp,
    DismissMessage,

    // Application
    Quit,
    Confirm,
    Cancel,
}

impl Action {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Action::FocusNext => "Next panel",
            Action::FocusPrev => "Previous panel",
            Action::ScrollUp => "Move up",
            Action::ScrollDown => "Move down",
            Action::OptionNext => "Next column option",
            Action::OptionPrev => "Previous column option",
            Action::OpenFilePrompt => "Choose a file",
            Action::Upload => "Upload the chosen file",
            Action::Download => "Download the visible result",
            Action::RunSummary => "Run summary statistics",
            Action::RunCorrelation => "Run correlation matrix",
            Action::RunHistogram => "Run histogram",
            Action::RunScatter => "Run scatter plot",
            Action::ToggleHelp => "Toggle help screen",
            Action::DismissMessage => "Dismiss newest message",
            Action::Quit => "Quit application",
            Action::Confirm => "Confirm",
            Action::Cancel => "Cancel",
        }
    }

    /// Get category for grouping in help screen
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::FocusNext
            | Action::FocusPrev
            | Action::ScrollUp
            | Action::ScrollDown
            | Action::OptionNext
            | Action::OptionPrev => ActionCategory::Navigation,

            Action::OpenFilePrompt | Action::Upload | Action::Download => ActionCategory::FileOps,

            Action::RunSummary
            | Action::RunCorrelation
            | Action::RunHistogram
            | Action::RunScatter => ActionCategory::Analysis,

            Action::ToggleHelp | Action::DismissMessage => ActionCategory::View,

            Action::Quit | Action::Confirm | Action::Cancel => ActionCategory::Application,
        }
    }

    /// The analysis a run action requests
    pub fn analysis(&self) -> Option<AnalysisKind> {
        match self {
            Action::RunSummary => Some(AnalysisKind::Summary),
            Action::RunCorrelation => Some(AnalysisKind::Correlation),
            Action::RunHistogram => Some(AnalysisKind::Histogram),
            Action::RunScatter => Some(AnalysisKind::Scatter),
            _ => None,
        }
    }

    /// Get all possible actions (for validation)
    pub fn all() -> Vec<Action> {
        vec![
            Action::FocusNext,
            Action::FocusPrev,
            Action::ScrollUp,
            Action::ScrollDown,
            Action::OptionNext,
            Action::OptionPrev,
            Action::OpenFilePrompt,
            Action::Upload,
            Action::Download,
            Action::RunSummary,
            Action::RunCorrelation,
            Action::RunHistogram,
            Action::RunScatter,
            Action::ToggleHelp,
            Action::DismissMessage,
            Action::Quit,
            Action::Confirm,
            Action::Cancel,
        ]
    }
}

impl From<AnalysisKind> for Action {
    fn from(kind: AnalysisKind) -> Self {
        match kind {
            AnalysisKind::Summary => Action::RunSummary,
            AnalysisKind::Correlation => Action::RunCorrelation,
            AnalysisKind::Histogram => Action::RunHistogram,
            AnalysisKind::Scatter => Action::RunScatter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Navigation,
    FileOps,
    Analysis,
    View,
    Application,
}

impl ActionCategory {
    pub const ALL: [ActionCategory; 5] = [
        ActionCategory::FileOps,
        ActionCategory::Analysis,
        ActionCategory::Navigation,
        ActionCategory::View,
        ActionCategory::Application,
    ];
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCategory::Navigation => write!(f, "Navigation"),
            ActionCategory::FileOps => write!(f, "Files"),
            ActionCategory::Analysis => write!(f, "Analysis"),
            ActionCategory::View => write!(f, "View"),
            ActionCategory::Application => write!(f, "Application"),
        }
    }
}
