use crate::core::AnalysisKind;
use crate::dashboard::Dashboard;
use crate::tui::action::Action;
use crate::tui::event::Tasks;
use crate::tui::theme::Theme;
use color_eyre::Result;
use ratatui::{Frame, layout::Rect};

/// What a component may touch while handling an action
pub struct Context<'a> {
    pub dashboard: &'a mut Dashboard,
    pub tasks: &'a Tasks,
}

impl Context<'_> {
    /// Submit the chosen file in the background
    pub fn upload(&mut self) {
        if let Some(pending) = self.dashboard.begin_upload() {
            self.tasks.upload(pending);
        }
    }

    pub fn analyze(&mut self, kind: AnalysisKind) {
        if let Some(pending) = self.dashboard.begin_analysis(kind) {
            self.tasks.analysis(pending);
        }
    }

    /// Summary CSVs are written on the spot; images are fetched in the background
    pub fn download(&mut self, kind: AnalysisKind) {
        if let Some(pending) = self.dashboard.begin_download(kind) {
            self.tasks.download(pending);
        }
    }
}

/// Base trait for all dashboard panels
///
/// Panels keep only presentation state (cursor, scroll offset). Everything
/// else lives in the `Dashboard` and is reached through the `Context`.
pub trait Component {
    /// Handle an action
    ///
    /// Returns Ok(true) if the action was handled and consumed.
    /// Returns Ok(false) if the action was not handled and should propagate.
    fn handle_action(&mut self, action: Action, ctx: &mut Context<'_>) -> Result<bool>;

    /// Render the component within the given area
    fn render(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard, theme: &Theme);

    /// Actions this component reacts to, for the help line
    fn supported_actions(&self) -> &[Action];

    /// Get component name for debugging/logging
    fn name(&self) -> &str;

    /// Update component state (called on every tick)
    fn update(&mut self, _dashboard: &Dashboard) -> Result<()> {
        Ok(())
    }
}

/// Components that can receive keyboard focus
pub trait Focusable: Component {
    fn is_focused(&self) -> bool;

    fn set_focused(&mut self, focused: bool);
}
