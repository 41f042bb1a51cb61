use crate::dashboard::Dashboard;
use crate::tui::component::{Component, Context, Focusable};
use crate::tui::{Action, Theme};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::path::PathBuf;
use tracing::debug;
use tui_textarea::TextArea;

/// Upload panel: file path entry plus the Upload control
pub struct FilePrompt {
    textarea: TextArea<'static>,
    editing: bool,
    focused: bool,
    actions: Vec<Action>,
}

impl Default for FilePrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl FilePrompt {
    pub fn new() -> Self {
        Self {
            textarea: TextArea::default(),
            editing: false,
            focused: false,
            actions: vec![
                Action::OpenFilePrompt,
                Action::Upload,
                Action::Confirm,
                Action::Cancel,
            ],
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
    }

    /// Current text with surrounding whitespace and quotes removed
    ///
    /// Terminals quote paths that are dropped onto them.
    pub fn path_text(&self) -> String {
        let raw = self.textarea.lines().join("");
        raw.trim()
            .trim_matches(|c| c == '\'' || c == '"')
            .to_string()
    }

    /// Feed a raw key while editing; Enter selects the file, Esc abandons
    pub fn input(&mut self, key: KeyEvent, ctx: &mut Context<'_>) {
        match key.code {
            KeyCode::Enter => self.commit(ctx),
            KeyCode::Esc => self.editing = false,
            _ => {
                self.textarea.input(key);
            }
        }
    }

    fn commit(&mut self, ctx: &mut Context<'_>) {
        self.editing = false;
        let text = self.path_text();
        debug!("File chosen: '{text}'");
        let path = (!text.is_empty()).then(|| PathBuf::from(text));
        ctx.dashboard.select_file(path);
    }
}

impl Component for FilePrompt {
    fn handle_action(&mut self, action: Action, ctx: &mut Context<'_>) -> Result<bool> {
        match action {
            Action::OpenFilePrompt | Action::Confirm => {
                self.start_editing();
                Ok(true)
            }
            Action::Upload => {
                ctx.upload();
                Ok(true)
            }
            Action::Cancel if self.editing => {
                self.editing = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard, theme: &Theme) {
        let block = Block::default()
            .title(" Upload ")
            .borders(Borders::ALL)
            .border_style(theme.border_style(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        if self.editing {
            self.textarea.set_cursor_line_style(theme.normal_style());
            frame.render_widget(&self.textarea, chunks[0]);
        } else {
            let label = Line::from(vec![
                Span::styled("File: ", theme.header_style()),
                Span::styled(dashboard.file_label().to_string(), theme.normal_style()),
            ]);
            frame.render_widget(Paragraph::new(label), chunks[0]);
        }

        let control = dashboard.upload_control();
        let button_style = if !control.is_enabled() {
            theme.disabled_style()
        } else if self.focused {
            theme.selected_style()
        } else {
            theme.normal_style()
        };
        let button = Line::from(Span::styled(format!("[ {} ]", control.label()), button_style));
        frame.render_widget(Paragraph::new(button), chunks[1]);
    }

    fn supported_actions(&self) -> &[Action] {
        &self.actions
    }

    fn name(&self) -> &str {
        "FilePrompt"
    }
}

impl Focusable for FilePrompt {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.editing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropped_path_is_unquoted() {
        let mut prompt = FilePrompt::new();
        prompt.textarea.insert_str("  '/tmp/my data.csv' ");
        assert_eq!(prompt.path_text(), "/tmp/my data.csv");
    }

    #[test]
    fn test_losing_focus_stops_editing() {
        let mut prompt = FilePrompt::new();
        prompt.set_focused(true);
        prompt.start_editing();
        assert!(prompt.is_editing());
        prompt.set_focused(false);
        assert!(!prompt.is_editing());
    }
}
