use crate::dashboard::Dashboard;
use crate::tui::component::{Component, Context};
use crate::tui::{Action, Theme};
use color_eyre::Result;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const MAX_LINES: usize = 3;

/// Newest notice, wrapped to the bar width
pub struct MessageBar {
    actions: Vec<Action>,
}

impl Default for MessageBar {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBar {
    pub fn new() -> Self {
        Self {
            actions: vec![Action::DismissMessage],
        }
    }

    /// Wrapped lines of the newest notice, capped at three
    pub fn wrapped(message: &str, width: u16) -> Vec<String> {
        let width = usize::from(width.max(1));
        let mut lines: Vec<String> = textwrap::wrap(message, width)
            .into_iter()
            .map(|l| l.into_owned())
            .collect();
        if lines.len() > MAX_LINES {
            lines.truncate(MAX_LINES);
            if let Some(last) = lines.last_mut() {
                last.push('…');
            }
        }
        lines
    }

    /// Rows the bar needs, borders included
    pub fn height(dashboard: &Dashboard, width: u16) -> u16 {
        let inner = width.saturating_sub(2);
        let lines = dashboard
            .notices()
            .latest()
            .map_or(1, |n| Self::wrapped(&n.message, inner).len().max(1));
        lines as u16 + 2
    }
}

impl Component for MessageBar {
    fn handle_action(&mut self, action: Action, ctx: &mut Context<'_>) -> Result<bool> {
        match action {
            Action::DismissMessage => {
                ctx.dashboard.notices_mut().dismiss_latest();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard, theme: &Theme) {
        let notices = dashboard.notices();
        let title = match notices.len() {
            0 | 1 => " Messages ".to_string(),
            n => format!(" Messages ({} more) ", n - 1),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme.border_style(false));

        let lines: Vec<Line> = match notices.latest() {
            Some(notice) => {
                let style = theme.notice_style(notice.kind);
                Self::wrapped(&notice.message, area.width.saturating_sub(2))
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, style)))
                    .collect()
            }
            None => vec![Line::from(Span::styled("", theme.disabled_style()))],
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn supported_actions(&self) -> &[Action] {
        &self.actions
    }

    fn name(&self) -> &str {
        "MessageBar"
    }
}
