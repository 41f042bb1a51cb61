use crate::dashboard::Dashboard;
use crate::render::PreviewView;
use crate::tui::component::{Component, Context, Focusable};
use crate::tui::{Action, Theme};
use color_eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

const MAX_COLUMN_WIDTH: usize = 24;

/// Data preview: file name, counts, missing values and the first rows
pub struct PreviewPanel {
    scroll: usize,
    focused: bool,
    actions: Vec<Action>,
}

impl Default for PreviewPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewPanel {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            focused: false,
            actions: vec![Action::ScrollUp, Action::ScrollDown],
        }
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn summary_lines(preview: &PreviewView, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![
                Span::styled("File: ", theme.header_style()),
                Span::raw(preview.filename.clone()),
            ]),
            Line::from(format!(
                "Rows: {}    Columns: {}",
                preview.row_count, preview.column_count
            )),
        ];
        if let Some(missing) = &preview.missing {
            let parts: Vec<String> = missing
                .iter()
                .map(|(column, count)| format!("{column}: {count}"))
                .collect();
            lines.push(Line::from(vec![
                Span::styled("Missing: ", theme.header_style()),
                Span::raw(parts.join(", ")),
            ]));
        }
        lines
    }

    fn column_widths(preview: &PreviewView) -> Vec<Constraint> {
        (0..preview.table.header.len())
            .map(|i| {
                let widest = std::iter::once(&preview.table.header[i])
                    .chain(preview.table.rows.iter().filter_map(|r| r.get(i)))
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(0);
                Constraint::Length(widest.min(MAX_COLUMN_WIDTH) as u16 + 1)
            })
            .collect()
    }
}

impl Component for PreviewPanel {
    fn handle_action(&mut self, action: Action, ctx: &mut Context<'_>) -> Result<bool> {
        let rows = ctx.dashboard.preview().table.rows.len();
        match action {
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                Ok(true)
            }
            Action::ScrollDown => {
                self.scroll = (self.scroll + 1).min(rows.saturating_sub(1));
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard, theme: &Theme) {
        let block = Block::default()
            .title(" Data Preview ")
            .borders(Borders::ALL)
            .border_style(theme.border_style(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let preview = dashboard.preview();
        if !preview.visible {
            let hint = Paragraph::new("No data uploaded yet").style(theme.disabled_style());
            frame.render_widget(hint, inner);
            return;
        }

        let summary = Self::summary_lines(preview, theme);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(summary.len() as u16), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(Paragraph::new(summary), chunks[0]);

        let header = Row::new(
            preview
                .table
                .header
                .iter()
                .map(|h| Cell::from(h.clone())),
        )
        .style(theme.header_style());
        let rows: Vec<Row> = preview
            .table
            .rows
            .iter()
            .skip(self.scroll)
            .map(|r| Row::new(r.iter().map(|c| Cell::from(c.clone()))).style(theme.normal_style()))
            .collect();
        let table = Table::new(rows, Self::column_widths(preview)).header(header);
        frame.render_widget(table, chunks[1]);
    }

    fn supported_actions(&self) -> &[Action] {
        &self.actions
    }

    fn name(&self) -> &str {
        "PreviewPanel"
    }

    fn update(&mut self, dashboard: &Dashboard) -> Result<()> {
        // A new upload can shrink the table under the current offset.
        let rows = dashboard.preview().table.rows.len();
        self.scroll = self.scroll.min(rows.saturating_sub(1));
        Ok(())
    }
}

impl Focusable for PreviewPanel {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
