use crate::core::AnalysisKind;
use crate::dashboard::Dashboard;
use crate::render::{CorrelationCard, ImageView, PlotCard, SummaryCard};
use crate::tui::component::{Component, Context, Focusable};
use crate::tui::{Action, Theme};
use color_eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

/// The single visible result card and its Download control
pub struct ResultsPanel {
    scroll: u16,
    last_shown: Option<AnalysisKind>,
    focused: bool,
    actions: Vec<Action>,
}

impl Default for ResultsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsPanel {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            last_shown: None,
            focused: false,
            actions: vec![
                Action::ScrollUp,
                Action::ScrollDown,
                Action::Download,
                Action::Confirm,
            ],
        }
    }

    /// Card the Download control acts on
    ///
    /// With nothing shown the summary slot is used, which reports what is
    /// missing through the usual notices.
    pub fn target(dashboard: &Dashboard) -> AnalysisKind {
        dashboard.results().shown().unwrap_or(AnalysisKind::Summary)
    }

    fn summary_lines(card: &SummaryCard, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for table in &card.tables {
            lines.push(Line::from(Span::styled(
                table.column.clone(),
                theme.header_style(),
            )));
            let width = table.rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            for (stat, value) in &table.rows {
                lines.push(Line::from(format!("  {stat:<width$}  {value}")));
            }
            lines.push(Line::default());
        }
        lines
    }

    fn image_lines(image: Option<&ImageView>, theme: &Theme) -> Vec<Line<'static>> {
        match image {
            Some(image) => vec![
                Line::from(Span::styled(image.alt.clone(), theme.header_style())),
                Line::from(vec![
                    Span::raw("Image: "),
                    Span::styled(image.src.clone(), theme.info_style()),
                ]),
            ],
            None => vec![Line::from(Span::styled(
                "No image returned",
                theme.disabled_style(),
            ))],
        }
    }

    fn plot_lines(card: &PlotCard, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(format!("Columns: {}", card.columns.join(" vs ")))];
        lines.extend(Self::image_lines(card.image.as_ref(), theme));
        lines
    }

    fn correlation_table<'a>(card: &'a CorrelationCard, theme: &Theme) -> Table<'a> {
        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(card.columns.iter().map(|c| Cell::from(c.as_str()))),
        )
        .style(theme.header_style());
        let rows: Vec<Row> = card
            .rows
            .iter()
            .map(|row| {
                let cells = row.cells.iter().map(|cell| {
                    let style = match cell.background {
                        Some(tint) => Style::default().bg(theme.tint(tint)).fg(theme.foreground),
                        None => theme.normal_style(),
                    };
                    Cell::from(cell.text.as_str()).style(style)
                });
                Row::new(
                    std::iter::once(Cell::from(row.column.as_str()).style(theme.header_style()))
                        .chain(cells),
                )
            })
            .collect();
        let widths = std::iter::once(Constraint::Length(
            card.rows
                .iter()
                .map(|r| r.column.len())
                .max()
                .unwrap_or(0)
                .min(20) as u16
                + 1,
        ))
        .chain(card.columns.iter().map(|c| Constraint::Length(c.len().clamp(6, 12) as u16 + 1)));
        Table::new(rows, widths).header(header)
    }
}

impl Component for ResultsPanel {
    fn handle_action(&mut self, action: Action, ctx: &mut Context<'_>) -> Result<bool> {
        match action {
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                Ok(true)
            }
            Action::ScrollDown => {
                self.scroll = self.scroll.saturating_add(1);
                Ok(true)
            }
            Action::Download | Action::Confirm => {
                let kind = Self::target(ctx.dashboard);
                ctx.download(kind);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard, theme: &Theme) {
        let results = dashboard.results();
        let title = match results.shown() {
            Some(kind) => format!(" {} ", kind.title()),
            None => " Results ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme.border_style(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(kind) = results.shown().filter(|_| results.visible) else {
            let hint = Paragraph::new("Run an analysis to see results").style(theme.disabled_style());
            frame.render_widget(hint, inner);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        match kind {
            AnalysisKind::Summary => {
                let lines = results
                    .summary()
                    .map(|c| Self::summary_lines(c, theme))
                    .unwrap_or_default();
                frame.render_widget(Paragraph::new(lines).scroll((self.scroll, 0)), chunks[0]);
            }
            AnalysisKind::Correlation => {
                if let Some(card) = results.correlation() {
                    let image = Self::image_lines(card.image.as_ref(), theme);
                    let parts = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Min(0), Constraint::Length(image.len() as u16)])
                        .split(chunks[0]);
                    frame.render_widget(Self::correlation_table(card, theme), parts[0]);
                    frame.render_widget(Paragraph::new(image), parts[1]);
                }
            }
            AnalysisKind::Histogram | AnalysisKind::Scatter => {
                let card = if kind == AnalysisKind::Histogram {
                    results.histogram()
                } else {
                    results.scatter()
                };
                let lines = card.map(|c| Self::plot_lines(c, theme)).unwrap_or_default();
                frame.render_widget(Paragraph::new(lines), chunks[0]);
            }
        }

        let control = dashboard.download_control(kind);
        let style = if !control.is_enabled() {
            theme.disabled_style()
        } else if self.focused {
            theme.selected_style()
        } else {
            theme.normal_style()
        };
        let button = Line::from(Span::styled(format!("[ {} ]", control.label()), style));
        frame.render_widget(Paragraph::new(button), chunks[1]);
    }

    fn supported_actions(&self) -> &[Action] {
        &self.actions
    }

    fn name(&self) -> &str {
        "ResultsPanel"
    }

    fn update(&mut self, dashboard: &Dashboard) -> Result<()> {
        let shown = dashboard.results().shown();
        if shown != self.last_shown {
            self.scroll = 0;
            self.last_shown = shown;
        }
        Ok(())
    }
}

impl Focusable for ResultsPanel {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
