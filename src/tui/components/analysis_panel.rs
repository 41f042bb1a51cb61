use crate::core::{AnalysisKind, ColumnSelector};
use crate::dashboard::Dashboard;
use crate::tui::component::{Component, Context, Focusable};
use crate::tui::{Action, Theme};
use color_eyre::Result;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// One row of the analysis panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisItem {
    Run(AnalysisKind),
    Pick(ColumnSelector),
}

impl AnalysisItem {
    /// Buttons first, then the three column pickers
    pub const ORDER: [AnalysisItem; 7] = [
        AnalysisItem::Run(AnalysisKind::Summary),
        AnalysisItem::Run(AnalysisKind::Correlation),
        AnalysisItem::Pick(ColumnSelector::Histogram),
        AnalysisItem::Run(AnalysisKind::Histogram),
        AnalysisItem::Pick(ColumnSelector::ScatterX),
        AnalysisItem::Pick(ColumnSelector::ScatterY),
        AnalysisItem::Run(AnalysisKind::Scatter),
    ];
}

/// Analysis buttons and column pickers
pub struct AnalysisPanel {
    cursor: usize,
    focused: bool,
    actions: Vec<Action>,
}

impl Default for AnalysisPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisPanel {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            focused: false,
            actions: vec![
                Action::ScrollUp,
                Action::ScrollDown,
                Action::OptionNext,
                Action::OptionPrev,
                Action::Confirm,
            ],
        }
    }

    pub fn current(&self) -> AnalysisItem {
        AnalysisItem::ORDER[self.cursor]
    }

    fn item_style(&self, index: usize, enabled: bool, theme: &Theme) -> Style {
        if !enabled {
            theme.disabled_style()
        } else if self.focused && index == self.cursor {
            theme.selected_style()
        } else {
            theme.normal_style()
        }
    }

    fn picker_label(selector: ColumnSelector) -> &'static str {
        match selector {
            ColumnSelector::Histogram => "Column",
            ColumnSelector::ScatterX => "X",
            ColumnSelector::ScatterY => "Y",
        }
    }
}

impl Component for AnalysisPanel {
    fn handle_action(&mut self, action: Action, ctx: &mut Context<'_>) -> Result<bool> {
        let last = AnalysisItem::ORDER.len() - 1;
        match (action, self.current()) {
            (Action::ScrollUp, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                Ok(true)
            }
            (Action::ScrollDown, _) => {
                self.cursor = (self.cursor + 1).min(last);
                Ok(true)
            }
            (Action::Confirm, AnalysisItem::Run(kind)) => {
                ctx.analyze(kind);
                Ok(true)
            }
            (Action::OptionNext | Action::Confirm, AnalysisItem::Pick(selector)) => {
                ctx.dashboard.cycle_column(selector, true);
                Ok(true)
            }
            (Action::OptionPrev, AnalysisItem::Pick(selector)) => {
                ctx.dashboard.cycle_column(selector, false);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard, theme: &Theme) {
        let block = Block::default()
            .title(" Analysis ")
            .borders(Borders::ALL)
            .border_style(theme.border_style(self.focused));

        if !dashboard.preview().visible {
            let hint = Paragraph::new("Upload a file to run analyses")
                .style(theme.disabled_style())
                .block(block);
            frame.render_widget(hint, area);
            return;
        }

        let lines: Vec<Line> = AnalysisItem::ORDER
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                AnalysisItem::Run(kind) => {
                    let control = dashboard.analysis_control(*kind);
                    Line::from(Span::styled(
                        format!("[ {} ]", control.label()),
                        self.item_style(i, control.is_enabled(), theme),
                    ))
                }
                AnalysisItem::Pick(selector) => {
                    let view = dashboard.preview().selector(*selector);
                    let value = dashboard
                        .selections()
                        .get(*selector)
                        .unwrap_or(view.placeholder);
                    let enabled = !view.options.is_empty();
                    Line::from(vec![
                        Span::raw(format!("  {}: ", Self::picker_label(*selector))),
                        Span::styled(
                            format!("< {value} >"),
                            self.item_style(i, enabled, theme),
                        ),
                    ])
                }
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn supported_actions(&self) -> &[Action] {
        &self.actions
    }

    fn name(&self) -> &str {
        "AnalysisPanel"
    }
}

impl Focusable for AnalysisPanel {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_analysis_and_picker_is_reachable() {
        for kind in AnalysisKind::ALL {
            assert!(AnalysisItem::ORDER.contains(&AnalysisItem::Run(kind)));
        }
        for selector in ColumnSelector::ALL {
            assert!(AnalysisItem::ORDER.contains(&AnalysisItem::Pick(selector)));
        }
    }
}
