use crate::dashboard::Dashboard;
use crate::render::Section;
use crate::tui::components::{AnalysisPanel, FilePrompt, MessageBar, PreviewPanel, ResultsPanel};
use crate::tui::event::{AppEvent, Completion, Tasks};
use crate::tui::{Action, ActionCategory, Component, Context, Focusable, KeyBindings, Theme};
use color_eyre::Result;
use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::time::Instant;
use tracing::debug;

const FOCUS_ORDER: [Section; 4] = [
    Section::Upload,
    Section::Preview,
    Section::Analysis,
    Section::Results,
];

/// Global actions advertised after the focused panel's own
const HINTS: [Action; 3] = [Action::FocusNext, Action::ToggleHelp, Action::Quit];

/// Application state
///
/// Owns the dashboard and the panels that draw it, routes key actions and
/// applies finished requests as they arrive.
pub struct App {
    dashboard: Dashboard,

    /// Spawner for background requests
    tasks: Tasks,

    file_prompt: FilePrompt,
    preview: PreviewPanel,
    analysis: AnalysisPanel,
    results: ResultsPanel,
    message_bar: MessageBar,

    focus: Section,
    show_help: bool,

    keybindings: KeyBindings,
    theme: Theme,

    should_quit: bool,
}

impl App {
    pub fn new(dashboard: Dashboard, tasks: Tasks) -> Self {
        let mut app = Self {
            dashboard,
            tasks,
            file_prompt: FilePrompt::new(),
            preview: PreviewPanel::new(),
            analysis: AnalysisPanel::new(),
            results: ResultsPanel::new(),
            message_bar: MessageBar::new(),
            focus: Section::Upload,
            show_help: false,
            keybindings: KeyBindings::default(),
            theme: Theme::default(),
            should_quit: false,
        };
        app.set_focus(Section::Upload);
        app
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    pub fn focus(&self) -> Section {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    pub fn set_keybindings(&mut self, keybindings: KeyBindings) {
        self.keybindings = keybindings;
    }

    /// Submit the dashboard's chosen file in the background
    pub fn start_upload(&mut self) {
        self.context().upload();
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Key(key) => self.handle_key_event(key)?,
            AppEvent::Tick => self.update()?,
            AppEvent::Resize(..) => {}
            AppEvent::Completed(completion) => self.apply(completion),
        }
        Ok(())
    }

    /// Handle a key event
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // The path prompt takes raw keys while it is open
        if self.file_prompt.is_editing() {
            let mut ctx = Context {
                dashboard: &mut self.dashboard,
                tasks: &self.tasks,
            };
            self.file_prompt.input(key, &mut ctx);
            return Ok(());
        }

        if let Some(action) = self.keybindings.get_action(&key) {
            self.handle_action(action)?;
        }
        Ok(())
    }

    /// Handle an action
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        debug!("Action {:?} with focus on {:?}", action, self.focus);

        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::Cancel | Action::Quit) {
                self.show_help = false;
            }
            return Ok(());
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.show_help = true,
            Action::FocusNext => self.cycle_focus(true),
            Action::FocusPrev => self.cycle_focus(false),
            Action::OpenFilePrompt => {
                self.set_focus(Section::Upload);
                self.file_prompt.start_editing();
            }
            Action::Upload => self.start_upload(),
            Action::RunSummary
            | Action::RunCorrelation
            | Action::RunHistogram
            | Action::RunScatter => {
                if let Some(kind) = action.analysis() {
                    self.context().analyze(kind);
                }
            }
            Action::Download => {
                let kind = ResultsPanel::target(&self.dashboard);
                self.context().download(kind);
            }
            Action::DismissMessage => {
                let mut ctx = Context {
                    dashboard: &mut self.dashboard,
                    tasks: &self.tasks,
                };
                self.message_bar.handle_action(action, &mut ctx)?;
            }
            _ => {
                self.route(action)?;
            }
        }
        Ok(())
    }

    /// Send an action to the focused panel
    fn route(&mut self, action: Action) -> Result<bool> {
        debug!("Routing {:?} to {}", action, self.focused_panel().name());
        let mut ctx = Context {
            dashboard: &mut self.dashboard,
            tasks: &self.tasks,
        };
        match self.focus {
            Section::Upload => self.file_prompt.handle_action(action, &mut ctx),
            Section::Preview => self.preview.handle_action(action, &mut ctx),
            Section::Analysis => self.analysis.handle_action(action, &mut ctx),
            Section::Results => self.results.handle_action(action, &mut ctx),
        }
    }

    fn focused_panel(&self) -> &dyn Focusable {
        let panels: [&dyn Focusable; 4] = [
            &self.file_prompt,
            &self.preview,
            &self.analysis,
            &self.results,
        ];
        panels
            .into_iter()
            .find(|p| p.is_focused())
            .unwrap_or(&self.file_prompt)
    }

    fn context(&mut self) -> Context<'_> {
        Context {
            dashboard: &mut self.dashboard,
            tasks: &self.tasks,
        }
    }

    /// Apply a finished request, then bring the affected section into view
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Upload(ticket, outcome) => {
                self.dashboard.finish_upload(ticket, outcome);
            }
            Completion::Analysis(ticket, outcome) => {
                self.dashboard.finish_analysis(&ticket, outcome);
            }
            Completion::Download(ticket, outcome) => {
                self.dashboard.finish_download(&ticket, outcome);
            }
        }
        if let Some(section) = self.dashboard.take_scroll_target() {
            self.set_focus(section);
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let len = FOCUS_ORDER.len();
        let current = FOCUS_ORDER
            .iter()
            .position(|s| *s == self.focus)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.set_focus(FOCUS_ORDER[next]);
    }

    fn set_focus(&mut self, section: Section) {
        self.focus = section;
        self.file_prompt.set_focused(section == Section::Upload);
        self.preview.set_focused(section == Section::Preview);
        self.analysis.set_focused(section == Section::Analysis);
        self.results.set_focused(section == Section::Results);
    }

    /// Update app state (called on every tick)
    pub fn update(&mut self) -> Result<()> {
        self.dashboard.tick(Instant::now());
        self.file_prompt.update(&self.dashboard)?;
        self.preview.update(&self.dashboard)?;
        self.analysis.update(&self.dashboard)?;
        self.results.update(&self.dashboard)?;
        Ok(())
    }

    /// Render the app
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let message_height = MessageBar::height(&self.dashboard, area.width);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),              // Upload
                Constraint::Percentage(40),         // Preview
                Constraint::Min(9),                 // Analysis | Results
                Constraint::Length(message_height), // Messages
                Constraint::Length(1),              // Help line
            ])
            .split(area);
        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(0)])
            .split(rows[2]);

        self.file_prompt
            .render(frame, rows[0], &self.dashboard, &self.theme);
        self.preview.render(frame, rows[1], &self.dashboard, &self.theme);
        self.analysis
            .render(frame, middle[0], &self.dashboard, &self.theme);
        self.results
            .render(frame, middle[1], &self.dashboard, &self.theme);
        self.message_bar
            .render(frame, rows[3], &self.dashboard, &self.theme);
        frame.render_widget(Paragraph::new(self.help_line()), rows[4]);

        if self.show_help {
            let help_area = Self::centered_rect(60, 70, area);
            frame.render_widget(Clear, help_area);
            frame.render_widget(self.help_screen(), help_area);
        }
    }

    /// Keys of the focused panel, then the message bar while it shows
    /// something, then the global hints
    fn help_line(&self) -> Line<'static> {
        let mut actions: Vec<Action> = self.focused_panel().supported_actions().to_vec();
        if !self.dashboard.notices().is_empty() {
            actions.extend_from_slice(self.message_bar.supported_actions());
        }
        for hint in HINTS {
            if !actions.contains(&hint) {
                actions.push(hint);
            }
        }

        let mut spans = Vec::new();
        for action in actions {
            if let Some(key) = self.keybindings.primary_key(action) {
                spans.push(Span::styled(key.to_string(), self.theme.header_style()));
                spans.push(Span::raw(format!(" {}  ", action.description())));
            }
        }
        Line::from(spans)
    }

    fn help_screen(&self) -> Paragraph<'static> {
        let mut lines = Vec::new();
        for category in ActionCategory::ALL {
            lines.push(Line::from(Span::styled(
                category.to_string(),
                self.theme.header_style(),
            )));
            for action in Action::all().into_iter().filter(|a| a.category() == category) {
                let keys = self.keybindings.get_keys_for_action(action).join(", ");
                lines.push(Line::from(format!("  {:<16} {}", keys, action.description())));
            }
            lines.push(Line::default());
        }
        Paragraph::new(lines).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(self.theme.border_style(true)),
        )
    }

    /// Helper to create centered rectangle
    fn centered_rect(percent_w: u16, percent_h: u16, area: Rect) -> Rect {
        let width = (area.width * percent_w) / 100;
        let height = (area.height * percent_h) / 100;
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnalyzeRequestBody, AnalyzeResponse, UploadFile, UploadResponse};
    use crate::dashboard::DashboardOptions;
    use crate::services::{Transport, TransportFuture};
    use crate::tui::EventLoop;
    use color_eyre::eyre::eyre;
    use crossterm::event::{KeyCode, KeyModifiers};
    use futures::FutureExt;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;
    use std::sync::Arc;

    struct CannedTransport;

    impl Transport for CannedTransport {
        fn upload(&self, _file: UploadFile) -> TransportFuture<UploadResponse> {
            let response: UploadResponse = serde_json::from_value(json!({
                "success": true,
                "session_id": "s1",
                "filename": "sales.csv",
                "columns": ["A", "B"],
                "dtypes": {"A": "int64", "B": "object"},
                "stats": {"rows": 2, "columns": 2},
                "preview": [{"A": 1, "B": "x"}, {"A": 2, "B": null}]
            }))
            .unwrap();
            futures::future::ready(Ok(response)).boxed()
        }

        fn analyze(&self, _body: AnalyzeRequestBody) -> TransportFuture<AnalyzeResponse> {
            futures::future::ready(Err(eyre!("offline"))).boxed()
        }

        fn fetch_bytes(&self, _reference: &str) -> TransportFuture<Vec<u8>> {
            futures::future::ready(Err(eyre!("offline"))).boxed()
        }
    }

    fn create_test_app() -> (App, EventLoop) {
        let events = EventLoop::new();
        let dashboard = Dashboard::new(Arc::new(CannedTransport), DashboardOptions::default());
        (App::new(dashboard, events.tasks()), events)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_quit_action() {
        let (mut app, _events) = create_test_app();
        assert!(!app.should_quit());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_focus_cycles_through_panels() {
        let (mut app, _events) = create_test_app();
        assert_eq!(app.focus(), Section::Upload);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Section::Preview);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Section::Results);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Section::Upload);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus(), Section::Results);
    }

    #[test]
    fn test_prompt_captures_typed_path() {
        let (mut app, _events) = create_test_app();
        press(&mut app, KeyCode::Char('o'));
        // 'q' is text here, not Quit
        type_text(&mut app, "/tmp/q/sales.csv");
        assert!(!app.should_quit());
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.dashboard().file_label(), "sales.csv");
    }

    #[test]
    fn test_analysis_without_upload_raises_notice() {
        let (mut app, _events) = create_test_app();
        press(&mut app, KeyCode::Char('1'));
        let notice = app.dashboard().notices().latest().unwrap();
        assert_eq!(notice.message, "No data uploaded. Please upload a file first.");
        press(&mut app, KeyCode::Char('x'));
        assert!(app.dashboard().notices().is_empty());
    }

    #[test]
    fn test_help_swallows_actions_until_closed() {
        let (mut app, _events) = create_test_app();
        press(&mut app, KeyCode::Char('?'));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Section::Upload);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Section::Preview);
    }

    #[tokio::test]
    async fn test_upload_completion_focuses_preview() {
        let (mut app, mut events) = create_test_app();
        app.dashboard_mut()
            .select_file(Some("/data/sales.csv".into()));
        press(&mut app, KeyCode::Char('u'));
        assert!(!app.dashboard().upload_control().is_enabled());

        let event = events.next().await.unwrap();
        app.handle_event(event).unwrap();

        assert_eq!(app.focus(), Section::Preview);
        assert!(app.dashboard().upload_control().is_enabled());
        let preview = app.dashboard().preview();
        assert!(preview.visible);
        assert_eq!(preview.filename, "sales.csv");
        assert_eq!(preview.table.rows[1], vec!["2".to_string(), "N/A".to_string()]);
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_analysis_controls_hidden_until_upload() {
        let (mut app, mut events) = create_test_app();
        let screen = draw(&mut app);
        assert!(screen.contains("Upload a file to run analyses"));
        assert!(!screen.contains("[ Summary Statistics ]"));
        assert!(!screen.contains("Select X column"));

        app.dashboard_mut()
            .select_file(Some("/data/sales.csv".into()));
        app.start_upload();
        let event = events.next().await.unwrap();
        app.handle_event(event).unwrap();

        let screen = draw(&mut app);
        assert!(!screen.contains("Upload a file to run analyses"));
        assert!(screen.contains("[ Summary Statistics ]"));
        assert!(screen.contains("Select X column"));
    }

    fn help_text(app: &App) -> String {
        app.help_line()
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn test_help_line_follows_focused_panel() {
        let (mut app, _events) = create_test_app();
        let text = help_text(&app);
        assert!(text.contains("Upload the chosen file"));
        assert!(!text.contains("Next column option"));
        assert!(text.contains("Quit application"));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Section::Analysis);
        let text = help_text(&app);
        assert!(text.contains("Next column option"));
        assert!(!text.contains("Upload the chosen file"));
        assert!(!text.contains("Dismiss newest message"));

        press(&mut app, KeyCode::Char('1'));
        assert!(help_text(&app).contains("Dismiss newest message"));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(App::centered_rect(60, 70, area), Rect::new(20, 7, 60, 35));
    }
}
