use crate::config::ThemeName;
use crate::render::format::Rgba;
use crate::services::NoticeKind;
use ratatui::style::{Color, Modifier, Style};

/// Color scheme for the dashboard
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI colors
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    /// Opaque color translucent tints are blended over
    pub canvas: (u8, u8, u8),

    // Table colors
    pub header_fg: Color,
    pub header_bg: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub disabled: Color,

    // Status/feedback colors
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "Default Dark".to_string(),
            background: Color::Reset,
            foreground: Color::Gray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            canvas: (25, 25, 35),
            header_fg: Color::Cyan,
            header_bg: Color::Reset,
            selected_fg: Color::Black,
            selected_bg: Color::Cyan,
            disabled: Color::DarkGray,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            background: Color::White,
            foreground: Color::Black,
            border: Color::Gray,
            border_focused: Color::Blue,
            canvas: (255, 255, 255),
            header_fg: Color::Blue,
            header_bg: Color::Rgb(240, 240, 240),
            selected_fg: Color::White,
            selected_bg: Color::Blue,
            disabled: Color::Gray,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Rgb(200, 150, 0), // Darker yellow for light bg
            info: Color::Blue,
        }
    }

    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    /// Terminals have no alpha; flatten the tint over the canvas
    pub fn tint(&self, color: Rgba) -> Color {
        let (r, g, b) = color.over(self.canvas);
        Color::Rgb(r, g, b)
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn disabled_style(&self) -> Style {
        Style::default()
            .fg(self.disabled)
            .add_modifier(Modifier::DIM)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn notice_style(&self, kind: NoticeKind) -> Style {
        match kind {
            NoticeKind::Info => Style::default().fg(self.success),
            NoticeKind::Validation => Style::default().fg(self.warning),
            NoticeKind::Server | NoticeKind::Transport | NoticeKind::NotFound => Style::default()
                .fg(self.error)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }
}
