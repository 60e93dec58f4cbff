use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub surface: Color,
    pub surface_bright: Color,
    pub border: Color,
    pub border_focused: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(8, 12, 16),
            surface: Color::Rgb(20, 26, 32),
            surface_bright: Color::Rgb(36, 44, 54),
            border: Color::Rgb(60, 70, 80),
            border_focused: Color::Rgb(90, 110, 230),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(170, 175, 180),
            dim: Color::Rgb(120, 125, 130),
            accent: Color::Rgb(99, 102, 241),
            positive: Color::Rgb(16, 185, 129),
            negative: Color::Rgb(239, 68, 68),
            warning: Color::Rgb(245, 158, 11),
            error: Color::Rgb(200, 80, 80),
        }
    }
}

impl Theme {
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.surface_bright)
            .add_modifier(Modifier::BOLD)
    }
}
