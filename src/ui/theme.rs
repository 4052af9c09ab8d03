use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub foreground: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Yellow,
            secondary: Color::Cyan,
            background: Color::Reset,
            foreground: Color::White,
            error: Color::Red,
            success: Color::Green,
            border: Color::DarkGray,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn primary_style(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn secondary_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for a form value given focus and validation state
    pub fn field_style(&self, focused: bool, errored: bool) -> Style {
        match (focused, errored) {
            (_, true) => self.error_style(),
            (true, false) => self.primary_style(),
            (false, false) => self.style(),
        }
    }

    /// Style for the create button, lit once the form can be submitted
    pub fn button_style(&self, ready: bool) -> Style {
        if ready {
            self.primary_style()
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            self.muted_style().add_modifier(Modifier::REVERSED)
        }
    }
}
