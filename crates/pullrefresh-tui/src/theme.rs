use ratatui::style::Color;

/// Runtime theme colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey0: Color,
    pub grey2: Color,

    // Semantic colors
    /// Rows added by the last refresh
    pub fresh: Color,
    /// Fully visible indicator
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            fresh: Color::Rgb(0xd8, 0xa6, 0x57),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
        }
    }
}

impl Theme {
    /// Terminal stand-in for opacity: `None` when fully transparent
    pub fn indicator_color(&self, alpha: f64) -> Option<Color> {
        if alpha <= 0.05 {
            None
        } else if alpha < 0.5 {
            Some(self.grey0)
        } else if alpha < 0.9 {
            Some(self.grey2)
        } else {
            Some(self.accent)
        }
    }
}
