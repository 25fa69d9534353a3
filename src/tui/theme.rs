//! Theme definitions for the TUI
//!
//! Dark and light themes. The default is "dark"; users can configure
//! "light" via config file or env var. Job swatches always use the job's
//! own color and are not themed.

use ratatui::style::Color;

use crate::models::HexColor;
use crate::tui::app::RowStatus;

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "light" => ThemeName::Light,
            _ => ThemeName::Dark,
        }
    }
}

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,

    // Base colors
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,

    // Row status
    pub saving: Color,
    pub success: Color,
    pub error: Color,

    // UI elements
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub editing_bg: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme (default)
    pub fn dark() -> Self {
        Self {
            name: ThemeName::Dark,

            fg: Color::White,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            saving: Color::Rgb(255, 180, 0),
            success: Color::Rgb(0, 200, 0),
            error: Color::Rgb(255, 80, 80),

            selected_bg: Color::Rgb(60, 60, 80),
            selected_fg: Color::White,
            header_bg: Color::Rgb(40, 80, 120),
            header_fg: Color::White,
            editing_bg: Color::Rgb(30, 30, 45),
            accent: Color::Cyan,
        }
    }

    /// Create a light theme
    /// Uses darker, more saturated colors for visibility on light backgrounds
    pub fn light() -> Self {
        Self {
            name: ThemeName::Light,

            fg: Color::Black,
            muted: Color::Rgb(120, 120, 120),
            border: Color::Rgb(120, 120, 120),
            border_focused: Color::Rgb(0, 100, 180),

            saving: Color::Rgb(200, 120, 0),
            success: Color::Rgb(0, 140, 0),
            error: Color::Rgb(200, 0, 0),

            selected_bg: Color::Rgb(200, 220, 255),
            selected_fg: Color::Black,
            header_bg: Color::Rgb(180, 200, 230),
            header_fg: Color::Black,
            editing_bg: Color::Rgb(235, 235, 245),
            accent: Color::Rgb(0, 100, 180),
        }
    }

    /// Create theme from name string
    pub fn from_name(name: &str) -> Self {
        match ThemeName::parse(name) {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    /// Terminal color for a job swatch
    pub fn swatch_color(&self, color: &HexColor) -> Color {
        let (r, g, b) = color.rgb();
        Color::Rgb(r, g, b)
    }

    /// Color of the row status indicator
    pub fn status_color(&self, status: RowStatus) -> Color {
        match status {
            RowStatus::Idle => self.muted,
            RowStatus::Saving => self.saving,
            RowStatus::Saved => self.success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_name() {
        let dark = Theme::from_name("dark");
        assert_eq!(dark.name, ThemeName::Dark);

        let light = Theme::from_name("LIGHT");
        assert_eq!(light.name, ThemeName::Light);

        // Unknown defaults to dark
        let unknown = Theme::from_name("solarized");
        assert_eq!(unknown.name, ThemeName::Dark);
    }

    #[test]
    fn test_swatch_uses_job_color() {
        let theme = Theme::light();
        let color = HexColor::parse("0693e3").unwrap();
        assert_eq!(theme.swatch_color(&color), Color::Rgb(0x06, 0x93, 0xe3));
    }

    #[test]
    fn test_status_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.status_color(RowStatus::Saving), theme.saving);
        assert_eq!(theme.status_color(RowStatus::Saved), theme.success);
    }
}
