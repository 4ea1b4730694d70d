//! Neon-on-charcoal palette for the RMRE chart.
//!
//! - **Background**: deep charcoal
//! - **Accent**: electric cyan (level series, borders)
//! - **Positive / Negative**: neon green / hot pink (direction of the move)
//! - **Warning**: neon orange (empty chart notice)
//! - **Muted**: steel blue (axes)

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    /// Cool purple, used for log-return lines.
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Line color by value column: levels in accent, returns in neutral.
    pub fn line_color(&self, value_column: &str) -> Color {
        match value_column {
            "log_return" => self.neutral,
            _ => self.accent,
        }
    }

    /// Green when the series ended at or above where it started.
    pub fn change_color(&self, first: f64, last: f64) -> Color {
        if last >= first {
            self.positive
        } else {
            self.negative
        }
    }
}
