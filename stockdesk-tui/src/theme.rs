//! Parrot/neon theme tokens for the StockDesk dashboard.
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (focus, selection, MA-7 line)
//! - **Positive**: Neon green (up candles, gains, low volatility)
//! - **Negative**: Hot pink (down candles, losses, high volatility)
//! - **Warning**: Neon orange (medium volatility, alerts)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Steel blue (labels, disabled)

use ratatui::style::{Color, Modifier, Style};

use stockdesk_core::VolatilityBand;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
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

    /// Green for gains (including flat), pink for losses.
    pub fn change_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn volatility_color(&self, band: VolatilityBand) -> Color {
        match band {
            VolatilityBand::Low => self.positive,
            VolatilityBand::Medium => self.warning,
            VolatilityBand::High => self.negative,
        }
    }
}

// Style shorthands used by the render functions.

pub fn accent() -> Style {
    Style::default().fg(Theme::default().accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(Theme::default().positive)
}

pub fn negative() -> Style {
    Style::default().fg(Theme::default().negative)
}

pub fn warning() -> Style {
    Style::default().fg(Theme::default().warning)
}

pub fn neutral() -> Style {
    Style::default().fg(Theme::default().neutral)
}

pub fn muted() -> Style {
    Style::default().fg(Theme::default().muted)
}

pub fn text() -> Style {
    Style::default().fg(Theme::default().text_primary)
}

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::Rgb(18, 18, 20));
        assert_eq!(theme.accent, Color::Rgb(0, 255, 255));
    }

    #[test]
    fn test_change_color() {
        let theme = Theme::default();
        assert_eq!(theme.change_color(1.5), theme.positive);
        assert_eq!(theme.change_color(-0.2), theme.negative);
        assert_eq!(theme.change_color(0.0), theme.positive);
    }

    #[test]
    fn test_volatility_color() {
        let theme = Theme::default();
        assert_eq!(theme.volatility_color(VolatilityBand::Low), theme.positive);
        assert_eq!(theme.volatility_color(VolatilityBand::Medium), theme.warning);
        assert_eq!(theme.volatility_color(VolatilityBand::High), theme.negative);
    }

    #[test]
    fn test_panel_styles_follow_focus() {
        assert_eq!(panel_border(true), accent());
        assert_eq!(panel_border(false), muted());
    }
}
