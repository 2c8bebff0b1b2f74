//! Color theme and styling for the inventory TUI

use ratatui::style::{Color, Modifier, Style};
use tabletop_core::Rarity;

/// UI color theme
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub highlight: Color,

    // HP colors
    pub hp_healthy: Color,
    pub hp_wounded: Color,
    pub hp_critical: Color,

    // Rarity colors
    pub common: Color,
    pub uncommon: Color,
    pub rare: Color,
    pub very_rare: Color,
    pub legendary: Color,
    pub artifact: Color,

    // Coin colors
    pub platinum: Color,
    pub gold: Color,
    pub silver: Color,
    pub copper: Color,

    // Text colors
    pub equipped_text: Color,
    pub command_text: Color,
    pub error_text: Color,
    pub system_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            highlight: Color::Rgb(40, 44, 52),

            hp_healthy: Color::Green,
            hp_wounded: Color::Yellow,
            hp_critical: Color::Red,

            common: Color::White,
            uncommon: Color::Green,
            rare: Color::LightBlue,
            very_rare: Color::Magenta,
            legendary: Color::Yellow,
            artifact: Color::LightRed,

            platinum: Color::Gray,
            gold: Color::Yellow,
            silver: Color::White,
            copper: Color::Rgb(184, 115, 51),

            equipped_text: Color::Cyan,
            command_text: Color::Yellow,
            error_text: Color::LightRed,
            system_text: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Get HP bar color based on ratio
    pub fn hp_color(&self, ratio: f32) -> Color {
        if ratio > 0.5 {
            self.hp_healthy
        } else if ratio > 0.25 {
            self.hp_wounded
        } else {
            self.hp_critical
        }
    }

    /// Get style for an item's name based on its rarity
    pub fn rarity_style(&self, rarity: Rarity) -> Style {
        let color = match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::VeryRare => self.very_rare,
            Rarity::Legendary => self.legendary,
            Rarity::Artifact => self.artifact,
        };
        let style = Style::default().fg(color);
        if matches!(rarity, Rarity::Legendary | Rarity::Artifact) {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Get style for the selected inventory row
    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get style for errors in the status line
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error_text)
    }

    /// Get style for the command prompt
    pub fn command_style(&self) -> Style {
        Style::default().fg(self.command_text)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self, focused: bool) -> Style {
        let style = Style::default().fg(if focused {
            self.border_focused
        } else {
            self.foreground
        });

        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}
