//! Status and hotkey bars

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use tabletop_core::CharacterRecord;

use crate::app::InputMode;
use crate::ui::theme::Theme;

/// Status bar showing mode, character and the last message
pub struct StatusBarWidget<'a> {
    record: Option<&'a CharacterRecord>,
    dirty: bool,
    input_mode: InputMode,
    theme: &'a Theme,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(
        record: Option<&'a CharacterRecord>,
        dirty: bool,
        input_mode: InputMode,
        theme: &'a Theme,
    ) -> Self {
        Self {
            record,
            dirty,
            input_mode,
            theme,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (input_mode_text, input_mode_style) = match self.input_mode {
            InputMode::Normal => (
                "NORMAL",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            InputMode::Command => (
                "COMMAND",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        };

        let mut spans = vec![Span::styled(
            format!("-- {input_mode_text} --"),
            input_mode_style,
        )];

        match self.record {
            Some(record) => {
                spans.push(Span::raw(" | "));
                spans.push(Span::raw(record.name().to_string()));
                if self.dirty {
                    spans.push(Span::styled(" [+]", self.theme.command_style()));
                }
            }
            None => {
                spans.push(Span::raw(" | "));
                spans.push(Span::styled("no character", self.theme.system_style()));
            }
        }

        if let Some(msg) = self.message {
            let style = if msg.starts_with("Error") || msg.starts_with("Unsaved") {
                self.theme.error_style()
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(msg, style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Hotkey bar widget
pub struct HotkeyBarWidget<'a> {
    input_mode: InputMode,
    theme: &'a Theme,
}

impl<'a> HotkeyBarWidget<'a> {
    pub fn new(input_mode: InputMode, theme: &'a Theme) -> Self {
        Self { input_mode, theme }
    }
}

impl Widget for HotkeyBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hotkeys = match self.input_mode {
            InputMode::Normal => vec![
                ("::command", true),
                ("a:add", true),
                ("x:remove", true),
                ("e:equip", true),
                ("c:coins", true),
                ("n:note", true),
                ("^S:save", true),
                ("Tab:panel", false),
                ("?:help", false),
                ("q:quit", false),
            ],
            InputMode::Command => vec![
                ("Enter:run", true),
                ("Esc:cancel", true),
                ("↑/↓:history", false),
            ],
        };

        let mut spans = Vec::new();
        for (i, (hotkey, primary)) in hotkeys.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            let style = if *primary {
                Style::default().fg(self.theme.foreground)
            } else {
                Style::default().fg(self.theme.border)
            };
            spans.push(Span::styled(*hotkey, style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
