//! Scrollable text panels: character notes and command output

use std::collections::BTreeMap;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::theme::Theme;

/// Free-form notes grouped by section heading
pub struct NotesWidget<'a> {
    notes: Option<&'a BTreeMap<String, String>>,
    scroll: u16,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> NotesWidget<'a> {
    pub fn new(notes: Option<&'a BTreeMap<String, String>>, theme: &'a Theme) -> Self {
        Self {
            notes,
            scroll: 0,
            theme,
            focused: false,
        }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for NotesWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(" Notes ", self.theme.title_style(self.focused)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let mut lines: Vec<Line> = Vec::new();
        for (section, text) in self.notes.into_iter().flatten() {
            lines.push(Line::from(Span::styled(
                section.clone(),
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::UNDERLINED),
            )));
            for line in text.lines() {
                lines.push(Line::from(line.to_string()));
            }
            lines.push(Line::from(""));
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "No notes. :note <section> <text>",
                self.theme.system_style(),
            )));
        }

        render_scrolled(lines, self.scroll, block, area, buf);
    }
}

/// Lines printed by the last command
pub struct OutputWidget<'a> {
    lines: &'a [String],
    scroll: u16,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> OutputWidget<'a> {
    pub fn new(lines: &'a [String], theme: &'a Theme) -> Self {
        Self {
            lines,
            scroll: 0,
            theme,
            focused: false,
        }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for OutputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(" Output ", self.theme.title_style(self.focused)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let lines: Vec<Line> = self
            .lines
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect();

        render_scrolled(lines, self.scroll, block, area, buf);
    }
}

/// Render lines inside a block, clamping the scroll so the last page stays visible.
fn render_scrolled(lines: Vec<Line>, scroll: u16, block: Block, area: Rect, buf: &mut Buffer) {
    let inner = block.inner(area);
    block.render(area, buf);

    let max_scroll = lines.len().saturating_sub(inner.height as usize);
    let scroll = (scroll as usize).min(max_scroll) as u16;

    Paragraph::new(lines)
        .scroll((scroll, 0))
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn test_notes_render_section_headings() {
        let mut notes = BTreeMap::new();
        notes.insert("Allies".to_string(), "The ferryman".to_string());

        let theme = Theme::default();
        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        NotesWidget::new(Some(&notes), &theme).render(area, &mut buf);

        assert!(row(&buf, 1).contains("Allies"));
        assert!(row(&buf, 2).contains("The ferryman"));
    }

    #[test]
    fn test_output_scroll_is_clamped() {
        let lines: Vec<String> = (1..=5).map(|i| format!("line {i}")).collect();

        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        OutputWidget::new(&lines, &theme)
            .scroll(100)
            .render(area, &mut buf);

        // Two visible rows, so the last two lines are shown
        assert!(row(&buf, 1).contains("line 4"));
        assert!(row(&buf, 2).contains("line 5"));
    }
}
