//! Coin purse panel

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use tabletop_core::{Denomination, Purse};

use crate::ui::theme::Theme;

/// Shows each denomination and the purse's worth in gold
pub struct PurseWidget<'a> {
    purse: Option<&'a Purse>,
    theme: &'a Theme,
}

impl<'a> PurseWidget<'a> {
    pub fn new(purse: Option<&'a Purse>, theme: &'a Theme) -> Self {
        Self { purse, theme }
    }

    fn coin_color(&self, denomination: Denomination) -> Style {
        let color = match denomination {
            Denomination::Platinum => self.theme.platinum,
            Denomination::Gold => self.theme.gold,
            Denomination::Silver => self.theme.silver,
            Denomination::Copper => self.theme.copper,
        };
        Style::default().fg(color)
    }
}

impl Widget for PurseWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Purse ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let purse = self.purse.copied().unwrap_or_default();
        let mut lines: Vec<Line> = Denomination::all()
            .iter()
            .map(|d| {
                Line::from(vec![
                    Span::styled(format!("{}: ", d.abbreviation()), self.coin_color(*d)),
                    Span::raw(format!("{:>8}", purse.get(*d))),
                ])
            })
            .collect();
        lines.push(Line::from(Span::styled(
            format!("Worth {:.2} gp", purse.total_value()),
            Style::default().add_modifier(Modifier::DIM),
        )));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
