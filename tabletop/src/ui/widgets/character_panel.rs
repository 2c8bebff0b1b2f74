//! Character sheet panel for the sidebar

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use tabletop_core::{Ability, CharacterRecord};

use crate::ui::theme::Theme;

/// Compact character sheet
pub struct CharacterPanelWidget<'a> {
    record: Option<&'a CharacterRecord>,
    theme: &'a Theme,
}

impl<'a> CharacterPanelWidget<'a> {
    pub fn new(record: Option<&'a CharacterRecord>, theme: &'a Theme) -> Self {
        Self { record, theme }
    }
}

impl Widget for CharacterPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(record) = self.record else {
            let block = Block::default()
                .title(" No character ")
                .borders(Borders::ALL)
                .border_style(self.theme.border_style(false));
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(":new <name>", self.theme.command_style())),
                Line::from(Span::styled(":open <file>", self.theme.command_style())),
            ])
            .block(block)
            .render(area, buf);
            return;
        };

        let block = Block::default()
            .title(format!(" {} ", record.name()))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Class/Race
                Constraint::Length(1), // HP bar
                Constraint::Length(2), // AC/Init/Speed
                Constraint::Min(0),    // Ability scores
            ])
            .split(inner);

        let identity = &record.identity;
        let mut class_text = format!("Level {}", identity.level);
        if !identity.class.is_empty() {
            class_text.push(' ');
            class_text.push_str(&identity.class);
        }
        let mut heading = vec![Line::from(Span::styled(
            class_text,
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        let details: Vec<&str> = [identity.race.as_str(), identity.alignment.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !details.is_empty() {
            heading.push(Line::from(Span::styled(
                details.join(", "),
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
        Paragraph::new(heading).render(chunks[0], buf);

        // HP bar
        let stats = &record.statistics;
        let hp_ratio = stats.hp_ratio();
        let hp_label = if stats.temporary_hit_points > 0 {
            format!(
                "HP: {}/{} (+{})",
                stats.current_hit_points, stats.max_hit_points, stats.temporary_hit_points
            )
        } else {
            format!("HP: {}/{}", stats.current_hit_points, stats.max_hit_points)
        };

        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.hp_color(hp_ratio)))
            .ratio(hp_ratio as f64)
            .label(hp_label)
            .render(chunks[1], buf);

        let combat_stats = vec![
            Line::from(vec![
                Span::raw("AC: "),
                Span::styled(
                    format!("{}", stats.armor_class),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  Init: "),
                Span::raw(signed(stats.initiative)),
            ]),
            Line::from(format!("Speed: {} ft", stats.speed)),
        ];
        Paragraph::new(combat_stats).render(chunks[2], buf);

        if chunks[3].height > 0 {
            Paragraph::new(ability_lines(record)).render(chunks[3], buf);
        }
    }
}

fn ability_lines(record: &CharacterRecord) -> Vec<Line<'static>> {
    Ability::all()
        .iter()
        .map(|ability| {
            let score = record.abilities.get(*ability);
            let modifier = record.abilities.modifier(*ability);
            Line::from(format!(
                "{}: {score:2} ({})",
                ability.abbreviation(),
                signed(modifier)
            ))
        })
        .collect()
}

fn signed(value: i32) -> String {
    if value >= 0 {
        format!("+{value}")
    } else {
        format!("{value}")
    }
}
