//! Inventory table widget

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

use tabletop_core::CharacterRecord;

use crate::ui::theme::Theme;

/// Numbered item table with the highlighted row and carried totals
pub struct InventoryWidget<'a> {
    record: Option<&'a CharacterRecord>,
    theme: &'a Theme,
    selected: Option<usize>,
    focused: bool,
}

impl<'a> InventoryWidget<'a> {
    pub fn new(record: Option<&'a CharacterRecord>, theme: &'a Theme) -> Self {
        Self {
            record,
            theme,
            selected: None,
            focused: false,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for InventoryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .title(Span::styled(" Inventory ", self.theme.title_style(self.focused)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let Some(record) = self.record else {
            Paragraph::new(Span::styled("No character loaded", self.theme.system_style()))
                .block(block)
                .render(area, buf);
            return;
        };

        block = block.title_bottom(Line::from(format!(
            " {} items | {:.1} lb | {:.2} gp ",
            record.item_count(),
            record.total_weight(),
            record.total_value()
        )));

        if record.items().is_empty() {
            Paragraph::new(Span::styled(
                "Empty. Press 'a' to add an item.",
                self.theme.system_style(),
            ))
            .block(block)
            .render(area, buf);
            return;
        }

        let header = Row::new(["#", "Name", "Qty", "Wt", "Value", "Category"]).style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::UNDERLINED),
        );

        let rows = record.items().iter().enumerate().map(|(i, item)| {
            let marker = if item.equipped { "*" } else { " " };
            let name_style = if item.equipped {
                self.theme.rarity_style(item.rarity).fg(self.theme.equipped_text)
            } else {
                self.theme.rarity_style(item.rarity)
            };
            Row::new(vec![
                Cell::from(format!("{}{marker}", i + 1)),
                Cell::from(Span::styled(item.name.clone(), name_style)),
                Cell::from(item.quantity.to_string()),
                Cell::from(format!("{:.1}", item.total_weight())),
                Cell::from(format!("{:.2}", item.total_value())),
                Cell::from(item.category.name()),
            ])
        });

        let widths = [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(self.theme.selected_style())
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(self.selected);
        StatefulWidget::render(table, area, buf, &mut state);
    }
}
