//! Render orchestration for the inventory TUI

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use tabletop_core::command::HELP;
use tabletop_core::Item;

use crate::app::{App, InputMode};
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::widgets::{
    CharacterPanelWidget, HotkeyBarWidget, InputWidget, InventoryWidget, NotesWidget,
    OutputWidget, PurseWidget, StatusBarWidget,
};

/// Which panel is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Inventory,
    Notes,
    Output,
}

/// Overlay types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Help,
    ItemDetails,
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::calculate(area);
    let record = app.record();

    render_title_bar(frame, app, layout.title_area);

    frame.render_widget(
        CharacterPanelWidget::new(record, &app.theme),
        layout.sheet_area,
    );
    frame.render_widget(
        PurseWidget::new(record.map(|r| r.purse()), &app.theme),
        layout.purse_area,
    );

    frame.render_widget(
        InventoryWidget::new(record, &app.theme)
            .selected(app.selected_index())
            .focused(app.focused_panel == FocusedPanel::Inventory),
        layout.inventory_area,
    );
    frame.render_widget(
        NotesWidget::new(record.map(|r| r.notes()), &app.theme)
            .scroll(app.notes_scroll)
            .focused(app.focused_panel == FocusedPanel::Notes),
        layout.notes_area,
    );
    frame.render_widget(
        OutputWidget::new(&app.output, &app.theme)
            .scroll(app.output_scroll)
            .focused(app.focused_panel == FocusedPanel::Output),
        layout.output_area,
    );

    frame.render_widget(
        StatusBarWidget::new(record, app.session.is_dirty(), app.input_mode, &app.theme)
            .message(app.status_message()),
        layout.status_bar,
    );
    frame.render_widget(
        HotkeyBarWidget::new(app.input_mode, &app.theme),
        layout.hotkey_bar,
    );
    frame.render_widget(
        InputWidget::new(app.input_buffer(), &app.theme)
            .cursor_position(app.cursor_position())
            .active(app.input_mode == InputMode::Command),
        layout.input_area,
    );

    if let Some(overlay) = app.overlay() {
        match overlay {
            Overlay::Help => render_help_overlay(frame, app, area),
            Overlay::ItemDetails => {
                if let Some(item) = app.selected_item() {
                    render_item_overlay(frame, app, item, area);
                }
            }
        }
    }
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let file = app
        .session
        .path()
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unsaved".to_string());
    let title = match app.record() {
        Some(record) => format!(" Tabletop Inventory | {} | {file} ", record.name()),
        None => " Tabletop Inventory ".to_string(),
    };

    let line = Line::from(Span::styled(
        title,
        Style::default()
            .fg(app.theme.foreground)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(90, 36, area);
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let mut help_text = vec![
        Line::from(Span::styled("Keys:", heading)),
        Line::from("  j/k or ↑/↓   Move selection / scroll"),
        Line::from("  g/G          First/last item"),
        Line::from("  Tab          Cycle panel focus"),
        Line::from("  Enter        Item details"),
        Line::from("  a/x/e/E      Add, remove, equip, edit item"),
        Line::from("  c/n/o        Coins, note, open"),
        Line::from("  Ctrl+S       Save"),
        Line::from("  q            Quit"),
        Line::from(""),
        Line::from(Span::styled("Commands:", heading)),
    ];
    help_text.extend(HELP.iter().map(|(usage, summary)| {
        Line::from(vec![
            Span::styled(format!("  :{usage}"), app.theme.command_style()),
            Span::raw(format!("  {summary}")),
        ])
    }));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        "Press Esc or q to close",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

/// Render the details of one item
fn render_item_overlay(frame: &mut Frame, app: &App, item: &Item, area: Rect) {
    let popup_area = centered_rect_fixed(50, 14, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(
            item.name.clone(),
            app.theme.rarity_style(item.rarity),
        )),
        Line::from(format!("{} | {}", item.category, item.rarity)),
        Line::from(format!(
            "Quantity: {}{}",
            item.quantity,
            if item.equipped { " (equipped)" } else { "" }
        )),
        Line::from(format!(
            "Weight: {:.2} lb each, {:.2} lb total",
            item.unit_weight,
            item.total_weight()
        )),
        Line::from(format!(
            "Value: {:.2} gp each, {:.2} gp total",
            item.unit_value,
            item.total_value()
        )),
    ];
    if !item.tags.is_empty() {
        lines.push(Line::from(format!("Tags: {}", item.tags.join(", "))));
    }
    if !item.description.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(item.description.clone()));
    }

    let block = Block::default()
        .title(" Item ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use tabletop_core::{Session, SessionConfig};
    use tempfile::TempDir;

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_full_screen() {
        let temp_dir = TempDir::new().unwrap();
        let config = SessionConfig::new().with_save_dir(temp_dir.path());
        let mut app = App::new(Session::new(&config).unwrap());
        app.run_command("new Brin");
        app.run_command("add Longsword");
        app.run_command("coin gp +12");

        let text = screen_text(&app);
        assert!(text.contains("Tabletop Inventory | Brin | unsaved"));
        assert!(text.contains("Longsword"));
        assert!(text.contains("-- NORMAL --"));

        app.toggle_item_details();
        assert!(screen_text(&app).contains("Weight: 3.00 lb each"));

        app.toggle_help();
        assert!(screen_text(&app).contains("Commands:"));
    }
}
