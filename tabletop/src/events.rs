//! Event handling for the inventory TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, InputMode};
use crate::ui::FocusedPanel;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    let result = match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    };

    if app.should_quit {
        EventResult::Quit
    } else {
        result
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            move_up(app);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            move_down(app);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Ctrl+C leaves immediately, saved or not
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
    }
}

/// Handle keys in NORMAL mode (vim-style navigation and hotkeys)
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char(':') => app.enter_command_mode(),
        KeyCode::Char('?') | KeyCode::F(1) => app.toggle_help(),
        KeyCode::Char('q') => app.request_quit(),

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => move_down(app),
        KeyCode::Char('k') | KeyCode::Up => move_up(app),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::BackTab => app.cycle_focus_reverse(),

        // Inventory actions
        KeyCode::Char('x') | KeyCode::Delete => app.remove_selected(),
        KeyCode::Char('e') => app.toggle_selected_equipped(),
        KeyCode::Enter => app.toggle_item_details(),

        // Shortcuts into the command line
        KeyCode::Char('a') => app.prefill_command("add "),
        KeyCode::Char('c') => app.prefill_command("coin gp "),
        KeyCode::Char('n') => app.prefill_command("note "),
        KeyCode::Char('o') => app.prefill_command("open "),
        KeyCode::Char('E') => {
            if let Some(index) = app.selected_index() {
                app.prefill_command(&format!("edit {} ", index + 1));
            }
        }
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.run_command("save")
        }
        KeyCode::Char('s') => app.run_command("show"),
        KeyCode::Char('l') => app.run_command("list"),

        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn move_down(app: &mut App) {
    match app.focused_panel {
        FocusedPanel::Inventory => app.select_next(),
        FocusedPanel::Notes => app.scroll_notes_down(),
        FocusedPanel::Output => app.scroll_output_down(),
    }
}

fn move_up(app: &mut App) {
    match app.focused_panel {
        FocusedPanel::Inventory => app.select_prev(),
        FocusedPanel::Notes => app.scroll_notes_up(),
        FocusedPanel::Output => app.scroll_output_up(),
    }
}

/// Handle keys in COMMAND mode (: commands)
fn handle_command_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => app.enter_normal_mode(),

        KeyCode::Enter => {
            let command = app.submit_input();
            app.enter_normal_mode();
            if let Some(command) = command {
                app.run_command(&command);
            }
        }

        // Input editing; the leading ':' stays put
        KeyCode::Left => {
            if app.cursor_position() > 1 {
                app.cursor_left();
            }
        }
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => {
            app.cursor_home();
            app.cursor_right();
        }
        KeyCode::End => app.cursor_end(),
        KeyCode::Backspace => {
            if app.cursor_position() > 1 {
                app.backspace();
            } else if app.input_buffer().len() <= 1 {
                // Backspace on just ":" exits command mode
                app.enter_normal_mode();
            }
        }
        KeyCode::Delete => app.delete(),
        KeyCode::Up => app.history_prev(),
        KeyCode::Down => app.history_next(),

        KeyCode::Char(c) => app.type_char(c),

        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle key when overlay is open
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Char('?') => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
