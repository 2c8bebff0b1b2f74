//! Main application state and logic

use std::collections::VecDeque;

use tabletop_core::{CharacterRecord, CommandError, Item, Session};

use crate::ui::theme::Theme;
use crate::ui::{FocusedPanel, Overlay};

const HISTORY_LIMIT: usize = 100;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Command mode - entering : commands
    Command,
}

/// Main application state
pub struct App {
    pub session: Session,

    // UI state
    pub theme: Theme,
    pub focused_panel: FocusedPanel,
    overlay: Option<Overlay>,
    selected_item: usize,
    pub notes_scroll: u16,
    pub output_scroll: u16,

    // Output of the last command, shown in the log panel
    pub output: Vec<String>,

    // Input state
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,
    pub input_history: VecDeque<String>,
    pub history_index: Option<usize>,
    pub saved_input: Option<String>,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        let greeting = match session.record() {
            Some(record) => format!("Editing {}. Press ':' for commands, '?' for help.", record.name()),
            None => "No character loaded. Try ':new <name>' or ':open <file>'.".to_string(),
        };

        Self {
            session,
            theme: Theme::default(),
            focused_panel: FocusedPanel::default(),
            overlay: None,
            selected_item: 0,
            notes_scroll: 0,
            output_scroll: 0,
            output: Vec::new(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            input_history: VecDeque::with_capacity(HISTORY_LIMIT),
            history_index: None,
            saved_input: None,
            status_message: Some(greeting),
            should_quit: false,
        }
    }

    pub fn record(&self) -> Option<&CharacterRecord> {
        self.session.record()
    }

    fn item_count(&self) -> usize {
        self.record().map_or(0, |r| r.items().len())
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Run one line of the command language and show what it said.
    pub fn run_command(&mut self, line: &str) {
        let line = line.trim().trim_start_matches(':').trim();
        if line.is_empty() {
            return;
        }

        match self.session.run_line(line) {
            Ok(outcome) => {
                if outcome.quit {
                    self.should_quit = true;
                }
                match outcome.lines.first() {
                    Some(first) => {
                        self.set_status(first.clone());
                        self.output = outcome.lines;
                        self.output_scroll = 0;
                    }
                    None => self.clear_status(),
                }
            }
            Err(e) => {
                tracing::debug!(command = line, error = %e, "command failed");
                self.set_status(error_status(&e));
            }
        }
        self.clamp_selection();
    }

    /// Remove the highlighted item.
    pub fn remove_selected(&mut self) {
        if self.item_count() == 0 {
            self.set_status("Nothing to remove");
            return;
        }
        self.run_command(&format!("rm {}", self.selected_item + 1));
    }

    /// Toggle whether the highlighted item is equipped.
    pub fn toggle_selected_equipped(&mut self) {
        if self.item_count() == 0 {
            self.set_status("Nothing to equip");
            return;
        }
        self.run_command(&format!("equip {}", self.selected_item + 1));
    }

    /// Ask to quit. Refused while there are unsaved changes.
    pub fn request_quit(&mut self) {
        self.run_command("quit");
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selected_index(&self) -> Option<usize> {
        (self.item_count() > 0).then_some(self.selected_item)
    }

    pub fn selected_item(&self) -> Option<&Item> {
        let index = self.selected_index()?;
        self.record()?.items().get(index)
    }

    pub fn select_next(&mut self) {
        let count = self.item_count();
        if count > 0 {
            self.selected_item = (self.selected_item + 1).min(count - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_item = self.selected_item.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_item = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_item = self.item_count().saturating_sub(1);
    }

    /// Keep the selection on an existing row after the list changes.
    fn clamp_selection(&mut self) {
        let count = self.item_count();
        if self.selected_item >= count {
            self.selected_item = count.saturating_sub(1);
        }
    }

    pub fn scroll_notes_down(&mut self) {
        self.notes_scroll = self.notes_scroll.saturating_add(1);
    }

    pub fn scroll_notes_up(&mut self) {
        self.notes_scroll = self.notes_scroll.saturating_sub(1);
    }

    pub fn scroll_output_down(&mut self) {
        self.output_scroll = self.output_scroll.saturating_add(1);
    }

    pub fn scroll_output_up(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    // =========================================================================
    // Input line
    // =========================================================================

    /// Enter command mode (starts with :)
    pub fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.input_buffer.clear();
        self.input_buffer.push(':');
        self.cursor_position = 1;
    }

    /// Enter command mode with text already typed after the colon.
    pub fn prefill_command(&mut self, text: &str) {
        self.enter_command_mode();
        self.input_buffer.push_str(text);
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Exit to normal mode
    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.clear_input();
        self.history_index = None;
        self.saved_input = None;
    }

    /// Submit current input
    pub fn submit_input(&mut self) -> Option<String> {
        if self.input_buffer.trim_start_matches(':').trim().is_empty() {
            return None;
        }

        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;

        if self.input_history.front() != Some(&input) {
            self.input_history.push_front(input.clone());
            if self.input_history.len() > HISTORY_LIMIT {
                self.input_history.pop_back();
            }
        }
        self.history_index = None;
        self.saved_input = None;

        Some(input)
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position) {
            self.input_buffer
                .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Navigate to previous input in history
    pub fn history_prev(&mut self) {
        if self.input_history.is_empty() {
            return;
        }

        // Save current input if we're just starting to browse history
        if self.history_index.is_none() {
            self.saved_input = Some(self.input_buffer.clone());
        }

        let new_index = match self.history_index {
            None => 0,
            Some(i) if i + 1 < self.input_history.len() => i + 1,
            Some(i) => i,
        };

        if let Some(entry) = self.input_history.get(new_index) {
            self.input_buffer = entry.clone();
            self.cursor_position = self.input_buffer.chars().count();
            self.history_index = Some(new_index);
        }
    }

    /// Navigate to next input in history
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.input_buffer = self.saved_input.take().unwrap_or_else(|| ":".to_string());
                self.cursor_position = self.input_buffer.chars().count();
                self.history_index = None;
            }
            Some(i) => {
                if let Some(entry) = self.input_history.get(i - 1) {
                    self.input_buffer = entry.clone();
                    self.cursor_position = self.input_buffer.chars().count();
                    self.history_index = Some(i - 1);
                }
            }
        }
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    // =========================================================================
    // Overlays and focus
    // =========================================================================

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    /// Show details of the highlighted item
    pub fn toggle_item_details(&mut self) {
        if matches!(self.overlay, Some(Overlay::ItemDetails)) {
            self.overlay = None;
        } else if self.selected_item().is_some() {
            self.overlay = Some(Overlay::ItemDetails);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Cycle to next focused panel
    pub fn cycle_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Inventory => FocusedPanel::Notes,
            FocusedPanel::Notes => FocusedPanel::Output,
            FocusedPanel::Output => FocusedPanel::Inventory,
        };
    }

    /// Cycle to previous focused panel
    pub fn cycle_focus_reverse(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Inventory => FocusedPanel::Output,
            FocusedPanel::Output => FocusedPanel::Notes,
            FocusedPanel::Notes => FocusedPanel::Inventory,
        };
    }

    // =========================================================================
    // Status line
    // =========================================================================

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }
}

fn error_status(error: &CommandError) -> String {
    match error {
        CommandError::UnsavedChanges => {
            "Unsaved changes. :save first, or add ! (:quit!, :new!, :open!) to discard.".to_string()
        }
        other => format!("Error: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabletop_core::SessionConfig;
    use tempfile::TempDir;

    fn app_with_items(items: &[&str]) -> (TempDir, App) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = SessionConfig::new().with_save_dir(temp_dir.path());
        let mut app = App::new(Session::new(&config).unwrap());
        app.run_command(":new Tester");
        for item in items {
            app.run_command(&format!("add \"{item}\""));
        }
        (temp_dir, app)
    }

    #[test]
    fn test_selection_is_clamped() {
        let (_dir, mut app) = app_with_items(&["Rope", "Torch", "Bedroll"]);
        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_index(), Some(2));

        app.remove_selected();
        assert_eq!(app.selected_index(), Some(1));
        assert_eq!(app.selected_item().map(|i| i.name.as_str()), Some("Torch"));

        app.select_first();
        app.select_prev();
        assert_eq!(app.selected_index(), Some(0));
    }

    #[test]
    fn test_toggle_selected_equipped() {
        let (_dir, mut app) = app_with_items(&["Shield"]);
        app.toggle_selected_equipped();
        assert!(app.selected_item().unwrap().equipped);
        assert_eq!(app.status_message(), Some("Equipped Shield"));
    }

    #[test]
    fn test_quit_refused_while_dirty() {
        let (_dir, mut app) = app_with_items(&["Rope"]);
        app.request_quit();
        assert!(!app.should_quit);
        assert!(app.status_message().unwrap().starts_with("Unsaved changes"));

        app.run_command(":save");
        app.request_quit();
        assert!(app.should_quit);
    }

    #[test]
    fn test_errors_go_to_status() {
        let (_dir, mut app) = app_with_items(&[]);
        app.run_command(":coin gp -5");
        assert!(app.status_message().unwrap().starts_with("Error: Not enough gold"));
    }

    #[test]
    fn test_input_editing_and_history() {
        let (_dir, mut app) = app_with_items(&[]);
        app.enter_command_mode();
        for c in "inv".chars() {
            app.type_char(c);
        }
        app.cursor_left();
        app.backspace();
        assert_eq!(app.input_buffer(), ":iv");
        app.cursor_end();
        assert_eq!(app.submit_input().as_deref(), Some(":iv"));

        app.enter_command_mode();
        app.history_prev();
        assert_eq!(app.input_buffer(), ":iv");
        app.history_next();
        assert_eq!(app.input_buffer(), ":");

        app.enter_command_mode();
        assert_eq!(app.submit_input(), None);
    }
}
