//! TUI widgets for the inventory tracker

pub mod character_panel;
pub mod input;
pub mod inventory;
pub mod notes;
pub mod purse;
pub mod status_bar;

pub use character_panel::CharacterPanelWidget;
pub use input::InputWidget;
pub use inventory::InventoryWidget;
pub use notes::{NotesWidget, OutputWidget};
pub use purse::PurseWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};
