//! UI module for the inventory TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;

pub use render::{FocusedPanel, Overlay};
