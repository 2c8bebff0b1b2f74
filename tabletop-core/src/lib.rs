//! Character inventory tracking for tabletop role-playing games.
//!
//! This crate provides:
//! - Character records with items, a four-denomination purse and notes
//! - Lenient JSON loading and atomic saving
//! - A library of saved characters in one directory
//! - A small command language shared by the TUI and headless front ends
//!
//! # Quick Start
//!
//! ```no_run
//! use tabletop_core::{Session, SessionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::from_env();
//!     let mut session = Session::new(&config)?;
//!
//!     session.run_line("new Thorin")?;
//!     session.run_line("add Longsword equipped=yes")?;
//!     session.run_line("coin gp +25")?;
//!
//!     for line in session.run_line("inv")?.lines {
//!         println!("{line}");
//!     }
//!     session.run_line("save")?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod character;
pub mod command;
pub mod error;
pub mod item;
pub mod library;
pub mod persist;
pub mod purse;
pub mod session;
pub mod testing;

// Primary public API
pub use character::{Ability, AbilityScores, CharacterId, CharacterRecord, CombatStats, Identity};
pub use command::{Command, CommandError};
pub use error::ValidationError;
pub use item::{Item, ItemCategory, ItemId, Rarity};
pub use library::{CharacterLibrary, SaveInfo};
pub use persist::{ParseError, PersistError};
pub use purse::{Denomination, Purse};
pub use session::{Outcome, Session, SessionConfig};
