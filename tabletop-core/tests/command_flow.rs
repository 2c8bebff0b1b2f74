//! Scripted sessions through the command language.
//!
//! These drive `Session::run_line` the same way the headless front end does.

use tabletop_core::{CommandError, Session, SessionConfig, ValidationError};
use tempfile::TempDir;

fn new_session() -> (TempDir, Session) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = SessionConfig::new().with_save_dir(temp_dir.path().join("characters"));
    let session = Session::new(&config).expect("Failed to open session");
    (temp_dir, session)
}

fn run_all(session: &mut Session, lines: &[&str]) {
    for line in lines {
        if let Err(e) = session.run_line(line) {
            panic!("'{line}' failed: {e}");
        }
    }
}

// =============================================================================
// A full shopping trip
// =============================================================================

#[test]
fn test_outfitting_a_character() {
    let (_dir, mut session) = new_session();

    run_all(
        &mut session,
        &[
            "new \"Mira Stormborn\"",
            "set class Ranger",
            "set level 2",
            "set race Half-Elf",
            "coin gp =100",
            "add Longbow equipped=yes",
            "add \"Arrows (20)\" qty=2",
            "add Backpack",
            "add \"Lucky Coin\" value=0 rarity=uncommon desc=\"Found in a well\"",
            "coin gp -50",
            "note Allies \"The ferryman at Blackwater\"",
        ],
    );

    let record = session.record().expect("character should be loaded");
    assert_eq!(record.name(), "Mira Stormborn");
    assert_eq!(record.items().len(), 4);
    assert_eq!(record.item_count(), 5);
    assert_eq!(record.equipped_items().count(), 1);
    assert_eq!(record.purse().gold, 50);
    // Longbow 2 + arrows 2x1 + backpack 5
    assert_eq!(record.total_weight(), 9.0);
    // Longbow 50 + arrows 2x1 + backpack 2 + coins 50
    assert!((record.total_value() - 104.0).abs() < 1e-9);

    let saved = session.run_line("save").unwrap();
    assert!(saved.lines[0].contains("Mira_Stormborn-"));
    assert!(!session.is_dirty());

    let listing = session.run_line("list").unwrap();
    assert_eq!(listing.lines.len(), 1);
    assert!(listing.lines[0].starts_with("Mira Stormborn - Level 2 Ranger"));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_overspending_is_rejected() {
    let (_dir, mut session) = new_session();
    run_all(&mut session, &["new Pauper", "coin sp +3"]);

    let err = session.run_line("coin sp -4").unwrap_err();
    match err {
        CommandError::Validation(ValidationError::InsufficientFunds {
            available,
            requested,
            ..
        }) => {
            assert_eq!(available, 3);
            assert_eq!(requested, 4);
        }
        other => panic!("expected insufficient funds, got {other}"),
    }
    assert_eq!(session.record().unwrap().purse().silver, 3);
}

#[test]
fn test_opening_a_missing_file_keeps_current_character() {
    let (_dir, mut session) = new_session();
    run_all(&mut session, &["new Keeper", "add Rope"]);

    let err = session.run_line("open nobody").unwrap_err();
    assert!(matches!(err, CommandError::UnsavedChanges));

    let err = session.run_line("open! nobody").unwrap_err();
    assert!(matches!(err, CommandError::Persist(_)));
    assert_eq!(session.record().unwrap().name(), "Keeper");
    assert!(session.is_dirty());
}

#[test]
fn test_unknown_command_and_usage() {
    let (_dir, mut session) = new_session();
    assert!(matches!(
        session.run_line("fly"),
        Err(CommandError::UnknownCommand(_))
    ));
    assert!(matches!(
        session.run_line("coin gp"),
        Err(CommandError::Usage(_))
    ));

    let help = session.run_line("help").unwrap();
    assert!(help.lines.iter().any(|l| l.starts_with("coin")));
}
