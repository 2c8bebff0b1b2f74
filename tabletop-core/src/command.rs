//! The textual command language shared by the TUI command line and headless
//! mode.
//!
//! A line is split into words on whitespace; `"..."` groups words (quotes may
//! start mid-word, so `desc="a long rope"` is one word). Items are numbered
//! from 1 as they appear in `inv`.

use crate::character::Ability;
use crate::error::ValidationError;
use crate::item::{ItemCategory, Rarity};
use crate::persist::PersistError;
use crate::purse::Denomination;
use thiserror::Error;

/// Errors from parsing or executing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(String),

    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    UnknownCommand(String),

    #[error("No character loaded. Use 'new <name>' or 'open <file>'.")]
    NoCharacter,

    #[error("No item #{number} (inventory holds {count})")]
    NoSuchItem { number: usize, count: usize },

    #[error("Unsaved changes. Use 'save' first, or add '!' (quit!, new!, open!) to discard them.")]
    UnsavedChanges,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// A field of an item that `add` and `edit` can set.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemField {
    Name(String),
    Quantity(u32),
    Weight(f64),
    Value(f64),
    Category(ItemCategory),
    Rarity(Rarity),
    Description(String),
    Equipped(bool),
    Tags(Vec<String>),
}

/// A field of the record that `set` can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Name,
    Class,
    Level,
    Race,
    Alignment,
    Deity,
    GameSystem,
    Ability(Ability),
    Save(Ability),
    MaxHitPoints,
    HitPoints,
    TempHitPoints,
    ArmorClass,
    Initiative,
    Speed,
}

impl RecordField {
    fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        if let Some(ability) = lower
            .strip_prefix("save_")
            .or_else(|| lower.strip_prefix("save."))
            .and_then(Ability::parse)
        {
            return Some(RecordField::Save(ability));
        }
        if let Some(ability) = Ability::parse(&lower) {
            return Some(RecordField::Ability(ability));
        }
        let field = match lower.as_str() {
            "name" => RecordField::Name,
            "class" => RecordField::Class,
            "level" => RecordField::Level,
            "race" => RecordField::Race,
            "alignment" => RecordField::Alignment,
            "deity" => RecordField::Deity,
            "system" | "game_system" => RecordField::GameSystem,
            "maxhp" | "max_hp" => RecordField::MaxHitPoints,
            "hp" => RecordField::HitPoints,
            "temphp" | "temp_hp" => RecordField::TempHitPoints,
            "ac" => RecordField::ArmorClass,
            "init" | "initiative" => RecordField::Initiative,
            "speed" => RecordField::Speed,
            _ => return None,
        };
        Some(field)
    }

    /// Whether the field holds free text rather than a number.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            RecordField::Name
                | RecordField::Class
                | RecordField::Race
                | RecordField::Alignment
                | RecordField::Deity
                | RecordField::GameSystem
        )
    }
}

/// How `coin` changes a denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinChange {
    /// Add (positive) or spend (negative) coins.
    Delta(i64),
    /// Replace the count outright.
    Set(u32),
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `new!` discards unsaved changes.
    New { name: String, force: bool },
    /// `open!` discards unsaved changes.
    Open { reference: String, force: bool },
    Save(Option<String>),
    List,
    Delete,
    Show,
    Inventory,
    Add { name: String, fields: Vec<ItemField> },
    Edit { number: usize, fields: Vec<ItemField> },
    Remove(usize),
    Equip(usize),
    Catalog(Option<String>),
    Coin { denomination: Denomination, change: CoinChange },
    Note { section: String, text: String },
    Unnote(String),
    Set { field: RecordField, value: String },
    Help,
    Quit { force: bool },
}

impl Command {
    /// Parse one line of input.
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let words = split_words(line)?;
        let Some((verb, args)) = words.split_first() else {
            return Err(CommandError::Usage("type a command, or 'help'".to_string()));
        };

        let command = match verb.to_lowercase().as_str() {
            "new" | "new!" => Command::New {
                name: rest(args, "new <name>")?,
                force: verb.ends_with('!'),
            },
            "open" | "load" | "open!" | "load!" => Command::Open {
                reference: rest(args, "open <file or name>")?,
                force: verb.ends_with('!'),
            },
            "save" => Command::Save(if args.is_empty() {
                None
            } else {
                Some(args.join(" "))
            }),
            "list" | "ls" => Command::List,
            "delete" => Command::Delete,
            "show" | "sheet" => Command::Show,
            "inv" | "inventory" | "i" => Command::Inventory,
            "add" => {
                let split = args.iter().position(|w| w.contains('=')).unwrap_or(args.len());
                let (name_words, field_words) = args.split_at(split);
                if name_words.is_empty() {
                    return Err(usage(ADD_USAGE));
                }
                Command::Add {
                    name: name_words.join(" "),
                    fields: item_fields(field_words)?,
                }
            }
            "edit" => {
                let (number, field_words) = args
                    .split_first()
                    .ok_or_else(|| usage("edit <n> key=value..."))?;
                if field_words.is_empty() {
                    return Err(usage("edit <n> key=value..."));
                }
                Command::Edit {
                    number: item_number(number)?,
                    fields: item_fields(field_words)?,
                }
            }
            "rm" | "remove" => Command::Remove(single_number(args, "rm <n>")?),
            "equip" | "unequip" => Command::Equip(single_number(args, "equip <n>")?),
            "catalog" => Command::Catalog(if args.is_empty() {
                None
            } else {
                Some(args.join(" "))
            }),
            "coin" | "coins" => {
                let [denomination, amount] = args else {
                    return Err(usage(COIN_USAGE));
                };
                let denomination: Denomination = denomination.parse().map_err(CommandError::Usage)?;
                Command::Coin {
                    denomination,
                    change: coin_change(amount)?,
                }
            }
            "note" => {
                let (section, text) = args
                    .split_first()
                    .ok_or_else(|| usage("note <section> <text>"))?;
                Command::Note {
                    section: section.clone(),
                    text: text.join(" "),
                }
            }
            "unnote" => Command::Unnote(rest(args, "unnote <section>")?),
            "set" => {
                let (field, value) = args
                    .split_first()
                    .ok_or_else(|| usage("set <field> <value>"))?;
                let field = RecordField::parse(field)
                    .ok_or_else(|| CommandError::Usage(format!("unknown field '{field}'")))?;
                if value.is_empty() && !field.is_text() {
                    return Err(usage("set <field> <value>"));
                }
                Command::Set {
                    field,
                    value: value.join(" "),
                }
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit { force: false },
            "quit!" | "q!" => Command::Quit { force: true },
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

const ADD_USAGE: &str =
    "add <name> [qty=N] [weight=W] [value=V] [cat=C] [rarity=R] [desc=TEXT] [tags=a,b]";
const COIN_USAGE: &str = "coin <pp|gp|sp|cp> <+N|-N|=N>";

/// One-line summaries shown by `help`.
pub const HELP: &[(&str, &str)] = &[
    ("new[!] <name>", "Start a blank character (new! discards unsaved changes)"),
    ("open[!] <file>", "Load a character file or library entry (open! discards unsaved changes)"),
    ("save [file]", "Save the character (to the library by default)"),
    ("list", "List characters in the library"),
    ("delete", "Delete the current character's saved file"),
    ("show", "Show the character sheet"),
    ("inv", "Show the inventory"),
    (ADD_USAGE, "Add an item (catalog items fill in defaults)"),
    ("edit <n> key=value...", "Change fields of item n"),
    ("rm <n>", "Remove item n"),
    ("equip <n>", "Toggle whether item n is equipped"),
    ("catalog [filter]", "List standard gear"),
    (COIN_USAGE, "Add, spend or set coins"),
    ("note <section> <text>", "Write a notes section"),
    ("unnote <section>", "Remove a notes section"),
    ("set <field> <value>", "Set name, class, level, str..cha, save_str, hp, ac, ..."),
    ("help", "Show this help"),
    ("quit", "Exit (quit! discards unsaved changes)"),
];

fn usage(text: &str) -> CommandError {
    CommandError::Usage(text.to_string())
}

fn rest(args: &[String], usage_text: &str) -> Result<String, CommandError> {
    if args.is_empty() {
        return Err(usage(usage_text));
    }
    Ok(args.join(" "))
}

fn single_number(args: &[String], usage_text: &str) -> Result<usize, CommandError> {
    match args {
        [number] => item_number(number),
        _ => Err(usage(usage_text)),
    }
}

fn item_number(word: &str) -> Result<usize, CommandError> {
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CommandError::Usage(format!(
            "'{word}' is not an item number (items start at 1)"
        ))),
    }
}

fn coin_change(word: &str) -> Result<CoinChange, CommandError> {
    let invalid = || CommandError::Usage(format!("'{word}' is not a coin amount. {COIN_USAGE}"));
    if let Some(n) = word.strip_prefix('=') {
        return n.parse().map(CoinChange::Set).map_err(|_| invalid());
    }
    let digits = word.strip_prefix('+').unwrap_or(word);
    digits.parse().map(CoinChange::Delta).map_err(|_| invalid())
}

fn item_fields(words: &[String]) -> Result<Vec<ItemField>, CommandError> {
    words.iter().map(|w| item_field(w)).collect()
}

fn item_field(word: &str) -> Result<ItemField, CommandError> {
    let (key, value) = word
        .split_once('=')
        .ok_or_else(|| CommandError::Usage(format!("expected key=value, got '{word}'")))?;
    let bad_value = |what: &str| CommandError::Usage(format!("{key}: '{value}' is not {what}"));

    let field = match key.to_lowercase().as_str() {
        "name" => ItemField::Name(value.to_string()),
        "qty" | "quantity" => {
            ItemField::Quantity(value.parse().map_err(|_| bad_value("a whole number"))?)
        }
        "weight" | "wt" => ItemField::Weight(value.parse().map_err(|_| bad_value("a number"))?),
        "value" | "price" => ItemField::Value(value.parse().map_err(|_| bad_value("a number"))?),
        "cat" | "category" => ItemField::Category(value.parse().map_err(CommandError::Usage)?),
        "rarity" => ItemField::Rarity(value.parse().map_err(CommandError::Usage)?),
        "desc" | "description" => ItemField::Description(value.to_string()),
        "equipped" => ItemField::Equipped(parse_bool(value).ok_or_else(|| bad_value("yes or no"))?),
        "tags" => ItemField::Tags(
            value
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect(),
        ),
        other => {
            return Err(CommandError::Usage(format!(
                "unknown item field '{other}' (name, qty, weight, value, cat, rarity, desc, equipped, tags)"
            )))
        }
    };
    Ok(field)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "on" => Some(true),
        "no" | "n" | "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Split on whitespace, keeping `"quoted text"` together.
fn split_words(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_word = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_quotes {
        return Err(usage("missing closing quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words_with_quotes() {
        assert_eq!(
            split_words(r#"note "Quest Log" find the "lost" sword"#).unwrap(),
            vec!["note", "Quest Log", "find", "the", "lost", "sword"]
        );
        assert_eq!(
            split_words(r#"add Rope desc="fifty feet of hemp""#).unwrap(),
            vec!["add", "Rope", "desc=fifty feet of hemp"]
        );
        assert_eq!(split_words(r#"note x """#).unwrap(), vec!["note", "x", ""]);
        assert!(split_words(r#"note "unterminated"#).is_err());
    }

    #[test]
    fn test_parse_add() {
        let command =
            Command::parse(r#"add Potion of Healing qty=2 weight=0.5 value=50 cat=consumable rarity="very rare""#)
                .unwrap();
        assert_eq!(
            command,
            Command::Add {
                name: "Potion of Healing".to_string(),
                fields: vec![
                    ItemField::Quantity(2),
                    ItemField::Weight(0.5),
                    ItemField::Value(50.0),
                    ItemField::Category(ItemCategory::Consumable),
                    ItemField::Rarity(Rarity::VeryRare),
                ],
            }
        );

        assert!(matches!(Command::parse("add"), Err(CommandError::Usage(_))));
        assert!(matches!(Command::parse("add Rope qty=lots"), Err(CommandError::Usage(_))));
        assert!(matches!(Command::parse("add Rope colour=red"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_parse_item_numbers_start_at_one() {
        assert_eq!(Command::parse("rm 3").unwrap(), Command::Remove(3));
        assert_eq!(Command::parse("equip 1").unwrap(), Command::Equip(1));
        assert!(matches!(Command::parse("rm 0"), Err(CommandError::Usage(_))));
        assert!(matches!(Command::parse("rm -1"), Err(CommandError::Usage(_))));
        assert!(matches!(Command::parse("rm"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_parse_edit() {
        assert_eq!(
            Command::parse("edit 2 qty=5 equipped=yes tags=magic,cursed").unwrap(),
            Command::Edit {
                number: 2,
                fields: vec![
                    ItemField::Quantity(5),
                    ItemField::Equipped(true),
                    ItemField::Tags(vec!["magic".to_string(), "cursed".to_string()]),
                ],
            }
        );
        assert!(Command::parse("edit 2").is_err());
    }

    #[test]
    fn test_parse_coin() {
        assert_eq!(
            Command::parse("coin gp +15").unwrap(),
            Command::Coin {
                denomination: Denomination::Gold,
                change: CoinChange::Delta(15)
            }
        );
        assert_eq!(
            Command::parse("coin silver -3").unwrap(),
            Command::Coin {
                denomination: Denomination::Silver,
                change: CoinChange::Delta(-3)
            }
        );
        assert_eq!(
            Command::parse("coin PP =2").unwrap(),
            Command::Coin {
                denomination: Denomination::Platinum,
                change: CoinChange::Set(2)
            }
        );
        assert!(Command::parse("coin ep 5").is_err());
        assert!(Command::parse("coin gp =-5").is_err());
        assert!(Command::parse("coin gp").is_err());
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            Command::parse("set str 16").unwrap(),
            Command::Set {
                field: RecordField::Ability(Ability::Strength),
                value: "16".to_string()
            }
        );
        assert_eq!(
            Command::parse("set save_wis 3").unwrap(),
            Command::Set {
                field: RecordField::Save(Ability::Wisdom),
                value: "3".to_string()
            }
        );
        assert_eq!(
            Command::parse("set class Eldritch Knight").unwrap(),
            Command::Set {
                field: RecordField::Class,
                value: "Eldritch Knight".to_string()
            }
        );
        assert!(Command::parse("set luck 3").is_err());
        assert!(Command::parse("set level").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(
            Command::parse(r#"note "Quest Log" Find the sword"#).unwrap(),
            Command::Note {
                section: "Quest Log".to_string(),
                text: "Find the sword".to_string()
            }
        );
        assert_eq!(Command::parse("save").unwrap(), Command::Save(None));
        assert_eq!(Command::parse("QUIT").unwrap(), Command::Quit { force: false });
        assert_eq!(Command::parse("q!").unwrap(), Command::Quit { force: true });
        assert_eq!(
            Command::parse("new! \"Mira Stormborn\"").unwrap(),
            Command::New {
                name: "Mira Stormborn".to_string(),
                force: true
            }
        );
        assert_eq!(
            Command::parse("open mira").unwrap(),
            Command::Open {
                reference: "mira".to_string(),
                force: false
            }
        );
        assert!(matches!(
            Command::parse("dance"),
            Err(CommandError::UnknownCommand(verb)) if verb == "dance"
        ));
        assert!(matches!(Command::parse("   "), Err(CommandError::Usage(_))));
    }
}
