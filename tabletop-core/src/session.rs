//! Session - the single owner of the character being edited.
//!
//! Both front ends drive a [`Session`] through [`Command`]s. It remembers the
//! file the record belongs to and whether there are unsaved changes. A command
//! that fails leaves the record exactly as it was.

use crate::catalog;
use crate::character::{Ability, CharacterRecord};
use crate::command::{CoinChange, Command, CommandError, ItemField, RecordField, HELP};
use crate::item::Item;
use crate::library::CharacterLibrary;
use crate::persist::{self, PersistError};
use std::path::{Path, PathBuf};

/// Environment variable overriding the save directory.
pub const SAVE_DIR_ENV: &str = "TABLETOP_SAVE_DIR";

/// Environment variable overriding the log file location.
pub const LOG_FILE_ENV: &str = "TABLETOP_LOG_FILE";

const DEFAULT_SAVE_DIR_NAME: &str = "tabletop_inventory";

/// Where a session keeps its files.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory holding the character library.
    pub save_dir: PathBuf,

    /// Log file used while the TUI owns the terminal. Defaults to
    /// `tabletop.log` in the save directory.
    pub log_file: Option<PathBuf>,
}

impl SessionConfig {
    /// Defaults: `<home>/tabletop_inventory`, no explicit log file.
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            save_dir: home.join(DEFAULT_SAVE_DIR_NAME),
            log_file: None,
        }
    }

    /// Defaults overridden by `TABLETOP_SAVE_DIR` and `TABLETOP_LOG_FILE`.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Some(dir) = env_path(SAVE_DIR_ENV) {
            config.save_dir = dir;
        }
        if let Some(file) = env_path(LOG_FILE_ENV) {
            config.log_file = Some(file);
        }
        config
    }

    /// Set the save directory.
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }

    /// Set the log file.
    pub fn with_log_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.log_file = Some(file.into());
        self
    }

    /// The log file to use, falling back to one inside the save directory.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.save_dir.join("tabletop.log"))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// What a successful command has to say.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Lines to show the user.
    pub lines: Vec<String>,

    /// The user asked to leave.
    pub quit: bool,
}

impl Outcome {
    pub fn message(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            quit: false,
        }
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }

    fn quit() -> Self {
        Self {
            lines: vec!["Farewell.".to_string()],
            quit: true,
        }
    }
}

/// An editing session over at most one character.
#[derive(Debug)]
pub struct Session {
    library: CharacterLibrary,
    record: Option<CharacterRecord>,
    path: Option<PathBuf>,
    dirty: bool,
}

impl Session {
    /// Open the library in `config.save_dir` with no character loaded.
    pub fn new(config: &SessionConfig) -> Result<Self, PersistError> {
        Ok(Self {
            library: CharacterLibrary::open(&config.save_dir)?,
            record: None,
            path: None,
            dirty: false,
        })
    }

    pub fn library(&self) -> &CharacterLibrary {
        &self.library
    }

    pub fn record(&self) -> Option<&CharacterRecord> {
        self.record.as_ref()
    }

    /// The file the record was loaded from or last saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the record has changed since it was loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Parse and execute one line of input.
    pub fn run_line(&mut self, line: &str) -> Result<Outcome, CommandError> {
        let command = Command::parse(line)?;
        self.execute(command)
    }

    /// Replace the current record with a blank one.
    ///
    /// Refused with [`CommandError::UnsavedChanges`] while the current record
    /// has unsaved edits.
    pub fn new_character(&mut self, name: &str) -> Result<&CharacterRecord, CommandError> {
        self.check_saved(false)?;
        self.start_blank(name)
    }

    /// Load a character by library name or path.
    ///
    /// Refused with [`CommandError::UnsavedChanges`] while the current record
    /// has unsaved edits. A failed load keeps the current record.
    pub fn open(&mut self, reference: impl AsRef<Path>) -> Result<&CharacterRecord, CommandError> {
        self.check_saved(false)?;
        self.load_record(reference.as_ref())
    }

    fn start_blank(&mut self, name: &str) -> Result<&CharacterRecord, CommandError> {
        let record = CharacterRecord::create_blank(name)?;
        tracing::info!(character = %record.name(), "created character");
        self.path = None;
        self.dirty = true;
        Ok(&*self.record.insert(record))
    }

    fn load_record(&mut self, reference: &Path) -> Result<&CharacterRecord, CommandError> {
        let path = self.library.resolve(reference);
        let record = persist::load(&path)?;
        self.path = Some(path);
        self.dirty = false;
        Ok(&*self.record.insert(record))
    }

    /// Save the record, to `target` if given, else where it came from, else
    /// to the library. Returns the path written.
    pub fn save(&mut self, target: Option<&str>) -> Result<PathBuf, CommandError> {
        let record = self.record.as_ref().ok_or(CommandError::NoCharacter)?;
        let path = match (target, &self.path) {
            (Some(target), _) => self.library.resolve(Path::new(target)),
            (None, Some(path)) => path.clone(),
            (None, None) => self.library.path_for(record),
        };
        persist::save(record, &path)?;
        self.path = Some(path.clone());
        self.dirty = false;
        Ok(path)
    }

    /// Execute a parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, CommandError> {
        tracing::debug!(?command, "executing command");
        match command {
            Command::New { name, force } => {
                self.check_saved(force)?;
                let record = self.start_blank(&name)?;
                Ok(Outcome::message(format!(
                    "Created {}. Use 'save' to write it to the library.",
                    record.name()
                )))
            }
            Command::Open { reference, force } => {
                self.check_saved(force)?;
                let record = self.load_record(Path::new(&reference))?;
                Ok(Outcome::message(format!(
                    "Loaded {} ({} items).",
                    record.name(),
                    record.items().len()
                )))
            }
            Command::Save(target) => {
                let path = self.save(target.as_deref())?;
                Ok(Outcome::message(format!("Saved to {}", path.display())))
            }
            Command::List => self.list(),
            Command::Delete => self.delete(),
            Command::Show => Ok(Outcome::from_lines(sheet_lines(self.current()?))),
            Command::Inventory => Ok(Outcome::from_lines(inventory_lines(self.current()?))),
            Command::Add { name, fields } => {
                let mut item = catalog::find_item(&name).unwrap_or_else(|| Item::new(name));
                apply_item_fields(&mut item, fields);
                let summary = item.to_string();
                let count = self.mutate(|record| {
                    record.add_item(item)?;
                    Ok(record.items().len())
                })?;
                Ok(Outcome::message(format!("Added #{count}: {summary}")))
            }
            Command::Edit { number, fields } => {
                let index = self.item_index(number)?;
                let summary = self.mutate(|record| {
                    let mut item = record.item(index)?.clone();
                    apply_item_fields(&mut item, fields);
                    let summary = item.to_string();
                    record.replace_item(index, item)?;
                    Ok(summary)
                })?;
                Ok(Outcome::message(format!("Updated #{number}: {summary}")))
            }
            Command::Remove(number) => {
                let index = self.item_index(number)?;
                let item = self.mutate(|record| Ok(record.remove_item(index)?))?;
                Ok(Outcome::message(format!("Removed {}", item.name)))
            }
            Command::Equip(number) => {
                let index = self.item_index(number)?;
                let (name, equipped) = self.mutate(|record| {
                    let equipped = record.toggle_equipped(index)?;
                    Ok((record.item(index)?.name.clone(), equipped))
                })?;
                let state = if equipped { "Equipped" } else { "Unequipped" };
                Ok(Outcome::message(format!("{state} {name}")))
            }
            Command::Catalog(filter) => Ok(catalog_lines(filter.as_deref())),
            Command::Coin {
                denomination,
                change,
            } => {
                let amount = self.mutate(|record| match change {
                    CoinChange::Delta(delta) => Ok(record.adjust_currency(denomination, delta)?),
                    CoinChange::Set(amount) => {
                        record.set_currency(denomination, amount);
                        Ok(amount)
                    }
                })?;
                let purse = self.current()?.purse();
                Ok(Outcome::from_lines(vec![
                    format!("{}: {amount}", capitalize(denomination.name())),
                    purse.to_string(),
                ]))
            }
            Command::Note { section, text } => {
                if section.trim().is_empty() {
                    return Err(CommandError::Usage("note <section> <text>".to_string()));
                }
                self.mutate(|record| {
                    record.update_notes(section.trim(), text);
                    Ok(())
                })?;
                Ok(Outcome::message(format!("Updated notes: {}", section.trim())))
            }
            Command::Unnote(section) => {
                let record = self.current()?;
                if !record.notes().contains_key(&section) {
                    return Ok(Outcome::message(format!("No notes section '{section}'")));
                }
                self.mutate(|record| {
                    record.remove_note(&section);
                    Ok(())
                })?;
                Ok(Outcome::message(format!("Removed notes: {section}")))
            }
            Command::Set { field, value } => {
                let message = self.mutate(|record| set_field(record, field, &value))?;
                Ok(Outcome::message(message))
            }
            Command::Help => Ok(Outcome::from_lines(
                HELP.iter()
                    .map(|(usage, about)| format!("{usage:<28} {about}"))
                    .collect(),
            )),
            Command::Quit { force } => {
                self.check_saved(force)?;
                Ok(Outcome::quit())
            }
        }
    }

    /// Refuse to drop unsaved edits unless `force` is set.
    fn check_saved(&self, force: bool) -> Result<(), CommandError> {
        if self.dirty && !force {
            return Err(CommandError::UnsavedChanges);
        }
        Ok(())
    }

    fn current(&self) -> Result<&CharacterRecord, CommandError> {
        self.record.as_ref().ok_or(CommandError::NoCharacter)
    }

    /// Run `f` on the record, marking the session dirty when it succeeds.
    fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut CharacterRecord) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        let record = self.record.as_mut().ok_or(CommandError::NoCharacter)?;
        let result = f(record)?;
        self.dirty = true;
        Ok(result)
    }

    /// Convert a 1-based item number to an index.
    fn item_index(&self, number: usize) -> Result<usize, CommandError> {
        let count = self.current()?.items().len();
        if number == 0 || number > count {
            return Err(CommandError::NoSuchItem { number, count });
        }
        Ok(number - 1)
    }

    fn list(&self) -> Result<Outcome, CommandError> {
        let saves = self.library.list()?;
        if saves.is_empty() {
            return Ok(Outcome::message(format!(
                "No saved characters in {}",
                self.library.dir().display()
            )));
        }
        let lines = saves
            .iter()
            .map(|save| {
                let meta = &save.metadata;
                let file = save
                    .path
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!(
                    "{} - Level {} {} ({}) - {} items - {file}",
                    meta.name, meta.level, meta.class, meta.game_system, meta.item_count
                )
            })
            .collect();
        Ok(Outcome::from_lines(lines))
    }

    /// Delete the record's file and close it.
    fn delete(&mut self) -> Result<Outcome, CommandError> {
        let record = self.current()?;
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| self.library.path_for(record));
        let name = record.name().to_string();
        let removed = self.library.remove(&path)?;

        self.record = None;
        self.path = None;
        self.dirty = false;

        if removed {
            Ok(Outcome::message(format!("Deleted {name} ({})", path.display())))
        } else {
            Ok(Outcome::message(format!("Closed {name}; it had no saved file.")))
        }
    }
}

fn apply_item_fields(item: &mut Item, fields: Vec<ItemField>) {
    for field in fields {
        match field {
            ItemField::Name(name) => item.name = name,
            ItemField::Quantity(quantity) => item.quantity = quantity,
            ItemField::Weight(weight) => item.unit_weight = weight,
            ItemField::Value(value) => item.unit_value = value,
            ItemField::Category(category) => item.category = category,
            ItemField::Rarity(rarity) => item.rarity = rarity,
            ItemField::Description(description) => item.description = description,
            ItemField::Equipped(equipped) => item.equipped = equipped,
            ItemField::Tags(tags) => item.tags = tags,
        }
    }
}

/// Apply `set <field> <value>`. Numbers are parsed before anything changes.
fn set_field(
    record: &mut CharacterRecord,
    field: RecordField,
    value: &str,
) -> Result<String, CommandError> {
    let value = value.trim();
    let number = || {
        value
            .parse::<i32>()
            .map_err(|_| CommandError::Usage(format!("'{value}' is not a whole number")))
    };

    match field {
        RecordField::Name => {
            record.rename(value)?;
            return Ok(format!("Name: {}", record.name()));
        }
        RecordField::Level => {
            record.identity.level = value
                .parse()
                .map_err(|_| CommandError::Usage(format!("'{value}' is not a level")))?;
        }
        RecordField::Class => record.identity.class = value.to_string(),
        RecordField::Race => record.identity.race = value.to_string(),
        RecordField::Alignment => record.identity.alignment = value.to_string(),
        RecordField::Deity => record.identity.deity = value.to_string(),
        RecordField::GameSystem => record.identity.game_system = value.to_string(),
        RecordField::Ability(ability) => record.abilities.set(ability, number()?),
        RecordField::Save(ability) => record.statistics.saving_throws.set(ability, number()?),
        RecordField::MaxHitPoints => record.statistics.max_hit_points = number()?,
        RecordField::HitPoints => record.statistics.current_hit_points = number()?,
        RecordField::TempHitPoints => record.statistics.temporary_hit_points = number()?,
        RecordField::ArmorClass => record.statistics.armor_class = number()?,
        RecordField::Initiative => record.statistics.initiative = number()?,
        RecordField::Speed => record.statistics.speed = number()?,
    }
    // Public fields bypass the record's own timestamp bump.
    record.updated_at = chrono::Utc::now();
    Ok(format!("{} set to {value}", field_label(field)))
}

fn field_label(field: RecordField) -> String {
    match field {
        RecordField::Name => "Name".to_string(),
        RecordField::Class => "Class".to_string(),
        RecordField::Level => "Level".to_string(),
        RecordField::Race => "Race".to_string(),
        RecordField::Alignment => "Alignment".to_string(),
        RecordField::Deity => "Deity".to_string(),
        RecordField::GameSystem => "Game system".to_string(),
        RecordField::Ability(ability) => ability.name().to_string(),
        RecordField::Save(ability) => format!("{} save", ability.name()),
        RecordField::MaxHitPoints => "Max HP".to_string(),
        RecordField::HitPoints => "HP".to_string(),
        RecordField::TempHitPoints => "Temp HP".to_string(),
        RecordField::ArmorClass => "AC".to_string(),
        RecordField::Initiative => "Initiative".to_string(),
        RecordField::Speed => "Speed".to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn signed(n: i32) -> String {
    if n >= 0 {
        format!("+{n}")
    } else {
        n.to_string()
    }
}

/// The character sheet as text.
pub fn sheet_lines(record: &CharacterRecord) -> Vec<String> {
    let identity = &record.identity;
    let stats = &record.statistics;
    let mut lines = vec![
        format!(
            "{} - Level {} {} {}",
            record.name(),
            identity.level,
            identity.race,
            identity.class
        ),
        format!(
            "System: {}  Alignment: {}  Deity: {}",
            identity.game_system, identity.alignment, identity.deity
        ),
        format!(
            "HP: {}/{} (+{} temp)  AC: {}  Init: {}  Speed: {}",
            stats.current_hit_points,
            stats.max_hit_points,
            stats.temporary_hit_points,
            stats.armor_class,
            signed(stats.initiative),
            stats.speed
        ),
    ];

    let abilities: Vec<String> = Ability::all()
        .iter()
        .map(|&a| {
            format!(
                "{} {} ({})",
                a.abbreviation(),
                record.abilities.get(a),
                signed(record.abilities.modifier(a))
            )
        })
        .collect();
    lines.push(abilities.join("  "));

    let saves: Vec<String> = Ability::all()
        .iter()
        .map(|&a| format!("{} {}", a.abbreviation(), signed(stats.saving_throws.get(a))))
        .collect();
    lines.push(format!("Saves: {}", saves.join("  ")));

    lines.push(record.purse().to_string());
    lines.push(format!(
        "Carrying {} items, {:.1} lb, worth {:.2} gp in total",
        record.item_count(),
        record.total_weight(),
        record.total_value()
    ));

    for (section, text) in record.notes() {
        lines.push(format!("[{section}] {text}"));
    }
    lines
}

/// The numbered inventory as text.
pub fn inventory_lines(record: &CharacterRecord) -> Vec<String> {
    if record.items().is_empty() {
        return vec!["Inventory is empty.".to_string()];
    }
    let mut lines: Vec<String> = record
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{:>3}. {item}", i + 1))
        .collect();
    lines.push(format!(
        "Total weight: {:.1} lb  Total value: {:.2} gp",
        record.total_weight(),
        record.total_value()
    ));
    lines
}

fn catalog_lines(filter: Option<&str>) -> Outcome {
    let filter = filter.map(str::to_lowercase);
    let lines: Vec<String> = catalog::all()
        .iter()
        .filter(|entry| match &filter {
            Some(f) => entry.name.to_lowercase().contains(f.as_str()),
            None => true,
        })
        .map(|entry| {
            format!(
                "{:<20} {:<10} {:>5.1} lb {:>8.2} gp",
                entry.name,
                entry.category.name(),
                entry.unit_weight, entry.unit_value
            )
        })
        .collect();
    if lines.is_empty() {
        return Outcome::message("No catalog items match.");
    }
    Outcome::from_lines(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::testing::sample_fighter;
    use tempfile::TempDir;

    fn session() -> (TempDir, Session) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = SessionConfig::new().with_save_dir(temp_dir.path());
        let session = Session::new(&config).unwrap();
        (temp_dir, session)
    }

    fn with_fighter(session: &mut Session) {
        let path = session.library().save(&sample_fighter("Thorin")).unwrap();
        session.open(&path).unwrap();
    }

    #[test]
    fn test_commands_need_a_character() {
        let (_dir, mut session) = session();
        assert!(matches!(session.run_line("inv"), Err(CommandError::NoCharacter)));
        assert!(matches!(session.run_line("coin gp 5"), Err(CommandError::NoCharacter)));
        assert!(matches!(session.run_line("save"), Err(CommandError::NoCharacter)));
        assert!(session.run_line("help").is_ok());
        assert!(session.run_line("catalog").is_ok());
    }

    #[test]
    fn test_new_add_save_and_reopen() {
        let (_dir, mut session) = session();
        session.run_line("new Mira").unwrap();
        assert!(session.is_dirty());

        session
            .run_line(r#"add "Bag of Holding" weight=15 value=500 rarity=uncommon"#)
            .unwrap();
        session.run_line("add Torch qty=5").unwrap();
        session.run_line("coin gp +12").unwrap();

        let outcome = session.run_line("save").unwrap();
        assert!(outcome.lines[0].starts_with("Saved to"));
        assert!(!session.is_dirty());

        let path = session.path().unwrap().to_path_buf();
        let record = session.record().unwrap().clone();
        session.run_line("new Other").unwrap();
        session
            .run_line(&format!("open! \"{}\"", path.display()))
            .unwrap();
        assert_eq!(session.record(), Some(&record));
        assert!(!session.is_dirty());

        let torch = &record.items()[1];
        assert_eq!(torch.name, "Torch");
        assert_eq!(torch.quantity, 5);
        assert_eq!(torch.unit_weight, 1.0);
    }

    #[test]
    fn test_failed_commands_leave_record_unchanged() {
        let (_dir, mut session) = session();
        with_fighter(&mut session);
        let before = session.record().unwrap().clone();

        assert!(matches!(
            session.run_line("coin gp -1000"),
            Err(CommandError::Validation(ValidationError::InsufficientFunds { .. }))
        ));
        assert!(matches!(
            session.run_line("rm 9"),
            Err(CommandError::NoSuchItem { number: 9, count: 4 })
        ));
        assert!(matches!(
            session.run_line("edit 1 weight=-3"),
            Err(CommandError::Validation(ValidationError::InvalidNumber { .. }))
        ));
        assert!(matches!(
            session.run_line("add Ghost name=\"\""),
            Err(CommandError::Validation(ValidationError::EmptyItemName))
        ));
        assert!(session.run_line("set str lots").is_err());
        assert!(session.run_line("set name \"\"").is_err());

        assert_eq!(session.record(), Some(&before));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_item_numbers_are_one_based() {
        let (_dir, mut session) = session();
        with_fighter(&mut session);

        let outcome = session.run_line("rm 1").unwrap();
        assert_eq!(outcome.lines, vec!["Removed Longsword"]);
        assert_eq!(session.record().unwrap().items()[0].name, "Chain Mail");

        session.run_line("equip 1").unwrap();
        assert!(!session.record().unwrap().items()[0].equipped);

        session.run_line("edit 2 qty=5 desc=\"Heals 2d4+2\"").unwrap();
        let potion = &session.record().unwrap().items()[1];
        assert_eq!(potion.quantity, 5);
        assert_eq!(potion.description, "Heals 2d4+2");
        assert!(session.is_dirty());
    }

    #[test]
    fn test_coin_and_set() {
        let (_dir, mut session) = session();
        with_fighter(&mut session);

        session.run_line("coin pp =3").unwrap();
        session.run_line("coin sp -2").unwrap();
        let purse = *session.record().unwrap().purse();
        assert_eq!(purse.platinum, 3);
        assert_eq!(purse.silver, 5);

        session.run_line("set level 4").unwrap();
        session.run_line("set dex 15").unwrap();
        session.run_line("set save_con 6").unwrap();
        session.run_line("set class Eldritch Knight").unwrap();
        let record = session.record().unwrap();
        assert_eq!(record.identity.level, 4);
        assert_eq!(record.abilities.dexterity, 15);
        assert_eq!(record.statistics.saving_throws.constitution, 6);
        assert_eq!(record.identity.class, "Eldritch Knight");
    }

    #[test]
    fn test_notes() {
        let (_dir, mut session) = session();
        with_fighter(&mut session);

        session.run_line(r#"note "Quest Log" Find the lost sword"#).unwrap();
        assert_eq!(
            session.record().unwrap().notes()["Quest Log"],
            "Find the lost sword"
        );

        session.run_line(r#"unnote "Quest Log""#).unwrap();
        assert!(!session.record().unwrap().notes().contains_key("Quest Log"));
    }

    #[test]
    fn test_quit_guards_unsaved_changes() {
        let (_dir, mut session) = session();
        assert!(session.run_line("quit").unwrap().quit);

        session.run_line("new Mira").unwrap();
        assert!(matches!(session.run_line("quit"), Err(CommandError::UnsavedChanges)));
        assert!(session.run_line("quit!").unwrap().quit);

        session.run_line("save").unwrap();
        assert!(session.run_line("quit").unwrap().quit);
    }

    #[test]
    fn test_new_and_open_guard_unsaved_changes() {
        let (_dir, mut session) = session();
        with_fighter(&mut session);
        session.run_line("new Mira").unwrap();
        session.run_line("add Rope").unwrap();

        assert!(matches!(session.run_line("new Kara"), Err(CommandError::UnsavedChanges)));
        assert!(matches!(session.new_character("Kara"), Err(CommandError::UnsavedChanges)));
        assert!(matches!(session.run_line("open Thorin"), Err(CommandError::UnsavedChanges)));
        assert!(matches!(session.open("Thorin"), Err(CommandError::UnsavedChanges)));
        assert_eq!(session.record().unwrap().name(), "Mira");
        assert_eq!(session.record().unwrap().items().len(), 1);
        assert!(session.is_dirty());

        // A forced open that fails still keeps the unsaved record
        assert!(matches!(session.run_line("open! nobody"), Err(CommandError::Persist(_))));
        assert_eq!(session.record().unwrap().name(), "Mira");
        assert!(session.is_dirty());

        session.run_line("new! Kara").unwrap();
        assert_eq!(session.record().unwrap().name(), "Kara");
        assert!(session.record().unwrap().items().is_empty());
    }

    #[test]
    fn test_show_with_extreme_ability_scores() {
        let (_dir, mut session) = session();
        session.run_line("new Mira").unwrap();
        session.run_line("set str -2147483648").unwrap();
        session.run_line("set dex 2147483647").unwrap();

        let sheet = session.run_line("show").unwrap();
        assert!(sheet
            .lines
            .iter()
            .any(|l| l.starts_with("STR -2147483648 (-1073741829)  DEX 2147483647 (+1073741818)")));
    }

    #[test]
    fn test_delete_closes_record() {
        let (_dir, mut session) = session();
        with_fighter(&mut session);
        let path = session.path().unwrap().to_path_buf();

        session.run_line("delete").unwrap();
        assert!(!path.exists());
        assert!(session.record().is_none());
        assert!(session.library().list().unwrap().is_empty());
    }

    #[test]
    fn test_save_as_named_file() {
        let (dir, mut session) = session();
        session.run_line("new Mira").unwrap();
        session.run_line("save backup").unwrap();
        assert_eq!(session.path(), Some(dir.path().join("backup.json").as_path()));
        assert!(dir.path().join("backup.json").exists());

        session.run_line("open backup").unwrap();
        assert_eq!(session.record().unwrap().name(), "Mira");
    }

    #[test]
    fn test_list_and_show() {
        let (_dir, mut session) = session();
        with_fighter(&mut session);

        let listing = session.run_line("list").unwrap();
        assert_eq!(listing.lines.len(), 1);
        assert!(listing.lines[0].starts_with("Thorin - Level 3 Fighter (D&D 5e) - 4 items"));

        let sheet = session.run_line("show").unwrap();
        assert_eq!(sheet.lines[0], "Thorin - Level 3 Human Fighter");
        assert!(sheet.lines.iter().any(|l| l == "[Backstory] A former soldier seeking redemption."));

        let inventory = session.run_line("inv").unwrap();
        assert!(inventory.lines[0].starts_with("  1. Longsword [E]"));
        assert!(inventory.lines.last().unwrap().starts_with("Total weight: 69.0 lb"));
    }

    #[test]
    fn test_config_builders() {
        let config = SessionConfig::new()
            .with_save_dir("/tmp/chars")
            .with_log_file("/tmp/chars.log");
        assert_eq!(config.save_dir, PathBuf::from("/tmp/chars"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/chars.log"));

        let default_log = SessionConfig::new().with_save_dir("/tmp/chars").log_path();
        assert_eq!(default_log, PathBuf::from("/tmp/chars/tabletop.log"));
        assert!(SessionConfig::new().save_dir.ends_with("tabletop_inventory"));
    }
}
