//! The character record: identity, statistics, inventory, purse and notes.
//!
//! Every mutating operation either succeeds completely or returns a
//! [`ValidationError`] and leaves the record as it was.

use crate::error::ValidationError;
use crate::item::Item;
use crate::purse::{Denomination, Purse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Game system given to new records and to older saves that never named one.
pub const DEFAULT_GAME_SYSTEM: &str = "Generic";

/// Free-text identity fields. The name lives on the record itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub class: String,
    pub level: u32,
    pub race: String,
    pub alignment: String,
    pub deity: String,
    pub game_system: String,
}

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }

    /// Accepts the full name or the three-letter abbreviation.
    pub fn parse(s: &str) -> Option<Ability> {
        let lower = s.to_lowercase();
        Ability::all()
            .into_iter()
            .find(|a| a.name().to_lowercase() == lower || a.abbreviation().to_lowercase() == lower)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Six named integers. Used both for ability scores and saving throw bonuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Standard d20 modifier for a score. Display helper only.
    ///
    /// Computed in 64 bits so extreme scores cannot overflow.
    pub fn modifier(&self, ability: Ability) -> i32 {
        ((self.get(ability) as i64 - 10).div_euclid(2)) as i32
    }
}

// ============================================================================
// Combat Statistics
// ============================================================================

/// User-entered combat numbers. Nothing here is derived from rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatStats {
    pub max_hit_points: i32,
    pub current_hit_points: i32,
    pub temporary_hit_points: i32,
    pub armor_class: i32,
    pub initiative: i32,
    pub speed: i32,
    pub saving_throws: AbilityScores,
}

impl CombatStats {
    /// Fraction of maximum HP remaining, clamped to 0..=1.
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hit_points <= 0 {
            return 0.0;
        }
        (self.current_hit_points as f32 / self.max_hit_points as f32).clamp(0.0, 1.0)
    }
}

// ============================================================================
// Character Record
// ============================================================================

/// The full persisted state of one character.
///
/// Field order is the on-disk key order. Records are only read back through
/// [`crate::persist::from_json`], which enforces the name and item rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterRecord {
    pub id: CharacterId,
    name: String,
    pub identity: Identity,
    pub abilities: AbilityScores,
    pub statistics: CombatStats,
    #[serde(rename = "inventory")]
    items: Vec<Item>,
    #[serde(rename = "currency")]
    purse: Purse,
    notes: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CharacterRecord {
    /// Create a record with every number zeroed and nothing carried.
    pub fn create_blank(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = validate_name(name.into())?;
        let now = Utc::now();
        Ok(Self {
            id: CharacterId::new(),
            name,
            identity: Identity {
                game_system: DEFAULT_GAME_SYSTEM.to_string(),
                ..Identity::default()
            },
            abilities: AbilityScores::default(),
            statistics: CombatStats::default(),
            items: Vec::new(),
            purse: Purse::default(),
            notes: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Assemble a record from already-validated parts (used by the loader).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: CharacterId,
        name: String,
        identity: Identity,
        abilities: AbilityScores,
        statistics: CombatStats,
        items: Vec<Item>,
        purse: Purse,
        notes: BTreeMap<String, String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            identity,
            abilities,
            statistics,
            items,
            purse,
            notes,
            created_at,
            updated_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = validate_name(name.into())?;
        self.touch();
        Ok(())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Result<&Item, ValidationError> {
        self.items.get(index).ok_or(ValidationError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn purse(&self) -> &Purse {
        &self.purse
    }

    pub fn notes(&self) -> &BTreeMap<String, String> {
        &self.notes
    }

    /// Append an item. Identically named items stay separate entries.
    pub fn add_item(&mut self, item: Item) -> Result<(), ValidationError> {
        item.validate()?;
        tracing::debug!(character = %self.name, item = %item.name, "adding item");
        self.items.push(item);
        self.touch();
        Ok(())
    }

    /// Remove and return the item at `index`.
    pub fn remove_item(&mut self, index: usize) -> Result<Item, ValidationError> {
        self.check_index(index)?;
        let item = self.items.remove(index);
        tracing::debug!(character = %self.name, item = %item.name, "removed item");
        self.touch();
        Ok(item)
    }

    /// Swap in an edited item, returning the previous one.
    pub fn replace_item(&mut self, index: usize, item: Item) -> Result<Item, ValidationError> {
        self.check_index(index)?;
        item.validate()?;
        let previous = std::mem::replace(&mut self.items[index], item);
        self.touch();
        Ok(previous)
    }

    /// Flip the equipped flag. Returns the new state.
    pub fn toggle_equipped(&mut self, index: usize) -> Result<bool, ValidationError> {
        self.check_index(index)?;
        let item = &mut self.items[index];
        item.equipped = !item.equipped;
        let equipped = item.equipped;
        self.touch();
        Ok(equipped)
    }

    pub fn equipped_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.equipped)
    }

    /// Total number of individual pieces carried.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| i.quantity as u64).sum()
    }

    pub fn total_weight(&self) -> f64 {
        self.items.iter().map(Item::total_weight).sum()
    }

    /// Items plus coins, in gold pieces.
    pub fn total_value(&self) -> f64 {
        self.items.iter().map(Item::total_value).sum::<f64>() + self.purse.total_value()
    }

    /// Add or spend coins. Returns the new count for that denomination.
    pub fn adjust_currency(
        &mut self,
        denomination: Denomination,
        delta: i64,
    ) -> Result<u32, ValidationError> {
        let amount = self.purse.adjust(denomination, delta)?;
        tracing::debug!(character = %self.name, %denomination, delta, amount, "adjusted currency");
        self.touch();
        Ok(amount)
    }

    pub fn set_currency(&mut self, denomination: Denomination, amount: u32) {
        self.purse.set(denomination, amount);
        self.touch();
    }

    /// Insert or replace a notes section.
    pub fn update_notes(&mut self, section: impl Into<String>, text: impl Into<String>) {
        self.notes.insert(section.into(), text.into());
        self.touch();
    }

    pub fn remove_note(&mut self, section: &str) -> Option<String> {
        let removed = self.notes.remove(section);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        if index >= self.items.len() {
            return Err(ValidationError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn validate_name(name: String) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}
