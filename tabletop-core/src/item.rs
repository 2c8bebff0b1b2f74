//! Inventory items.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Broad grouping used for sorting and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Consumable,
    Tool,
    #[default]
    Misc,
}

impl ItemCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ItemCategory::Weapon => "Weapon",
            ItemCategory::Armor => "Armor",
            ItemCategory::Consumable => "Consumable",
            ItemCategory::Tool => "Tool",
            ItemCategory::Misc => "Misc",
        }
    }

    pub fn all() -> [ItemCategory; 5] {
        [
            ItemCategory::Weapon,
            ItemCategory::Armor,
            ItemCategory::Consumable,
            ItemCategory::Tool,
            ItemCategory::Misc,
        ]
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weapon" => Ok(ItemCategory::Weapon),
            "armor" | "armour" => Ok(ItemCategory::Armor),
            "consumable" | "potion" => Ok(ItemCategory::Consumable),
            "tool" => Ok(ItemCategory::Tool),
            "misc" | "other" => Ok(ItemCategory::Misc),
            _ => Err(format!("unknown category '{s}'")),
        }
    }
}

/// Rarity tag. Display-only; it has no effect on totals.
///
/// Upper-case aliases accept older save files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    #[serde(alias = "COMMON")]
    Common,
    #[serde(alias = "UNCOMMON")]
    Uncommon,
    #[serde(alias = "RARE")]
    Rare,
    #[serde(alias = "VERY_RARE")]
    VeryRare,
    #[serde(alias = "LEGENDARY")]
    Legendary,
    #[serde(alias = "ARTIFACT")]
    Artifact,
}

impl Rarity {
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::VeryRare => "Very Rare",
            Rarity::Legendary => "Legendary",
            Rarity::Artifact => "Artifact",
        }
    }

    pub fn all() -> [Rarity; 6] {
        [
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::VeryRare,
            Rarity::Legendary,
            Rarity::Artifact,
        ]
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "common" => Ok(Rarity::Common),
            "uncommon" => Ok(Rarity::Uncommon),
            "rare" => Ok(Rarity::Rare),
            "veryrare" => Ok(Rarity::VeryRare),
            "legendary" => Ok(Rarity::Legendary),
            "artifact" => Ok(Rarity::Artifact),
            _ => Err(format!("unknown rarity '{s}'")),
        }
    }
}

/// A single inventory entry.
///
/// Line totals (`quantity * unit_weight`, `quantity * unit_value`) are always
/// computed, never stored. Values are in gold pieces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: ItemCategory,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default, alias = "weight")]
    pub unit_weight: f64,
    #[serde(default, alias = "value")]
    pub unit_value: f64,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Item {
    /// Create a single common item with no weight or value.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: String::new(),
            category: ItemCategory::Misc,
            quantity: 1,
            unit_weight: 0.0,
            unit_value: 0.0,
            rarity: Rarity::Common,
            equipped: false,
            tags: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_weight(mut self, unit_weight: f64) -> Self {
        self.unit_weight = unit_weight;
        self
    }

    pub fn with_value(mut self, unit_value: f64) -> Self {
        self.unit_value = unit_value;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn equipped(mut self) -> Self {
        self.equipped = true;
        self
    }

    /// Check the item's fields are within their domains.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyItemName);
        }
        if !is_non_negative(self.unit_weight) {
            return Err(ValidationError::InvalidNumber {
                field: "unit_weight",
            });
        }
        if !is_non_negative(self.unit_value) {
            return Err(ValidationError::InvalidNumber {
                field: "unit_value",
            });
        }
        Ok(())
    }

    /// Weight of the whole stack.
    pub fn total_weight(&self) -> f64 {
        self.unit_weight * self.quantity as f64
    }

    /// Value of the whole stack, in gold pieces.
    pub fn total_value(&self) -> f64 {
        self.unit_value * self.quantity as f64
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let equipped = if self.equipped { " [E]" } else { "" };
        write!(
            f,
            "{}{} - Qty: {}, Value: {}, Weight: {}, Rarity: {}",
            self.name, equipped, self.quantity, self.unit_value, self.unit_weight, self.rarity
        )
    }
}

fn is_non_negative(n: f64) -> bool {
    n.is_finite() && n >= 0.0
}
