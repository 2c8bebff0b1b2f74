//! Standard adventuring gear.
//!
//! A fixed list of common items the front ends can add by name instead of
//! typing in weight and price by hand. Weights are in pounds, values in gold.

use crate::item::{Item, ItemCategory, Rarity};

/// Look up a standard item by name (case-insensitive).
///
/// Returns a fresh copy with its own id and a quantity of one.
pub fn find_item(name: &str) -> Option<Item> {
    let name_lower = name.trim().to_lowercase();
    STANDARD_ITEMS
        .iter()
        .find(|entry| entry.name.to_lowercase() == name_lower)
        .map(CatalogEntry::to_item)
}

/// Every catalog entry, in display order.
pub fn all() -> &'static [CatalogEntry] {
    &STANDARD_ITEMS
}

/// A template for a standard item.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub category: ItemCategory,
    pub unit_weight: f64,
    pub unit_value: f64,
    pub description: &'static str,
}

impl CatalogEntry {
    const fn new(
        name: &'static str,
        category: ItemCategory,
        unit_weight: f64,
        unit_value: f64,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            category,
            unit_weight,
            unit_value,
            description,
        }
    }

    pub fn to_item(&self) -> Item {
        Item::new(self.name)
            .with_category(self.category)
            .with_weight(self.unit_weight)
            .with_value(self.unit_value)
            .with_rarity(Rarity::Common)
            .with_description(self.description)
    }
}

lazy_static::lazy_static! {
    static ref STANDARD_ITEMS: Vec<CatalogEntry> = {
        use ItemCategory::*;
        vec![
            // Weapons
            CatalogEntry::new("Club", Weapon, 2.0, 0.1, ""),
            CatalogEntry::new("Dagger", Weapon, 1.0, 2.0, "Finesse, light, thrown (20/60)."),
            CatalogEntry::new("Handaxe", Weapon, 2.0, 5.0, "Light, thrown (20/60)."),
            CatalogEntry::new("Quarterstaff", Weapon, 4.0, 0.2, "Versatile."),
            CatalogEntry::new("Spear", Weapon, 3.0, 1.0, "Thrown (20/60), versatile."),
            CatalogEntry::new("Longsword", Weapon, 3.0, 15.0, "Versatile."),
            CatalogEntry::new("Rapier", Weapon, 2.0, 25.0, "Finesse."),
            CatalogEntry::new("Shortsword", Weapon, 2.0, 10.0, "Finesse, light."),
            CatalogEntry::new("Greataxe", Weapon, 7.0, 30.0, "Heavy, two-handed."),
            CatalogEntry::new("Shortbow", Weapon, 2.0, 25.0, "Ammunition (80/320), two-handed."),
            CatalogEntry::new("Longbow", Weapon, 2.0, 50.0, "Ammunition (150/600), heavy, two-handed."),
            CatalogEntry::new("Light Crossbow", Weapon, 5.0, 25.0, "Ammunition (80/320), loading."),

            // Armor
            CatalogEntry::new("Leather Armor", Armor, 10.0, 10.0, "Light armor, AC 11 + Dex."),
            CatalogEntry::new("Studded Leather", Armor, 13.0, 45.0, "Light armor, AC 12 + Dex."),
            CatalogEntry::new("Chain Shirt", Armor, 20.0, 50.0, "Medium armor, AC 13 + Dex (max 2)."),
            CatalogEntry::new("Scale Mail", Armor, 45.0, 50.0, "Medium armor, AC 14 + Dex (max 2)."),
            CatalogEntry::new("Chain Mail", Armor, 55.0, 75.0, "Heavy armor, AC 16."),
            CatalogEntry::new("Plate Armor", Armor, 65.0, 1500.0, "Heavy armor, AC 18."),
            CatalogEntry::new("Shield", Armor, 6.0, 10.0, "+2 AC when carried."),

            // Consumables
            CatalogEntry::new("Potion of Healing", Consumable, 0.5, 50.0, "Regain 2d4 + 2 hit points."),
            CatalogEntry::new("Antitoxin", Consumable, 0.0, 50.0, "Advantage on saves against poison for 1 hour."),
            CatalogEntry::new("Rations (1 day)", Consumable, 2.0, 0.5, "Trail rations for one day."),
            CatalogEntry::new("Oil Flask", Consumable, 1.0, 0.1, "Lamp oil or an improvised fire weapon."),
            CatalogEntry::new("Arrows (20)", Consumable, 1.0, 1.0, "A quiver of 20 arrows."),
            CatalogEntry::new("Bolts (20)", Consumable, 1.5, 1.0, "A case of 20 crossbow bolts."),
            CatalogEntry::new("Torch", Consumable, 1.0, 0.01, "Bright light for 20 feet. Burns for 1 hour."),

            // Tools
            CatalogEntry::new("Thieves' Tools", Tool, 1.0, 25.0, "For picking locks and disarming traps."),
            CatalogEntry::new("Crowbar", Tool, 5.0, 2.0, "Advantage on Strength checks to pry things open."),
            CatalogEntry::new("Healer's Kit", Tool, 3.0, 5.0, "Ten uses. Stabilize a creature at 0 hit points."),
            CatalogEntry::new("Tinderbox", Tool, 1.0, 0.5, "Used to light fires."),
            CatalogEntry::new("Rope (50 feet)", Tool, 10.0, 1.0, "Hemp rope."),
            CatalogEntry::new("Grappling Hook", Tool, 4.0, 2.0, ""),

            // Everything else
            CatalogEntry::new("Backpack", Misc, 5.0, 2.0, "A leather pack for carrying gear."),
            CatalogEntry::new("Bedroll", Misc, 7.0, 1.0, ""),
            CatalogEntry::new("Waterskin", Misc, 5.0, 0.2, "Holds 4 pints of liquid."),
            CatalogEntry::new("Lantern", Misc, 2.0, 5.0, "Bright light in a 30-foot radius."),
            CatalogEntry::new("Holy Symbol", Misc, 1.0, 5.0, "A divine spellcasting focus."),
            CatalogEntry::new("Arcane Focus", Misc, 1.0, 10.0, "An orb, crystal or wand used as a spellcasting focus."),
            CatalogEntry::new("Component Pouch", Misc, 2.0, 25.0, "A small pouch of spell components."),
        ]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_item_case_insensitive() {
        let rope = find_item("rope (50 FEET)").unwrap();
        assert_eq!(rope.name, "Rope (50 feet)");
        assert_eq!(rope.category, ItemCategory::Tool);
        assert_eq!(rope.quantity, 1);
        assert_eq!(rope.unit_weight, 10.0);

        assert!(find_item("  Longsword ").is_some());
        assert!(find_item("Vorpal Sword").is_none());
    }

    #[test]
    fn test_items_get_fresh_ids() {
        let first = find_item("Torch").unwrap();
        let second = find_item("Torch").unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_catalog_entries_are_valid() {
        for entry in all() {
            assert!(entry.to_item().validate().is_ok(), "{} is invalid", entry.name);
        }
    }
}
