//! Fixtures for tests and demos.
//!
//! Provides ready-made records so tests don't have to build every field by
//! hand.

use crate::character::{AbilityScores, CharacterRecord};
use crate::item::{Item, ItemCategory, Rarity};
use crate::purse::Denomination;

/// A plain item with the given stack size, unit weight and unit value.
pub fn sample_item(name: &str, quantity: u32, unit_weight: f64, unit_value: f64) -> Item {
    Item::new(name)
        .with_quantity(quantity)
        .with_weight(unit_weight)
        .with_value(unit_value)
}

/// A level 3 fighter carrying a few pieces of gear and some coin.
pub fn sample_fighter(name: &str) -> CharacterRecord {
    let mut character =
        CharacterRecord::create_blank(name).expect("sample name must not be empty");

    character.identity.class = "Fighter".to_string();
    character.identity.level = 3;
    character.identity.race = "Human".to_string();
    character.identity.alignment = "Lawful Good".to_string();
    character.identity.game_system = "D&D 5e".to_string();

    character.abilities = AbilityScores::new(16, 14, 14, 10, 12, 8);
    character.statistics.max_hit_points = 28;
    character.statistics.current_hit_points = 28;
    character.statistics.armor_class = 18;
    character.statistics.initiative = 2;
    character.statistics.speed = 30;
    character.statistics.saving_throws = AbilityScores::new(5, 2, 4, 0, 1, -1);

    let gear = [
        Item::new("Longsword")
            .with_category(ItemCategory::Weapon)
            .with_weight(3.0)
            .with_value(15.0)
            .equipped(),
        Item::new("Chain Mail")
            .with_category(ItemCategory::Armor)
            .with_weight(55.0)
            .with_value(75.0)
            .equipped(),
        Item::new("Potion of Healing")
            .with_category(ItemCategory::Consumable)
            .with_quantity(2)
            .with_weight(0.5)
            .with_value(50.0)
            .with_rarity(Rarity::Common),
        Item::new("Rope (50 feet)")
            .with_category(ItemCategory::Tool)
            .with_weight(10.0)
            .with_value(1.0),
    ];
    for item in gear {
        character
            .add_item(item)
            .expect("sample items are valid");
    }

    character
        .adjust_currency(Denomination::Gold, 42)
        .expect("deposit cannot fail");
    character
        .adjust_currency(Denomination::Silver, 7)
        .expect("deposit cannot fail");
    character.update_notes("Backstory", "A former soldier seeking redemption.");

    character
}
