//! Four-denomination currency purse.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coin denominations, largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Denomination {
    Platinum,
    Gold,
    Silver,
    Copper,
}

impl Denomination {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Denomination::Platinum => "PP",
            Denomination::Gold => "GP",
            Denomination::Silver => "SP",
            Denomination::Copper => "CP",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Denomination::Platinum => "platinum",
            Denomination::Gold => "gold",
            Denomination::Silver => "silver",
            Denomination::Copper => "copper",
        }
    }

    /// Worth of one coin in copper pieces.
    pub fn copper_value(&self) -> u64 {
        match self {
            Denomination::Platinum => 1000,
            Denomination::Gold => 100,
            Denomination::Silver => 10,
            Denomination::Copper => 1,
        }
    }

    pub fn all() -> [Denomination; 4] {
        [
            Denomination::Platinum,
            Denomination::Gold,
            Denomination::Silver,
            Denomination::Copper,
        ]
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Denomination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pp" | "plat" | "platinum" => Ok(Denomination::Platinum),
            "gp" | "gold" => Ok(Denomination::Gold),
            "sp" | "silver" => Ok(Denomination::Silver),
            "cp" | "copper" => Ok(Denomination::Copper),
            _ => Err(format!("unknown denomination '{s}'")),
        }
    }
}

/// Coins held by a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Purse {
    pub platinum: u32,
    pub gold: u32,
    pub silver: u32,
    pub copper: u32,
}

impl Purse {
    pub fn new(platinum: u32, gold: u32, silver: u32, copper: u32) -> Self {
        Self {
            platinum,
            gold,
            silver,
            copper,
        }
    }

    pub fn get(&self, denomination: Denomination) -> u32 {
        match denomination {
            Denomination::Platinum => self.platinum,
            Denomination::Gold => self.gold,
            Denomination::Silver => self.silver,
            Denomination::Copper => self.copper,
        }
    }

    pub fn set(&mut self, denomination: Denomination, amount: u32) {
        match denomination {
            Denomination::Platinum => self.platinum = amount,
            Denomination::Gold => self.gold = amount,
            Denomination::Silver => self.silver = amount,
            Denomination::Copper => self.copper = amount,
        }
    }

    /// Add `delta` coins (negative to spend). Returns the new count.
    ///
    /// The purse is untouched when the result would be negative or overflow.
    pub fn adjust(&mut self, denomination: Denomination, delta: i64) -> Result<u32, ValidationError> {
        let available = self.get(denomination);
        let updated = (available as i64)
            .checked_add(delta)
            .ok_or(ValidationError::CurrencyOverflow { denomination })?;
        if updated < 0 {
            return Err(ValidationError::InsufficientFunds {
                denomination,
                available,
                requested: delta.unsigned_abs(),
            });
        }
        let updated = u32::try_from(updated)
            .map_err(|_| ValidationError::CurrencyOverflow { denomination })?;
        self.set(denomination, updated);
        Ok(updated)
    }

    /// Everything converted to copper pieces.
    pub fn total_copper(&self) -> u64 {
        Denomination::all()
            .iter()
            .map(|d| self.get(*d) as u64 * d.copper_value())
            .sum()
    }

    /// Everything converted to gold pieces.
    pub fn total_value(&self) -> f64 {
        self.total_copper() as f64 / 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.total_copper() == 0
    }
}

impl fmt::Display for Purse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PP: {}, GP: {}, SP: {}, CP: {}",
            self.platinum, self.gold, self.silver, self.copper
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_value_ratios() {
        assert_eq!(Purse::new(1, 0, 0, 0).total_value(), 10.0);
        assert_eq!(Purse::new(0, 1, 0, 0).total_value(), 1.0);
        assert_eq!(Purse::new(0, 0, 1, 0).total_value(), 0.1);
        assert_eq!(Purse::new(0, 0, 0, 1).total_value(), 0.01);
        assert_eq!(Purse::new(2, 3, 4, 5).total_copper(), 2345);
    }

    #[test]
    fn test_adjust_deposit_and_spend() {
        let mut purse = Purse::default();
        assert_eq!(purse.adjust(Denomination::Gold, 25), Ok(25));
        assert_eq!(purse.adjust(Denomination::Gold, -10), Ok(15));
        assert_eq!(purse.adjust(Denomination::Gold, -15), Ok(0));
        assert!(purse.is_empty());
    }

    #[test]
    fn test_overdraw_leaves_purse_untouched() {
        let mut purse = Purse::new(0, 5, 3, 0);
        let err = purse.adjust(Denomination::Silver, -4).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientFunds {
                denomination: Denomination::Silver,
                available: 3,
                requested: 4,
            }
        );
        assert_eq!(purse, Purse::new(0, 5, 3, 0));
    }

    #[test]
    fn test_overflow_rejected() {
        let mut purse = Purse::new(0, 0, 0, u32::MAX);
        assert_eq!(
            purse.adjust(Denomination::Copper, 1),
            Err(ValidationError::CurrencyOverflow {
                denomination: Denomination::Copper
            })
        );
        assert_eq!(purse.copper, u32::MAX);
    }

    #[test]
    fn test_denomination_parse() {
        assert_eq!("pp".parse::<Denomination>(), Ok(Denomination::Platinum));
        assert_eq!("Gold".parse::<Denomination>(), Ok(Denomination::Gold));
        assert_eq!("SP".parse::<Denomination>(), Ok(Denomination::Silver));
        assert!("electrum".parse::<Denomination>().is_err());
    }
}
