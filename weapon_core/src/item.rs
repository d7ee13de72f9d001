use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::enchantment;

/// An item held or stored by an entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type id, e.g. "minecraft:diamond_sword"
    pub type_id: String,
    /// Enchantment id -> level
    #[serde(default)]
    pub enchantments: BTreeMap<String, u32>,
    /// Durability component, absent for unbreakable items
    #[serde(default)]
    pub durability: Option<Durability>,
    /// Lore lines shown under the item name
    #[serde(default)]
    pub lore: Vec<String>,
}

/// Wear state of a breakable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durability {
    /// Damage taken so far
    pub damage: u32,
    /// Damage at which the item breaks
    pub max: u32,
}

impl ItemStack {
    pub fn new(type_id: impl Into<String>) -> Self {
        ItemStack {
            type_id: type_id.into(),
            ..Default::default()
        }
    }

    pub fn with_enchantment(mut self, id: impl Into<String>, level: u32) -> Self {
        self.enchantments.insert(id.into(), level);
        self
    }

    pub fn with_durability(mut self, damage: u32, max: u32) -> Self {
        self.durability = Some(Durability { damage, max });
        self
    }

    /// Level of an enchantment, 0 when absent
    pub fn enchant_level(&self, id: &str) -> u32 {
        self.enchantments.get(id).copied().unwrap_or(0)
    }

    pub fn is(&self, type_id: &str) -> bool {
        self.type_id == type_id
    }
}

/// Enchantment level on an optional item (empty hand -> 0)
pub fn enchant_level(item: Option<&ItemStack>, id: &str) -> u32 {
    item.map_or(0, |i| i.enchant_level(id))
}

impl Durability {
    /// Percent chance (0-100) that a use consumes durability
    pub fn damage_chance(unbreaking: u32) -> f64 {
        100.0 / (unbreaking as f64 + 1.0)
    }

    /// Add wear, capped at max. Returns true if the item is now broken.
    pub fn wear(&mut self, amount: u32) -> bool {
        self.damage = (self.damage + amount).min(self.max);
        self.is_broken()
    }

    pub fn is_broken(&self) -> bool {
        self.damage >= self.max
    }
}

impl ItemStack {
    /// Unbreaking level, the only enchantment that changes wear
    pub fn unbreaking(&self) -> u32 {
        self.enchant_level(enchantment::UNBREAKING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enchant_level_missing_is_zero() {
        let item = ItemStack::new("minecraft:iron_sword").with_enchantment("sharpness", 3);
        assert_eq!(item.enchant_level("sharpness"), 3);
        assert_eq!(item.enchant_level("smite"), 0);
        assert_eq!(enchant_level(None, "sharpness"), 0);
    }

    #[test]
    fn test_damage_chance() {
        assert!((Durability::damage_chance(0) - 100.0).abs() < f64::EPSILON);
        assert!((Durability::damage_chance(1) - 50.0).abs() < f64::EPSILON);
        assert!((Durability::damage_chance(3) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wear_caps_at_max() {
        let mut d = Durability { damage: 249, max: 250 };
        assert!(d.wear(2));
        assert_eq!(d.damage, 250);

        let mut d = Durability { damage: 10, max: 250 };
        assert!(!d.wear(1));
        assert_eq!(d.damage, 11);
    }
}
