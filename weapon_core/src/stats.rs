//! Declarative weapon stat blocks

use serde::{Deserialize, Serialize};

/// Base damage used when a held item has no stat block
pub const DEFAULT_DAMAGE: f64 = 1.0;
/// Attack speed used when a held item has no stat block (bare hand)
pub const DEFAULT_ATTACK_SPEED: f64 = 4.0;

/// Per-weapon combat stats, keyed by the item type id
///
/// Field names accept both snake_case (stat files) and camelCase (the
/// cross-addon registration schema). Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Item type id, e.g. "minecraft:iron_sword"
    pub id: String,
    /// Attacks per second at full charge
    #[serde(alias = "attackSpeed")]
    pub attack_speed: f64,
    /// Base damage before the charge curve and modifiers
    pub damage: f64,
    /// Weapons lose 1 durability per hit, everything else 2
    #[serde(default, alias = "isWeapon")]
    pub is_weapon: bool,
    /// Fully charged grounded hits sweep nearby entities
    #[serde(default)]
    pub sweep: bool,
    /// Hits disable a raised shield
    #[serde(default, alias = "disableShield")]
    pub disable_shield: bool,
    /// Do not write the damage/speed lore line onto the item
    #[serde(default, alias = "skipLore")]
    pub skip_lore: bool,
    /// Knockback distance in blocks without knockback enchantment
    #[serde(default, alias = "regularKnockback")]
    pub regular_knockback: Option<f64>,
    /// Knockback distance in blocks per knockback level (enchant or sprint)
    #[serde(default, alias = "enchantedKnockback")]
    pub enchanted_knockback: Option<f64>,
    /// Name of the hook consulted before the attack lands
    #[serde(default, alias = "beforeEffect")]
    pub before_effect: Option<String>,
    /// Name of the hook notified after the attack resolved
    #[serde(default)]
    pub script: Option<String>,
}

impl WeaponStats {
    /// Create a stat block with no flags set
    pub fn new(id: impl Into<String>, attack_speed: f64, damage: f64) -> Self {
        WeaponStats {
            id: id.into(),
            attack_speed,
            damage,
            is_weapon: false,
            sweep: false,
            disable_shield: false,
            skip_lore: false,
            regular_knockback: None,
            enchanted_knockback: None,
            before_effect: None,
            script: None,
        }
    }

    pub fn weapon(mut self) -> Self {
        self.is_weapon = true;
        self
    }

    pub fn with_sweep(mut self) -> Self {
        self.sweep = true;
        self
    }

    pub fn with_disable_shield(mut self) -> Self {
        self.disable_shield = true;
        self
    }

    pub fn with_before_effect(mut self, hook: impl Into<String>) -> Self {
        self.before_effect = Some(hook.into());
        self
    }

    pub fn with_script(mut self, hook: impl Into<String>) -> Self {
        self.script = Some(hook.into());
        self
    }

    /// Base damage, treating zero or non-finite values as missing
    pub fn effective_damage(&self) -> f64 {
        if self.damage != 0.0 && self.damage.is_finite() {
            self.damage
        } else {
            DEFAULT_DAMAGE
        }
    }

    /// Attack speed, treating zero or non-finite values as missing
    pub fn effective_attack_speed(&self) -> f64 {
        if self.attack_speed != 0.0 && self.attack_speed.is_finite() {
            self.attack_speed
        } else {
            DEFAULT_ATTACK_SPEED
        }
    }

    /// Check the stat block for values that cannot be used
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("weapon id must not be empty".to_string());
        }
        if !self.attack_speed.is_finite() || self.attack_speed < 0.0 {
            return Err(format!(
                "{}: attack_speed must be a non-negative number",
                self.id
            ));
        }
        if !self.damage.is_finite() {
            return Err(format!("{}: damage must be a finite number", self.id));
        }
        Ok(())
    }
}

/// Base damage for an optional stat block
pub fn damage_or_default(stats: Option<&WeaponStats>) -> f64 {
    stats.map_or(DEFAULT_DAMAGE, WeaponStats::effective_damage)
}

/// Attack speed for an optional stat block
pub fn attack_speed_or_default(stats: Option<&WeaponStats>) -> f64 {
    stats.map_or(DEFAULT_ATTACK_SPEED, WeaponStats::effective_attack_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snake_case_toml() {
        let toml = r#"
id = "minecraft:iron_sword"
attack_speed = 1.6
damage = 6
is_weapon = true
sweep = true
"#;
        let stats: WeaponStats = toml::from_str(toml).unwrap();
        assert_eq!(stats.id, "minecraft:iron_sword");
        assert!((stats.attack_speed - 1.6).abs() < f64::EPSILON);
        assert!(stats.is_weapon);
        assert!(stats.sweep);
        assert!(!stats.disable_shield);
        assert_eq!(stats.regular_knockback, None);
    }

    #[test]
    fn test_parse_camel_case_json_ignores_unknown() {
        let json = r#"{
            "id": "tcc:battle_axe",
            "attackSpeed": 0.9,
            "damage": 9,
            "disableShield": true,
            "enchantedKnockback": 3.0,
            "beforeEffect": "heavy_swing",
            "somethingElse": 42
        }"#;
        let stats: WeaponStats = serde_json::from_str(json).unwrap();
        assert!(stats.disable_shield);
        assert_eq!(stats.enchanted_knockback, Some(3.0));
        assert_eq!(stats.before_effect.as_deref(), Some("heavy_swing"));
    }

    #[test]
    fn test_defaults_for_missing_stats() {
        assert!((damage_or_default(None) - 1.0).abs() < f64::EPSILON);
        assert!((attack_speed_or_default(None) - 4.0).abs() < f64::EPSILON);

        let zeroed = WeaponStats::new("x:stick", 0.0, 0.0);
        assert!((zeroed.effective_damage() - 1.0).abs() < f64::EPSILON);
        assert!((zeroed.effective_attack_speed() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate() {
        assert!(WeaponStats::new("a:b", 1.6, 6.0).validate().is_ok());
        assert!(WeaponStats::new("", 1.6, 6.0).validate().is_err());
        assert!(WeaponStats::new("a:b", -1.0, 6.0).validate().is_err());
        assert!(WeaponStats::new("a:b", 1.0, f64::NAN).validate().is_err());
    }
}
