use serde::Deserialize;
use weapon_core::WeaponStats;

/// TOML layout of a weapon stat file
///
/// ```toml
/// [source]
/// name = "vanilla"
///
/// [[weapons]]
/// id = "minecraft:iron_sword"
/// attack_speed = 1.6
/// damage = 6
/// is_weapon = true
/// sweep = true
/// ```
#[derive(Debug, Deserialize)]
pub struct StatFileConfig {
    #[serde(default)]
    pub source: Option<SourceConfig>,
    #[serde(default)]
    pub weapons: Vec<WeaponStats>,
}

/// Metadata about where a stat file comes from
#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    pub name: String,
}

impl StatFileConfig {
    /// Validate every entry, reporting the first bad one
    pub fn validate(&self) -> Result<(), String> {
        self.weapons.iter().try_for_each(WeaponStats::validate)
    }
}
