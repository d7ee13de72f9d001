//! Combat constants configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use super::ConfigError;

/// Charge percentage above which crits, sweeps and sprint knockback unlock
pub const SPECIAL_THRESHOLD_PERCENT: f64 = 84.8;

/// Global combat constants instance
static COMBAT_CONSTANTS: OnceLock<CombatConstants> = OnceLock::new();

/// Initialize the global combat constants from a TOML file
///
/// Returns error if already initialized or if loading fails.
pub fn init_constants(path: &Path) -> Result<(), ConfigError> {
    let constants = CombatConstants::load_from_path(path)?;
    constants.validate()?;
    COMBAT_CONSTANTS.set(constants).map_err(|_| {
        ConfigError::ValidationError("CombatConstants already initialized".to_string())
    })
}

/// Initialize the global combat constants with default values
pub fn init_constants_default() -> Result<(), ConfigError> {
    COMBAT_CONSTANTS.set(CombatConstants::default()).map_err(|_| {
        ConfigError::ValidationError("CombatConstants already initialized".to_string())
    })
}

/// Get a reference to the global combat constants
///
/// Falls back to defaults if nothing was initialized.
pub fn constants() -> &'static CombatConstants {
    COMBAT_CONSTANTS.get_or_init(CombatConstants::default)
}

/// Check if constants have been initialized
pub fn constants_initialized() -> bool {
    COMBAT_CONSTANTS.get().is_some()
}

/// Ensure constants are initialized with defaults (idempotent, useful for tests)
pub fn ensure_constants_initialized() {
    COMBAT_CONSTANTS.get_or_init(CombatConstants::default);
}

/// Tunable combat constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub iframes: IframeConstants,
    #[serde(default)]
    pub crit: CritConstants,
    #[serde(default)]
    pub knockback: KnockbackConstants,
    #[serde(default)]
    pub shield: ShieldConstants,
    #[serde(default)]
    pub sweep: SweepConstants,
    #[serde(default)]
    pub durability: DurabilityConstants,
}

impl CombatConstants {
    /// Load constants from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        super::load_toml(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep.radius <= 0.0 {
            return Err(ConfigError::ValidationError(
                "sweep.radius must be positive".to_string(),
            ));
        }
        if self.crit.multiplier < 0.0 {
            return Err(ConfigError::ValidationError(
                "crit.multiplier must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IframeConstants {
    /// Ticks after a hit during which weaker hits are ignored
    #[serde(default = "default_iframe_ticks")]
    pub ticks: u64,
}

impl Default for IframeConstants {
    fn default() -> Self {
        IframeConstants {
            ticks: default_iframe_ticks(),
        }
    }
}

fn default_iframe_ticks() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CritConstants {
    /// Damage multiplier of a critical hit (1.5 = 150%)
    #[serde(default = "default_crit_multiplier")]
    pub multiplier: f64,
}

impl Default for CritConstants {
    fn default() -> Self {
        CritConstants {
            multiplier: default_crit_multiplier(),
        }
    }
}

fn default_crit_multiplier() -> f64 {
    1.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnockbackConstants {
    /// Distance in blocks of an unenchanted hit
    #[serde(default = "default_regular_distance")]
    pub regular_distance: f64,
    /// Distance in blocks added per knockback level
    #[serde(default = "default_enchanted_distance")]
    pub enchanted_distance: f64,
    /// Flat distance added to enchanted knockback
    #[serde(default = "default_enchanted_base")]
    pub enchanted_base: f64,
    /// Apex height above the target for enchanted knockback
    #[serde(default = "default_enchanted_height")]
    pub enchanted_height: f64,
    /// Apex height above the target for regular knockback
    #[serde(default = "default_regular_height")]
    pub regular_height: f64,
}

impl Default for KnockbackConstants {
    fn default() -> Self {
        KnockbackConstants {
            regular_distance: default_regular_distance(),
            enchanted_distance: default_enchanted_distance(),
            enchanted_base: default_enchanted_base(),
            enchanted_height: default_enchanted_height(),
            regular_height: default_regular_height(),
        }
    }
}

fn default_regular_distance() -> f64 {
    1.552
}
fn default_enchanted_distance() -> f64 {
    2.586
}
fn default_enchanted_base() -> f64 {
    0.552
}
fn default_enchanted_height() -> f64 {
    1.0
}
fn default_regular_height() -> f64 {
    0.7955
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldConstants {
    /// Shield cooldown applied by a shield-disabling hit
    #[serde(default = "default_disable_ticks")]
    pub disable_ticks: u32,
    /// Radius around a blocking entity scanned for attackers in its view cone
    #[serde(default = "default_scan_radius")]
    pub scan_radius: f64,
}

impl Default for ShieldConstants {
    fn default() -> Self {
        ShieldConstants {
            disable_ticks: default_disable_ticks(),
            scan_radius: default_scan_radius(),
        }
    }
}

fn default_disable_ticks() -> u32 {
    100
}
fn default_scan_radius() -> f64 {
    64.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConstants {
    /// Radius around the attacker, and width of the box around the target
    #[serde(default = "default_sweep_radius")]
    pub radius: f64,
    /// Height of the box around the target
    #[serde(default = "default_sweep_height")]
    pub height: f64,
    /// Sweeping edge level used when a hook does not set one
    #[serde(default = "default_sweep_level")]
    pub level: f64,
}

impl Default for SweepConstants {
    fn default() -> Self {
        SweepConstants {
            radius: default_sweep_radius(),
            height: default_sweep_height(),
            level: default_sweep_level(),
        }
    }
}

fn default_sweep_radius() -> f64 {
    3.0
}
fn default_sweep_height() -> f64 {
    0.25
}
fn default_sweep_level() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurabilityConstants {
    /// Wear per hit for items flagged as weapons
    #[serde(default = "default_weapon_cost")]
    pub weapon_cost: u32,
    /// Wear per hit for everything else
    #[serde(default = "default_tool_cost")]
    pub tool_cost: u32,
    /// Exhaustion added to the attacker per landed hit
    #[serde(default = "default_exhaustion")]
    pub exhaustion_per_hit: f64,
}

impl Default for DurabilityConstants {
    fn default() -> Self {
        DurabilityConstants {
            weapon_cost: default_weapon_cost(),
            tool_cost: default_tool_cost(),
            exhaustion_per_hit: default_exhaustion(),
        }
    }
}

fn default_weapon_cost() -> u32 {
    1
}
fn default_tool_cost() -> u32 {
    2
}
fn default_exhaustion() -> f64 {
    0.1
}
