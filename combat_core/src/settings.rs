//! World and per-player settings stored as host dynamic properties

use crate::host::{EntityId, Host, PropertyValue, Rgb};

pub const ADDON_TOGGLE: &str = "addon_toggle";
pub const DEBUG_MODE: &str = "debug_mode";
pub const SHIELD_BREAK_SPECIAL: &str = "shieldBreakSpecial";
pub const SATURATION_HEALING: &str = "saturationHealing";

pub const EXCLUDE_PET_FROM_SWEEP: &str = "excludePetFromSweep";
pub const TIP_MESSAGE: &str = "tipMessage";
pub const COOLDOWN_STYLE: &str = "cooldownStyle";
pub const SWEEP_RED: &str = "sweepR";
pub const SWEEP_GREEN: &str = "sweepG";
pub const SWEEP_BLUE: &str = "sweepB";

/// World-scoped switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSettings {
    pub addon_enabled: bool,
    pub debug_mode: bool,
    /// Shield disabling also requires a fully charged hit from players
    pub shield_break_special: bool,
    pub saturation_healing: bool,
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldSettings {
            addon_enabled: true,
            debug_mode: false,
            shield_break_special: false,
            saturation_healing: true,
        }
    }
}

impl WorldSettings {
    pub fn read(host: &dyn Host) -> Self {
        let defaults = WorldSettings::default();
        let flag = |key: &str, default: bool| {
            host.world_property(key)
                .and_then(|v| v.as_bool())
                .unwrap_or(default)
        };
        WorldSettings {
            addon_enabled: flag(ADDON_TOGGLE, defaults.addon_enabled),
            debug_mode: flag(DEBUG_MODE, defaults.debug_mode),
            shield_break_special: flag(SHIELD_BREAK_SPECIAL, defaults.shield_break_special),
            saturation_healing: flag(SATURATION_HEALING, defaults.saturation_healing),
        }
    }

    /// Write defaults for any world key that is missing
    pub fn initialize(host: &mut dyn Host) {
        let defaults = WorldSettings::default();
        for (key, value) in [
            (ADDON_TOGGLE, defaults.addon_enabled),
            (SHIELD_BREAK_SPECIAL, defaults.shield_break_special),
            (SATURATION_HEALING, defaults.saturation_healing),
        ] {
            if host.world_property(key).is_none() {
                host.set_world_property(key, PropertyValue::Bool(value));
            }
        }
    }
}

/// Per-player cosmetic toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerToggle {
    EnchantedHit,
    DamageIndicator,
    CriticalHit,
    Sweep,
    CritSound,
    BowHitSound,
}

impl PlayerToggle {
    pub const ALL: [PlayerToggle; 6] = [
        PlayerToggle::EnchantedHit,
        PlayerToggle::DamageIndicator,
        PlayerToggle::CriticalHit,
        PlayerToggle::Sweep,
        PlayerToggle::CritSound,
        PlayerToggle::BowHitSound,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PlayerToggle::EnchantedHit => "enchantedHit",
            PlayerToggle::DamageIndicator => "damageIndicator",
            PlayerToggle::CriticalHit => "criticalHit",
            PlayerToggle::Sweep => "sweep",
            PlayerToggle::CritSound => "critSound",
            PlayerToggle::BowHitSound => "bowHitSound",
        }
    }
}

/// How the attack cooldown is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CooldownStyle {
    #[default]
    Crosshair,
    Hotbar,
    Subtitle,
    None,
}

impl CooldownStyle {
    pub fn from_index(index: f64) -> Self {
        match index as i64 {
            1 => CooldownStyle::Hotbar,
            2 => CooldownStyle::Subtitle,
            3 => CooldownStyle::None,
            _ => CooldownStyle::Crosshair,
        }
    }

    /// Short code used in indicator title texts
    pub fn code(self) -> &'static str {
        match self {
            CooldownStyle::Crosshair => "crs",
            CooldownStyle::Hotbar => "htb",
            CooldownStyle::Subtitle => "sub",
            CooldownStyle::None => "non",
        }
    }
}

/// Settings of a single player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSettings {
    pub exclude_pet_from_sweep: bool,
    pub cooldown_style: CooldownStyle,
    /// Sweep particle color channels, 0..=255
    pub sweep_color: [f64; 3],
}

impl PlayerSettings {
    pub fn read(host: &dyn Host, player: EntityId) -> Self {
        let channel = |key: &str| {
            host.player_property(player, key)
                .and_then(|v| v.as_number())
                .unwrap_or(255.0)
        };
        PlayerSettings {
            exclude_pet_from_sweep: host
                .player_property(player, EXCLUDE_PET_FROM_SWEEP)
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            cooldown_style: host
                .player_property(player, COOLDOWN_STYLE)
                .and_then(|v| v.as_number())
                .map(CooldownStyle::from_index)
                .unwrap_or_default(),
            sweep_color: [channel(SWEEP_RED), channel(SWEEP_GREEN), channel(SWEEP_BLUE)],
        }
    }

    /// Sweep color scaled by a brightness factor
    pub fn sweep_rgb(&self, brightness: f64) -> Rgb {
        Rgb {
            red: self.sweep_color[0] / 255.0 * brightness,
            green: self.sweep_color[1] / 255.0 * brightness,
            blue: self.sweep_color[2] / 255.0 * brightness,
        }
    }

    /// Whether a toggle is switched on. Unset toggles count as off.
    pub fn enabled(host: &dyn Host, player: EntityId, toggle: PlayerToggle) -> bool {
        host.player_property(player, toggle.key())
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Whether the config tip should be shown. Unset counts as on.
    pub fn tip_message(host: &dyn Host, player: EntityId) -> bool {
        host.player_property(player, TIP_MESSAGE)
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    /// Switch on every unset boolean setting on a player's first spawn
    pub fn initialize(host: &mut dyn Host, player: EntityId) {
        let keys = [EXCLUDE_PET_FROM_SWEEP, TIP_MESSAGE]
            .into_iter()
            .chain(PlayerToggle::ALL.iter().map(|t| t.key()));
        for key in keys {
            if host.player_property(player, key).is_none() {
                host.set_player_property(player, key, PropertyValue::Bool(true));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimWorld;

    #[test]
    fn test_world_defaults_when_unset() {
        let world = SimWorld::new();
        let settings = WorldSettings::read(&world);
        assert_eq!(settings, WorldSettings::default());
        assert!(settings.addon_enabled);
        assert!(!settings.debug_mode);
    }

    #[test]
    fn test_initialize_keeps_existing_values() {
        let mut world = SimWorld::new();
        world.set_world_property(DEBUG_MODE, PropertyValue::Bool(true));
        WorldSettings::initialize(&mut world);

        let settings = WorldSettings::read(&world);
        assert!(settings.debug_mode);
        assert!(settings.saturation_healing);
    }

    #[test]
    fn test_player_initialize_enables_toggles() {
        let mut world = SimWorld::new();
        let player = EntityId(7);
        assert!(!PlayerSettings::enabled(&world, player, PlayerToggle::Sweep));

        PlayerSettings::initialize(&mut world, player);
        for toggle in PlayerToggle::ALL {
            assert!(PlayerSettings::enabled(&world, player, toggle));
        }
        assert!(PlayerSettings::read(&world, player).exclude_pet_from_sweep);
    }

    #[test]
    fn test_player_initialize_keeps_choices() {
        let mut world = SimWorld::new();
        let player = EntityId(7);
        world.set_player_property(player, "sweep", PropertyValue::Bool(false));

        PlayerSettings::initialize(&mut world, player);
        assert!(!PlayerSettings::enabled(&world, player, PlayerToggle::Sweep));
        assert!(PlayerSettings::enabled(&world, player, PlayerToggle::CritSound));
    }

    #[test]
    fn test_sweep_rgb_scaling() {
        let settings = PlayerSettings {
            exclude_pet_from_sweep: false,
            cooldown_style: CooldownStyle::Crosshair,
            sweep_color: [255.0, 0.0, 127.5],
        };
        let rgb = settings.sweep_rgb(0.5);
        assert!((rgb.red - 0.5).abs() < f64::EPSILON);
        assert!(rgb.green.abs() < f64::EPSILON);
        assert!((rgb.blue - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cooldown_style_from_index() {
        assert_eq!(CooldownStyle::from_index(0.0), CooldownStyle::Crosshair);
        assert_eq!(CooldownStyle::from_index(2.0), CooldownStyle::Subtitle);
        assert_eq!(CooldownStyle::from_index(9.0), CooldownStyle::Crosshair);
    }
}
