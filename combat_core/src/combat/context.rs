use weapon_core::{ItemStack, Vec3, WeaponStats};

use crate::check::{CritCues, SweepCues, SweepOptions};
use crate::damage::DamageOverrides;
use crate::host::{EntityId, EntitySnapshot, ParticleVariables};

/// What a before-attack hook sees
#[derive(Debug, Clone)]
pub struct BeforeAttackContext {
    pub attacker: EntitySnapshot,
    pub target: EntitySnapshot,
    pub item: Option<ItemStack>,
    /// Base damage of the held weapon
    pub damage: f64,
    pub special_check: bool,
    /// Entities a sweep would reach
    pub swept_entities: Vec<EntityId>,
    pub crit: bool,
    pub sprint_knockback: bool,
    /// Attack charge in [0, 1]
    pub cooldown: f64,
    /// The target is still invulnerable from its last hit
    pub iframes: bool,
    pub tick: u64,
}

/// Adjustments returned by a before-attack hook
///
/// Unset fields keep the computed value. `cancel` defaults to false.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackOverrides {
    /// Zero the attack's damage
    pub cancel: bool,
    /// Replaces the weapon's base damage
    pub damage: Option<f64>,
    pub crit_attack: Option<bool>,
    pub crit_multiplier: Option<f64>,
    pub sprint_knockback: Option<bool>,
    pub sweep: Option<bool>,
    pub sweep_level: Option<f64>,
    pub sweep_location: Option<Vec3>,
    pub sweep_radius: Option<f64>,
    pub cancel_durability: bool,
    pub regular_knockback: Option<f64>,
    pub enchanted_knockback: Option<f64>,
    pub crit_sound: Option<String>,
    pub crit_particle: Option<String>,
    pub crit_offset: Option<Vec3>,
    pub crit_variables: Option<ParticleVariables>,
    pub sweep_sound: Option<String>,
    pub sweep_particle: Option<String>,
    pub sweep_offset: Option<Vec3>,
    pub sweep_pitch: Option<f64>,
    pub sweep_volume: Option<f64>,
    pub sweep_variables: Option<ParticleVariables>,
}

impl AttackOverrides {
    pub fn damage_overrides(&self) -> DamageOverrides {
        DamageOverrides {
            damage: self.damage,
            crit_attack: self.crit_attack,
            crit_multiplier: self.crit_multiplier,
            cancel: self.cancel,
        }
    }

    pub fn crit_cues(&self) -> CritCues {
        let defaults = CritCues::default();
        CritCues {
            sound: self.crit_sound.clone().unwrap_or(defaults.sound),
            particle: self.crit_particle.clone().unwrap_or(defaults.particle),
            offset: self.crit_offset.unwrap_or(defaults.offset),
            variables: self.crit_variables.clone().unwrap_or(defaults.variables),
        }
    }

    pub fn sweep_cues(&self) -> SweepCues {
        let defaults = SweepCues::default();
        SweepCues {
            sound: self.sweep_sound.clone().unwrap_or(defaults.sound),
            particle: self.sweep_particle.clone().unwrap_or(defaults.particle),
            offset: self.sweep_offset.unwrap_or(defaults.offset),
            pitch: self.sweep_pitch.unwrap_or(defaults.pitch),
            volume: self.sweep_volume.unwrap_or(defaults.volume),
            variables: self.sweep_variables.clone(),
        }
    }

    pub fn sweep_options(&self, fire_aspect: u32, damage: f64) -> SweepOptions {
        let defaults = SweepOptions::default();
        SweepOptions {
            fire_aspect,
            damage: Some(damage),
            level: self.sweep_level.unwrap_or(defaults.level),
            forced: self.sweep,
            location: self.sweep_location,
            scale: self.sweep_radius.unwrap_or(defaults.scale),
        }
    }
}

/// Everything resolved about one attack before effects are applied
#[derive(Debug, Clone)]
pub struct AttackContext<'a> {
    pub attacker: &'a EntitySnapshot,
    pub target: &'a EntitySnapshot,
    pub item: Option<&'a ItemStack>,
    pub stats: Option<&'a WeaponStats>,
    pub tick: u64,
    /// Attack charge in [0, 1]
    pub charge: f64,
    pub overrides: AttackOverrides,
}
