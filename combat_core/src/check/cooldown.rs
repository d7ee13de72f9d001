//! Attack cooldown and charge

use weapon_core::ids::effect;
use weapon_core::stats::attack_speed_or_default;
use weapon_core::WeaponStats;

use super::Checker;
use crate::config::SPECIAL_THRESHOLD_PERCENT;
use crate::host::EntitySnapshot;

const MIN_ATTACK_SPEED: f64 = 0.000_005;

/// Ticks until an attack is fully charged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownTime {
    /// With haste and mining fatigue applied
    pub ticks: f64,
    /// From the raw attack speed
    pub base_ticks: f64,
}

/// Cooldown of an attack at `attack_speed`, adjusted for the entity's effects
pub fn cooldown_time(entity: &EntitySnapshot, attack_speed: f64) -> CooldownTime {
    let haste = entity.effect_level(effect::HASTE) as f64;
    let fatigue = entity.effect_level(effect::MINING_FATIGUE) as f64;
    let adjusted = (attack_speed * (1.0 + haste * 0.1) * (1.0 - fatigue * 0.1)).max(MIN_ATTACK_SPEED);
    CooldownTime {
        ticks: 20.0 / adjusted,
        base_ticks: 20.0 / attack_speed,
    }
}

/// Charge fraction in [0, 1] from remaining and total cooldown ticks
///
/// A degenerate (zero) cooldown counts as fully charged.
pub fn attack_charge(max_ticks: f64, remaining_ticks: f64) -> f64 {
    let charge = (max_ticks - remaining_ticks) / max_ticks;
    if charge.is_nan() {
        1.0
    } else {
        charge.clamp(0.0, 1.0)
    }
}

/// Whether `elapsed` ticks clear the fully-charged threshold
pub fn special_valid_at(elapsed: f64, cooldown_ticks: f64) -> bool {
    elapsed / cooldown_ticks * 100.0 > SPECIAL_THRESHOLD_PERCENT
}

impl Checker<'_> {
    /// Attack charged past the special threshold
    pub fn special_valid(&self, attacker: &EntitySnapshot, stats: Option<&WeaponStats>) -> bool {
        let cooldown = cooldown_time(attacker, attack_speed_or_default(stats));
        special_valid_at(self.elapsed(attacker), cooldown.ticks)
    }

    /// Remaining cooldown ticks for the attacker's held weapon
    pub fn remaining_cooldown(&self, attacker: &EntitySnapshot, stats: Option<&WeaponStats>) -> f64 {
        let max = cooldown_time(attacker, attack_speed_or_default(stats)).ticks.round();
        let last = self.statuses.last_attack_time(attacker.id) as f64;
        (last + max - self.tick as f64).max(0.0)
    }
}
