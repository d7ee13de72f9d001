use weapon_core::ids::{effect, enchantment, entity, family, DRY_OR_FROZEN_BIOMES};
use weapon_core::item::enchant_level;
use weapon_core::stats::{attack_speed_or_default, damage_or_default};
use weapon_core::{ItemStack, WeaponStats};

use crate::check::{cooldown_time, is_inanimate, Checker, CritCues, HitOptions, VEHICLE_EXEMPT};
use crate::config::constants;
use crate::host::{EntitySnapshot, Weather};

const FAMILY_ENCHANT_BONUS: f64 = 2.5;
const IMPALING_BONUS: f64 = 2.5;
const STRENGTH_BONUS: f64 = 3.0;
const WEAKNESS_PENALTY: f64 = 4.0;

/// Damage of a single hit
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageResult {
    /// Damage applied to the target
    pub final_damage: f64,
    /// Base damage times crit, compared for iframes
    pub raw: f64,
    /// An enchantment bonus applied to a living target
    pub enchanted_hit: bool,
}

/// Hook-provided adjustments to the damage formula
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageOverrides {
    pub damage: Option<f64>,
    pub crit_attack: Option<bool>,
    pub crit_multiplier: Option<f64>,
    pub cancel: bool,
}

/// Inputs of the damage formula
#[derive(Debug, Clone, Copy)]
pub struct DamageRequest<'a> {
    pub item: Option<&'a ItemStack>,
    pub stats: Option<&'a WeaponStats>,
    pub elapsed: f64,
    pub base_damage: f64,
    pub attack_speed: f64,
    pub overrides: DamageOverrides,
    /// Fixed cooldown window for damage tables; suppresses side effects
    pub probe_ticks: Option<f64>,
}

/// Vanilla charge-up curve, 0.2 at no charge up to 1.0 at full charge
pub fn charge_multiplier(elapsed: f64, cooldown_ticks: f64) -> f64 {
    let t = elapsed.min(cooldown_ticks);
    (0.2 + ((t + 0.5) / cooldown_ticks).powi(2) * 0.8).clamp(0.2, 1.0)
}

/// Share of the enchantment bonus that applies at this charge
pub fn enchant_scale(elapsed: f64, cooldown_ticks: f64) -> f64 {
    let t = elapsed.min(cooldown_ticks);
    ((t + 0.5) / cooldown_ticks).min(1.0)
}

/// Sharpness bonus: 1 at level I, then 0.5 per level + 0.5
pub fn sharpness_bonus(level: u32) -> f64 {
    match level {
        0 => 0.0,
        1 => 1.0,
        l => 0.5 * l as f64 + 0.5,
    }
}

impl Checker<'_> {
    /// Target is exposed to rain
    fn in_rain(&self, target: &EntitySnapshot) -> bool {
        if target.underground || self.host.weather(&target.dimension) == Weather::Clear {
            return false;
        }
        self.host
            .biome(target.id)
            .map_or(true, |biome| !DRY_OR_FROZEN_BIOMES.contains(&biome.as_str()))
    }

    fn enchant_bonus(&self, target: &EntitySnapshot, item: Option<&ItemStack>) -> f64 {
        let mut bonus = 0.0;
        for (target_family, enchant) in [
            (family::UNDEAD, enchantment::SMITE),
            (family::ARTHROPOD, enchantment::BANE_OF_ARTHROPODS),
        ] {
            if target.has_family(target_family) {
                bonus += enchant_level(item, enchant) as f64 * FAMILY_ENCHANT_BONUS;
            }
        }

        bonus += sharpness_bonus(enchant_level(item, enchantment::SHARPNESS));

        let impaling = enchant_level(item, enchantment::IMPALING);
        if impaling > 0 && (target.in_water || self.in_rain(target)) {
            bonus += impaling as f64 * IMPALING_BONUS;
        }
        bonus
    }

    /// Evaluate the damage formula without the final clamp
    pub fn calculate_damage(
        &mut self,
        attacker: &EntitySnapshot,
        target: &EntitySnapshot,
        request: &DamageRequest<'_>,
    ) -> DamageResult {
        let cooldown = request
            .probe_ticks
            .unwrap_or_else(|| cooldown_time(attacker, request.attack_speed).ticks);
        let probe = request.probe_ticks.is_some();
        let overrides = request.overrides;

        let crit_options = HitOptions {
            forced: overrides.crit_attack,
            ..HitOptions::probe()
        };
        let crit = if self.critical_hit(attacker, target, request.stats, crit_options, &CritCues::default())
            && !target.is_type(entity::ENDER_DRAGON)
        {
            overrides
                .crit_multiplier
                .unwrap_or(constants().crit.multiplier)
        } else {
            1.0
        };

        let multiplier = charge_multiplier(request.elapsed, cooldown);
        let bonus = self.enchant_bonus(target, request.item);

        if overrides.cancel {
            return DamageResult::default();
        }

        let enchanted_hit = bonus > 0.0 && !is_inanimate(target, VEHICLE_EXEMPT) && !probe;
        let enchant_damage = if bonus > 0.0 {
            bonus * enchant_scale(request.elapsed, cooldown)
        } else {
            0.0
        };

        let strength = attacker.effect_level(effect::STRENGTH) as f64 * STRENGTH_BONUS;
        let weakness = attacker.effect_level(effect::WEAKNESS) as f64 * WEAKNESS_PENALTY;
        if bonus > 0.0 && weakness > 0.0 && !probe {
            self.host.remove_effect(attacker.id, effect::WEAKNESS);
        }

        DamageResult {
            final_damage: (request.base_damage + strength - weakness) * crit * multiplier
                + enchant_damage,
            raw: request.base_damage * crit,
            enchanted_hit,
        }
    }

    /// Damage of the attacker's current swing, clamped at zero
    pub fn final_damage(
        &mut self,
        attacker: &EntitySnapshot,
        target: &EntitySnapshot,
        stats: Option<&WeaponStats>,
        overrides: DamageOverrides,
    ) -> DamageResult {
        let request = DamageRequest {
            item: attacker.mainhand.as_ref(),
            stats,
            elapsed: self.elapsed(attacker),
            base_damage: overrides.damage.unwrap_or_else(|| damage_or_default(stats)),
            attack_speed: attack_speed_or_default(stats),
            overrides,
            probe_ticks: None,
        };
        let result = self.calculate_damage(attacker, target, &request);
        DamageResult {
            final_damage: result.final_damage.max(0.0),
            raw: result.raw.max(0.0),
            enchanted_hit: result.enchanted_hit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::testing::Fixture;
    use crate::host::Host;
    use proptest::prelude::*;

    fn sword(damage: f64) -> WeaponStats {
        WeaponStats::new("minecraft:iron_sword", 1.6, damage).weapon()
    }

    #[test]
    fn test_charge_multiplier_bounds() {
        assert!((charge_multiplier(0.0, 12.5) - (0.2 + (0.5f64 / 12.5).powi(2) * 0.8)).abs() < 1e-12);
        assert!((charge_multiplier(12.5, 12.5) - 1.0).abs() < f64::EPSILON);
        assert!((charge_multiplier(400.0, 12.5) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sharpness_bonus() {
        assert_eq!(sharpness_bonus(0), 0.0);
        assert_eq!(sharpness_bonus(1), 1.0);
        assert_eq!(sharpness_bonus(2), 1.5);
        assert_eq!(sharpness_bonus(5), 3.0);
    }

    #[test]
    fn test_full_charge_plain_hit() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let stats = sword(6.0);
        let mut checker = fixture.checker();
        let result = checker.final_damage(&attacker, &target, Some(&stats), DamageOverrides::default());
        assert!((result.final_damage - 6.0).abs() < 1e-12);
        assert!((result.raw - 6.0).abs() < 1e-12);
        assert!(!result.enchanted_hit);
    }

    #[test]
    fn test_smite_on_undead() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let attacker = attacker.holding(ItemStack::new("minecraft:iron_sword").with_enchantment("smite", 2));
        let mut checker = fixture.checker();
        let result = checker.final_damage(&attacker, &target, Some(&sword(6.0)), DamageOverrides::default());
        assert!((result.final_damage - 11.0).abs() < 1e-12);
        assert!((result.raw - 6.0).abs() < 1e-12);
        assert!(result.enchanted_hit);
    }

    #[test]
    fn test_effects_and_weakness_removal() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let attacker = attacker
            .with_effect(effect::STRENGTH, 0)
            .with_effect(effect::WEAKNESS, 0)
            .holding(ItemStack::new("minecraft:iron_sword").with_enchantment("sharpness", 1));
        fixture.world.spawn(attacker.clone());

        let mut checker = fixture.checker();
        let result = checker.final_damage(&attacker, &target, Some(&sword(6.0)), DamageOverrides::default());
        // (6 + 3 - 4) + 1
        assert!((result.final_damage - 6.0).abs() < 1e-12);
        assert_eq!(fixture.world.entity(attacker.id).unwrap().effect_level(effect::WEAKNESS), 0);
    }

    #[test]
    fn test_crit_multiplier_and_dragon_exclusion() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let overrides = DamageOverrides {
            crit_attack: Some(true),
            crit_multiplier: Some(2.0),
            ..Default::default()
        };
        let mut checker = fixture.checker();
        let result = checker.final_damage(&attacker, &target, Some(&sword(6.0)), overrides);
        assert!((result.final_damage - 12.0).abs() < 1e-12);
        assert!((result.raw - 12.0).abs() < 1e-12);

        let dragon = EntitySnapshot::new(target.id, entity::ENDER_DRAGON);
        let result = checker.final_damage(&attacker, &dragon, Some(&sword(6.0)), overrides);
        assert!((result.final_damage - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_cancel_zeroes_damage() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let overrides = DamageOverrides {
            cancel: true,
            damage: Some(50.0),
            ..Default::default()
        };
        let mut checker = fixture.checker();
        let result = checker.final_damage(&attacker, &target, Some(&sword(6.0)), overrides);
        assert_eq!(result, DamageResult::default());
    }

    #[test]
    fn test_impaling_needs_water_or_rain() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let trident = WeaponStats::new("minecraft:trident", 1.1, 9.0).weapon();
        let attacker = attacker.holding(ItemStack::new("minecraft:trident").with_enchantment("impaling", 1));

        let mut checker = fixture.checker();
        let dry = checker.final_damage(&attacker, &target, Some(&trident), DamageOverrides::default());
        assert!((dry.final_damage - 9.0).abs() < 1e-12);

        fixture.world.set_weather(Weather::Rain);
        let mut checker = fixture.checker();
        let wet = checker.final_damage(&attacker, &target, Some(&trident), DamageOverrides::default());
        assert!((wet.final_damage - 11.5).abs() < 1e-12);

        fixture.world.set_biome(target.id, "minecraft:desert");
        let mut checker = fixture.checker();
        let desert = checker.final_damage(&attacker, &target, Some(&trident), DamageOverrides::default());
        assert!((desert.final_damage - 9.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_multiplier_matches_curve(t in 0.0f64..100.0, speed in 0.5f64..20.0) {
            let cooldown = 20.0 / speed;
            let m = charge_multiplier(t, cooldown);
            prop_assert!((0.2..=1.0).contains(&m));
            let expected = (0.2 + ((t.min(cooldown) + 0.5) / cooldown).powi(2) * 0.8).clamp(0.2, 1.0);
            prop_assert!((m - expected).abs() < 1e-12);
            if t >= cooldown {
                prop_assert!((m - 1.0).abs() < f64::EPSILON);
            }
        }

        #[test]
        fn prop_multiplier_is_monotonic(a in 0.0f64..30.0, b in 0.0f64..30.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(charge_multiplier(lo, 12.5) <= charge_multiplier(hi, 12.5));
        }
    }
}
