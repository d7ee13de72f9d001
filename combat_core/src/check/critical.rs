use weapon_core::ids::{particle, sound};
use weapon_core::{Vec3, WeaponStats};

use super::{is_inanimate, Checker, HitOptions, ARMOR_STAND_EXEMPT};
use crate::host::{EntitySnapshot, ParticleVariables, SoundCue};
use crate::settings::PlayerToggle;

/// Cue overrides for a critical hit
#[derive(Debug, Clone, PartialEq)]
pub struct CritCues {
    pub sound: String,
    pub particle: String,
    pub offset: Vec3,
    pub variables: ParticleVariables,
}

impl Default for CritCues {
    fn default() -> Self {
        CritCues {
            sound: sound::CRIT.to_string(),
            particle: particle::CRIT.to_string(),
            offset: Vec3::ZERO,
            variables: ParticleVariables::default(),
        }
    }
}

impl Checker<'_> {
    /// Whether the hit is a critical hit; emits crit cues unless `no_effect`
    pub fn critical_hit(
        &mut self,
        attacker: &EntitySnapshot,
        target: &EntitySnapshot,
        stats: Option<&WeaponStats>,
        options: HitOptions,
        cues: &CritCues,
    ) -> bool {
        if is_inanimate(target, ARMOR_STAND_EXEMPT) {
            return false;
        }
        if options.damage.is_some_and(|d| d <= 0.0) {
            return false;
        }

        let valid = match options.forced {
            Some(forced) => forced,
            None => {
                attacker.is_airborne_for_crit()
                    && self.special_valid(attacker, stats)
                    && self.statuses.crit_sweep_valid(attacker.id)
                    && !self.shield_block(attacker, target, stats, false)
            }
        };

        if valid && !options.no_effect {
            let location = target.center() + Vec3::new(0.0, 1.0, 0.0);
            self.selective_particle(
                PlayerToggle::CriticalHit,
                &attacker.dimension,
                &cues.particle,
                location,
                cues.offset,
                cues.variables.clone(),
            );
            if !(target.is_player() && target.is_creative()) {
                self.selective_sound(
                    PlayerToggle::CritSound,
                    &attacker.dimension,
                    SoundCue::new(cues.sound.clone(), attacker.location),
                );
            }
        }
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::testing::Fixture;
    use crate::host::{EntityId, Host};

    fn falling(mut snapshot: EntitySnapshot) -> EntitySnapshot {
        snapshot.on_ground = false;
        snapshot.falling = true;
        snapshot
    }

    #[test]
    fn test_grounded_attacker_never_crits() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let mut checker = fixture.checker();
        assert!(!checker.critical_hit(&attacker, &target, None, HitOptions::probe(), &CritCues::default()));
    }

    #[test]
    fn test_falling_charged_attacker_crits() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let attacker = falling(attacker);
        let mut checker = fixture.checker();
        assert!(checker.critical_hit(&attacker, &target, None, HitOptions::probe(), &CritCues::default()));
    }

    #[test]
    fn test_uncharged_attacker_does_not_crit() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        fixture.statuses.get_or_create(attacker.id).last_attack_time = 99;
        let attacker = falling(attacker);
        let mut checker = fixture.checker();
        assert!(!checker.critical_hit(&attacker, &target, None, HitOptions::probe(), &CritCues::default()));
    }

    #[test]
    fn test_forced_pins_result() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let mut checker = fixture.checker();
        let forced_on = HitOptions {
            forced: Some(true),
            ..HitOptions::probe()
        };
        assert!(checker.critical_hit(&attacker, &target, None, forced_on, &CritCues::default()));

        let forced_off = HitOptions {
            forced: Some(false),
            ..HitOptions::probe()
        };
        let attacker = falling(attacker);
        assert!(!checker.critical_hit(&attacker, &target, None, forced_off, &CritCues::default()));
    }

    #[test]
    fn test_non_positive_damage_and_inanimate_targets() {
        let mut fixture = Fixture::new(100);
        let (attacker, _) = fixture.pair();
        let attacker = falling(attacker);
        let item = EntitySnapshot::new(EntityId(9), "minecraft:item");
        let stand = EntitySnapshot::new(EntityId(10), "minecraft:armor_stand").with_family("inanimate");
        fixture.world.spawn(item.clone());
        fixture.world.spawn(stand.clone());
        let target = fixture.world.entity(EntityId(2)).unwrap();

        let mut checker = fixture.checker();
        let zero = HitOptions {
            damage: Some(0.0),
            ..HitOptions::probe()
        };
        assert!(!checker.critical_hit(&attacker, &target, None, zero, &CritCues::default()));
        assert!(!checker.critical_hit(&attacker, &item, None, HitOptions::probe(), &CritCues::default()));
        assert!(checker.critical_hit(&attacker, &stand, None, HitOptions::probe(), &CritCues::default()));
    }

    #[test]
    fn test_effects_are_deferred() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let attacker = falling(attacker);
        let mut checker = fixture.checker();
        assert!(checker.critical_hit(
            &attacker,
            &target,
            None,
            HitOptions::resolved(5.0, None),
            &CritCues::default()
        ));
        assert_eq!(fixture.scheduler.len(), 2);
    }

    #[test]
    fn test_probe_never_mutates() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let attacker = falling(attacker);
        let before = fixture.statuses.get(attacker.id).cloned();
        let mut checker = fixture.checker();
        checker.critical_hit(&attacker, &target, None, HitOptions::probe(), &CritCues::default());
        assert!(fixture.scheduler.is_empty());
        assert_eq!(fixture.statuses.get(attacker.id).cloned(), before);
        assert!(fixture.world.sounds().is_empty());
    }
}
