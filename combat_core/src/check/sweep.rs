use rand::Rng;
use weapon_core::ids::{entity, particle, sound};
use weapon_core::{Vec3, WeaponStats};

use super::{is_inanimate, Checker, SWEEP_BYSTANDER_EXEMPT, SWEEP_TARGET_EXEMPT};
use crate::config::constants;
use crate::host::{DamageCause, EntityId, EntitySnapshot, ParticleVariables, SoundCue};
use crate::settings::{PlayerSettings, PlayerToggle};

const PARTICLE_DISTANCE: f64 = 1.0;
const PARTICLE_HEIGHT: f64 = 0.15;
const VIEW_DISTANCE: f64 = 3.0;

/// Inputs of a sweep evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOptions {
    pub fire_aspect: u32,
    /// Resolved damage, None to only list the entities in range
    pub damage: Option<f64>,
    /// Sweeping level, secondary damage is 1 + damage * level / (level + 1)
    pub level: f64,
    pub forced: Option<bool>,
    /// Replaces the target location as the sweep center
    pub location: Option<Vec3>,
    /// Radius around the attacker and width of the box around the target
    pub scale: f64,
}

impl Default for SweepOptions {
    fn default() -> Self {
        let sweep = &constants().sweep;
        SweepOptions {
            fire_aspect: 0,
            damage: None,
            level: sweep.level,
            forced: None,
            location: None,
            scale: sweep.radius,
        }
    }
}

/// Cue overrides for a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepCues {
    pub sound: String,
    pub particle: String,
    pub offset: Vec3,
    pub pitch: f64,
    pub volume: f64,
    /// Replaces the default size and color variables
    pub variables: Option<ParticleVariables>,
}

impl Default for SweepCues {
    fn default() -> Self {
        SweepCues {
            sound: sound::SWEEP.to_string(),
            particle: particle::SWEEP.to_string(),
            offset: Vec3::ZERO,
            pitch: 1.0,
            volume: 1.0,
            variables: None,
        }
    }
}

/// Outcome of a sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepResult {
    pub swept: bool,
    /// Entities inside both the attacker's and the target's sweep volume
    pub common_entities: Vec<EntityId>,
}

impl Checker<'_> {
    fn sweep_allowed(
        &self,
        attacker: &EntitySnapshot,
        target: &EntitySnapshot,
        stats: Option<&WeaponStats>,
        forced: Option<bool>,
    ) -> bool {
        let eligible = stats.is_some_and(|s| s.sweep)
            && self.special_valid(attacker, stats)
            && self.statuses.crit_sweep_valid(attacker.id);
        if !eligible && forced.is_none() {
            return false;
        }

        let unsteady =
            !attacker.on_ground || attacker.riding.is_some() || attacker.is_faster_than_walk();
        if (unsteady && forced.is_none()) || forced == Some(false) {
            return false;
        }

        !is_inanimate(target, SWEEP_TARGET_EXEMPT)
    }

    /// Entities caught in both sweep volumes
    fn sweep_candidates(
        &self,
        attacker: &EntitySnapshot,
        target: &EntitySnapshot,
        center: Vec3,
        scale: f64,
    ) -> Vec<EntityId> {
        let around_attacker = self
            .host
            .entities_within(&attacker.dimension, attacker.location, scale);
        let around_target = self.host.entities_in_volume(
            &attacker.dimension,
            Vec3::new(center.x - scale / 2.0, center.y, center.z - scale / 2.0),
            Vec3::new(scale, constants().sweep.height, scale),
        );
        let exclude_pets = PlayerSettings::read(&*self.host, attacker.id).exclude_pet_from_sweep;

        around_attacker
            .into_iter()
            .filter(|id| around_target.contains(id))
            .filter(|&id| id != target.id && id != attacker.id && Some(id) != attacker.riding)
            .filter(|&id| {
                self.host.entity(id).is_some_and(|e| {
                    !is_inanimate(&e, SWEEP_BYSTANDER_EXEMPT)
                        && !(exclude_pets && e.tamed && !e.is_type(entity::TRADER_LLAMA))
                })
            })
            .collect()
    }

    /// Where the sweep particle appears
    fn sweep_particle_location(
        &self,
        attacker: &EntitySnapshot,
        target: &EntitySnapshot,
        center: Vec3,
    ) -> Vec3 {
        let looking_at_target = self
            .host
            .entity_in_view(attacker.id, VIEW_DISTANCE)
            .and_then(|id| self.host.entity(id))
            .filter(|e| !is_inanimate(e, &[entity::ARMOR_STAND]))
            .is_some_and(|e| e.id == target.id);
        let touch = attacker.player.as_ref().is_some_and(|p| p.touch_input);

        if looking_at_target || !touch {
            return attacker.view_point(PARTICLE_DISTANCE, PARTICLE_HEIGHT);
        }

        let direction = center - attacker.location;
        let magnitude = direction.horizontal_length();
        Vec3::new(
            attacker.location.x + direction.x / magnitude * PARTICLE_DISTANCE,
            (attacker.location.y + attacker.head_location.y) / 2.0 + PARTICLE_HEIGHT,
            attacker.location.z + direction.z / magnitude * PARTICLE_DISTANCE,
        )
    }

    /// Evaluate and apply a sweeping attack around the target
    ///
    /// Without a resolved damage nothing is applied and only the entities in
    /// range are returned.
    pub fn sweep(
        &mut self,
        attacker: &EntitySnapshot,
        target: &EntitySnapshot,
        stats: Option<&WeaponStats>,
        options: &SweepOptions,
        cues: &SweepCues,
    ) -> SweepResult {
        if !self.sweep_allowed(attacker, target, stats, options.forced) {
            return SweepResult::default();
        }

        let center = options.location.unwrap_or(target.location);
        let common_entities = self.sweep_candidates(attacker, target, center, options.scale);

        let damage = match options.damage {
            None => {
                return SweepResult {
                    swept: false,
                    common_entities,
                }
            }
            Some(d) if d <= 0.0 => return SweepResult::default(),
            Some(d) => d,
        };

        let variables = match &cues.variables {
            Some(variables) => variables.clone(),
            None => {
                let brightness = self.rng.gen_range(0.5..=1.0);
                let color = PlayerSettings::read(&*self.host, attacker.id).sweep_rgb(brightness);
                ParticleVariables::default()
                    .with_float("variable.size", 1.0)
                    .with_color("variable.color", color)
            }
        };
        let particle_location = options
            .location
            .unwrap_or_else(|| self.sweep_particle_location(attacker, target, center));
        self.selective_particle(
            PlayerToggle::Sweep,
            &attacker.dimension,
            &cues.particle,
            particle_location,
            cues.offset,
            variables,
        );
        self.play_sound(
            &attacker.dimension,
            SoundCue::new(cues.sound.clone(), attacker.location)
                .pitch(cues.pitch)
                .volume(cues.volume),
        );

        let amount = 1.0 + damage * (options.level / (options.level + 1.0));
        for &id in &common_entities {
            let Some(bystander) = self.host.entity(id) else {
                continue;
            };
            let cause = if self.shield_block(attacker, &bystander, stats, true) {
                DamageCause::EntityExplosion
            } else {
                DamageCause::EntityAttack
            };
            self.host.apply_damage(id, amount, cause, Some(attacker.id));

            if options.fire_aspect > 0 && !bystander.fire_immune {
                if let Err(error) = self.host.set_on_fire(id, options.fire_aspect * 4) {
                    if self.world.debug_mode {
                        tracing::debug!(entity = %id, %error, "set on fire skipped");
                    }
                }
            }
        }

        SweepResult {
            swept: true,
            common_entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::testing::Fixture;
    use crate::host::{Host, PropertyValue};
    use crate::settings::EXCLUDE_PET_FROM_SWEEP;

    fn sword() -> WeaponStats {
        WeaponStats::new("minecraft:iron_sword", 1.6, 6.0)
            .weapon()
            .with_sweep()
    }

    fn bystander(id: u64, location: Vec3) -> EntitySnapshot {
        EntitySnapshot::new(EntityId(id), "minecraft:pig").at(location)
    }

    #[test]
    fn test_candidates_are_inside_both_volumes() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        // inside both
        fixture.world.spawn(bystander(10, Vec3::new(1.0, 0.0, 2.0)));
        // near the target but beyond the attacker's radius
        fixture.world.spawn(bystander(11, Vec3::new(1.4, 0.0, 3.4)));
        // near the attacker but above the target box
        fixture.world.spawn(bystander(12, Vec3::new(0.0, 1.0, 1.0)));

        let mut checker = fixture.checker();
        let result = checker.sweep(&attacker, &target, Some(&sword()), &SweepOptions::default(), &SweepCues::default());
        assert!(!result.swept);
        assert_eq!(result.common_entities, vec![EntityId(10)]);
    }

    #[test]
    fn test_sweep_damages_bystanders() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        fixture.world.spawn(bystander(10, Vec3::new(-1.0, 0.0, 2.0)));

        let options = SweepOptions {
            damage: Some(6.0),
            fire_aspect: 1,
            ..Default::default()
        };
        let mut checker = fixture.checker();
        let result = checker.sweep(&attacker, &target, Some(&sword()), &options, &SweepCues::default());
        assert!(result.swept);

        let hits = fixture.world.damage_log();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, EntityId(10));
        assert!((hits[0].amount - 4.0).abs() < 1e-12);
        assert_eq!(hits[0].cause, DamageCause::EntityAttack);
        assert_eq!(fixture.world.fire_seconds(EntityId(10)), Some(4));
        assert_eq!(fixture.scheduler.len(), 1);
        assert_eq!(fixture.world.sounds()[0].id, sound::SWEEP);
    }

    #[test]
    fn test_airborne_attacker_never_sweeps() {
        let mut fixture = Fixture::new(100);
        let (mut attacker, target) = fixture.pair();
        attacker.on_ground = false;
        fixture.world.spawn(bystander(10, Vec3::new(1.0, 0.0, 2.0)));

        let options = SweepOptions {
            damage: Some(6.0),
            ..Default::default()
        };
        let mut checker = fixture.checker();
        let result = checker.sweep(&attacker, &target, Some(&sword()), &options, &SweepCues::default());
        assert_eq!(result, SweepResult::default());
        assert!(fixture.world.damage_log().is_empty());
    }

    #[test]
    fn test_mounted_attacker_never_sweeps() {
        let mut fixture = Fixture::new(100);
        let (mut attacker, target) = fixture.pair();
        fixture.world.spawn(bystander(10, Vec3::new(1.0, 0.0, 2.0)));
        attacker.riding = Some(EntityId(10));

        let options = SweepOptions {
            damage: Some(6.0),
            ..Default::default()
        };
        let mut checker = fixture.checker();
        let result = checker.sweep(&attacker, &target, Some(&sword()), &options, &SweepCues::default());
        assert_eq!(result, SweepResult::default());
        assert!(fixture.world.damage_log().is_empty());
    }

    #[test]
    fn test_mount_is_never_a_candidate() {
        let mut fixture = Fixture::new(100);
        let (mut attacker, target) = fixture.pair();
        // both inside both volumes
        fixture.world.spawn(bystander(10, Vec3::new(1.0, 0.0, 2.0)));
        fixture.world.spawn(bystander(11, Vec3::new(-1.0, 0.0, 2.0)));
        attacker.riding = Some(EntityId(10));

        let checker = fixture.checker();
        let scale = SweepOptions::default().scale;
        let candidates = checker.sweep_candidates(&attacker, &target, target.location, scale);
        assert_eq!(candidates, vec![EntityId(11)]);

        attacker.riding = None;
        let candidates = checker.sweep_candidates(&attacker, &target, target.location, scale);
        assert_eq!(candidates, vec![EntityId(10), EntityId(11)]);
    }

    #[test]
    fn test_requires_sweep_flag_unless_forced() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        fixture.world.spawn(bystander(10, Vec3::new(1.0, 0.0, 2.0)));
        let axe = WeaponStats::new("minecraft:iron_axe", 0.9, 9.0);

        let mut checker = fixture.checker();
        let result = checker.sweep(&attacker, &target, Some(&axe), &SweepOptions::default(), &SweepCues::default());
        assert!(result.common_entities.is_empty());

        let forced = SweepOptions {
            forced: Some(true),
            ..Default::default()
        };
        let result = checker.sweep(&attacker, &target, Some(&axe), &forced, &SweepCues::default());
        assert_eq!(result.common_entities, vec![EntityId(10)]);
    }

    #[test]
    fn test_non_positive_damage_returns_nothing() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        fixture.world.spawn(bystander(10, Vec3::new(1.0, 0.0, 2.0)));
        let options = SweepOptions {
            damage: Some(0.0),
            ..Default::default()
        };
        let mut checker = fixture.checker();
        let result = checker.sweep(&attacker, &target, Some(&sword()), &options, &SweepCues::default());
        assert_eq!(result, SweepResult::default());
    }

    #[test]
    fn test_pets_excluded_when_enabled() {
        let mut fixture = Fixture::new(100);
        let (attacker, target) = fixture.pair();
        let mut wolf = EntitySnapshot::new(EntityId(10), "minecraft:wolf").at(Vec3::new(1.0, 0.0, 2.0));
        wolf.tamed = true;
        let mut llama = EntitySnapshot::new(EntityId(11), entity::TRADER_LLAMA).at(Vec3::new(-1.0, 0.0, 2.0));
        llama.tamed = true;
        fixture.world.spawn(wolf);
        fixture.world.spawn(llama);
        fixture
            .world
            .set_player_property(attacker.id, EXCLUDE_PET_FROM_SWEEP, PropertyValue::Bool(true));

        let mut checker = fixture.checker();
        let result = checker.sweep(&attacker, &target, Some(&sword()), &SweepOptions::default(), &SweepCues::default());
        assert_eq!(result.common_entities, vec![EntityId(11)]);
    }
}
