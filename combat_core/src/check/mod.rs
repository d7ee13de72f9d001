//! Condition evaluation for a single attack
//!
//! A [`Checker`] bundles everything the predicates read and mutate: the host,
//! the status store, the deferred queue, world settings and the RNG. Calls
//! made with `no_effect` only read.

mod cooldown;
mod critical;
mod durability;
mod inanimate;
mod shield;
mod sprint;
mod sweep;

pub use cooldown::{attack_charge, cooldown_time, special_valid_at, CooldownTime};
pub use critical::CritCues;
pub use durability::DurabilityOutcome;
pub use inanimate::{
    is_inanimate, ARMOR_STAND_EXEMPT, SWEEP_BYSTANDER_EXEMPT, SWEEP_TARGET_EXEMPT,
    VEHICLE_EXEMPT,
};
pub use shield::is_blocking;
pub use sweep::{SweepCues, SweepOptions, SweepResult};

use rand::RngCore;
use weapon_core::Vec3;

use crate::host::{EntitySnapshot, Host, ParticleCue, ParticleVariables, SoundCue};
use crate::scheduler::{DeferredTask, Scheduler};
use crate::settings::{PlayerToggle, WorldSettings};
use crate::status::StatusStore;

/// Shared inputs of the crit and sprint-knockback predicates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitOptions {
    /// Resolved damage, None before it is known
    pub damage: Option<f64>,
    /// Evaluate only, no cues and no state changes
    pub no_effect: bool,
    /// Pin the outcome either way
    pub forced: Option<bool>,
}

impl HitOptions {
    pub fn probe() -> Self {
        HitOptions {
            no_effect: true,
            ..Default::default()
        }
    }

    pub fn resolved(damage: f64, forced: Option<bool>) -> Self {
        HitOptions {
            damage: Some(damage),
            no_effect: false,
            forced,
        }
    }
}

/// Context for evaluating one attack at one tick
pub struct Checker<'a> {
    pub host: &'a mut dyn Host,
    pub statuses: &'a mut StatusStore,
    pub scheduler: &'a mut Scheduler,
    pub rng: &'a mut dyn RngCore,
    pub world: WorldSettings,
    pub tick: u64,
}

impl<'a> Checker<'a> {
    pub fn new(
        host: &'a mut dyn Host,
        statuses: &'a mut StatusStore,
        scheduler: &'a mut Scheduler,
        rng: &'a mut dyn RngCore,
        tick: u64,
    ) -> Self {
        let world = WorldSettings::read(&*host);
        Checker {
            host,
            statuses,
            scheduler,
            rng,
            world,
            tick,
        }
    }

    /// Ticks since the entity last attacked
    pub fn elapsed(&self, entity: &EntitySnapshot) -> f64 {
        self.tick
            .saturating_sub(self.statuses.last_attack_time(entity.id)) as f64
    }

    /// Particle shown only to players who enabled `toggle`, emitted next tick
    pub(crate) fn selective_particle(
        &mut self,
        toggle: PlayerToggle,
        dimension: &str,
        id: &str,
        location: Vec3,
        offset: Vec3,
        variables: ParticleVariables,
    ) {
        self.scheduler.schedule(DeferredTask::Particle {
            toggle,
            cue: ParticleCue {
                id: id.to_string(),
                dimension: dimension.to_string(),
                location: location + offset,
                variables,
            },
        });
    }

    /// Sound heard only by players who enabled `toggle`, emitted next tick
    pub(crate) fn selective_sound(
        &mut self,
        toggle: PlayerToggle,
        dimension: &str,
        cue: SoundCue,
    ) {
        self.scheduler.schedule(DeferredTask::Sound {
            toggle,
            dimension: dimension.to_string(),
            cue,
        });
    }

    /// Sound for everyone nearby. Failures only matter in debug mode.
    pub(crate) fn play_sound(&mut self, dimension: &str, cue: SoundCue) {
        if let Err(error) = self.host.play_sound(dimension, &cue) {
            if self.world.debug_mode {
                tracing::debug!(sound = %cue.id, %error, "sound skipped");
            }
        }
    }
}
