//! Work deferred to the next tick
//!
//! Cue emission and post-attack hooks run once the current tick's mutations
//! are visible. Tasks queued while draining wait for the following tick.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::combat::AttackOutcome;
use crate::hooks::CombatHook;
use crate::host::{EntityId, Host, ParticleCue, SoundCue};
use crate::settings::{PlayerSettings, PlayerToggle};
use crate::status::StatusStore;

pub enum DeferredTask {
    /// Particle for players in the dimension who enabled the toggle
    Particle {
        toggle: PlayerToggle,
        cue: ParticleCue,
    },
    /// Sound for players in the dimension who enabled the toggle
    Sound {
        toggle: PlayerToggle,
        dimension: String,
        cue: SoundCue,
    },
    AfterAttack {
        hook: Arc<dyn CombatHook>,
        outcome: Box<AttackOutcome>,
    },
    ResetFallDistance(EntityId),
}

impl std::fmt::Debug for DeferredTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeferredTask::Particle { toggle, cue } => f
                .debug_struct("Particle")
                .field("toggle", toggle)
                .field("cue", cue)
                .finish(),
            DeferredTask::Sound { toggle, cue, .. } => f
                .debug_struct("Sound")
                .field("toggle", toggle)
                .field("cue", cue)
                .finish(),
            DeferredTask::AfterAttack { outcome, .. } => f
                .debug_struct("AfterAttack")
                .field("attacker", &outcome.attacker)
                .field("target", &outcome.target)
                .finish(),
            DeferredTask::ResetFallDistance(id) => {
                f.debug_tuple("ResetFallDistance").field(id).finish()
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: VecDeque<DeferredTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: DeferredTask) {
        self.queue.push_back(task);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeferredTask> {
        self.queue.iter()
    }

    /// Take every task queued so far
    pub fn take(&mut self) -> Vec<DeferredTask> {
        self.queue.drain(..).collect()
    }
}

/// Players in `dimension` who enabled `toggle`
fn audience(host: &dyn Host, dimension: &str, toggle: PlayerToggle) -> Vec<EntityId> {
    host.players()
        .into_iter()
        .filter(|&player| PlayerSettings::enabled(host, player, toggle))
        .filter(|&player| host.entity(player).is_some_and(|p| p.dimension == dimension))
        .collect()
}

/// Run one deferred task. Cue failures are ignored.
pub fn run_task(task: DeferredTask, host: &mut dyn Host, statuses: &mut StatusStore) {
    match task {
        DeferredTask::Particle { toggle, cue } => {
            for player in audience(&*host, &cue.dimension, toggle) {
                let _ = host.spawn_particle_for(player, &cue);
            }
        }
        DeferredTask::Sound {
            toggle,
            dimension,
            cue,
        } => {
            for player in audience(&*host, &dimension, toggle) {
                let _ = host.play_sound_for(player, &cue);
            }
        }
        DeferredTask::AfterAttack { hook, outcome } => hook.after_attack(&outcome, host),
        DeferredTask::ResetFallDistance(id) => {
            if let Some(status) = statuses.get_mut(id) {
                status.fall_distance = 0.0;
            }
        }
    }
}
