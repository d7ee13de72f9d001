use rand::Rng;
use weapon_core::ids::sound;
use weapon_core::{Durability, WeaponStats};

use super::Checker;
use crate::config::constants;
use crate::host::{EntitySnapshot, SoundCue};

/// What a hit did to the attacker's held item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityOutcome {
    /// Creative mode, unbreakable item, unknown weapon or a lucky roll
    Unchanged,
    Worn { damage: u32, max: u32 },
    Broken,
}

impl Checker<'_> {
    /// Wear the attacker's held weapon by one hit
    pub fn reduce_durability(
        &mut self,
        attacker: &EntitySnapshot,
        stats: Option<&WeaponStats>,
    ) -> DurabilityOutcome {
        if attacker.is_creative() {
            return DurabilityOutcome::Unchanged;
        }
        let (Some(stats), Some(mut item)) = (stats, attacker.mainhand.clone()) else {
            return DurabilityOutcome::Unchanged;
        };
        let Some(mut durability) = item.durability else {
            return DurabilityOutcome::Unchanged;
        };

        let chance = Durability::damage_chance(item.unbreaking());
        let roll = self.rng.gen::<f64>() * 100.0;
        if chance < roll {
            return DurabilityOutcome::Unchanged;
        }

        let costs = &constants().durability;
        let cost = if stats.is_weapon {
            costs.weapon_cost
        } else {
            costs.tool_cost
        };

        if durability.wear(cost) {
            self.play_sound(
                &attacker.dimension,
                SoundCue::new(sound::BREAK, attacker.location),
            );
            self.host.set_mainhand(attacker.id, None);
            DurabilityOutcome::Broken
        } else {
            item.durability = Some(durability);
            self.host.set_mainhand(attacker.id, Some(item));
            DurabilityOutcome::Worn {
                damage: durability.damage,
                max: durability.max,
            }
        }
    }
}
