use weapon_core::ids::sound;
use weapon_core::WeaponStats;

use super::{is_inanimate, Checker, HitOptions, VEHICLE_EXEMPT};
use crate::host::{EntitySnapshot, SoundCue};

impl Checker<'_> {
    /// Whether the hit carries sprint knockback
    ///
    /// Unless `no_effect`, a valid hit consumes the attacker's sprint and plays
    /// the knockback sound.
    pub fn sprint_knockback(
        &mut self,
        attacker: &EntitySnapshot,
        target: &EntitySnapshot,
        stats: Option<&WeaponStats>,
        options: HitOptions,
    ) -> bool {
        if is_inanimate(target, VEHICLE_EXEMPT) {
            return false;
        }
        if options.damage.is_some_and(|d| d <= 0.0) {
            return false;
        }

        let valid = options.forced.unwrap_or_else(|| {
            self.special_valid(attacker, stats) && self.statuses.sprint_knockback_valid(attacker.id)
        });

        if valid && !options.no_effect {
            self.statuses
                .get_or_create(attacker.id)
                .sprint_knockback_hit_used = true;
            self.play_sound(
                &attacker.dimension,
                SoundCue::new(sound::KNOCKBACK, attacker.location).volume(0.7),
            );
        }
        valid
    }
}
