use weapon_core::ids::{entity, sound};
use weapon_core::WeaponStats;

use super::Checker;
use crate::config::constants;
use crate::host::{EntitySnapshot, Host, SoundCue};

/// Whether an entity is holding a raised shield this tick
pub fn is_blocking(host: &dyn Host, target: &EntitySnapshot) -> bool {
    let has_shield = [&target.mainhand, &target.offhand]
        .into_iter()
        .flatten()
        .any(|item| item.is(entity::SHIELD));
    has_shield
        && (target.sneaking || target.riding.is_some())
        && host.item_cooldown(target.id, entity::SHIELD) == 0
}

impl Checker<'_> {
    /// Attacker is inside the target's forward half-plane
    fn in_shield_arc(&self, attacker: &EntitySnapshot, target: &EntitySnapshot) -> bool {
        let nearby = self.host.entities_within(
            &target.dimension,
            target.location,
            constants().shield.scan_radius,
        );
        if !nearby.contains(&attacker.id) {
            return false;
        }
        let view = target.view_direction.flattened();
        let to_attacker = (attacker.location - target.location).flattened();
        view.angle_to(to_attacker) <= 90.0
    }

    /// Whether the target's shield blocks this hit
    ///
    /// With `disable`, a shield-disabling weapon also puts the shield on
    /// cooldown.
    pub fn shield_block(
        &mut self,
        attacker: &EntitySnapshot,
        target: &EntitySnapshot,
        stats: Option<&WeaponStats>,
        disable: bool,
    ) -> bool {
        if target.is_player() && target.is_creative() {
            return false;
        }
        if !self.statuses.shield_valid(target.id) {
            return false;
        }

        let special = if self.world.shield_break_special && attacker.is_player() {
            self.special_valid(attacker, stats)
        } else {
            true
        };

        let in_arc = self.in_shield_arc(attacker, target);
        let disables = stats.is_some_and(|s| s.disable_shield);
        if disable && disables && in_arc && special {
            self.host.start_item_cooldown(
                target.id,
                entity::SHIELD,
                constants().shield.disable_ticks,
            );
            self.play_sound(
                &attacker.dimension,
                SoundCue::new(sound::BREAK, target.location),
            );
        }
        in_arc
    }
}
