use weapon_core::ids::{entity, family};

use crate::host::EntitySnapshot;

/// Exempts armor stands only
pub const ARMOR_STAND_EXEMPT: &[&str] = &[entity::ARMOR_STAND];

/// Exempts armor stands and rideable vehicles
pub const VEHICLE_EXEMPT: &[&str] = &[
    entity::ARMOR_STAND,
    "minecraft:boat",
    "minecraft:chest_boat",
    "minecraft:minecart",
    "minecraft:command_block_minecart",
    "minecraft:hopper_minecart",
    "minecraft:tnt_minecart",
];

/// Targets a sweep may start from
pub const SWEEP_TARGET_EXEMPT: &[&str] = &[
    entity::ENDER_CRYSTAL,
    entity::ARMOR_STAND,
    "minecraft:boat",
    "minecraft:chest_boat",
    "minecraft:minecart",
    "minecraft:command_block_minecart",
    "minecraft:hopper_minecart",
    "minecraft:tnt_minecart",
];

/// Bystanders a sweep may hit besides living entities
pub const SWEEP_BYSTANDER_EXEMPT: &[&str] = &[entity::ARMOR_STAND, entity::ENDER_CRYSTAL];

/// Whether an entity is an object rather than a creature
///
/// Types listed in `exempt` are never inanimate.
pub fn is_inanimate(target: &EntitySnapshot, exempt: &[&str]) -> bool {
    if exempt.contains(&target.type_id.as_str()) {
        return false;
    }
    target.has_family(family::INANIMATE)
        || target.has_family(family::IGNORE)
        || entity::INANIMATE.contains(&target.type_id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::EntityId;

    #[test]
    fn test_fixed_list_and_families() {
        let tnt = EntitySnapshot::new(EntityId(1), "minecraft:tnt");
        assert!(is_inanimate(&tnt, &[]));

        let stand = EntitySnapshot::new(EntityId(2), entity::ARMOR_STAND)
            .with_family(family::INANIMATE);
        assert!(is_inanimate(&stand, &[]));
        assert!(!is_inanimate(&stand, ARMOR_STAND_EXEMPT));

        let zombie = EntitySnapshot::new(EntityId(3), "minecraft:zombie")
            .with_family(family::UNDEAD);
        assert!(!is_inanimate(&zombie, &[]));
    }

    #[test]
    fn test_exemption_overrides_list() {
        let crystal = EntitySnapshot::new(EntityId(1), entity::ENDER_CRYSTAL);
        assert!(is_inanimate(&crystal, VEHICLE_EXEMPT));
        assert!(!is_inanimate(&crystal, SWEEP_BYSTANDER_EXEMPT));
    }
}
