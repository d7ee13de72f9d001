//! Well-known identifiers used by the combat rules
//!
//! Ids follow the host's namespaced convention. Enchantment and effect ids are
//! bare names, matching how the host reports them on items and entities.

/// Enchantment ids
pub mod enchantment {
    pub const SHARPNESS: &str = "sharpness";
    pub const SMITE: &str = "smite";
    pub const BANE_OF_ARTHROPODS: &str = "bane_of_arthropods";
    pub const IMPALING: &str = "impaling";
    pub const KNOCKBACK: &str = "knockback";
    pub const FIRE_ASPECT: &str = "fire_aspect";
    pub const UNBREAKING: &str = "unbreaking";
}

/// Mob effect ids
pub mod effect {
    pub const HASTE: &str = "haste";
    pub const MINING_FATIGUE: &str = "mining_fatigue";
    pub const STRENGTH: &str = "strength";
    pub const WEAKNESS: &str = "weakness";
    pub const BLINDNESS: &str = "blindness";
    pub const SLOW_FALLING: &str = "slow_falling";
    pub const LEVITATION: &str = "levitation";
    pub const SATURATION: &str = "saturation";
}

/// Entity and item type ids
pub mod entity {
    pub const PLAYER: &str = "minecraft:player";
    pub const ARMOR_STAND: &str = "minecraft:armor_stand";
    pub const ENDER_CRYSTAL: &str = "minecraft:ender_crystal";
    pub const ENDER_DRAGON: &str = "minecraft:ender_dragon";
    pub const TRADER_LLAMA: &str = "minecraft:trader_llama";
    pub const ARROW: &str = "minecraft:arrow";
    pub const SHIELD: &str = "minecraft:shield";
    pub const MACE: &str = "minecraft:mace";

    /// Types that are always inanimate regardless of type family
    pub const INANIMATE: [&str; 7] = [
        "minecraft:ender_crystal",
        "minecraft:painting",
        "minecraft:falling_block",
        "minecraft:tnt",
        "minecraft:fishing_hook",
        "minecraft:item",
        "minecraft:xp_orb",
    ];
}

/// Type family tags
pub mod family {
    pub const INANIMATE: &str = "inanimate";
    pub const IGNORE: &str = "ignore";
    pub const UNDEAD: &str = "undead";
    pub const ARTHROPOD: &str = "arthropod";
}

/// Sound ids
pub mod sound {
    pub const CRIT: &str = "entity.player.attack.crit";
    pub const KNOCKBACK: &str = "entity.player.attack.knockback";
    pub const SWEEP: &str = "entity.player.attack.sweep";
    pub const STRONG: &str = "game.player.attack.strong.se";
    pub const WEAK: &str = "game.player.attack.weak.se";
    pub const NO_DAMAGE: &str = "game.player.attack.nodamage.se";
    pub const BREAK: &str = "random.break";
    pub const BOW_DING: &str = "game.player.bow.ding";
}

/// Particle ids
pub mod particle {
    pub const CRIT: &str = "minecraft:critical_hit_emitter";
    pub const SWEEP: &str = "sweepnslash:sweep_particle";
    pub const ENCHANTED_HIT: &str = "sweepnslash:magic_critical_hit_emitter";
    pub const DAMAGE_INDICATOR: &str = "sweepnslash:damage_indicator_emitter";
}

/// Biomes where rain never falls, so impaling's rain bonus does not apply
pub const DRY_OR_FROZEN_BIOMES: [&str; 26] = [
    "minecraft:frozen_ocean",
    "minecraft:deep_frozen_ocean",
    "minecraft:frozen_river",
    "minecraft:cold_beach",
    "minecraft:cold_taiga",
    "minecraft:cold_taiga_hills",
    "minecraft:cold_taiga_mutated",
    "minecraft:savanna",
    "minecraft:savanna_plateau",
    "minecraft:savanna_mutated",
    "minecraft:savanna_plateau_mutated",
    "minecraft:desert",
    "minecraft:desert_hills",
    "minecraft:desert_mutated",
    "minecraft:ice_plains",
    "minecraft:ice_mountains",
    "minecraft:ice_plains_spikes",
    "minecraft:mesa",
    "minecraft:mesa_plateau",
    "minecraft:mesa_plateau_mutated",
    "minecraft:mesa_plateau_stone_mutated",
    "minecraft:mesa_bryce",
    "minecraft:grove",
    "minecraft:snowy_slopes",
    "minecraft:jagged_peaks",
    "minecraft:frozen_peaks",
];
