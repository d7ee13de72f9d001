//! weapon_core - Weapon stat blocks and item data for melee combat
//!
//! This crate holds the host-independent data that the combat engine consumes:
//! - WeaponStats: the declarative per-weapon stat block, keyed by item id
//! - ItemStack: a held item with enchantments, durability and lore
//! - Well-known ids for enchantments, effects, entity types, sounds and particles
//! - Lore formatting for the damage/speed line shown on items

pub mod ids;
pub mod item;
pub mod lore;
pub mod stats;
pub mod types;

pub use item::{Durability, ItemStack};
pub use stats::WeaponStats;
pub use types::Vec3;
