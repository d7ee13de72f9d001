//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Engine
pub use crate::engine::CombatEngine;
pub use crate::events::CombatEvent;

// Host seam
pub use crate::host::{DamageCause, EntityId, EntitySnapshot, Host, HostError};
pub use crate::sim::SimWorld;

// Attack results and hooks
pub use crate::combat::{AttackOutcome, AttackOverrides, BeforeAttackContext};
pub use crate::damage::{format_table, DamageResult, DamageTableRow};
pub use crate::hooks::{CombatHook, HookRegistry};

// Config
pub use crate::config::{init_constants, init_constants_default};

// Re-exports from the weapon crates
pub use weapon_core::{ItemStack, Vec3, WeaponStats};
pub use weapon_tables::WeaponRegistry;
