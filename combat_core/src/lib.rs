//! combat_core - Melee combat resolution for a block-game host
//!
//! This library provides:
//! - CombatEngine: weapon registry, per-entity status, hooks and deferred work
//! - Attack resolution: damage curve, crits, sprint knockback, sweeps, shields
//! - Knockback kinematics solved with the Lambert W function
//! - Per-tick status upkeep and inbound event dispatch
//! - Host: the trait a game host implements, plus the in-memory SimWorld
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use combat_core::prelude::*;
//!
//! let mut world = SimWorld::new();
//! let (weapons, _report) = WeaponRegistry::load(Path::new("data/weapons"))?;
//! let mut engine = CombatEngine::new().with_weapons(weapons);
//!
//! engine.handle_event(&mut world, CombatEvent::WorldLoaded, 0);
//! engine.handle_event(
//!     &mut world,
//!     CombatEvent::EntityHitEntity { attacker: EntityId(1), target: EntityId(2) },
//!     100,
//! );
//! engine.tick(&mut world, 101);
//! ```

pub mod check;
pub mod combat;
pub mod config;
pub mod damage;
pub mod engine;
pub mod events;
pub mod hooks;
pub mod host;
pub mod knockback;
pub mod math;
pub mod prelude;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod status;
pub mod tick;

// Core API
pub use engine::CombatEngine;
pub use events::CombatEvent;
pub use combat::{AttackOutcome, AttackOverrides, BeforeAttackContext};
pub use hooks::{CombatHook, HookRegistry};
pub use host::{EntityId, EntitySnapshot, Host, HostError};

// Configuration
pub use config::{init_constants, init_constants_default};
pub use settings::{PlayerSettings, WorldSettings};

// Re-export commonly needed weapon crates types
pub use weapon_core::{ItemStack, Vec3, WeaponStats};
pub use weapon_tables::WeaponRegistry;
