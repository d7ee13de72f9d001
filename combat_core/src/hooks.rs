//! Weapon hooks
//!
//! Weapons name their hooks in `before_effect` and `script`. Names resolve
//! against a [`HookRegistry`] filled by the embedding application; stat data
//! never carries executable code.

use std::collections::HashMap;
use std::sync::Arc;

use crate::combat::{AttackOutcome, AttackOverrides, BeforeAttackContext};
use crate::host::Host;

/// Extension point for weapon-specific attack behavior
pub trait CombatHook: Send + Sync {
    /// Runs before damage is computed. Returned overrides adjust the attack.
    fn before_attack(&self, _context: &BeforeAttackContext, _host: &dyn Host) -> AttackOverrides {
        AttackOverrides::default()
    }

    /// Runs on the tick after the attack resolved
    fn after_attack(&self, _outcome: &AttackOutcome, _host: &mut dyn Host) {}
}

/// Named hooks available to weapon stat blocks
#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: HashMap<String, Arc<dyn CombatHook>>,
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.hooks.keys().collect();
        names.sort();
        f.debug_struct("HookRegistry").field("hooks", &names).finish()
    }
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook, replacing any previous hook with the same name
    pub fn register(&mut self, name: impl Into<String>, hook: Arc<dyn CombatHook>) -> bool {
        self.hooks.insert(name.into(), hook).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CombatHook>> {
        self.hooks.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
