//! Per-entity combat status
//!
//! One [`CombatStatus`] per entity, created on first access and dropped when
//! the host reports the entity removed.

use std::collections::HashMap;

use crate::host::EntityId;

/// Last hit an entity took, compared against new hits for iframes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub raw_damage: f64,
    pub damage: f64,
    pub tick: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombatStatus {
    pub last_attack_time: u64,
    pub last_shield_time: u64,
    /// Remaining cooldown ticks, refreshed every tick
    pub cooldown: f64,
    pub sprint_knockback_hit_used: bool,
    pub sprint_knockback_valid: bool,
    pub crit_sweep_valid: bool,
    pub shield_valid: bool,
    /// A mace smash is charged (fell far enough with a mace)
    pub mace: bool,
    pub attack_ready: bool,
    pub show_bar: bool,
    /// Holding use on an item (raising a shield, drawing a bow)
    pub hold_interact: bool,
    pub last_selected_slot: Option<u32>,
    pub last_selected_item: Option<String>,
    pub food_tick_timer: f64,
    pub fall_distance: f64,
    /// Swing hit a block this tick
    pub left_click: bool,
    /// Interacted with a block this tick
    pub right_click: bool,
    /// Raw damage of this entity's last attack
    pub raw_damage: f64,
    /// Last hurt event was caused by an engine-resolved player hit
    pub player_hit: bool,
    pub last_hit: Option<HitRecord>,
}

impl Default for CombatStatus {
    fn default() -> Self {
        CombatStatus {
            last_attack_time: 0,
            last_shield_time: 0,
            cooldown: 0.0,
            sprint_knockback_hit_used: false,
            sprint_knockback_valid: false,
            crit_sweep_valid: true,
            shield_valid: false,
            mace: false,
            attack_ready: false,
            show_bar: true,
            hold_interact: false,
            last_selected_slot: None,
            last_selected_item: None,
            food_tick_timer: 0.0,
            fall_distance: 0.0,
            left_click: false,
            right_click: false,
            raw_damage: 0.0,
            player_hit: false,
            last_hit: None,
        }
    }
}

impl CombatStatus {
    /// Ticks since the last attack
    pub fn elapsed(&self, tick: u64) -> u64 {
        tick.saturating_sub(self.last_attack_time)
    }
}

/// Map from entity to its combat status
#[derive(Debug, Default)]
pub struct StatusStore {
    statuses: HashMap<EntityId, CombatStatus>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of an entity, created with defaults if missing
    pub fn get_or_create(&mut self, id: EntityId) -> &mut CombatStatus {
        self.statuses.entry(id).or_default()
    }

    /// Read-only lookup that never creates a record
    pub fn get(&self, id: EntityId) -> Option<&CombatStatus> {
        self.statuses.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut CombatStatus> {
        self.statuses.get_mut(&id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<CombatStatus> {
        self.statuses.remove(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.statuses.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn last_attack_time(&self, id: EntityId) -> u64 {
        self.get(id).map_or(0, |s| s.last_attack_time)
    }

    pub fn crit_sweep_valid(&self, id: EntityId) -> bool {
        self.get(id).map_or(true, |s| s.crit_sweep_valid)
    }

    pub fn sprint_knockback_valid(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|s| s.sprint_knockback_valid)
    }

    pub fn shield_valid(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|s| s.shield_valid)
    }
}
