//! The combat engine: weapon registry, hooks, statuses and deferred work
//!
//! A [`CombatEngine`] owns all engine state and borrows the host per call.
//! Per-tick maintenance lives in [`crate::tick`] and inbound event dispatch in
//! [`crate::events`].

use std::path::Path;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use weapon_core::WeaponStats;
use weapon_tables::{
    decode_registration, ChannelError, ConfigError, LoadReport, MergeOutcome, WeaponRegistry,
    REGISTER_WEAPONS_CHANNEL,
};

use crate::check::Checker;
use crate::combat::{resolve_attack, AttackOutcome};
use crate::damage::DamageTableRow;
use crate::hooks::{CombatHook, HookRegistry};
use crate::host::{EntityId, EntitySnapshot, Host};
use crate::scheduler::{run_task, Scheduler};
use crate::settings::WorldSettings;
use crate::status::{CombatStatus, StatusStore};

#[derive(Debug)]
pub struct CombatEngine {
    pub(crate) weapons: WeaponRegistry,
    pub(crate) hooks: HookRegistry,
    pub(crate) statuses: StatusStore,
    pub(crate) scheduler: Scheduler,
    pub(crate) rng: ChaCha8Rng,
}

impl Default for CombatEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatEngine {
    /// Engine with an empty registry and an entropy-seeded RNG
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// Engine with a fixed RNG seed, for reproducible durability rolls
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        CombatEngine {
            weapons: WeaponRegistry::new(),
            hooks: HookRegistry::new(),
            statuses: StatusStore::new(),
            scheduler: Scheduler::new(),
            rng,
        }
    }

    pub fn with_weapons(mut self, weapons: WeaponRegistry) -> Self {
        self.weapons = weapons;
        self
    }

    pub fn weapons(&self) -> &WeaponRegistry {
        &self.weapons
    }

    pub fn weapons_mut(&mut self) -> &mut WeaponRegistry {
        &mut self.weapons
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Make a hook available to weapons that name it. Returns true on replace.
    pub fn register_hook(&mut self, name: impl Into<String>, hook: Arc<dyn CombatHook>) -> bool {
        self.hooks.register(name, hook)
    }

    pub fn status(&self, id: EntityId) -> Option<&CombatStatus> {
        self.statuses.get(id)
    }

    pub fn status_mut(&mut self, id: EntityId) -> &mut CombatStatus {
        self.statuses.get_or_create(id)
    }

    pub fn statuses(&self) -> &StatusStore {
        &self.statuses
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Stat block of the item an entity holds in its main hand
    pub fn held_stats(&self, entity: &EntitySnapshot) -> Option<&WeaponStats> {
        entity
            .mainhand
            .as_ref()
            .and_then(|item| self.weapons.get(&item.type_id))
    }

    /// Write missing world settings and announce the engine
    pub fn initialize_world(&mut self, host: &mut dyn Host) {
        WorldSettings::initialize(host);
        info!(weapons = self.weapons.len(), "combat engine loaded");
    }

    /// Merge every stat file under `dir`
    ///
    /// Sources that fail are skipped with a warning. The per-source summary
    /// is only logged in debug mode.
    pub fn load_stats_dir(
        &mut self,
        host: &dyn Host,
        dir: &Path,
    ) -> Result<LoadReport, ConfigError> {
        let report = self.weapons.load_dir(dir)?;
        if WorldSettings::read(host).debug_mode {
            for line in report.lines() {
                debug!("{line}");
            }
        }
        Ok(report)
    }

    /// Accept a registration message from another addon
    ///
    /// Entries merge last-writer-wins. In debug mode each add or overwrite is
    /// logged.
    pub fn register_weapons_from_channel(
        &mut self,
        host: &dyn Host,
        channel: &str,
        payload: &str,
    ) -> Result<Vec<(String, MergeOutcome)>, ChannelError> {
        if channel != REGISTER_WEAPONS_CHANNEL {
            return Err(ChannelError::UnknownChannel(channel.to_string()));
        }
        let weapons = decode_registration(payload)?;
        let merged = self.weapons.merge(weapons);

        if WorldSettings::read(host).debug_mode {
            for (id, outcome) in &merged {
                match outcome {
                    MergeOutcome::Added => debug!(weapon = %id, "weapon registered"),
                    MergeOutcome::Overwritten => debug!(weapon = %id, "weapon stats overwritten"),
                }
            }
        }
        Ok(merged)
    }

    /// Resolve a melee hit reported by the host
    ///
    /// Returns None when either entity is gone or the attacker is dead.
    pub fn attack(
        &mut self,
        host: &mut dyn Host,
        attacker: EntityId,
        target: EntityId,
        tick: u64,
    ) -> Option<AttackOutcome> {
        let attacker = host.entity(attacker).filter(|e| e.is_alive())?;
        let target = host.entity(target)?;
        let stats = attacker
            .mainhand
            .as_ref()
            .and_then(|item| self.weapons.get(&item.type_id));

        let mut checker = Checker::new(
            host,
            &mut self.statuses,
            &mut self.scheduler,
            &mut self.rng,
            tick,
        );
        Some(resolve_attack(
            &mut checker,
            &self.hooks,
            &attacker,
            &target,
            stats,
        ))
    }

    /// Run everything queued before this call. Work queued meanwhile waits.
    pub fn run_deferred(&mut self, host: &mut dyn Host) {
        for task in self.scheduler.take() {
            run_task(task, host, &mut self.statuses);
        }
    }

    /// Damage table for the weapon a player holds
    pub fn damage_table(
        &mut self,
        host: &mut dyn Host,
        player: EntityId,
    ) -> Option<Vec<DamageTableRow>> {
        let player = host.entity(player)?;
        let stats = player
            .mainhand
            .as_ref()
            .and_then(|item| self.weapons.get(&item.type_id));

        let mut checker = Checker::new(
            host,
            &mut self.statuses,
            &mut self.scheduler,
            &mut self.rng,
            0,
        );
        Some(checker.damage_table(&player, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PropertyValue;
    use crate::sim::SimWorld;
    use crate::settings::DEBUG_MODE;
    use weapon_core::{ItemStack, Vec3};

    fn sword() -> WeaponStats {
        WeaponStats::new("minecraft:iron_sword", 1.6, 6.0)
            .weapon()
            .with_sweep()
    }

    fn world_with_pair() -> SimWorld {
        let mut world = SimWorld::new();
        world.spawn(
            EntitySnapshot::player(EntityId(1), "Steve")
                .holding(ItemStack::new("minecraft:iron_sword")),
        );
        world.spawn(EntitySnapshot::new(EntityId(2), "minecraft:zombie").at(Vec3::new(0.0, 0.0, 2.0)));
        world
    }

    #[test]
    fn test_attack_uses_held_weapon_stats() {
        let mut world = world_with_pair();
        let mut engine = CombatEngine::with_seed(1);
        engine.weapons_mut().register(sword());

        let outcome = engine.attack(&mut world, EntityId(1), EntityId(2), 100).unwrap();
        assert!(outcome.hit);
        assert!((outcome.damage.final_damage - 6.0).abs() < 1e-9);
        assert_eq!(engine.status(EntityId(1)).unwrap().last_attack_time, 100);
    }

    #[test]
    fn test_attack_needs_live_entities() {
        let mut world = world_with_pair();
        let mut engine = CombatEngine::with_seed(1);
        assert!(engine.attack(&mut world, EntityId(1), EntityId(9), 100).is_none());

        world.set_health(EntityId(1), 0.0);
        assert!(engine.attack(&mut world, EntityId(1), EntityId(2), 100).is_none());
    }

    #[test]
    fn test_channel_registration_merges() {
        let world = SimWorld::new();
        let mut engine = CombatEngine::with_seed(1);
        engine.weapons_mut().register(sword());

        let payload = r#"{
            "channel": "sweep-and-slash:register-weapons",
            "weapons": [
                {"id": "minecraft:iron_sword", "attackSpeed": 2.0, "damage": 7.0},
                {"id": "mymod:katana", "attackSpeed": 1.8, "damage": 6.0}
            ]
        }"#;
        let merged = engine
            .register_weapons_from_channel(&world, REGISTER_WEAPONS_CHANNEL, payload)
            .unwrap();
        assert_eq!(
            merged,
            vec![
                ("minecraft:iron_sword".to_string(), MergeOutcome::Overwritten),
                ("mymod:katana".to_string(), MergeOutcome::Added),
            ]
        );
        assert_eq!(engine.weapons().get("minecraft:iron_sword").unwrap().damage, 7.0);
    }

    #[test]
    fn test_unknown_channel_is_rejected() {
        let world = SimWorld::new();
        let mut engine = CombatEngine::with_seed(1);
        let result = engine.register_weapons_from_channel(&world, "other:channel", "[]");
        assert!(matches!(result, Err(ChannelError::UnknownChannel(_))));
    }

    #[test]
    fn test_load_stats_dir_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.toml"),
            "[source]\nname = \"Vanilla\"\n\n[[weapons]]\nid = \"minecraft:iron_sword\"\nattackSpeed = 1.6\ndamage = 6.0\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("b.toml"), "not toml at all [").unwrap();

        let mut world = SimWorld::new();
        world.set_world_property(DEBUG_MODE, PropertyValue::Bool(true));
        let mut engine = CombatEngine::with_seed(1);
        let report = engine.load_stats_dir(&world, dir.path()).unwrap();

        assert_eq!(report.loaded, vec!["Vanilla".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert!(engine.weapons().contains("minecraft:iron_sword"));
    }

    #[test]
    fn test_run_deferred_drains_queue() {
        let mut world = world_with_pair();
        world.set_player_property(EntityId(1), "sweep", PropertyValue::Bool(true));
        world.spawn(EntitySnapshot::new(EntityId(3), "minecraft:pig").at(Vec3::new(1.0, 0.0, 2.0)));
        let mut engine = CombatEngine::with_seed(1);
        engine.weapons_mut().register(sword());

        let outcome = engine.attack(&mut world, EntityId(1), EntityId(2), 100).unwrap();
        assert!(outcome.swept);
        assert!(!engine.scheduler().is_empty());

        engine.run_deferred(&mut world);
        assert!(engine.scheduler().is_empty());
        assert_eq!(world.private_particles().len(), 1);
    }

    #[test]
    fn test_damage_table_for_held_weapon() {
        let mut world = world_with_pair();
        let mut engine = CombatEngine::with_seed(1);
        engine.weapons_mut().register(sword());

        let rows = engine.damage_table(&mut world, EntityId(1)).unwrap();
        assert_eq!(rows.len(), 14);
        assert!((rows[13].damage - 6.0).abs() < 1e-9);
    }
}
