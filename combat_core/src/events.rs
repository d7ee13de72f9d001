//! Inbound host events
//!
//! The host reports what happened in the world as [`CombatEvent`]s and the
//! engine reacts. With the addon switched off, only bookkeeping events
//! (spawns, item use, block interaction) are still processed.

use tracing::debug;
use weapon_core::ids::{entity, particle, sound};
use weapon_core::Vec3;

use crate::check::{is_inanimate, Checker, ARMOR_STAND_EXEMPT};
use crate::damage::format_table;
use crate::engine::CombatEngine;
use crate::host::{
    DamageCause, EntityId, EntitySnapshot, Host, ParticleCue, ParticleVariables, SoundCue,
};
use crate::scheduler::DeferredTask;
use crate::settings::{PlayerSettings, PlayerToggle, WorldSettings};
use crate::status::HitRecord;

/// Script event that prints the held weapon's damage table
pub const TEST_DAMAGE_EVENT: &str = "sns:testdamage";
/// Script event sent when a player swings at nothing
pub const AIR_SWING_EVENT: &str = "se:attack";

const AIR_SWING_SHIELD_TICKS: u32 = 5;
const VIEW_DISTANCE: f64 = 3.0;
const BLOCK_VIEW_DISTANCE: f64 = 8.0;
const TIP_MESSAGE: &str = "Tip: use /sns:config to open the Sweep 'N Slash settings";

#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    WorldLoaded,
    /// A melee hit, by a player or a mob
    EntityHitEntity {
        attacker: EntityId,
        target: EntityId,
    },
    EntityHurt {
        target: EntityId,
        source: Option<EntityId>,
        cause: DamageCause,
        damage: f64,
    },
    ItemStartUse {
        player: EntityId,
    },
    ItemStopUse {
        player: EntityId,
    },
    PlayerInteractWithBlock {
        player: EntityId,
    },
    EntityHitBlock {
        entity: EntityId,
    },
    ProjectileHitEntity {
        shooter: Option<EntityId>,
        projectile_type: String,
        target: EntityId,
    },
    ProjectileSpawned {
        projectile: EntityId,
        owner: Option<EntityId>,
    },
    PlayerSpawned {
        player: EntityId,
        initial: bool,
    },
    ScriptEvent {
        id: String,
        source: Option<EntityId>,
    },
    EntityRemoved {
        entity: EntityId,
    },
}

impl CombatEngine {
    /// React to one host event at `tick`
    pub fn handle_event(&mut self, host: &mut dyn Host, event: CombatEvent, tick: u64) {
        match event {
            CombatEvent::WorldLoaded => self.initialize_world(host),
            CombatEvent::PlayerSpawned { player, initial } => {
                self.on_player_spawn(host, player, initial, tick)
            }
            CombatEvent::ItemStartUse { player } => {
                self.statuses.get_or_create(player).hold_interact = true;
            }
            CombatEvent::ItemStopUse { player } => {
                self.statuses.get_or_create(player).hold_interact = false;
            }
            CombatEvent::PlayerInteractWithBlock { player } => {
                self.statuses.get_or_create(player).right_click = true;
            }
            CombatEvent::EntityRemoved { entity } => {
                self.statuses.remove(entity);
            }
            event => {
                if !WorldSettings::read(&*host).addon_enabled {
                    return;
                }
                self.handle_combat_event(host, event, tick);
            }
        }
    }

    fn handle_combat_event(&mut self, host: &mut dyn Host, event: CombatEvent, tick: u64) {
        match event {
            CombatEvent::EntityHitEntity { attacker, target } => {
                self.on_hit_entity(host, attacker, target, tick)
            }
            CombatEvent::EntityHurt {
                target,
                source,
                cause,
                damage,
            } => self.on_hurt(host, target, source, cause, damage, tick),
            CombatEvent::EntityHitBlock { entity } => {
                let Some(snapshot) = host.entity(entity) else {
                    return;
                };
                if !snapshot.is_player() || snapshot.is_creative() {
                    return;
                }
                let status = self.statuses.get_or_create(entity);
                status.last_shield_time = tick;
                status.last_attack_time = tick;
                status.left_click = true;
            }
            CombatEvent::ProjectileHitEntity {
                shooter,
                projectile_type,
                target,
            } => on_projectile_hit(host, shooter, &projectile_type, target),
            CombatEvent::ProjectileSpawned { projectile, owner } => {
                let Some(owner) = owner.and_then(|id| host.entity(id)) else {
                    return;
                };
                if let Err(error) = host.apply_impulse(projectile, owner.velocity) {
                    if WorldSettings::read(&*host).debug_mode {
                        debug!(%projectile, %error, "projectile kept its own velocity");
                    }
                }
            }
            CombatEvent::ScriptEvent { id, source } => {
                let Some(player) = source.and_then(|id| host.entity(id)).filter(|e| e.is_player())
                else {
                    return;
                };
                match id.as_str() {
                    TEST_DAMAGE_EVENT => self.log_damage_table(host, &player),
                    AIR_SWING_EVENT => self.on_air_swing(host, &player, tick),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn on_player_spawn(&mut self, host: &mut dyn Host, player: EntityId, initial: bool, tick: u64) {
        if initial {
            if PlayerSettings::tip_message(&*host, player) {
                host.send_message(player, TIP_MESSAGE);
            }
            PlayerSettings::initialize(host, player);
        }
        self.statuses.get_or_create(player).last_attack_time = tick;
    }

    fn on_hit_entity(&mut self, host: &mut dyn Host, attacker: EntityId, target: EntityId, tick: u64) {
        let Some(snapshot) = host.entity(attacker) else {
            return;
        };

        if !snapshot.is_player() {
            // Mobs hitting a raised shield must not be knocked back
            let Some(target) = host.entity(target) else {
                return;
            };
            let stats = snapshot
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
            if checker.shield_block(&snapshot, &target, stats, false) {
                if let Err(error) = checker.host.apply_knockback(attacker, 0.0, 0.0, 0.0) {
                    if checker.world.debug_mode {
                        debug!(%attacker, %error, "shield knockback cancel skipped");
                    }
                }
            }
            return;
        }

        self.statuses.get_or_create(attacker).left_click = true;
        self.attack(host, attacker, target, tick);
    }

    fn on_hurt(
        &mut self,
        host: &mut dyn Host,
        target: EntityId,
        source: Option<EntityId>,
        cause: DamageCause,
        damage: f64,
        tick: u64,
    ) {
        let Some(hurt) = host.entity(target) else {
            return;
        };
        let debug_mode = WorldSettings::read(&*host).debug_mode;
        let player_hit = self.statuses.get(target).is_some_and(|s| s.player_hit);

        // Only engine-resolved hits may push; everything else keeps the motion
        if source.is_none() && cause != DamageCause::Override && damage >= 0.0 && !player_hit {
            let result = host.apply_knockback(target, 0.0, 0.0, hurt.velocity.y);
            if let Err(error) = result {
                if debug_mode {
                    debug!(%target, %error, "knockback skipped");
                }
            }
        }

        let source = source.and_then(|id| host.entity(id)).filter(|e| e.is_player());
        self.statuses.get_or_create(target).player_hit = false;

        let record = |raw_damage| HitRecord {
            raw_damage,
            damage,
            tick,
        };
        let last_hit = match (source, cause) {
            (Some(player), DamageCause::EntityAttack) => {
                self.damage_indicator(&hurt, damage);
                let raw = self.statuses.get(player.id).map_or(0.0, |s| s.raw_damage);
                Some(record(raw))
            }
            (Some(_), DamageCause::MaceSmash) => {
                self.damage_indicator(&hurt, damage);
                None
            }
            _ => Some(record(damage)),
        };
        if let Some(hit) = last_hit {
            self.statuses.get_or_create(target).last_hit = Some(hit);
        }
    }

    /// Floating damage number for players who enabled it
    fn damage_indicator(&mut self, target: &EntitySnapshot, damage: f64) {
        let hearts = (damage.clamp(0.0, target.max_health) / 2.0).trunc();
        self.scheduler.schedule(DeferredTask::Particle {
            toggle: PlayerToggle::DamageIndicator,
            cue: ParticleCue {
                id: particle::DAMAGE_INDICATOR.to_string(),
                dimension: target.dimension.clone(),
                location: target.center() + Vec3::new(0.0, 0.5, 0.0),
                variables: ParticleVariables::default().with_float("variable.amount", hearts),
            },
        });
    }

    /// Swinging at air or a block starts the cooldown like a hit would
    fn on_air_swing(&mut self, host: &mut dyn Host, player: &EntitySnapshot, tick: u64) {
        let shield_cooldown = host.item_cooldown(player.id, entity::SHIELD);
        let shield_ticks = if shield_cooldown > 0 {
            shield_cooldown
        } else {
            AIR_SWING_SHIELD_TICKS
        };
        host.start_item_cooldown(player.id, entity::SHIELD, shield_ticks);

        let status = self.statuses.get_or_create(player.id);
        if status.left_click {
            status.left_click = false;
            return;
        }
        if status.right_click {
            status.right_click = false;
            status.last_shield_time = tick;
            return;
        }

        let looking_at_entity = host
            .entity_in_view(player.id, VIEW_DISTANCE)
            .and_then(|id| host.entity(id))
            .is_some_and(|e| !is_inanimate(&e, ARMOR_STAND_EXEMPT));
        if host.block_in_view(player.id, BLOCK_VIEW_DISTANCE) && !looking_at_entity {
            return;
        }
        status.last_attack_time = tick;
    }

    fn log_damage_table(&mut self, host: &mut dyn Host, player: &EntitySnapshot) {
        let debug_mode = WorldSettings::read(&*host).debug_mode;
        let Some(rows) = self.damage_table(host, player.id) else {
            return;
        };
        if !debug_mode {
            return;
        }
        let item = player.mainhand.as_ref();
        let mut title = item.map_or("hand", |i| i.type_id.as_str()).to_string();
        if item.is_some() && self.held_stats(player).is_none() {
            title.push_str(" (Weapon stats not found)");
        }
        debug!("{}", format_table(&title, &rows));
    }
}

/// Ding for shooters who hit another player with an arrow
fn on_projectile_hit(
    host: &mut dyn Host,
    shooter: Option<EntityId>,
    projectile_type: &str,
    target: EntityId,
) {
    let Some(shooter) = shooter.and_then(|id| host.entity(id)) else {
        return;
    };
    let hit_player = host.entity(target).is_some_and(|e| e.is_player());
    if !PlayerSettings::enabled(&*host, shooter.id, PlayerToggle::BowHitSound)
        || !hit_player
        || shooter.id == target
        || projectile_type != entity::ARROW
    {
        return;
    }
    let cue = SoundCue::new(sound::BOW_DING, shooter.location).pitch(0.5);
    let _ = host.play_sound_for(shooter.id, &cue);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PropertyValue;
    use crate::settings::{ADDON_TOGGLE, DEBUG_MODE};
    use crate::sim::SimWorld;
    use weapon_core::{ItemStack, WeaponStats};

    const STEVE: EntityId = EntityId(1);
    const ZOMBIE: EntityId = EntityId(2);

    fn setup() -> (SimWorld, CombatEngine) {
        let mut world = SimWorld::new();
        world.spawn(
            EntitySnapshot::player(STEVE, "Steve").holding(ItemStack::new("minecraft:iron_sword")),
        );
        world.spawn(EntitySnapshot::new(ZOMBIE, "minecraft:zombie").at(Vec3::new(0.0, 0.0, 2.0)));
        let mut engine = CombatEngine::with_seed(5);
        engine
            .weapons_mut()
            .register(WeaponStats::new("minecraft:iron_sword", 1.6, 6.0).weapon());
        (world, engine)
    }

    #[test]
    fn test_player_hit_runs_attack() {
        let (mut world, mut engine) = setup();
        engine.handle_event(
            &mut world,
            CombatEvent::EntityHitEntity {
                attacker: STEVE,
                target: ZOMBIE,
            },
            100,
        );
        assert_eq!(world.damage_log().len(), 1);
        assert!(engine.status(STEVE).unwrap().left_click);
        assert!(engine.status(ZOMBIE).unwrap().player_hit);
    }

    #[test]
    fn test_disabled_addon_ignores_combat() {
        let (mut world, mut engine) = setup();
        world.set_world_property(ADDON_TOGGLE, PropertyValue::Bool(false));
        engine.handle_event(
            &mut world,
            CombatEvent::EntityHitEntity {
                attacker: STEVE,
                target: ZOMBIE,
            },
            100,
        );
        assert!(world.damage_log().is_empty());

        engine.handle_event(&mut world, CombatEvent::ItemStartUse { player: STEVE }, 100);
        assert!(engine.status(STEVE).unwrap().hold_interact);
    }

    #[test]
    fn test_hurt_records_hit_for_iframes() {
        let (mut world, mut engine) = setup();
        engine.status_mut(STEVE).raw_damage = 6.0;
        engine.handle_event(
            &mut world,
            CombatEvent::EntityHurt {
                target: ZOMBIE,
                source: Some(STEVE),
                cause: DamageCause::EntityAttack,
                damage: 4.5,
            },
            200,
        );
        let hit = engine.status(ZOMBIE).unwrap().last_hit.unwrap();
        assert_eq!(hit, HitRecord { raw_damage: 6.0, damage: 4.5, tick: 200 });
        assert_eq!(engine.scheduler().len(), 1);

        engine.handle_event(
            &mut world,
            CombatEvent::EntityHurt {
                target: ZOMBIE,
                source: None,
                cause: DamageCause::Other,
                damage: 3.0,
            },
            210,
        );
        let hit = engine.status(ZOMBIE).unwrap().last_hit.unwrap();
        assert_eq!(hit, HitRecord { raw_damage: 3.0, damage: 3.0, tick: 210 });
    }

    #[test]
    fn test_sourceless_hurt_cancels_horizontal_knockback() {
        let (mut world, mut engine) = setup();
        world.entity_mut(ZOMBIE).unwrap().velocity = Vec3::new(0.3, -0.2, 0.1);
        engine.handle_event(
            &mut world,
            CombatEvent::EntityHurt {
                target: ZOMBIE,
                source: None,
                cause: DamageCause::Other,
                damage: 1.0,
            },
            10,
        );
        assert_eq!(world.entity(ZOMBIE).unwrap().velocity, Vec3::new(0.0, -0.2, 0.0));

        // the hurt that follows an engine hit keeps the engine's knockback
        engine.status_mut(ZOMBIE).player_hit = true;
        world.entity_mut(ZOMBIE).unwrap().velocity = Vec3::new(0.3, 0.4, 0.1);
        engine.handle_event(
            &mut world,
            CombatEvent::EntityHurt {
                target: ZOMBIE,
                source: None,
                cause: DamageCause::Other,
                damage: 1.0,
            },
            11,
        );
        assert_eq!(world.entity(ZOMBIE).unwrap().velocity, Vec3::new(0.3, 0.4, 0.1));
        assert!(!engine.status(ZOMBIE).unwrap().player_hit);
    }

    #[test]
    fn test_air_swing_starts_cooldown() {
        let (mut world, mut engine) = setup();
        let swing = || CombatEvent::ScriptEvent {
            id: AIR_SWING_EVENT.to_string(),
            source: Some(STEVE),
        };

        engine.handle_event(&mut world, swing(), 50);
        assert_eq!(engine.status(STEVE).unwrap().last_attack_time, 50);
        assert_eq!(world.item_cooldown(STEVE, entity::SHIELD), 5);

        engine.handle_event(&mut world, CombatEvent::PlayerInteractWithBlock { player: STEVE }, 60);
        engine.handle_event(&mut world, swing(), 60);
        let status = engine.status(STEVE).unwrap();
        assert_eq!(status.last_attack_time, 50);
        assert_eq!(status.last_shield_time, 60);
        assert!(!status.right_click);

        world.set_block_in_view(STEVE, true);
        engine.handle_event(&mut world, swing(), 70);
        assert_eq!(engine.status(STEVE).unwrap().last_attack_time, 50);
    }

    #[test]
    fn test_hit_block_resets_cooldown_for_survival_players() {
        let (mut world, mut engine) = setup();
        engine.handle_event(&mut world, CombatEvent::EntityHitBlock { entity: STEVE }, 30);
        let status = engine.status(STEVE).unwrap();
        assert_eq!(status.last_attack_time, 30);
        assert!(status.left_click);

        // the following air swing event is swallowed
        engine.handle_event(
            &mut world,
            CombatEvent::ScriptEvent {
                id: AIR_SWING_EVENT.to_string(),
                source: Some(STEVE),
            },
            31,
        );
        assert_eq!(engine.status(STEVE).unwrap().last_attack_time, 30);
    }

    #[test]
    fn test_first_spawn_initializes_player() {
        let (mut world, mut engine) = setup();
        engine.handle_event(
            &mut world,
            CombatEvent::PlayerSpawned {
                player: STEVE,
                initial: true,
            },
            5,
        );
        assert_eq!(world.messages().len(), 1);
        assert!(PlayerSettings::enabled(&world, STEVE, PlayerToggle::Sweep));
        assert_eq!(engine.status(STEVE).unwrap().last_attack_time, 5);

        world.set_player_property(STEVE, "tipMessage", PropertyValue::Bool(false));
        engine.handle_event(
            &mut world,
            CombatEvent::PlayerSpawned {
                player: STEVE,
                initial: true,
            },
            9,
        );
        assert_eq!(world.messages().len(), 1);
    }

    #[test]
    fn test_bow_ding_for_opted_in_shooter() {
        let (mut world, mut engine) = setup();
        world.spawn(EntitySnapshot::player(EntityId(3), "Alex"));
        world.set_player_property(STEVE, "bowHitSound", PropertyValue::Bool(true));

        let hit = |target| CombatEvent::ProjectileHitEntity {
            shooter: Some(STEVE),
            projectile_type: entity::ARROW.to_string(),
            target,
        };
        engine.handle_event(&mut world, hit(ZOMBIE), 1);
        assert!(world.private_sounds().is_empty());

        engine.handle_event(&mut world, hit(EntityId(3)), 2);
        let (listener, cue) = &world.private_sounds()[0];
        assert_eq!(*listener, STEVE);
        assert_eq!(cue.id, sound::BOW_DING);
        assert_eq!(cue.pitch, 0.5);
    }

    #[test]
    fn test_projectile_inherits_owner_velocity() {
        let (mut world, mut engine) = setup();
        world.entity_mut(STEVE).unwrap().velocity = Vec3::new(0.2, 0.0, 0.1);
        world.spawn(EntitySnapshot::new(EntityId(9), entity::ARROW));
        engine.handle_event(
            &mut world,
            CombatEvent::ProjectileSpawned {
                projectile: EntityId(9),
                owner: Some(STEVE),
            },
            1,
        );
        assert_eq!(world.entity(EntityId(9)).unwrap().velocity, Vec3::new(0.2, 0.0, 0.1));
    }

    #[test]
    fn test_mob_hitting_shield_is_not_knocked_back() {
        let (mut world, mut engine) = setup();
        let mut guard = world.entity(STEVE).unwrap();
        guard.offhand = Some(ItemStack::new(entity::SHIELD));
        guard.sneaking = true;
        world.spawn(guard);
        engine.status_mut(STEVE).shield_valid = true;
        world.entity_mut(ZOMBIE).unwrap().velocity = Vec3::new(0.5, 0.0, 0.5);
        // zombie stands in front of the player, who faces +Z
        engine.handle_event(
            &mut world,
            CombatEvent::EntityHitEntity {
                attacker: ZOMBIE,
                target: STEVE,
            },
            40,
        );
        assert_eq!(world.knockbacks().len(), 1);
        assert_eq!(world.entity(ZOMBIE).unwrap().velocity, Vec3::ZERO);
    }

    #[test]
    fn test_removed_entity_loses_status() {
        let (mut world, mut engine) = setup();
        engine.status_mut(ZOMBIE).fall_distance = -1.0;
        engine.handle_event(&mut world, CombatEvent::EntityRemoved { entity: ZOMBIE }, 1);
        assert!(engine.status(ZOMBIE).is_none());
    }

    #[test]
    fn test_damage_table_event_needs_player_source() {
        let (mut world, mut engine) = setup();
        world.set_world_property(DEBUG_MODE, PropertyValue::Bool(true));
        engine.handle_event(
            &mut world,
            CombatEvent::ScriptEvent {
                id: TEST_DAMAGE_EVENT.to_string(),
                source: Some(ZOMBIE),
            },
            1,
        );
        assert!(engine.status(ZOMBIE).is_none());
        engine.handle_event(
            &mut world,
            CombatEvent::ScriptEvent {
                id: TEST_DAMAGE_EVENT.to_string(),
                source: Some(STEVE),
            },
            1,
        );
        assert!(world.damage_log().is_empty());
    }
}
