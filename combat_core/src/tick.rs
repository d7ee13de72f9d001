//! Per-tick status maintenance
//!
//! Runs once per game tick after deferred work: shield timing, cooldown reset
//! on item switch, the sprint-knockback flags, fall tracking for mace smashes,
//! saturation healing, item lore and the cooldown indicator.

use weapon_core::ids::{effect, entity};
use weapon_core::lore::refresh_lore;
use weapon_core::stats::attack_speed_or_default;
use weapon_core::WeaponStats;
use weapon_tables::WeaponRegistry;

use crate::check::{cooldown_time, is_blocking, is_inanimate, special_valid_at, ARMOR_STAND_EXEMPT};
use crate::engine::CombatEngine;
use crate::host::{EntityId, EntitySnapshot, Host, IndicatorDisplay};
use crate::scheduler::{DeferredTask, Scheduler};
use crate::settings::{CooldownStyle, PlayerSettings, WorldSettings};
use crate::status::CombatStatus;

/// Event telling the host a mace smash is charged
pub const MACE_EVENT: &str = "sweepnslash:mace";
pub const NOT_MACE_EVENT: &str = "sweepnslash:not_mace";

const LORE_INTERVAL: u64 = 40;
const SHIELD_DELAY: u64 = 5;
const MACE_FALL_DISTANCE: f64 = 1.5;
const VIEW_DISTANCE: f64 = 3.0;
const MAX_SATURATION: f64 = 20.0;
const SATURATION_HEAL_TICKS: f64 = 10.0;
const HUNGER_HEAL_TICKS: f64 = 80.0;
const INDICATOR_PIXELS: f64 = 16.0;
const SUBTITLE_DOTS: i64 = 10;

impl CombatEngine {
    /// Advance the engine by one game tick
    pub fn tick(&mut self, host: &mut dyn Host, tick: u64) {
        self.run_deferred(host);

        let world = WorldSettings::read(&*host);
        if world.saturation_healing && host.natural_regeneration() {
            host.set_natural_regeneration(false);
        }

        for id in host.players() {
            let Some(player) = host.entity(id) else {
                continue;
            };
            if tick % LORE_INTERVAL == 0 {
                refresh_inventory_lore(host, &self.weapons, id);
            }

            let stats = player
                .mainhand
                .as_ref()
                .and_then(|item| self.weapons.get(&item.type_id));
            let status = self.statuses.get_or_create(id);

            update_shield(&*host, &player, status, tick);
            update_selection(&player, status, tick);
            update_sprint(&player, status);
            update_fall(host, &mut self.scheduler, &player, status, &world);
            heal_from_food(host, &player, status, &world);
            update_indicator(host, &player, stats, status, &world, tick);
        }
    }
}

/// Write the damage/speed lore onto every stat-bearing inventory item
fn refresh_inventory_lore(host: &mut dyn Host, weapons: &WeaponRegistry, player: EntityId) {
    for (slot, item) in host.inventory(player) {
        let Some(stats) = weapons.get(&item.type_id) else {
            continue;
        };
        if let Some(lore) = refresh_lore(&item.lore, stats) {
            host.set_lore(player, slot, lore);
        }
    }
}

/// A raised shield only blocks after a short delay (or on the first tick)
fn update_shield(host: &dyn Host, player: &EntitySnapshot, status: &mut CombatStatus, tick: u64) {
    if !(is_blocking(host, player) && !status.hold_interact) {
        status.last_shield_time = tick;
    }
    let raised_for = tick.saturating_sub(status.last_shield_time);
    status.shield_valid = raised_for >= SHIELD_DELAY || raised_for == 1;
}

/// Switching to a different held item restarts the attack cooldown
fn update_selection(player: &EntitySnapshot, status: &mut CombatStatus, tick: u64) {
    let item = player.mainhand.as_ref().map(|i| i.type_id.clone());
    if status.last_selected_item != item {
        status.last_attack_time = tick;
    }
    status.last_selected_slot = player.player.as_ref().map(|p| p.selected_slot);
    status.last_selected_item = item;
}

/// One sprint-knockback hit per sprint; crits and sweeps wait until it is used
fn update_sprint(player: &EntitySnapshot, status: &mut CombatStatus) {
    if player.sprinting {
        status.sprint_knockback_valid = !status.sprint_knockback_hit_used;
    } else {
        status.sprint_knockback_hit_used = false;
        status.sprint_knockback_valid = false;
    }
    status.crit_sweep_valid = !player.sprinting || status.sprint_knockback_hit_used;
}

fn free_falling(player: &EntitySnapshot) -> bool {
    player.falling
        && !player.gliding
        && !player.on_ground
        && !player.in_water
        && !player.flying
        && !player.climbing
        && player.effect_level(effect::SLOW_FALLING) == 0
        && player.effect_level(effect::LEVITATION) == 0
}

/// Track fall distance and tell the host whether a mace smash is charged
fn update_fall(
    host: &mut dyn Host,
    scheduler: &mut Scheduler,
    player: &EntitySnapshot,
    status: &mut CombatStatus,
    world: &WorldSettings,
) {
    let fallen = status.fall_distance;
    if free_falling(player) {
        status.fall_distance = fallen + player.velocity.y;
    } else {
        scheduler.schedule(DeferredTask::ResetFallDistance(player.id));
    }

    if !world.addon_enabled {
        host.trigger_event(player.id, MACE_EVENT);
        return;
    }
    let holds_mace = player.mainhand.as_ref().is_some_and(|i| i.is(entity::MACE));
    status.mace = fallen.abs() >= MACE_FALL_DISTANCE && holds_mace;
    let event = if status.mace { MACE_EVENT } else { NOT_MACE_EVENT };
    host.trigger_event(player.id, event);
}

/// Saturation effect and food-driven regeneration
fn heal_from_food(
    host: &mut dyn Host,
    player: &EntitySnapshot,
    status: &mut CombatStatus,
    world: &WorldSettings,
) {
    let Some(food) = player.player.as_ref() else {
        return;
    };

    let saturation_level = player.effect_level(effect::SATURATION);
    if saturation_level > 0 && player.is_alive() {
        let boosted = food.saturation + saturation_level as f64 * 2.0;
        host.set_saturation(player.id, boosted.clamp(0.0, MAX_SATURATION));
    }

    let can_heal = world.saturation_healing
        && food.hunger >= 18.0
        && player.is_alive()
        && player.health < player.max_health
        && !food.creative;
    if !can_heal {
        status.food_tick_timer = 0.0;
        return;
    }

    status.food_tick_timer += 1.0;
    let using_saturation = food.saturation > 0.0 && food.hunger >= 20.0;
    let interval = if using_saturation {
        SATURATION_HEAL_TICKS
    } else {
        HUNGER_HEAL_TICKS
    };
    if status.food_tick_timer < interval {
        return;
    }

    let (heal, exhaustion) = if using_saturation {
        let heal = (food.saturation / 6.0).min(1.0);
        (heal, heal * 6.0)
    } else {
        (1.0, 6.0)
    };
    host.set_exhaustion(player.id, food.exhaustion + exhaustion);
    host.set_health(
        player.id,
        (player.health + heal).clamp(0.0, player.max_health),
    );
    status.food_tick_timer = 0.0;
}

/// Indicator fill in pixels, 0..=16
pub fn indicator_pixels(max_cooldown: f64, remaining: f64) -> u32 {
    let pixels = (((max_cooldown.round() - remaining) / max_cooldown) * 17.0)
        .floor()
        .min(INDICATOR_PIXELS);
    if pixels.is_nan() {
        return 0;
    }
    pixels.clamp(0.0, INDICATOR_PIXELS) as u32
}

/// Subtitle-style indicator: ten dots, light ones for the charged part
pub fn indicator_subtitle(pixels: u32) -> String {
    let light = (pixels as f64 / 1.6).round() as i64;
    let dark = SUBTITLE_DOTS - light;
    let mut text = "§7˙".repeat(light.max(0) as usize);
    text.push_str(&"§8˙".repeat(dark.max(0) as usize));
    text
}

/// Entity the player looks at that a swing would actually hit
fn view_target(host: &dyn Host, player: &EntitySnapshot) -> Option<EntitySnapshot> {
    host.entity_in_view(player.id, VIEW_DISTANCE)
        .and_then(|id| host.entity(id))
        .filter(|e| !is_inanimate(e, ARMOR_STAND_EXEMPT))
        .filter(|e| e.is_alive())
        .filter(|e| e.riding != Some(player.id) && player.riding != Some(e.id))
}

/// Refresh the remaining cooldown and drive the on-screen indicator
fn update_indicator(
    host: &mut dyn Host,
    player: &EntitySnapshot,
    stats: Option<&WeaponStats>,
    status: &mut CombatStatus,
    world: &WorldSettings,
    tick: u64,
) {
    let max_cooldown = cooldown_time(player, attack_speed_or_default(stats)).ticks;
    let last = status.last_attack_time as f64;
    status.cooldown = (last + max_cooldown - tick as f64).max(0.0);
    let remaining = status.cooldown;

    let pixels = indicator_pixels(max_cooldown, remaining);
    let special = special_valid_at(status.elapsed(tick) as f64, max_cooldown);
    let in_view = view_target(&*host, player).is_some();
    let style = PlayerSettings::read(&*host, player.id).cooldown_style;

    if !world.addon_enabled || style == CooldownStyle::None {
        if status.show_bar {
            host.show_indicator(player.id, IndicatorDisplay::Clear);
            status.show_bar = false;
        }
    } else {
        status.show_bar = true;
        if remaining > 0.0 || (in_view && stats.is_some() && style == CooldownStyle::Crosshair) {
            let ready = special && in_view && remaining <= 0.0;
            let display = if style == CooldownStyle::Subtitle {
                IndicatorDisplay::Subtitle {
                    text: indicator_subtitle(pixels),
                }
            } else {
                IndicatorDisplay::Sprite {
                    text: format!(
                        "_sweepnslash:{}:{}:{pixels}",
                        style.code(),
                        if ready { 't' } else { 'f' }
                    ),
                }
            };
            host.show_indicator(player.id, display);
            status.attack_ready = false;
        } else if !status.attack_ready {
            host.show_indicator(player.id, IndicatorDisplay::Clear);
            status.attack_ready = true;
        }
    }

    if world.addon_enabled && world.debug_mode {
        let percent = ((max_cooldown - remaining) / max_cooldown * 100.0).floor();
        let text = format!(
            "{} ({}{percent}%§f)",
            remaining.trunc(),
            if special { "§a" } else { "" }
        );
        host.set_action_bar(player.id, &text);
    }
}
