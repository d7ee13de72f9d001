use tracing::debug;
use weapon_core::ids::{enchantment, entity, particle, sound};
use weapon_core::item::enchant_level;
use weapon_core::stats::{attack_speed_or_default, damage_or_default};
use weapon_core::{Vec3, WeaponStats};

use super::context::{AttackContext, AttackOverrides, BeforeAttackContext};
use super::result::AttackOutcome;
use crate::check::{
    attack_charge, cooldown_time, is_inanimate, Checker, CritCues, DurabilityOutcome, HitOptions,
    SweepCues, SweepOptions, ARMOR_STAND_EXEMPT,
};
use crate::config::constants;
use crate::damage::DamageResult;
use crate::hooks::{CombatHook, HookRegistry};
use crate::host::{DamageCause, EntitySnapshot, ParticleVariables, SoundCue};
use crate::knockback::{apply_attack_knockback, attack_destination, KnockbackDistances};
use crate::scheduler::DeferredTask;
use crate::settings::PlayerToggle;
use crate::status::HitRecord;
use std::sync::Arc;

fn lookup_hook(
    checker: &Checker<'_>,
    hooks: &HookRegistry,
    name: Option<&str>,
) -> Option<Arc<dyn CombatHook>> {
    let name = name?;
    let hook = hooks.get(name);
    if hook.is_none() && checker.world.debug_mode {
        debug!(hook = name, "weapon names an unregistered hook");
    }
    hook
}

/// Resolve one melee hit of `attacker` on `target`
pub fn resolve_attack(
    checker: &mut Checker<'_>,
    hooks: &HookRegistry,
    attacker: &EntitySnapshot,
    target: &EntitySnapshot,
    stats: Option<&WeaponStats>,
) -> AttackOutcome {
    let tick = checker.tick;
    let item = attacker.mainhand.as_ref();

    let max_cooldown = cooldown_time(attacker, attack_speed_or_default(stats))
        .ticks
        .round();
    let remaining = checker.remaining_cooldown(attacker, stats);
    checker.statuses.get_or_create(attacker.id).cooldown = remaining;
    let charge = attack_charge(max_cooldown, remaining);

    // Estimates for the hook, without cues
    let crit = checker.critical_hit(attacker, target, stats, HitOptions::probe(), &CritCues::default());
    let sprint_knockback = checker.sprint_knockback(attacker, target, stats, HitOptions::probe());
    let preview = checker.sweep(attacker, target, stats, &SweepOptions::default(), &SweepCues::default());
    let special_check = checker.special_valid(attacker, stats);

    let last_hit = checker
        .statuses
        .get(target.id)
        .and_then(|s| s.last_hit)
        .unwrap_or(HitRecord {
            raw_damage: 0.0,
            damage: 0.0,
            tick: 0,
        });
    let time_valid = tick.saturating_sub(last_hit.tick) >= constants().iframes.ticks;

    let overrides = match lookup_hook(checker, hooks, stats.and_then(|s| s.before_effect.as_deref())) {
        Some(hook) => {
            let context = BeforeAttackContext {
                attacker: attacker.clone(),
                target: target.clone(),
                item: item.cloned(),
                damage: damage_or_default(stats),
                special_check,
                swept_entities: preview.common_entities.clone(),
                crit,
                sprint_knockback,
                cooldown: charge,
                iframes: !time_valid,
                tick,
            };
            hook.before_attack(&context, &*checker.host)
        }
        None => AttackOverrides::default(),
    };

    let context = AttackContext {
        attacker,
        target,
        item,
        stats,
        tick,
        charge,
        overrides,
    };
    let mut outcome = apply_attack(checker, &context, time_valid, last_hit, special_check);
    if !outcome.iframes_valid {
        outcome.swept_entities = preview.common_entities;
    }

    if let Some(hook) = lookup_hook(checker, hooks, stats.and_then(|s| s.script.as_deref())) {
        checker.scheduler.schedule(DeferredTask::AfterAttack {
            hook,
            outcome: Box::new(outcome.clone()),
        });
    }
    outcome
}

fn apply_attack(
    checker: &mut Checker<'_>,
    context: &AttackContext<'_>,
    time_valid: bool,
    last_hit: HitRecord,
    special_check: bool,
) -> AttackOutcome {
    let AttackContext {
        attacker,
        target,
        item,
        stats,
        tick,
        charge,
        ref overrides,
    } = *context;

    let defaults = KnockbackDistances::default();
    let distances = KnockbackDistances {
        regular: overrides
            .regular_knockback
            .or(stats.and_then(|s| s.regular_knockback))
            .unwrap_or(defaults.regular),
        enchanted: overrides
            .enchanted_knockback
            .or(stats.and_then(|s| s.enchanted_knockback))
            .unwrap_or(defaults.enchanted),
    };

    let damage = checker.final_damage(attacker, target, stats, overrides.damage_overrides());
    let crit = checker.critical_hit(
        attacker,
        target,
        stats,
        HitOptions::resolved(damage.final_damage, overrides.crit_attack),
        &overrides.crit_cues(),
    );
    let sprint_knockback = checker.sprint_knockback(
        attacker,
        target,
        stats,
        HitOptions::resolved(damage.final_damage, overrides.sprint_knockback),
    );

    let fire_aspect = enchant_level(item, enchantment::FIRE_ASPECT);
    let inanimate = is_inanimate(target, ARMOR_STAND_EXEMPT);
    let knockback_level = enchant_level(item, enchantment::KNOCKBACK) + u32::from(sprint_knockback);

    // Swinging lowers the attacker's own shield
    let shield_cooldown = checker.host.item_cooldown(attacker.id, entity::SHIELD);
    checker
        .host
        .start_item_cooldown(attacker.id, entity::SHIELD, shield_cooldown.max(1));
    checker.statuses.get_or_create(attacker.id).last_shield_time = tick;

    let shield_block = checker.shield_block(attacker, target, stats, true);
    let cause = if shield_block {
        DamageCause::EntityExplosion
    } else {
        DamageCause::EntityAttack
    };

    checker.statuses.get_or_create(attacker.id).raw_damage = damage.raw;
    checker.statuses.get_or_create(target.id).player_hit = true;

    let iframes_valid = (time_valid
        || (damage.raw > last_hit.raw_damage && damage.final_damage > last_hit.damage))
        && !(target.is_player() && target.is_creative());

    let mut outcome = AttackOutcome {
        attacker: attacker.id,
        target: target.id,
        item: item.cloned(),
        tick,
        damage,
        hit: false,
        iframes_valid,
        shield_block,
        special_check,
        crit,
        sprint_knockback,
        swept: false,
        swept_entities: Vec::new(),
        inanimate,
        cooldown: charge,
        durability: DurabilityOutcome::Unchanged,
    };

    if iframes_valid {
        let sweep = checker.sweep(
            attacker,
            target,
            stats,
            &overrides.sweep_options(fire_aspect, damage.final_damage),
            &overrides.sweep_cues(),
        );
        outcome.swept = sweep.swept;
        outcome.swept_entities = sweep.common_entities;

        let mace = checker.statuses.get(attacker.id).is_some_and(|s| s.mace);
        let damage_valid = if mace && attacker.falling {
            false
        } else {
            checker
                .host
                .apply_damage(target.id, damage.final_damage, cause, Some(attacker.id))
        };
        outcome.hit = damage_valid;

        let attacker_now = checker
            .host
            .entity(attacker.id)
            .unwrap_or_else(|| attacker.clone());
        let target_now = checker
            .host
            .entity(target.id)
            .unwrap_or_else(|| target.clone());

        if !mace && !inanimate && damage.final_damage > 0.0 {
            if let Some(player) = attacker_now.player.as_ref().filter(|p| !p.creative) {
                let exhaustion = player.exhaustion + constants().durability.exhaustion_per_hit;
                checker.host.set_exhaustion(attacker.id, exhaustion);
            }
            if !overrides.cancel_durability {
                outcome.durability = checker.reduce_durability(attacker, stats);
            }
        }

        if damage_valid && !shield_block {
            let result = if time_valid || knockback_level > 0 {
                let (destination, height) = attack_destination(
                    knockback_level,
                    distances,
                    attacker_now.location,
                    attacker_now.yaw,
                    target_now.location,
                    target_now.on_ground,
                );
                apply_attack_knockback(&mut *checker.host, &target_now, destination, height)
            } else {
                let velocity = target_now.velocity;
                checker
                    .host
                    .apply_knockback(target.id, velocity.x, velocity.z, velocity.y)
            };
            if let Err(error) = result {
                if checker.world.debug_mode {
                    debug!(target = %target.id, %error, "knockback skipped");
                }
            }
        }

        if damage.final_damage > 0.0 {
            if damage.enchanted_hit {
                checker.selective_particle(
                    PlayerToggle::EnchantedHit,
                    &target_now.dimension,
                    particle::ENCHANTED_HIT,
                    target_now.center() + Vec3::new(0.0, 1.0, 0.0),
                    Vec3::ZERO,
                    ParticleVariables::default(),
                );
            }
            if !(outcome.swept || crit) {
                let id = if special_check {
                    sound::STRONG
                } else {
                    sound::WEAK
                };
                checker.play_sound(
                    &attacker_now.dimension,
                    SoundCue::new(id, attacker_now.location).volume(0.7),
                );
            }
        }
    } else if damage.final_damage > 0.0 {
        checker.play_sound(
            &attacker.dimension,
            SoundCue::new(sound::NO_DAMAGE, attacker.location).volume(0.7),
        );
    }

    report(checker, context, &damage, iframes_valid);

    if damage.final_damage >= 0.0 {
        checker.statuses.get_or_create(attacker.id).last_attack_time = tick;
    }
    outcome
}

fn report(
    checker: &Checker<'_>,
    context: &AttackContext<'_>,
    damage: &DamageResult,
    iframes_valid: bool,
) {
    if !checker.world.debug_mode {
        return;
    }
    let attacker = context.attacker;
    let name = attacker
        .player
        .as_ref()
        .map_or(attacker.type_id.as_str(), |p| p.name.as_str());
    debug!(
        attacker = name,
        item = context.item.map_or("hand", |i| i.type_id.as_str()),
        stats_found = context.stats.is_some() || context.item.is_none(),
        damage = damage.final_damage,
        charge = context.charge,
        iframes_immune = !iframes_valid,
        ticks_since_last_attack = checker.elapsed(attacker),
        "damage result"
    );
}
