
use weapon_core::stats::{attack_speed_or_default, damage_or_default};
use weapon_core::WeaponStats;

use super::calculation::{DamageOverrides, DamageRequest};
use crate::check::{cooldown_time, Checker};
use crate::host::EntitySnapshot;

/// Damage of a swing after `tick` ticks of charge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageTableRow {
    pub tick: u32,
    /// Charge in percent of the base cooldown
    pub percent: f64,
    pub damage: f64,
    /// Damage per second when swinging every `tick` ticks
    pub dps: f64,
    /// Same, with swings capped at two per second by invulnerability frames
    pub dps_with_iframes: f64,
}

impl Checker<'_> {
    /// Damage and DPS of the held weapon for every charge from 0 to full
    pub fn damage_table(
        &mut self,
        player: &EntitySnapshot,
        stats: Option<&WeaponStats>,
    ) -> Vec<DamageTableRow> {
        let attack_speed = attack_speed_or_default(stats);
        let base_damage = damage_or_default(stats);
        let window = cooldown_time(player, attack_speed).base_ticks.round();

        (0..=window as u32)
            .map(|tick| {
                let request = DamageRequest {
                    item: player.mainhand.as_ref(),
                    stats,
                    elapsed: tick as f64,
                    base_damage,
                    attack_speed,
                    overrides: DamageOverrides::default(),
                    probe_ticks: Some(window),
                };
                let damage = self.calculate_damage(player, player, &request).final_damage;
                let seconds = tick as f64 / 20.0;
                DamageTableRow {
                    tick,
                    percent: (tick as f64 * 100.0 / window).round(),
                    damage,
                    dps: damage / seconds,
                    dps_with_iframes: damage / seconds.max(0.5),
                }
            })
            .collect()
    }
}

/// Render a damage table as text
pub fn format_table(item: &str, rows: &[DamageTableRow]) -> String {
    let mut out = format!("{item}\n[ Ticks | Damage | DPS (with iframes) ]\n");
    for row in rows {
        out.push_str(&format!(
            "[ {} ({}%) | {:.2} | {:.2} ({:.2}) ]\n",
            row.tick, row.percent, row.damage, row.dps, row.dps_with_iframes
        ));
    }
    out
}
