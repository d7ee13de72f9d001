//! Damage/speed lore line written onto items that have a stat block

use crate::stats::WeaponStats;

/// Items with this many lore lines or more are left alone
pub const MAX_LORE_LINES: usize = 100;
/// Lore lines longer than this are never written
pub const MAX_LORE_LINE_LEN: usize = 1000;

const STAT_PREFIX: &str = "§r§2";

fn damage_text(stats: &WeaponStats) -> String {
    format!("{STAT_PREFIX} {} DMG", stats.damage)
}

fn speed_text(stats: &WeaponStats) -> String {
    format!("{STAT_PREFIX}{} SPD", stats.attack_speed)
}

/// The lore entry describing a weapon's damage and attack speed
pub fn stat_lore_line(stats: &WeaponStats) -> String {
    format!("{}\n {}", damage_text(stats), speed_text(stats))
}

fn is_stat_line(line: &str) -> bool {
    (line.contains("SPD") || line.contains("DMG"))
        && (line.starts_with(STAT_PREFIX) || line.starts_with(&format!(" {STAT_PREFIX}")))
}

/// Compute the updated lore for an item, or None when nothing should change
///
/// Existing stat lines are replaced rather than duplicated. With `skip_lore`
/// the stat lines are stripped instead.
pub fn refresh_lore(existing: &[String], stats: &WeaponStats) -> Option<Vec<String>> {
    let line = stat_lore_line(stats);
    if existing.len() >= MAX_LORE_LINES || line.len() > MAX_LORE_LINE_LEN {
        return None;
    }

    let (stat_lines, other_lines): (Vec<&String>, Vec<&String>) =
        existing.iter().partition(|l| is_stat_line(l));
    let joined: String = stat_lines
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(",");

    if joined.contains(&speed_text(stats)) && joined.contains(&damage_text(stats)) {
        return None;
    }

    let mut lore: Vec<String> = Vec::with_capacity(other_lines.len() + 1);
    if !stats.skip_lore {
        lore.push(line);
    }
    lore.extend(other_lines.into_iter().cloned());

    if lore.as_slice() == existing {
        None
    } else {
        Some(lore)
    }
}
