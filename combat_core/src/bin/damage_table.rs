//! Damage Table
//!
//! Prints damage and DPS per tick of charge for a weapon, using stat files
//! from a directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use combat_core::config::{init_constants, init_constants_default};
use combat_core::damage::format_table;
use combat_core::prelude::*;

/// Damage Table - damage and DPS over the attack cooldown
#[derive(Parser, Debug)]
#[command(name = "damage_table")]
#[command(about = "Print the damage curve of a weapon from its stat files")]
struct Args {
    /// Item id of the weapon, e.g. minecraft:iron_sword
    weapon: String,

    /// Directory of weapon stat files
    #[arg(long, default_value = "data/weapons")]
    stats_dir: PathBuf,

    /// Combat constants TOML, built-in defaults when absent
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Haste level of the wielder
    #[arg(long, default_value_t = 0)]
    haste: u32,

    /// Strength level of the wielder
    #[arg(long, default_value_t = 0)]
    strength: u32,

    /// Sharpness level on the weapon
    #[arg(long, default_value_t = 0)]
    sharpness: u32,
}

const WIELDER: EntityId = EntityId(1);

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("combat_core=info")),
        )
        .init();

    let args = Args::parse();

    let constants = match &args.constants {
        Some(path) => init_constants(path),
        None => init_constants_default(),
    };
    if let Err(error) = constants {
        tracing::error!(%error, "failed to load combat constants");
        return ExitCode::FAILURE;
    }

    let mut world = SimWorld::new();
    let mut engine = CombatEngine::new();
    match engine.load_stats_dir(&world, &args.stats_dir) {
        Ok(report) => {
            for line in report.lines() {
                tracing::info!("{line}");
            }
        }
        Err(error) => {
            tracing::error!(%error, dir = ?args.stats_dir, "failed to read weapon stats");
            return ExitCode::FAILURE;
        }
    }
    if !engine.weapons().contains(&args.weapon) {
        tracing::warn!(weapon = %args.weapon, "no stat block found, using bare-hand stats");
    }

    let mut item = ItemStack::new(&args.weapon);
    if args.sharpness > 0 {
        item = item.with_enchantment("sharpness", args.sharpness);
    }
    let mut wielder = EntitySnapshot::player(WIELDER, "wielder").holding(item);
    if args.haste > 0 {
        wielder = wielder.with_effect("haste", args.haste - 1);
    }
    if args.strength > 0 {
        wielder = wielder.with_effect("strength", args.strength - 1);
    }
    world.spawn(wielder);

    let Some(rows) = engine.damage_table(&mut world, WIELDER) else {
        return ExitCode::FAILURE;
    };
    println!("{}", format_table(&args.weapon, &rows));
    ExitCode::SUCCESS
}
