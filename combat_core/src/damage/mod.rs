//! Damage formula and damage tables

mod calculation;
mod table;

pub use calculation::{
    charge_multiplier, enchant_scale, sharpness_bonus, DamageOverrides, DamageRequest,
    DamageResult,
};
pub use table::{format_table, DamageTableRow};
