//! Attack orchestration

mod context;
mod resolution;
mod result;

pub use context::{AttackContext, AttackOverrides, BeforeAttackContext};
pub use resolution::resolve_attack;
pub use result::AttackOutcome;
