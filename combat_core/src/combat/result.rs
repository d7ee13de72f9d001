use weapon_core::ItemStack;

use crate::check::DurabilityOutcome;
use crate::damage::DamageResult;
use crate::host::EntityId;

/// Fully resolved attack, handed to after-attack hooks
#[derive(Debug, Clone, PartialEq)]
pub struct AttackOutcome {
    pub attacker: EntityId,
    pub target: EntityId,
    pub item: Option<ItemStack>,
    pub tick: u64,
    pub damage: DamageResult,
    /// The host accepted the primary damage
    pub hit: bool,
    pub iframes_valid: bool,
    pub shield_block: bool,
    pub special_check: bool,
    pub crit: bool,
    pub sprint_knockback: bool,
    pub swept: bool,
    pub swept_entities: Vec<EntityId>,
    pub inanimate: bool,
    /// Attack charge in [0, 1]
    pub cooldown: f64,
    pub durability: DurabilityOutcome,
}
