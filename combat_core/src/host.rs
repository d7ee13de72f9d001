//! The seam between the combat engine and the game host
//!
//! The engine never owns world state. It reads entity snapshots, asks the host
//! spatial questions and issues mutations through [`Host`]. The in-memory
//! [`crate::sim::SimWorld`] implements it for tests and tooling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use weapon_core::ids::{effect, entity};
use weapon_core::{ItemStack, Vec3};

/// Stable identity of a host entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Error returned by a host mutation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("entity {0} is no longer valid")]
    EntityInvalid(EntityId),
    #[error("host rejected the request: {0}")]
    Rejected(String),
}

/// Damage cause tag attached to applied damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCause {
    EntityAttack,
    /// Used for shield-blocked hits so the host skips its own shield handling
    EntityExplosion,
    MaceSmash,
    Projectile,
    /// Damage applied by commands or scripts bypassing combat rules
    Override,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Thunder,
}

/// Player-only state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub creative: bool,
    pub selected_slot: u32,
    /// Playing with touch controls
    pub touch_input: bool,
    pub hunger: f64,
    pub saturation: f64,
    pub exhaustion: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        PlayerState {
            name: String::new(),
            creative: false,
            selected_slot: 0,
            touch_input: false,
            hunger: 20.0,
            saturation: 5.0,
            exhaustion: 0.0,
        }
    }
}

/// Read-only view of an entity at the moment it was queried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub type_id: String,
    pub families: Vec<String>,
    pub dimension: String,
    pub location: Vec3,
    pub head_location: Vec3,
    pub velocity: Vec3,
    /// Body yaw in degrees
    pub yaw: f64,
    pub view_direction: Vec3,
    pub on_ground: bool,
    pub falling: bool,
    pub in_water: bool,
    pub flying: bool,
    pub climbing: bool,
    pub gliding: bool,
    pub sprinting: bool,
    pub sneaking: bool,
    /// Entity this one rides
    pub riding: Option<EntityId>,
    pub tamed: bool,
    pub fire_immune: bool,
    /// No sky access at the entity's location
    pub underground: bool,
    pub movement_speed: f64,
    pub health: f64,
    pub max_health: f64,
    /// Effect id -> amplifier (0 = level I)
    pub effects: BTreeMap<String, u32>,
    pub mainhand: Option<ItemStack>,
    pub offhand: Option<ItemStack>,
    pub player: Option<PlayerState>,
}

impl EntitySnapshot {
    /// A grounded, idle entity of the given type with 20 health
    pub fn new(id: EntityId, type_id: impl Into<String>) -> Self {
        EntitySnapshot {
            id,
            type_id: type_id.into(),
            families: Vec::new(),
            dimension: "minecraft:overworld".to_string(),
            location: Vec3::ZERO,
            head_location: Vec3::new(0.0, 1.62, 0.0),
            velocity: Vec3::ZERO,
            yaw: 0.0,
            view_direction: Vec3::new(0.0, 0.0, 1.0),
            on_ground: true,
            falling: false,
            in_water: false,
            flying: false,
            climbing: false,
            gliding: false,
            sprinting: false,
            sneaking: false,
            riding: None,
            tamed: false,
            fire_immune: false,
            underground: false,
            movement_speed: 0.1,
            health: 20.0,
            max_health: 20.0,
            effects: BTreeMap::new(),
            mainhand: None,
            offhand: None,
            player: None,
        }
    }

    /// A survival-mode player
    pub fn player(id: EntityId, name: impl Into<String>) -> Self {
        let mut snapshot = EntitySnapshot::new(id, entity::PLAYER);
        snapshot.player = Some(PlayerState {
            name: name.into(),
            ..Default::default()
        });
        snapshot
    }

    pub fn at(mut self, location: Vec3) -> Self {
        self.head_location = location + (self.head_location - self.location);
        self.location = location;
        self
    }

    pub fn holding(mut self, item: ItemStack) -> Self {
        self.mainhand = Some(item);
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.families.push(family.into());
        self
    }

    pub fn with_effect(mut self, id: impl Into<String>, amplifier: u32) -> Self {
        self.effects.insert(id.into(), amplifier);
        self
    }

    pub fn is_player(&self) -> bool {
        self.player.is_some()
    }

    pub fn is_creative(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.creative)
    }

    pub fn is_type(&self, type_id: &str) -> bool {
        self.type_id == type_id
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.families.iter().any(|f| f == family)
    }

    /// Effect level (amplifier + 1), 0 when the effect is absent
    pub fn effect_level(&self, id: &str) -> u32 {
        self.effects.get(id).map_or(0, |amp| amp + 1)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Point roughly in the middle of the hitbox
    pub fn center(&self) -> Vec3 {
        let lift = if self.is_type(entity::ENDER_DRAGON) {
            3.0
        } else {
            0.0
        };
        Vec3::new(
            self.location.x,
            (self.location.y + self.head_location.y) / 2.0 + lift,
            self.location.z,
        )
    }

    /// Point `distance` blocks ahead along the body yaw, `height` above mid-body
    pub fn view_point(&self, distance: f64, height: f64) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(
            self.location.x - yaw.sin() * distance,
            (self.location.y + self.head_location.y) / 2.0 + height,
            self.location.z + yaw.cos() * distance,
        )
    }

    /// Moving horizontally faster than sprinting allows
    pub fn is_faster_than_walk(&self) -> bool {
        let walk = if self.sprinting {
            self.movement_speed * 10.0 / 13.0
        } else {
            self.movement_speed
        };
        self.velocity.horizontal_length() >= walk * 2.1585 && self.sprinting
    }

    /// Crit-blocking states: levitating in water, gliding and so on
    pub fn is_airborne_for_crit(&self) -> bool {
        self.falling
            && !self.on_ground
            && !self.in_water
            && !self.flying
            && !self.climbing
            && self.riding.is_none()
            && self.effect_level(effect::BLINDNESS) == 0
            && self.effect_level(effect::SLOW_FALLING) == 0
    }
}

/// RGB color in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Molang-style variables passed along with a particle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticleVariables {
    pub floats: BTreeMap<String, f64>,
    pub colors: BTreeMap<String, Rgb>,
}

impl ParticleVariables {
    pub fn with_float(mut self, name: impl Into<String>, value: f64) -> Self {
        self.floats.insert(name.into(), value);
        self
    }

    pub fn with_color(mut self, name: impl Into<String>, color: Rgb) -> Self {
        self.colors.insert(name.into(), color);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundCue {
    pub id: String,
    pub location: Vec3,
    pub volume: f64,
    pub pitch: f64,
}

impl SoundCue {
    pub fn new(id: impl Into<String>, location: Vec3) -> Self {
        SoundCue {
            id: id.into(),
            location,
            volume: 1.0,
            pitch: 1.0,
        }
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn pitch(mut self, pitch: f64) -> Self {
        self.pitch = pitch;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleCue {
    pub id: String,
    pub dimension: String,
    pub location: Vec3,
    pub variables: ParticleVariables,
}

/// What the cooldown indicator should show this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndicatorDisplay {
    /// Crosshair/hotbar sprite: title text carrying the pixel value
    Sprite { text: String },
    /// Subtitle made of dot glyphs
    Subtitle { text: String },
    Clear,
}

/// Value stored in a host dynamic property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// World access used by the combat engine
pub trait Host {
    fn entity(&self, id: EntityId) -> Option<EntitySnapshot>;
    /// All players currently online
    fn players(&self) -> Vec<EntityId>;
    /// Entities whose location lies within `radius` of `center`
    fn entities_within(&self, dimension: &str, center: Vec3, radius: f64) -> Vec<EntityId>;
    /// Entities inside the box spanning `corner` to `corner + size`
    fn entities_in_volume(&self, dimension: &str, corner: Vec3, size: Vec3) -> Vec<EntityId>;
    /// First entity along the viewer's line of sight
    fn entity_in_view(&self, viewer: EntityId, max_distance: f64) -> Option<EntityId>;
    /// Whether a solid block is along the viewer's line of sight
    fn block_in_view(&self, viewer: EntityId, max_distance: f64) -> bool;
    fn weather(&self, dimension: &str) -> Weather;
    fn biome(&self, id: EntityId) -> Option<String>;
    /// Remaining ticks of an item cooldown category
    fn item_cooldown(&self, id: EntityId, category: &str) -> u32;
    /// Inventory slot -> item for an entity with a container
    fn inventory(&self, id: EntityId) -> Vec<(u32, ItemStack)>;
    fn world_property(&self, key: &str) -> Option<PropertyValue>;
    fn player_property(&self, player: EntityId, key: &str) -> Option<PropertyValue>;
    fn natural_regeneration(&self) -> bool;

    /// Returns whether the host accepted the damage
    fn apply_damage(
        &mut self,
        target: EntityId,
        amount: f64,
        cause: DamageCause,
        source: Option<EntityId>,
    ) -> bool;
    /// Replace horizontal velocity with (x, z) and vertical with `vertical`
    fn apply_knockback(
        &mut self,
        target: EntityId,
        x: f64,
        z: f64,
        vertical: f64,
    ) -> Result<(), HostError>;
    /// Add `impulse` to the target's current velocity
    fn apply_impulse(&mut self, target: EntityId, impulse: Vec3) -> Result<(), HostError>;
    fn set_on_fire(&mut self, target: EntityId, seconds: u32) -> Result<(), HostError>;
    /// Sound audible to everyone nearby
    fn play_sound(&mut self, dimension: &str, cue: &SoundCue) -> Result<(), HostError>;
    /// Sound audible to one player only
    fn play_sound_for(&mut self, player: EntityId, cue: &SoundCue) -> Result<(), HostError>;
    /// Particle visible to one player only
    fn spawn_particle_for(&mut self, player: EntityId, cue: &ParticleCue) -> Result<(), HostError>;
    fn set_mainhand(&mut self, id: EntityId, item: Option<ItemStack>);
    fn set_lore(&mut self, id: EntityId, slot: u32, lore: Vec<String>);
    fn start_item_cooldown(&mut self, id: EntityId, category: &str, ticks: u32);
    fn remove_effect(&mut self, id: EntityId, effect: &str);
    fn set_health(&mut self, id: EntityId, value: f64);
    fn set_saturation(&mut self, id: EntityId, value: f64);
    fn set_exhaustion(&mut self, id: EntityId, value: f64);
    fn set_natural_regeneration(&mut self, enabled: bool);
    fn trigger_event(&mut self, id: EntityId, event: &str);
    fn set_world_property(&mut self, key: &str, value: PropertyValue);
    fn set_player_property(&mut self, player: EntityId, key: &str, value: PropertyValue);
    fn show_indicator(&mut self, player: EntityId, display: IndicatorDisplay);
    fn set_action_bar(&mut self, player: EntityId, text: &str);
    fn send_message(&mut self, player: EntityId, text: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_level_is_amplifier_plus_one() {
        let snapshot = EntitySnapshot::new(EntityId(1), "minecraft:zombie")
            .with_effect(effect::STRENGTH, 1);
        assert_eq!(snapshot.effect_level(effect::STRENGTH), 2);
        assert_eq!(snapshot.effect_level(effect::WEAKNESS), 0);
    }

    #[test]
    fn test_faster_than_walk_requires_sprinting() {
        let mut snapshot = EntitySnapshot::player(EntityId(1), "Steve");
        snapshot.velocity = Vec3::new(0.5, 0.0, 0.0);
        assert!(!snapshot.is_faster_than_walk());

        snapshot.sprinting = true;
        assert!(snapshot.is_faster_than_walk());

        snapshot.velocity = Vec3::new(0.1, 0.0, 0.0);
        assert!(!snapshot.is_faster_than_walk());
    }

    #[test]
    fn test_airborne_for_crit() {
        let mut snapshot = EntitySnapshot::player(EntityId(1), "Steve");
        assert!(!snapshot.is_airborne_for_crit());

        snapshot.on_ground = false;
        snapshot.falling = true;
        assert!(snapshot.is_airborne_for_crit());

        snapshot.effects.insert(effect::SLOW_FALLING.to_string(), 0);
        assert!(!snapshot.is_airborne_for_crit());
    }

    #[test]
    fn test_center_uses_head_height() {
        let snapshot = EntitySnapshot::new(EntityId(1), "minecraft:zombie").at(Vec3::new(1.0, 64.0, 1.0));
        assert!((snapshot.center().y - 64.81).abs() < 1e-9);
    }

    #[test]
    fn test_dragon_center_is_lifted_from_mid_body() {
        let dragon = EntitySnapshot::new(EntityId(1), entity::ENDER_DRAGON).at(Vec3::new(0.0, 70.0, 0.0));
        assert!((dragon.center().y - 73.81).abs() < 1e-9);
    }

    #[test]
    fn test_view_point_follows_yaw() {
        let mut snapshot = EntitySnapshot::player(EntityId(1), "Steve").at(Vec3::new(0.0, 64.0, 0.0));
        let ahead = snapshot.view_point(1.0, 0.15);
        assert!(ahead.x.abs() < 1e-9);
        assert!((ahead.y - (64.0 + 0.81 + 0.15)).abs() < 1e-9);
        assert!((ahead.z - 1.0).abs() < 1e-9);

        snapshot.yaw = 90.0;
        let left = snapshot.view_point(2.0, 0.0);
        assert!((left.x + 2.0).abs() < 1e-9);
        assert!(left.z.abs() < 1e-9);
    }
}
