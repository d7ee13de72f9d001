//! In-memory host
//!
//! [`SimWorld`] keeps entities, properties and everything the engine emits in
//! plain collections. Tests drive the engine against it and the damage table
//! tool uses it as a stand-in world. Queries return entities in id order.

use std::collections::{BTreeMap, HashMap, HashSet};

use weapon_core::{ItemStack, Vec3};

use crate::host::{
    DamageCause, EntityId, EntitySnapshot, Host, HostError, IndicatorDisplay, ParticleCue,
    PropertyValue, SoundCue, Weather,
};

/// One `apply_damage` call accepted by the world
#[derive(Debug, Clone, PartialEq)]
pub struct DamageRecord {
    pub target: EntityId,
    pub amount: f64,
    pub cause: DamageCause,
    pub source: Option<EntityId>,
}

/// One `apply_knockback` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnockbackRecord {
    pub target: EntityId,
    pub x: f64,
    pub z: f64,
    pub vertical: f64,
}

#[derive(Debug)]
pub struct SimWorld {
    entities: BTreeMap<EntityId, EntitySnapshot>,
    inventories: HashMap<EntityId, BTreeMap<u32, ItemStack>>,
    weather: Weather,
    biomes: HashMap<EntityId, String>,
    view_targets: HashMap<EntityId, EntityId>,
    blocks_in_view: HashSet<EntityId>,
    item_cooldowns: HashMap<(EntityId, String), u32>,
    world_properties: HashMap<String, PropertyValue>,
    player_properties: HashMap<(EntityId, String), PropertyValue>,
    natural_regeneration: bool,
    /// Entities whose knockback the world refuses
    knockback_immune: HashSet<EntityId>,
    damage_log: Vec<DamageRecord>,
    knockbacks: Vec<KnockbackRecord>,
    fire: HashMap<EntityId, u32>,
    sounds: Vec<SoundCue>,
    private_sounds: Vec<(EntityId, SoundCue)>,
    private_particles: Vec<(EntityId, ParticleCue)>,
    events: Vec<(EntityId, String)>,
    indicators: Vec<(EntityId, IndicatorDisplay)>,
    action_bars: Vec<(EntityId, String)>,
    messages: Vec<(EntityId, String)>,
}

impl Default for SimWorld {
    fn default() -> Self {
        SimWorld {
            entities: BTreeMap::new(),
            inventories: HashMap::new(),
            weather: Weather::Clear,
            biomes: HashMap::new(),
            view_targets: HashMap::new(),
            blocks_in_view: HashSet::new(),
            item_cooldowns: HashMap::new(),
            world_properties: HashMap::new(),
            player_properties: HashMap::new(),
            natural_regeneration: true,
            knockback_immune: HashSet::new(),
            damage_log: Vec::new(),
            knockbacks: Vec::new(),
            fire: HashMap::new(),
            sounds: Vec::new(),
            private_sounds: Vec::new(),
            private_particles: Vec::new(),
            events: Vec::new(),
            indicators: Vec::new(),
            action_bars: Vec::new(),
            messages: Vec::new(),
        }
    }
}

fn inside(location: Vec3, corner: Vec3, size: Vec3) -> bool {
    let within = |value: f64, start: f64, extent: f64| {
        let (low, high) = if extent < 0.0 {
            (start + extent, start)
        } else {
            (start, start + extent)
        };
        value >= low && value <= high
    };
    within(location.x, corner.x, size.x)
        && within(location.y, corner.y, size.y)
        && within(location.z, corner.z, size.z)
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, replacing any entity with the same id
    pub fn spawn(&mut self, snapshot: EntitySnapshot) {
        self.entities.insert(snapshot.id, snapshot);
    }

    /// Remove an entity and everything keyed by it
    pub fn despawn(&mut self, id: EntityId) -> Option<EntitySnapshot> {
        self.inventories.remove(&id);
        self.view_targets.remove(&id);
        self.biomes.remove(&id);
        self.entities.remove(&id)
    }

    /// Mutable access for moving entities around between ticks
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut EntitySnapshot> {
        self.entities.get_mut(&id)
    }

    /// Put an item in an inventory slot
    pub fn give(&mut self, id: EntityId, slot: u32, item: ItemStack) {
        self.inventories.entry(id).or_default().insert(slot, item);
    }

    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = weather;
    }

    pub fn set_biome(&mut self, id: EntityId, biome: &str) {
        self.biomes.insert(id, biome.to_string());
    }

    /// Make `viewer` look at `target`, None clears the line of sight
    pub fn set_view_target(&mut self, viewer: EntityId, target: Option<EntityId>) {
        match target {
            Some(target) => self.view_targets.insert(viewer, target),
            None => self.view_targets.remove(&viewer),
        };
    }

    pub fn set_block_in_view(&mut self, viewer: EntityId, blocked: bool) {
        if blocked {
            self.blocks_in_view.insert(viewer);
        } else {
            self.blocks_in_view.remove(&viewer);
        }
    }

    pub fn refuse_knockback(&mut self, id: EntityId) {
        self.knockback_immune.insert(id);
    }

    /// Count every item cooldown down by `ticks`
    pub fn advance(&mut self, ticks: u32) {
        self.item_cooldowns.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(ticks);
            *remaining > 0
        });
    }

    pub fn damage_log(&self) -> &[DamageRecord] {
        &self.damage_log
    }

    pub fn knockbacks(&self) -> &[KnockbackRecord] {
        &self.knockbacks
    }

    /// Seconds of fire last applied to an entity
    pub fn fire_seconds(&self, id: EntityId) -> Option<u32> {
        self.fire.get(&id).copied()
    }

    /// Sounds played for everyone nearby
    pub fn sounds(&self) -> &[SoundCue] {
        &self.sounds
    }

    pub fn private_sounds(&self) -> &[(EntityId, SoundCue)] {
        &self.private_sounds
    }

    pub fn private_particles(&self) -> &[(EntityId, ParticleCue)] {
        &self.private_particles
    }

    /// Entity events triggered so far
    pub fn events(&self) -> &[(EntityId, String)] {
        &self.events
    }

    pub fn indicators(&self) -> &[(EntityId, IndicatorDisplay)] {
        &self.indicators
    }

    pub fn action_bars(&self) -> &[(EntityId, String)] {
        &self.action_bars
    }

    pub fn messages(&self) -> &[(EntityId, String)] {
        &self.messages
    }

    /// Forget every recorded emission
    pub fn clear_log(&mut self) {
        self.damage_log.clear();
        self.knockbacks.clear();
        self.sounds.clear();
        self.private_sounds.clear();
        self.private_particles.clear();
        self.events.clear();
        self.indicators.clear();
        self.action_bars.clear();
        self.messages.clear();
    }

    fn require(&mut self, id: EntityId) -> Result<&mut EntitySnapshot, HostError> {
        self.entities.get_mut(&id).ok_or(HostError::EntityInvalid(id))
    }
}

impl Host for SimWorld {
    fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.entities.get(&id).cloned()
    }

    fn players(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.is_player())
            .map(|e| e.id)
            .collect()
    }

    fn entities_within(&self, dimension: &str, center: Vec3, radius: f64) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.dimension == dimension && e.location.distance(center) <= radius)
            .map(|e| e.id)
            .collect()
    }

    fn entities_in_volume(&self, dimension: &str, corner: Vec3, size: Vec3) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.dimension == dimension && inside(e.location, corner, size))
            .map(|e| e.id)
            .collect()
    }

    fn entity_in_view(&self, viewer: EntityId, max_distance: f64) -> Option<EntityId> {
        let from = self.entities.get(&viewer)?;
        let target = self.view_targets.get(&viewer)?;
        self.entities
            .get(target)
            .filter(|e| e.location.distance(from.head_location) <= max_distance)
            .map(|e| e.id)
    }

    fn block_in_view(&self, viewer: EntityId, _max_distance: f64) -> bool {
        self.blocks_in_view.contains(&viewer)
    }

    fn weather(&self, _dimension: &str) -> Weather {
        self.weather
    }

    fn biome(&self, id: EntityId) -> Option<String> {
        self.biomes.get(&id).cloned()
    }

    fn item_cooldown(&self, id: EntityId, category: &str) -> u32 {
        self.item_cooldowns
            .get(&(id, category.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn inventory(&self, id: EntityId) -> Vec<(u32, ItemStack)> {
        self.inventories
            .get(&id)
            .map(|slots| slots.iter().map(|(&slot, item)| (slot, item.clone())).collect())
            .unwrap_or_default()
    }

    fn world_property(&self, key: &str) -> Option<PropertyValue> {
        self.world_properties.get(key).cloned()
    }

    fn player_property(&self, player: EntityId, key: &str) -> Option<PropertyValue> {
        self.player_properties
            .get(&(player, key.to_string()))
            .cloned()
    }

    fn natural_regeneration(&self) -> bool {
        self.natural_regeneration
    }

    fn apply_damage(
        &mut self,
        target: EntityId,
        amount: f64,
        cause: DamageCause,
        source: Option<EntityId>,
    ) -> bool {
        let Some(entity) = self.entities.get_mut(&target) else {
            return false;
        };
        if !entity.is_alive() {
            return false;
        }
        entity.health = (entity.health - amount).max(0.0);
        self.damage_log.push(DamageRecord {
            target,
            amount,
            cause,
            source,
        });
        true
    }

    fn apply_knockback(
        &mut self,
        target: EntityId,
        x: f64,
        z: f64,
        vertical: f64,
    ) -> Result<(), HostError> {
        if self.knockback_immune.contains(&target) {
            return Err(HostError::Rejected(format!("{target} ignores knockback")));
        }
        let entity = self.require(target)?;
        entity.velocity = Vec3::new(x, vertical, z);
        self.knockbacks.push(KnockbackRecord {
            target,
            x,
            z,
            vertical,
        });
        Ok(())
    }

    fn apply_impulse(&mut self, target: EntityId, impulse: Vec3) -> Result<(), HostError> {
        let entity = self.require(target)?;
        entity.velocity = entity.velocity + impulse;
        Ok(())
    }

    fn set_on_fire(&mut self, target: EntityId, seconds: u32) -> Result<(), HostError> {
        self.require(target)?;
        self.fire.insert(target, seconds);
        Ok(())
    }

    fn play_sound(&mut self, _dimension: &str, cue: &SoundCue) -> Result<(), HostError> {
        self.sounds.push(cue.clone());
        Ok(())
    }

    fn play_sound_for(&mut self, player: EntityId, cue: &SoundCue) -> Result<(), HostError> {
        self.require(player)?;
        self.private_sounds.push((player, cue.clone()));
        Ok(())
    }

    fn spawn_particle_for(&mut self, player: EntityId, cue: &ParticleCue) -> Result<(), HostError> {
        self.require(player)?;
        self.private_particles.push((player, cue.clone()));
        Ok(())
    }

    fn set_mainhand(&mut self, id: EntityId, item: Option<ItemStack>) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.mainhand = item;
        }
    }

    fn set_lore(&mut self, id: EntityId, slot: u32, lore: Vec<String>) {
        let Some(item) = self.inventories.get_mut(&id).and_then(|s| s.get_mut(&slot)) else {
            return;
        };
        item.lore = lore;
        let type_id = item.type_id.clone();
        let lore = item.lore.clone();

        if let Some(entity) = self.entities.get_mut(&id) {
            let selected = entity.player.as_ref().map(|p| p.selected_slot);
            if selected == Some(slot) {
                if let Some(held) = entity.mainhand.as_mut().filter(|h| h.type_id == type_id) {
                    held.lore = lore;
                }
            }
        }
    }

    fn start_item_cooldown(&mut self, id: EntityId, category: &str, ticks: u32) {
        self.item_cooldowns.insert((id, category.to_string()), ticks);
    }

    fn remove_effect(&mut self, id: EntityId, effect: &str) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.effects.remove(effect);
        }
    }

    fn set_health(&mut self, id: EntityId, value: f64) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.health = value;
        }
    }

    fn set_saturation(&mut self, id: EntityId, value: f64) {
        if let Some(player) = self.entities.get_mut(&id).and_then(|e| e.player.as_mut()) {
            player.saturation = value;
        }
    }

    fn set_exhaustion(&mut self, id: EntityId, value: f64) {
        if let Some(player) = self.entities.get_mut(&id).and_then(|e| e.player.as_mut()) {
            player.exhaustion = value;
        }
    }

    fn set_natural_regeneration(&mut self, enabled: bool) {
        self.natural_regeneration = enabled;
    }

    fn trigger_event(&mut self, id: EntityId, event: &str) {
        self.events.push((id, event.to_string()));
    }

    fn set_world_property(&mut self, key: &str, value: PropertyValue) {
        self.world_properties.insert(key.to_string(), value);
    }

    fn set_player_property(&mut self, player: EntityId, key: &str, value: PropertyValue) {
        self.player_properties.insert((player, key.to_string()), value);
    }

    fn show_indicator(&mut self, player: EntityId, display: IndicatorDisplay) {
        self.indicators.push((player, display));
    }

    fn set_action_bar(&mut self, player: EntityId, text: &str) {
        self.action_bars.push((player, text.to_string()));
    }

    fn send_message(&mut self, player: EntityId, text: &str) {
        self.messages.push((player, text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_query_is_inclusive() {
        let mut world = SimWorld::new();
        world.spawn(EntitySnapshot::new(EntityId(1), "minecraft:pig").at(Vec3::new(1.0, 0.25, 1.0)));
        world.spawn(EntitySnapshot::new(EntityId(2), "minecraft:pig").at(Vec3::new(1.0, 0.3, 1.0)));

        let found = world.entities_in_volume("minecraft:overworld", Vec3::ZERO, Vec3::new(1.0, 0.25, 1.0));
        assert_eq!(found, vec![EntityId(1)]);
    }

    #[test]
    fn test_queries_respect_dimension() {
        let mut world = SimWorld::new();
        let mut nether = EntitySnapshot::new(EntityId(1), "minecraft:pig");
        nether.dimension = "minecraft:nether".to_string();
        world.spawn(nether);
        world.spawn(EntitySnapshot::new(EntityId(2), "minecraft:pig"));

        assert_eq!(world.entities_within("minecraft:overworld", Vec3::ZERO, 1.0), vec![EntityId(2)]);
    }

    #[test]
    fn test_damage_lowers_health_and_stops_at_zero() {
        let mut world = SimWorld::new();
        world.spawn(EntitySnapshot::new(EntityId(1), "minecraft:zombie"));

        assert!(world.apply_damage(EntityId(1), 15.0, DamageCause::EntityAttack, None));
        assert!(world.apply_damage(EntityId(1), 15.0, DamageCause::EntityAttack, None));
        assert!(!world.apply_damage(EntityId(1), 1.0, DamageCause::EntityAttack, None));
        assert_eq!(world.entity(EntityId(1)).unwrap().health, 0.0);
        assert_eq!(world.damage_log().len(), 2);
        assert!(!world.apply_damage(EntityId(9), 1.0, DamageCause::EntityAttack, None));
    }

    #[test]
    fn test_knockback_errors() {
        let mut world = SimWorld::new();
        assert_eq!(
            world.apply_knockback(EntityId(1), 0.0, 0.0, 0.0),
            Err(HostError::EntityInvalid(EntityId(1)))
        );

        world.spawn(EntitySnapshot::new(EntityId(1), "minecraft:zombie"));
        world.refuse_knockback(EntityId(1));
        assert!(matches!(
            world.apply_knockback(EntityId(1), 0.0, 0.0, 0.0),
            Err(HostError::Rejected(_))
        ));
    }

    #[test]
    fn test_cooldowns_count_down() {
        let mut world = SimWorld::new();
        world.start_item_cooldown(EntityId(1), "minecraft:shield", 5);
        world.advance(3);
        assert_eq!(world.item_cooldown(EntityId(1), "minecraft:shield"), 2);
        world.advance(3);
        assert_eq!(world.item_cooldown(EntityId(1), "minecraft:shield"), 0);
    }

    #[test]
    fn test_set_lore_updates_held_copy() {
        let mut world = SimWorld::new();
        let sword = ItemStack::new("minecraft:iron_sword");
        world.spawn(EntitySnapshot::player(EntityId(1), "Steve").holding(sword.clone()));
        world.give(EntityId(1), 0, sword);

        world.set_lore(EntityId(1), 0, vec!["sharp".to_string()]);
        assert_eq!(world.inventory(EntityId(1))[0].1.lore, vec!["sharp".to_string()]);
        assert_eq!(world.entity(EntityId(1)).unwrap().mainhand.unwrap().lore, vec!["sharp".to_string()]);
    }
}
