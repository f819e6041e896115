//! Scene-owned entity storage.
//!
//! A [`Stage`] owns every entity a scene spawns — the player, enemies,
//! platforms, and any projectiles added during play — in one growable
//! collection. Entities are soft-deleted: deactivation removes them from
//! update, collision, and render, but their slots are retained until the
//! stage is dropped with its scene. A long session that keeps spawning
//! projectiles therefore grows the collection without bound; scenes that
//! care should gate spawning (ammo) rather than expect compaction.
//!
//! [`Stage::step`] advances every entity one tick. Each entity is swapped
//! out of its slot and updated against the rest of the collection, with an
//! inactive placeholder filling the hole so nothing ever resolves against
//! itself.

use crate::collision::CollisionPolicy;
use crate::entity::{Entity, EntityBuilder, EntityError, EntityId, EntityKind};
use crate::math::Vec3;
use crate::render::RenderSink;
use crate::scene::SceneData;

/// Growable arena of entities owned by one scene.
#[derive(Debug, Default)]
pub struct Stage {
    entities: Vec<Entity>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and add an entity. Returns its id.
    pub fn spawn(&mut self, builder: EntityBuilder) -> Result<EntityId, EntityError> {
        let entity = builder.build()?;
        let id = entity.id();
        log::debug!("spawned {:?} as {:?}", entity.kind(), id);
        self.entities.push(entity);
        Ok(id)
    }

    /// Add an already-built entity (a projectile configured elsewhere, say).
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.entities.push(entity);
        id
    }

    /// Build every entity in a scene layout. Fails fast on the first
    /// invalid spec, leaving already-spawned entities in place.
    pub fn load(&mut self, data: &SceneData) -> Result<Vec<EntityId>, EntityError> {
        let mut ids = Vec::with_capacity(data.entities.len());
        for spec in &data.entities {
            ids.push(self.insert(spec.build()?));
        }
        Ok(ids)
    }

    /// Number of slots, active or not.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The first active player, if any.
    pub fn player(&self) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.kind() == EntityKind::Player && e.is_active())
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| e.kind() == EntityKind::Player && e.is_active())
    }

    /// Active entities of a kind.
    pub fn active_count(&self, kind: EntityKind) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind() == kind && e.is_active())
            .count()
    }

    /// Advance every entity one fixed step.
    ///
    /// AI-controlled entities track the live position of the active player,
    /// so an enemy updated after the player sees the player's position from
    /// this tick, not the last one.
    pub fn step(&mut self, dt: f32, policy: &CollisionPolicy) {
        for i in 0..self.entities.len() {
            let mut current = std::mem::take(&mut self.entities[i]);
            let target = self.target_position();
            current.update(dt, target, &mut self.entities, policy);
            self.entities[i] = current;
        }
    }

    fn target_position(&self) -> Option<Vec3> {
        self.player().map(|p| p.position)
    }

    /// Render every active entity.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        for entity in &self.entities {
            entity.render(sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiKind, AiState};
    use crate::render::{RecordingSink, TextureHandle};
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn policy() -> CollisionPolicy {
        CollisionPolicy::default()
    }

    #[test]
    fn player_lands_on_platform_in_stage_step() {
        let mut stage = Stage::new();
        let player = stage
            .spawn(
                Entity::builder(EntityKind::Player)
                    .at(Vec3::new(0.0, 1.0, 0.0))
                    .gravity(Vec3::new(0.0, -9.81, 0.0)),
            )
            .unwrap();
        stage
            .spawn(
                Entity::builder(EntityKind::Platform)
                    .at(Vec3::new(0.0, -1.0, 0.0))
                    .size(10.0, 1.0),
            )
            .unwrap();

        for _ in 0..120 {
            stage.step(DT, &policy());
        }

        let player = stage.get(player).unwrap();
        assert!(player.contacts().bottom);
        assert_relative_eq!(player.position.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn entity_never_resolves_against_itself() {
        // A lone enemy colliding against everything: stepping must leave it
        // untouched because the only other "entity" is its own slot.
        let mut stage = Stage::new();
        let id = stage
            .spawn(
                Entity::builder(EntityKind::Enemy)
                    .at(Vec3::new(3.0, 4.0, 0.0))
                    .collides_with(crate::collision::KindMask::ALL),
            )
            .unwrap();

        stage.step(DT, &policy());

        let enemy = stage.get(id).unwrap();
        assert_eq!(enemy.position, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(enemy.contacts(), Default::default());
    }

    #[test]
    fn enemies_track_the_player() {
        let mut stage = Stage::new();
        stage
            .spawn(Entity::builder(EntityKind::Player).at(Vec3::new(5.0, 0.0, 0.0)))
            .unwrap();
        let guard = stage
            .spawn(
                Entity::builder(EntityKind::Enemy)
                    .at(Vec3::new(3.0, 0.0, 0.0))
                    .speed(1.0)
                    .ai(AiKind::Guard {
                        trigger: 6.0,
                        track_y: false,
                    }),
            )
            .unwrap();

        stage.step(DT, &policy());
        assert_eq!(stage.get(guard).unwrap().ai().unwrap().state(), AiState::Walking);
        stage.step(DT, &policy());
        assert!(stage.get(guard).unwrap().velocity.x > 0.0);
    }

    #[test]
    fn deactivated_entities_are_retained_not_freed() {
        let mut stage = Stage::new();
        let shot = stage
            .spawn(Entity::builder(EntityKind::Projectile).size(0.2, 0.2).speed(6.0))
            .unwrap();
        assert_eq!(stage.len(), 1);

        stage.get_mut(shot).unwrap().deactivate();
        stage.step(DT, &policy());

        assert_eq!(stage.len(), 1);
        assert!(!stage.get(shot).unwrap().is_active());
    }

    #[test]
    fn render_draws_only_active_textured_entities() {
        let mut stage = Stage::new();
        stage
            .spawn(Entity::builder(EntityKind::Player).texture(TextureHandle(0)))
            .unwrap();
        let hidden = stage
            .spawn(Entity::builder(EntityKind::Enemy).at(Vec3::new(4.0, 0.0, 0.0)).texture(TextureHandle(1)))
            .unwrap();
        stage.get_mut(hidden).unwrap().deactivate();

        let mut sink = RecordingSink::new();
        stage.render(&mut sink);
        assert_eq!(sink.calls.len(), 1);
        assert_eq!(sink.calls[0].texture, TextureHandle(0));
    }

    #[test]
    fn player_lookup_skips_inactive_players() {
        let mut stage = Stage::new();
        let dead = stage.spawn(Entity::builder(EntityKind::Player)).unwrap();
        stage.get_mut(dead).unwrap().deactivate();
        assert!(stage.player().is_none());
        assert_eq!(stage.active_count(EntityKind::Player), 0);
    }
}
