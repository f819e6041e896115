//! Axis-separated AABB collision resolution.
//!
//! Every update tick runs two passes: vertical displacement followed by a Y
//! pass, then horizontal displacement followed by an X pass. Each pass walks
//! the collidable slice, tests overlap, applies kind-pair damage inline, and
//! pushes the moving entity out by the penetration depth on that axis. When
//! several collidables overlap in one pass, all are processed and the last
//! one in iteration order determines the final correction — there is no
//! closest-first sort.
//!
//! Because both passes can see the same overlapping pair in one tick,
//! contact damage may be counted once or twice depending on
//! [`DamageTiming`]. The historical behavior is per-pass; both are
//! supported so the choice is explicit.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};

// ── Contacts ────────────────────────────────────────────────────────────

/// Directional contact flags, recomputed every tick.
///
/// `bottom` means this entity's underside touched something (it landed);
/// `top` means its top edge hit something above it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

// ── KindMask ────────────────────────────────────────────────────────────

/// The set of entity kinds an entity resolves collision against.
///
/// Declarative replacement for hand-wiring collidable arrays per scene:
/// the pass skips any pair the mask excludes. Masks only gate *resolution*;
/// the geometric [`Entity::overlaps`] test itself is symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindMask(u8);

impl KindMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    const fn bit(kind: EntityKind) -> u8 {
        1 << kind as u8
    }

    /// A mask containing a single kind.
    pub const fn just(kind: EntityKind) -> Self {
        Self(Self::bit(kind))
    }

    /// This mask plus one more kind.
    pub const fn with(self, kind: EntityKind) -> Self {
        Self(self.0 | Self::bit(kind))
    }

    pub const fn contains(self, kind: EntityKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }
}

// ── Policy ──────────────────────────────────────────────────────────────

/// When contact damage is applied for a pair that overlaps in both passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageTiming {
    /// Damage at most once per pair per tick.
    OncePerTick,
    /// Damage every pass that sees the overlap — a pair straddling both
    /// axes takes double damage in that tick. Historical behavior.
    PerAxisPass,
}

/// Tunable collision behavior, owned by the scene and passed into updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionPolicy {
    pub damage: DamageTiming,
    /// A player landing on top of an enemy in the Y pass deactivates it.
    pub stomp_kills: bool,
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        Self {
            damage: DamageTiming::PerAxisPass,
            stomp_kills: false,
        }
    }
}

// ── Overlap test ────────────────────────────────────────────────────────

impl Entity {
    /// AABB overlap test: true when the boxes intersect on both axes.
    ///
    /// Always false against itself or when either side is inactive.
    /// Symmetric: `a.overlaps(&b) == b.overlaps(&a)`.
    pub fn overlaps(&self, other: &Entity) -> bool {
        if self.id() == other.id() {
            return false;
        }
        if !self.is_active() || !other.is_active() {
            return false;
        }
        let x_distance =
            (self.position.x - other.position.x).abs() - (self.width() + other.width()) / 2.0;
        let y_distance =
            (self.position.y - other.position.y).abs() - (self.height() + other.height()) / 2.0;
        x_distance < 0.0 && y_distance < 0.0
    }
}

// ── Passes ──────────────────────────────────────────────────────────────

/// Which axis a resolution pass corrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

/// One resolution pass for `entity` against every collidable.
pub(crate) fn resolve_axis(
    entity: &mut Entity,
    collidables: &mut [Entity],
    axis: Axis,
    policy: &CollisionPolicy,
) {
    for other in collidables.iter_mut() {
        if !entity.collides_with().contains(other.kind()) {
            continue;
        }
        if !entity.overlaps(other) {
            continue;
        }

        apply_contact_damage(entity, other, policy);

        match axis {
            Axis::Y => {
                let gap = (entity.position.y - other.position.y).abs();
                let overlap = ((entity.height() + other.height()) / 2.0 - gap).abs();
                if entity.position.y > other.position.y {
                    if policy.stomp_kills
                        && entity.kind() == EntityKind::Player
                        && other.kind() == EntityKind::Enemy
                    {
                        other.deactivate();
                    }
                    entity.position.y += overlap;
                    entity.velocity.y = 0.0;
                    entity.contacts.bottom = true;
                } else if entity.position.y < other.position.y {
                    entity.position.y -= overlap;
                    entity.velocity.y = 0.0;
                    entity.contacts.top = true;
                }
            }
            Axis::X => {
                let gap = (entity.position.x - other.position.x).abs();
                let overlap = ((entity.width() + other.width()) / 2.0 - gap).abs();
                if entity.position.x < other.position.x {
                    entity.position.x -= overlap;
                    entity.velocity.x = 0.0;
                    entity.contacts.right = true;
                } else if entity.position.x > other.position.x {
                    entity.position.x += overlap;
                    entity.velocity.x = 0.0;
                    entity.contacts.left = true;
                }
            }
        }
    }
}

/// Kind-pair side effects, applied on overlap before positional correction:
/// player↔enemy contact costs the player a life; projectile↔enemy contact
/// costs the enemy a life and spends the projectile.
fn apply_contact_damage(entity: &mut Entity, other: &mut Entity, policy: &CollisionPolicy) {
    if policy.damage == DamageTiming::OncePerTick && entity.damaged.contains(&other.id()) {
        return;
    }

    let hit = match (entity.kind(), other.kind()) {
        (EntityKind::Player, EntityKind::Enemy) => {
            entity.lives -= 1;
            true
        }
        (EntityKind::Enemy, EntityKind::Player) => {
            other.lives -= 1;
            true
        }
        (EntityKind::Projectile, EntityKind::Enemy) => {
            other.lives -= 1;
            entity.deactivate();
            true
        }
        (EntityKind::Enemy, EntityKind::Projectile) => {
            entity.lives -= 1;
            other.deactivate();
            true
        }
        _ => false,
    };

    if hit {
        entity.damaged.push(other.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn player_at(x: f32, y: f32) -> Entity {
        Entity::builder(EntityKind::Player)
            .at(Vec3::new(x, y, 0.0))
            .lives(3)
            .build()
            .unwrap()
    }

    fn enemy_at(x: f32, y: f32) -> Entity {
        Entity::builder(EntityKind::Enemy)
            .at(Vec3::new(x, y, 0.0))
            .build()
            .unwrap()
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = player_at(0.0, 0.0);
        let b = enemy_at(0.9, 0.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = enemy_at(5.0, 0.0);
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn no_self_overlap() {
        let a = player_at(0.0, 0.0);
        let copy = a.clone();
        assert!(!a.overlaps(&copy));
    }

    #[test]
    fn inactive_pair_never_overlaps() {
        let a = player_at(0.0, 0.0);
        let mut b = enemy_at(0.5, 0.0);
        assert!(a.overlaps(&b));
        b.deactivate();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        // Exactly 1.0 apart with unit extents: x_distance == 0, not < 0.
        let a = player_at(0.0, 0.0);
        let b = enemy_at(1.0, 0.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn side_contact_costs_a_life_and_flags_the_side() {
        // Player at origin, enemy 0.9 to the right, both 1x1 and stationary:
        // x_distance = 0.9 - 1.0 < 0, so the X pass collides.
        let mut player = player_at(0.0, 0.0);
        let mut others = [enemy_at(0.9, 0.0)];

        player.update(DT, None, &mut others, &CollisionPolicy::default());

        assert!(player.contacts().right);
        assert!(!player.contacts().left);
        // Both passes saw the same overlap under the per-pass policy.
        assert_eq!(player.lives, 1);
        // Pushed out to the left: the gap is now the full extent sum.
        assert_relative_eq!(player.position.x, -0.1, epsilon = 1e-5);
    }

    #[test]
    fn contact_from_the_left_flags_left() {
        let mut player = player_at(0.9, 0.0);
        let mut others = [enemy_at(0.0, 0.0)];
        player.update(DT, None, &mut others, &CollisionPolicy::default());
        assert!(player.contacts().left);
        assert!(!player.contacts().right);
    }

    #[test]
    fn once_per_tick_policy_counts_a_pair_once() {
        let policy = CollisionPolicy {
            damage: DamageTiming::OncePerTick,
            stomp_kills: false,
        };
        let mut player = player_at(0.0, 0.0);
        let mut others = [enemy_at(0.9, 0.0)];
        player.update(DT, None, &mut others, &policy);
        assert_eq!(player.lives, 2);
    }

    #[test]
    fn per_axis_policy_counts_a_pair_per_pass() {
        let policy = CollisionPolicy {
            damage: DamageTiming::PerAxisPass,
            stomp_kills: false,
        };
        let mut player = player_at(0.0, 0.0);
        let mut others = [enemy_at(0.9, 0.0)];
        player.update(DT, None, &mut others, &policy);
        assert_eq!(player.lives, 1);
    }

    #[test]
    fn landing_zeroes_vertical_velocity_and_sets_bottom() {
        let mut player = player_at(0.0, 0.5);
        player.gravity = Vec3::new(0.0, -9.81, 0.0);
        let mut ground = [Entity::builder(EntityKind::Platform)
            .at(Vec3::new(0.0, -1.0, 0.0))
            .size(10.0, 1.0)
            .build()
            .unwrap()];

        for _ in 0..60 {
            player.update(DT, None, &mut ground, &CollisionPolicy::default());
        }

        assert!(player.contacts().bottom);
        assert_relative_eq!(player.velocity.y, 0.0);
        // Resting on the platform's top edge: platform top is -0.5, player
        // half-height is 0.5.
        assert_relative_eq!(player.position.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn rising_into_a_ceiling_sets_top() {
        let mut player = player_at(0.0, -0.4);
        // Walk only drives the X axis; an upward velocity persists.
        player.velocity = Vec3::new(0.0, 2.0, 0.0);
        let mut ceiling = [Entity::builder(EntityKind::Platform)
            .at(Vec3::new(0.0, 1.0, 0.0))
            .size(10.0, 1.0)
            .build()
            .unwrap()];

        for _ in 0..30 {
            player.update(DT, None, &mut ceiling, &CollisionPolicy::default());
            if player.contacts().top {
                break;
            }
        }
        assert!(player.contacts().top);
        assert_relative_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn projectile_spends_itself_and_wounds_the_enemy() {
        let mut shot = Entity::builder(EntityKind::Projectile)
            .at(Vec3::new(0.0, 0.0, 0.0))
            .size(0.2, 0.2)
            .speed(6.0)
            .build()
            .unwrap();
        let mut enemies = [Entity::builder(EntityKind::Enemy)
            .at(Vec3::new(0.0, 0.5, 0.0))
            .lives(2)
            .build()
            .unwrap()];

        shot.update(DT, None, &mut enemies, &CollisionPolicy::default());

        assert!(!shot.is_active());
        assert_eq!(enemies[0].lives, 1);
        // The enemy deactivates on its own next update.
        assert!(enemies[0].is_active());
    }

    #[test]
    fn stomp_policy_deactivates_the_enemy_under_the_player() {
        let policy = CollisionPolicy {
            damage: DamageTiming::OncePerTick,
            stomp_kills: true,
        };
        let mut player = player_at(0.0, 0.8);
        player.velocity = Vec3::new(0.0, -3.0, 0.0);
        let mut enemies = [enemy_at(0.0, 0.0)];

        for _ in 0..30 {
            player.update(DT, None, &mut enemies, &policy);
            if !enemies[0].is_active() {
                break;
            }
        }
        assert!(!enemies[0].is_active());
    }

    #[test]
    fn mask_gates_resolution_but_not_geometry() {
        // Platforms resolve against nothing, but the geometric test is
        // still symmetric with an overlapping player.
        let platform = Entity::builder(EntityKind::Platform)
            .at(Vec3::new(0.0, 0.0, 0.0))
            .size(4.0, 1.0)
            .build()
            .unwrap();
        let player = player_at(0.0, 0.2);
        assert!(platform.overlaps(&player));
        assert!(player.overlaps(&platform));
        assert!(!platform.collides_with().contains(EntityKind::Player));
    }

    #[test]
    fn last_overlap_in_iteration_order_wins() {
        let mut player = player_at(0.0, 0.0);
        // Two enemies overlapping from both sides; the second one processed
        // determines the final pushout direction.
        let mut others = [enemy_at(0.6, 0.0), enemy_at(-0.6, 0.0)];
        player.update(DT, None, &mut others, &CollisionPolicy::default());
        // Final correction came from the enemy on the left: pushed right.
        assert!(player.contacts().left);
    }
}
