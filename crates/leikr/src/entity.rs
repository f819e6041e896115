//! # Entity — The Simulated Object
//!
//! One [`Entity`] type covers everything the simulation moves or collides:
//! players, enemies, platforms, and projectiles are variants of it, selected
//! by [`EntityKind`] and a [`MotionModel`] chosen once at construction
//! instead of branched on inline every tick.
//!
//! ## Update order
//!
//! [`Entity::update`] advances one fixed simulation step:
//!
//! 1. Deactivate if out of lives; no-op entirely if inactive.
//! 2. Drain queued [`Intent`]s and reset the per-tick contact flags.
//! 3. Run the AI state machine (enemies only), which steers `movement`,
//!    `velocity`, or `acceleration` toward the tracked target.
//! 4. Advance the sprite animation while movement is non-zero.
//! 5. Integrate velocity per the entity's motion model.
//! 6. Apply vertical displacement, then resolve the Y collision pass.
//! 7. Apply horizontal displacement, then resolve the X collision pass.
//! 8. Apply the one-shot jump impulse if queued this tick.
//! 9. Rebuild the model matrix from the final position (and rotation for
//!    kinds that rotate).
//!
//! Resolving the axes in two sequential passes avoids corner tunneling; the
//! cost is that a pair overlapping in both passes can be damaged twice in
//! one tick, which is why damage timing is a [`CollisionPolicy`] choice
//! rather than hardwired.

use std::collections::HashSet;
use std::f32::consts::TAU;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::ai::{Ai, AiKind};
use crate::animation::{AnimationError, AnimationSet, Facing, SpriteAnimation, SpriteSheet};
use crate::collision::{self, Axis, CollisionPolicy, Contacts, KindMask};
use crate::math::{Mat4, Rect, Vec3};
use crate::render::{RenderSink, TextureHandle};

// ── Identity ────────────────────────────────────────────────────────────

/// Unique identity of an entity, used to short-circuit self-collision.
///
/// Ids are allocated process-wide and never reused; entities themselves are
/// soft-deleted via [`Entity::deactivate`] and only freed with their stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Id of the inactive placeholder left behind while a stage updates an
    /// entity out-of-place.
    pub(crate) const PLACEHOLDER: Self = Self(u32::MAX);

    fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

// ── Kind & motion ───────────────────────────────────────────────────────

/// What an entity is, for collision side effects and scene queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Platform,
    Projectile,
}

/// How an entity integrates motion each tick. Selected once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionModel {
    /// Never moves and never resolves against others; platforms and other
    /// scenery that entities collide *against*.
    Static,
    /// Pure `velocity += acceleration * dt`, with acceleration built from
    /// gravity plus thrust intents. Lander/ship players and pursuit flyers.
    Thrust,
    /// Horizontal velocity driven as `movement.x * speed` (and vertically
    /// when `drive_y`), then gravity integration on top. Platformer players
    /// and walking enemies.
    Walk { drive_y: bool },
    /// Constant speed along the heading angle, ignoring acceleration.
    /// Projectiles: `vx = -sin(rotation) * speed`, `vy = cos(rotation) * speed`.
    Ballistic,
}

// ── Intents ─────────────────────────────────────────────────────────────

/// A single-tick command queued on an entity.
///
/// Intents replace one-shot "set flag, consume, clear" booleans: they are
/// queued by the input layer (or AI) and the whole set is drained exactly
/// once at the start of the next update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Jump,
    ThrustUp,
    ThrustDown,
    ThrustLeft,
    ThrustRight,
    RotateCw,
    RotateCcw,
}

/// The set of intents queued for the next simulation tick.
#[derive(Debug, Clone, Default)]
pub(crate) struct Intents {
    queued: HashSet<Intent>,
}

impl Intents {
    fn insert(&mut self, intent: Intent) {
        self.queued.insert(intent);
    }

    /// Consume every queued intent, leaving the set empty.
    fn drain(&mut self) -> TickIntents {
        let mut tick = TickIntents::default();
        for intent in self.queued.drain() {
            match intent {
                Intent::Jump => tick.jump = true,
                Intent::ThrustUp => tick.thrust_up = true,
                Intent::ThrustDown => tick.thrust_down = true,
                Intent::ThrustLeft => tick.thrust_left = true,
                Intent::ThrustRight => tick.thrust_right = true,
                Intent::RotateCw => tick.rotate_cw = true,
                Intent::RotateCcw => tick.rotate_ccw = true,
            }
        }
        tick
    }
}

/// Intents drained for the current tick. The AI may still queue a jump
/// mid-tick (ground reaction after the Y pass) before step 8 consumes it.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TickIntents {
    pub(crate) jump: bool,
    pub(crate) thrust_up: bool,
    pub(crate) thrust_down: bool,
    pub(crate) thrust_left: bool,
    pub(crate) thrust_right: bool,
    pub(crate) rotate_cw: bool,
    pub(crate) rotate_ccw: bool,
}

// ── Errors ──────────────────────────────────────────────────────────────

/// Invalid entity configuration, rejected by [`EntityBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub enum EntityError {
    /// Width or height was zero or negative.
    NonPositiveExtent { width: f32, height: f32 },
    /// The speed multiplier was negative.
    NegativeSpeed(f32),
    /// The animation configuration was invalid.
    Animation(AnimationError),
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NonPositiveExtent { width, height } => {
                write!(f, "entity extents must be positive, got {width}x{height}")
            }
            EntityError::NegativeSpeed(speed) => {
                write!(f, "entity speed must be non-negative, got {speed}")
            }
            EntityError::Animation(e) => write!(f, "invalid animation: {e}"),
        }
    }
}

impl std::error::Error for EntityError {}

impl From<AnimationError> for EntityError {
    fn from(e: AnimationError) -> Self {
        EntityError::Animation(e)
    }
}

// ── Entity ──────────────────────────────────────────────────────────────

/// A simulated object: physics state, collision geometry, optional sprite
/// animation, and an optional AI controller.
///
/// Kinematic fields are public — scenes and the input layer steer entities
/// by writing `movement` and queueing intents. Everything validated at
/// construction (extents, animation) is private.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    motion: MotionModel,
    collides_with: KindMask,

    /// World position. Z is carried but unused by collision.
    pub position: Vec3,
    pub velocity: Vec3,
    /// Rebuilt every tick from gravity plus thrust/pursuit contributions.
    pub acceleration: Vec3,
    /// Unit-ish steering direction, recomputed each tick by input or AI.
    pub movement: Vec3,
    /// Scalar speed multiplier applied to `movement` (and to ballistic flight).
    pub speed: f32,
    /// Constant ambient acceleration, typically `(0, -9.81, 0)` or zero.
    pub gravity: Vec3,
    /// Heading in radians; drives ballistic flight and the model matrix of
    /// rotating kinds. Wraps at ±2π.
    pub rotation: f32,
    /// Radians per rotate intent.
    pub rotate_speed: f32,
    /// Acceleration contributed by one thrust intent.
    pub thrust_power: f32,
    /// Upward velocity contributed by one jump intent.
    pub jump_power: f32,
    /// Integer health; reaching zero or below deactivates at the next tick.
    pub lives: i32,

    width: f32,
    height: f32,

    sprite: Option<SpriteAnimation>,
    texture: Option<TextureHandle>,
    ai: Option<Ai>,

    is_active: bool,
    pub(crate) contacts: Contacts,
    intents: Intents,
    /// Pairs already damaged this tick, for the once-per-tick damage policy.
    pub(crate) damaged: Vec<EntityId>,
    model_matrix: Mat4,
}

impl Entity {
    /// Start building an entity of the given kind.
    pub fn builder(kind: EntityKind) -> EntityBuilder {
        EntityBuilder::new(kind)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn motion(&self) -> MotionModel {
        self.motion
    }

    /// Full width of the axis-aligned bounding box.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Full height of the axis-aligned bounding box.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Soft-delete: the entity is skipped by update, collision, and render,
    /// but stays in its stage until teardown.
    pub fn deactivate(&mut self) {
        if self.is_active {
            log::debug!("entity {:?} ({:?}) deactivated", self.id, self.kind);
        }
        self.is_active = false;
    }

    /// The kinds this entity resolves collision against.
    pub fn collides_with(&self) -> KindMask {
        self.collides_with
    }

    pub fn ai(&self) -> Option<&Ai> {
        self.ai.as_ref()
    }

    pub(crate) fn take_ai(&mut self) -> Option<Ai> {
        self.ai.take()
    }

    pub(crate) fn put_ai(&mut self, ai: Ai) {
        self.ai = Some(ai);
    }

    pub fn sprite(&self) -> Option<&SpriteAnimation> {
        self.sprite.as_ref()
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Contact flags from the most recent update.
    pub fn contacts(&self) -> Contacts {
        self.contacts
    }

    /// Queue a one-shot intent for the next tick.
    pub fn intend(&mut self, intent: Intent) {
        self.intents.insert(intent);
    }

    /// Model matrix rebuilt by the most recent update.
    pub fn model_matrix(&self) -> Mat4 {
        self.model_matrix
    }

    /// Advance one fixed simulation step.
    ///
    /// `target` is the position the AI tracks (the player, for enemies);
    /// `collidables` are the entities resolved against this tick. The slice
    /// must not contain this entity — stages guarantee that by swapping an
    /// inactive placeholder into the hole — but an accidental alias is
    /// still caught by the id short-circuit.
    pub fn update(
        &mut self,
        dt: f32,
        target: Option<Vec3>,
        collidables: &mut [Entity],
        policy: &CollisionPolicy,
    ) {
        if self.lives <= 0 {
            self.deactivate();
        }
        if !self.is_active {
            return;
        }

        let mut tick = self.intents.drain();
        self.contacts = Contacts::default();
        self.damaged.clear();
        self.acceleration = self.gravity;

        if self.ai.is_some() {
            crate::ai::drive(self, target);
        }

        if let Some(sprite) = self.sprite.as_mut() {
            let moving = self.movement.length_squared() > 0.0;
            if moving {
                let m = self.movement;
                let facing = if m.x.abs() >= m.y.abs() {
                    if m.x < 0.0 { Facing::Left } else { Facing::Right }
                } else if m.y < 0.0 {
                    Facing::Down
                } else {
                    Facing::Up
                };
                sprite.set_facing(facing);
            }
            sprite.advance(dt, moving);
        }

        match self.motion {
            MotionModel::Static => {
                // Scenery: no displacement, no resolution, just the matrix.
                self.model_matrix = Mat4::from_translation(self.position);
                return;
            }
            MotionModel::Thrust => {
                if tick.thrust_up {
                    self.acceleration.y += self.thrust_power;
                }
                if tick.thrust_down {
                    self.acceleration.y -= self.thrust_power;
                }
                if tick.thrust_left {
                    self.acceleration.x -= self.thrust_power;
                }
                if tick.thrust_right {
                    self.acceleration.x += self.thrust_power;
                }
                if tick.rotate_ccw {
                    self.rotation += self.rotate_speed;
                    if self.rotation >= TAU {
                        self.rotation -= TAU;
                    }
                }
                if tick.rotate_cw {
                    self.rotation -= self.rotate_speed;
                    if self.rotation <= -TAU {
                        self.rotation += TAU;
                    }
                }
                self.velocity += self.acceleration * dt;
            }
            MotionModel::Walk { drive_y } => {
                self.velocity.x = self.movement.x * self.speed;
                if drive_y {
                    self.velocity.y = self.movement.y * self.speed;
                }
                self.velocity += self.acceleration * dt;
            }
            MotionModel::Ballistic => {
                self.velocity.x = -self.rotation.sin() * self.speed;
                self.velocity.y = self.rotation.cos() * self.speed;
            }
        }

        self.position.y += self.velocity.y * dt;
        collision::resolve_axis(self, collidables, Axis::Y, policy);
        crate::ai::ground_reaction(self, &mut tick);

        self.position.x += self.velocity.x * dt;
        collision::resolve_axis(self, collidables, Axis::X, policy);

        if tick.jump {
            self.velocity.y += self.jump_power;
        }

        self.model_matrix = match self.motion {
            MotionModel::Thrust | MotionModel::Ballistic => {
                Mat4::from_translation(self.position) * Mat4::from_rotation_z(self.rotation)
            }
            _ => Mat4::from_translation(self.position),
        };
    }

    /// Emit one textured quad. No-op when inactive or untextured.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        if !self.is_active {
            return;
        }
        let Some(texture) = self.texture else {
            return;
        };
        let uv = self.sprite.as_ref().map_or(Rect::FULL, SpriteAnimation::uv);
        sink.draw_quad(self.model_matrix, texture, uv);
    }
}

/// The default entity is the inactive placeholder a stage swaps into the
/// slot of the entity it is currently updating. It participates in nothing.
impl Default for Entity {
    fn default() -> Self {
        Self {
            id: EntityId::PLACEHOLDER,
            kind: EntityKind::Platform,
            motion: MotionModel::Static,
            collides_with: KindMask::NONE,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            movement: Vec3::ZERO,
            speed: 0.0,
            gravity: Vec3::ZERO,
            rotation: 0.0,
            rotate_speed: 0.0,
            thrust_power: 0.0,
            jump_power: 0.0,
            lives: 0,
            width: 1.0,
            height: 1.0,
            sprite: None,
            texture: None,
            ai: None,
            is_active: false,
            contacts: Contacts::default(),
            intents: Intents::default(),
            damaged: Vec::new(),
            model_matrix: Mat4::IDENTITY,
        }
    }
}

// ── EntityBuilder ───────────────────────────────────────────────────────

/// Validating builder for [`Entity`].
///
/// Defaults per kind: players and enemies walk (gravity off until set),
/// platforms are static, projectiles are ballistic. Collision masks default
/// to the pairings the kinds resolve in play: players against enemies and
/// platforms, enemies against players and platforms, projectiles against
/// enemies, platforms against nothing.
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    kind: EntityKind,
    motion: Option<MotionModel>,
    collides_with: Option<KindMask>,
    position: Vec3,
    width: f32,
    height: f32,
    speed: f32,
    gravity: Vec3,
    rotation: f32,
    rotate_speed: f32,
    thrust_power: f32,
    jump_power: f32,
    lives: i32,
    ai: Option<AiKind>,
    animation: Option<(SpriteSheet, AnimationSet)>,
    texture: Option<TextureHandle>,
}

impl EntityBuilder {
    fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            motion: None,
            collides_with: None,
            position: Vec3::ZERO,
            width: 1.0,
            height: 1.0,
            speed: 0.0,
            gravity: Vec3::ZERO,
            rotation: 0.0,
            rotate_speed: 0.0,
            thrust_power: 0.0,
            jump_power: 0.0,
            lives: 1,
            ai: None,
            animation: None,
            texture: None,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Full extents of the bounding box.
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Override the kind's default motion model.
    pub fn motion(mut self, motion: MotionModel) -> Self {
        self.motion = Some(motion);
        self
    }

    /// Override the kind's default collision mask.
    pub fn collides_with(mut self, mask: KindMask) -> Self {
        self.collides_with = Some(mask);
        self
    }

    pub fn rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    pub fn rotate_speed(mut self, radians: f32) -> Self {
        self.rotate_speed = radians;
        self
    }

    pub fn thrust_power(mut self, power: f32) -> Self {
        self.thrust_power = power;
        self
    }

    pub fn jump_power(mut self, power: f32) -> Self {
        self.jump_power = power;
        self
    }

    pub fn lives(mut self, lives: i32) -> Self {
        self.lives = lives;
        self
    }

    pub fn ai(mut self, kind: AiKind) -> Self {
        self.ai = Some(kind);
        self
    }

    pub fn animation(mut self, sheet: SpriteSheet, set: AnimationSet) -> Self {
        self.animation = Some((sheet, set));
        self
    }

    pub fn texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Validate and construct. Rejects non-positive extents, negative speed,
    /// and animation clips that don't fit their sheet.
    pub fn build(self) -> Result<Entity, EntityError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(EntityError::NonPositiveExtent {
                width: self.width,
                height: self.height,
            });
        }
        if self.speed < 0.0 {
            return Err(EntityError::NegativeSpeed(self.speed));
        }

        let sprite = match self.animation {
            Some((sheet, set)) => Some(SpriteAnimation::new(sheet, set)?),
            None => None,
        };

        let motion = self.motion.unwrap_or(match self.kind {
            EntityKind::Player | EntityKind::Enemy => MotionModel::Walk { drive_y: false },
            EntityKind::Platform => MotionModel::Static,
            EntityKind::Projectile => MotionModel::Ballistic,
        });

        let collides_with = self.collides_with.unwrap_or(match self.kind {
            EntityKind::Player => KindMask::just(EntityKind::Enemy).with(EntityKind::Platform),
            EntityKind::Enemy => KindMask::just(EntityKind::Player).with(EntityKind::Platform),
            EntityKind::Projectile => KindMask::just(EntityKind::Enemy),
            EntityKind::Platform => KindMask::NONE,
        });

        Ok(Entity {
            id: EntityId::next(),
            kind: self.kind,
            motion,
            collides_with,
            position: self.position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            movement: Vec3::ZERO,
            speed: self.speed,
            gravity: self.gravity,
            rotation: self.rotation,
            rotate_speed: self.rotate_speed,
            thrust_power: self.thrust_power,
            jump_power: self.jump_power,
            lives: self.lives,
            width: self.width,
            height: self.height,
            sprite,
            texture: self.texture,
            ai: self.ai.map(Ai::new),
            is_active: true,
            contacts: Contacts::default(),
            intents: Intents::default(),
            damaged: Vec::new(),
            model_matrix: Mat4::from_translation(self.position),
        })
    }
}
