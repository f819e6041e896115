//! Scenes, the game session, and data-driven scene layouts.
//!
//! [`GameSession`] is the context that outlives scenes: lives and ammo carry
//! across transitions, and scene changes are requested through it instead of
//! through globals. [`SceneManager`] owns the named scenes and processes the
//! pending transition at the start of the next frame.
//!
//! [`SceneData`] is the serializable form of a scene's starting entities.
//! Layouts can be authored in JSON and loaded with
//! [`Stage::load`](crate::stage::Stage::load), which validates every spec
//! before play starts.

use serde::{Deserialize, Serialize};

use crate::ai::AiKind;
use crate::animation::{AnimationError, AnimationSet, SpriteSheet};
use crate::collision::KindMask;
use crate::entity::{Entity, EntityError, EntityKind, MotionModel};
use crate::input::{Button, Buttons};
use crate::math::Vec3;
use crate::render::{RenderSink, TextureHandle};

// ── GameSession ─────────────────────────────────────────────────────────

/// State that outlives any single scene.
///
/// Created once at startup and passed to every scene callback. Scenes read
/// `lives` when configuring their player and write it back as play
/// progresses, so health follows the player from level to level.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub lives: i32,
    pub ammo: u32,
    pending: Option<String>,
}

impl GameSession {
    pub fn new(lives: i32, ammo: u32) -> Self {
        Self {
            lives,
            ammo,
            pending: None,
        }
    }

    /// Request a transition to the named scene. Processed at the start of
    /// the next frame; a second request in the same frame wins.
    pub fn goto(&mut self, name: &str) {
        self.pending = Some(name.to_string());
    }

    /// The requested-but-unprocessed transition, if any.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub(crate) fn take_pending(&mut self) -> Option<String> {
        self.pending.take()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(3, 200)
    }
}

// ── Scene trait & manager ───────────────────────────────────────────────

/// One screen of the game: a menu, a level, a win/lose screen.
///
/// The driver calls `update` once per simulation step and `render` once per
/// frame, in strict alternation. `enter` runs when the scene becomes
/// active, `exit` just before it stops being active.
pub trait Scene {
    fn enter(&mut self, session: &mut GameSession);
    fn update(&mut self, dt: f32, input: &Buttons<Button>, session: &mut GameSession);
    fn render(&self, sink: &mut dyn RenderSink);
    fn exit(&mut self, _session: &mut GameSession) {}
}

/// Owns the named scenes and the active one.
pub struct SceneManager {
    scenes: Vec<(String, Box<dyn Scene>)>,
    active: Option<usize>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self {
            scenes: Vec::new(),
            active: None,
        }
    }

    pub fn register(&mut self, name: &str, scene: Box<dyn Scene>) {
        self.scenes.push((name.to_string(), scene));
    }

    /// Name of the active scene, or `None` before the first transition.
    pub fn active(&self) -> Option<&str> {
        self.active.map(|i| self.scenes[i].0.as_str())
    }

    /// Process a pending transition: exit the old scene, enter the new one.
    /// An unknown name is logged and dropped rather than panicking.
    pub(crate) fn apply_transition(&mut self, session: &mut GameSession) {
        let Some(target) = session.take_pending() else {
            return;
        };
        if self.active.is_some_and(|i| self.scenes[i].0 == target) {
            return;
        }

        match self.scenes.iter().position(|(name, _)| *name == target) {
            Some(idx) => {
                if let Some(old) = self.active {
                    self.scenes[old].1.exit(session);
                    log::info!("scene transition: {} -> {target}", self.scenes[old].0);
                } else {
                    log::info!("entering scene: {target}");
                }
                self.active = Some(idx);
                self.scenes[idx].1.enter(session);
            }
            None => log::warn!("no scene named '{target}'"),
        }
    }

    pub(crate) fn update(
        &mut self,
        dt: f32,
        input: &Buttons<Button>,
        session: &mut GameSession,
    ) {
        if let Some(i) = self.active {
            self.scenes[i].1.update(dt, input, session);
        }
    }

    pub(crate) fn render(&self, sink: &mut dyn RenderSink) {
        if let Some(i) = self.active {
            self.scenes[i].1.render(sink);
        }
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

// ── Scene layout data ───────────────────────────────────────────────────

/// A scene's starting entities in serializable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneData {
    pub entities: Vec<EntitySpec>,
}

impl SceneData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Sprite-sheet layout in a scene file: either one `frames` clip shared by
/// every facing, or four directional clips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub columns: u32,
    pub rows: u32,
    #[serde(default)]
    pub frames: Vec<u32>,
    #[serde(default)]
    pub left: Vec<u32>,
    #[serde(default)]
    pub right: Vec<u32>,
    #[serde(default)]
    pub up: Vec<u32>,
    #[serde(default)]
    pub down: Vec<u32>,
}

impl AnimationSpec {
    fn set(&self) -> Result<AnimationSet, AnimationError> {
        let directional = [&self.left, &self.right, &self.up, &self.down];
        if directional.iter().all(|clip| !clip.is_empty()) {
            AnimationSet::new(
                self.left.clone(),
                self.right.clone(),
                self.up.clone(),
                self.down.clone(),
            )
        } else {
            AnimationSet::uniform(self.frames.clone())
        }
    }
}

fn default_extent() -> f32 {
    1.0
}

fn default_lives() -> i32 {
    1
}

/// One entity in a scene layout. Optional fields fall back to the kind's
/// defaults, exactly as [`EntityBuilder`](crate::entity::EntityBuilder) does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySpec {
    pub kind: EntityKind,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "default_extent")]
    pub width: f32,
    #[serde(default = "default_extent")]
    pub height: f32,
    #[serde(default)]
    pub speed: f32,
    #[serde(default)]
    pub gravity: Vec3,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub rotate_speed: f32,
    #[serde(default)]
    pub thrust_power: f32,
    #[serde(default)]
    pub jump_power: f32,
    #[serde(default = "default_lives")]
    pub lives: i32,
    #[serde(default)]
    pub motion: Option<MotionModel>,
    #[serde(default)]
    pub collides_with: Option<KindMask>,
    #[serde(default)]
    pub ai: Option<AiKind>,
    #[serde(default)]
    pub animation: Option<AnimationSpec>,
    #[serde(default)]
    pub texture: Option<TextureHandle>,
}

impl EntitySpec {
    /// A spec with the kind's defaults, for programmatic authoring.
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            position: Vec3::ZERO,
            width: default_extent(),
            height: default_extent(),
            speed: 0.0,
            gravity: Vec3::ZERO,
            rotation: 0.0,
            rotate_speed: 0.0,
            thrust_power: 0.0,
            jump_power: 0.0,
            lives: default_lives(),
            motion: None,
            collides_with: None,
            ai: None,
            animation: None,
            texture: None,
        }
    }

    /// Validate and build the entity this spec describes.
    pub fn build(&self) -> Result<Entity, EntityError> {
        let mut builder = Entity::builder(self.kind)
            .at(self.position)
            .size(self.width, self.height)
            .speed(self.speed)
            .gravity(self.gravity)
            .rotation(self.rotation)
            .rotate_speed(self.rotate_speed)
            .thrust_power(self.thrust_power)
            .jump_power(self.jump_power)
            .lives(self.lives);

        if let Some(motion) = self.motion {
            builder = builder.motion(motion);
        }
        if let Some(mask) = self.collides_with {
            builder = builder.collides_with(mask);
        }
        if let Some(ai) = self.ai {
            builder = builder.ai(ai);
        }
        if let Some(texture) = self.texture {
            builder = builder.texture(texture);
        }
        if let Some(spec) = &self.animation {
            let sheet = SpriteSheet::new(spec.columns, spec.rows)?;
            builder = builder.animation(sheet, spec.set()?);
        }

        builder.build()
    }
}
