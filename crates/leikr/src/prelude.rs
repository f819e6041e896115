//! Convenience re-exports — `use leikr::prelude::*` for the common items.

pub use crate::ai::{Ai, AiKind, AiState};
pub use crate::animation::{AnimationSet, Facing, SpriteAnimation, SpriteSheet, FRAME_RATE};
pub use crate::collision::{CollisionPolicy, Contacts, DamageTiming, KindMask};
pub use crate::entity::{Entity, EntityBuilder, EntityError, EntityId, EntityKind, Intent, MotionModel};
pub use crate::game::Game;
pub use crate::input::{Button, Buttons};
pub use crate::math::{Mat4, Quat, Rect, Vec2, Vec3, Vec4};
pub use crate::render::{DrawCall, QuadVertex, RecordingSink, RenderSink, TextureHandle};
pub use crate::scene::{AnimationSpec, EntitySpec, GameSession, Scene, SceneData, SceneManager};
pub use crate::stage::Stage;
pub use crate::time::{FixedTimestep, DEFAULT_STEP};
