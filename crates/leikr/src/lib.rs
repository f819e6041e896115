//! # Leikr — A Small 2D Game Core
//!
//! The simulation heart of a 2D game: one [`Entity`](entity::Entity) type
//! covering players, enemies, platforms, and projectiles, with per-kind
//! motion integration, axis-separated AABB collision resolution, a
//! parameterized enemy AI state machine, sprite-sheet animation, and
//! fixed-timestep scene management.
//!
//! Leikr deliberately owns no window, GPU, or audio device. The platform
//! layer polls input into [`Buttons`](input::Buttons), drives
//! [`Game::advance`](game::Game::advance) with real elapsed time, and
//! implements [`RenderSink`](render::RenderSink) to draw the textured quads
//! the core emits.
//!
//! Start with `use leikr::prelude::*` and build a [`Game`](game::Game).

pub mod ai;
pub mod animation;
pub mod collision;
pub mod entity;
pub mod game;
pub mod input;
pub mod math;
pub mod prelude;
pub mod render;
pub mod scene;
pub mod stage;
pub mod time;

/// Initialize `env_logger` from `RUST_LOG`, once. Safe to call again; a
/// second logger is ignored.
pub fn init_logger() {
    let _ = env_logger::Builder::new().parse_default_env().try_init();
}
