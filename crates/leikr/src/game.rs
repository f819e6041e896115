//! Game driver surface.
//!
//! [`Game`] bundles the scene manager, the session, the fixed-timestep
//! clock, and the button state into the object the platform loop drives.
//! The embedding loop owns the window and the clock source; each frame it
//! feeds input, then calls [`advance`](Game::advance) with the elapsed real
//! time and [`render`](Game::render) with its sink, in strict alternation:
//!
//! ```ignore
//! let mut game = Game::new()
//!     .scene("menu", Box::new(MainMenu::new()))
//!     .scene("level_a", Box::new(LevelA::new()))
//!     .start("menu");
//!
//! loop {
//!     platform.poll(&mut game.input);
//!     game.advance(platform.frame_seconds());
//!     game.render(&mut renderer);
//! }
//! ```
//!
//! `advance` may run zero steps on a fast frame or several on a slow one;
//! the scene's `update` always sees the same fixed dt either way.

use crate::input::{Button, Buttons};
use crate::render::RenderSink;
use crate::scene::{GameSession, Scene, SceneManager};
use crate::time::FixedTimestep;

/// The top-level game object the platform loop drives.
pub struct Game {
    scenes: SceneManager,
    pub session: GameSession,
    timestep: FixedTimestep,
    pub input: Buttons<Button>,
}

impl Game {
    /// A game with a default session (3 lives, 200 ammo) and a 1/60 s step.
    pub fn new() -> Self {
        Self {
            scenes: SceneManager::new(),
            session: GameSession::default(),
            timestep: FixedTimestep::new(),
            input: Buttons::new(),
        }
    }

    /// Replace the starting session (builder pattern).
    pub fn session(mut self, session: GameSession) -> Self {
        self.session = session;
        self
    }

    /// Use a custom simulation step, in seconds (builder pattern).
    ///
    /// # Panics
    ///
    /// Panics if `step` is not strictly positive.
    pub fn timestep(mut self, step: f32) -> Self {
        self.timestep = FixedTimestep::with_step(step);
        self
    }

    /// Register a named scene (builder pattern).
    pub fn scene(mut self, name: &str, scene: Box<dyn Scene>) -> Self {
        self.scenes.register(name, scene);
        self
    }

    /// Queue the scene to enter on the first frame (builder pattern).
    pub fn start(mut self, name: &str) -> Self {
        self.session.goto(name);
        self
    }

    /// Name of the active scene, or `None` before the first `advance`.
    pub fn active_scene(&self) -> Option<&str> {
        self.scenes.active()
    }

    /// Advance the game by `elapsed` seconds of real time.
    ///
    /// Processes the pending scene transition, then runs however many whole
    /// fixed steps fit. Input edges are cleared once a step has consumed
    /// them; on a frame too short for a step they are held for the next one.
    pub fn advance(&mut self, elapsed: f32) {
        self.scenes.apply_transition(&mut self.session);

        let steps = self.timestep.advance(elapsed);
        let dt = self.timestep.step();
        for _ in 0..steps {
            self.scenes.update(dt, &self.input, &mut self.session);
        }
        if steps > 0 {
            self.input.end_frame();
        }
    }

    /// Render the active scene into the sink.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        self.scenes.render(sink);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
