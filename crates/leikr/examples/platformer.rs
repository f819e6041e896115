//! Platformer — walk, jump, and stomp enemies.
//!
//! A headless demo of the simulation core: a level with a floor, a player,
//! and two enemies, driven by a few seconds of scripted input. A real
//! embedding would poll a window for input and implement `RenderSink` over
//! its GPU API; here the input is scripted and draws land in a
//! `RecordingSink`.
//!
//! Run with: `cargo run -p leikr --example platformer`

use leikr::prelude::*;

struct Level {
    stage: Stage,
    policy: CollisionPolicy,
}

impl Level {
    fn new() -> Self {
        Self {
            stage: Stage::new(),
            policy: CollisionPolicy {
                damage: DamageTiming::OncePerTick,
                stomp_kills: true,
            },
        }
    }
}

impl Scene for Level {
    fn enter(&mut self, session: &mut GameSession) {
        self.stage = Stage::new();

        self.stage
            .spawn(
                Entity::builder(EntityKind::Platform)
                    .at(Vec3::new(0.0, -3.5, 0.0))
                    .size(14.0, 1.0)
                    .texture(TextureHandle(2)),
            )
            .expect("valid platform");

        self.stage
            .spawn(
                Entity::builder(EntityKind::Player)
                    .at(Vec3::new(-4.0, -2.5, 0.0))
                    .size(0.8, 0.8)
                    .speed(2.5)
                    .gravity(Vec3::new(0.0, -9.81, 0.0))
                    .jump_power(5.0)
                    .lives(session.lives)
                    .texture(TextureHandle(0)),
            )
            .expect("valid player");

        self.stage
            .spawn(
                Entity::builder(EntityKind::Enemy)
                    .at(Vec3::new(4.0, -2.5, 0.0))
                    .size(0.8, 0.8)
                    .speed(0.5)
                    .gravity(Vec3::new(0.0, -9.81, 0.0))
                    .ai(AiKind::Walker)
                    .texture(TextureHandle(1)),
            )
            .expect("valid walker");

        self.stage
            .spawn(
                Entity::builder(EntityKind::Enemy)
                    .at(Vec3::new(1.0, -2.5, 0.0))
                    .size(0.8, 0.8)
                    .speed(1.0)
                    .gravity(Vec3::new(0.0, -9.81, 0.0))
                    .ai(AiKind::Guard {
                        trigger: 3.0,
                        track_y: false,
                    })
                    .texture(TextureHandle(1)),
            )
            .expect("valid guard");
    }

    fn update(&mut self, dt: f32, input: &Buttons<Button>, session: &mut GameSession) {
        let Some(player) = self.stage.player_mut() else {
            log::info!("player down — leaving the level");
            session.goto("done");
            return;
        };

        player.movement = Vec3::ZERO;
        if input.pressed(Button::Left) {
            player.movement.x = -1.0;
        }
        if input.pressed(Button::Right) {
            player.movement.x = 1.0;
        }
        if input.just_pressed(Button::Jump) && player.contacts().bottom {
            player.intend(Intent::Jump);
        }

        self.stage.step(dt, &self.policy);

        if let Some(player) = self.stage.player() {
            session.lives = player.lives;
        }
        if self.stage.active_count(EntityKind::Enemy) == 0 {
            log::info!("all enemies cleared");
            session.goto("done");
        }
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        self.stage.render(sink);
    }
}

struct Done;

impl Scene for Done {
    fn enter(&mut self, session: &mut GameSession) {
        log::info!("level over with {} lives left", session.lives);
    }
    fn update(&mut self, _dt: f32, _input: &Buttons<Button>, _session: &mut GameSession) {}
    fn render(&self, _sink: &mut dyn RenderSink) {}
}

fn main() {
    leikr::init_logger();

    let mut game = Game::new()
        .session(GameSession::new(3, 0))
        .scene("level", Box::new(Level::new()))
        .scene("done", Box::new(Done))
        .start("level");

    let mut sink = RecordingSink::new();
    for frame in 0u32..600 {
        // Scripted input: run right, hop every 1.5 seconds.
        if frame == 10 {
            game.input.press(Button::Right);
        }
        if frame % 90 == 20 {
            game.input.press(Button::Jump);
        } else {
            game.input.release(Button::Jump);
        }

        game.advance(1.0 / 60.0);

        sink.clear();
        game.render(&mut sink);

        if game.active_scene() == Some("done") {
            break;
        }
    }

    log::info!(
        "done: scene '{}', {} lives, last frame drew {} quads",
        game.active_scene().unwrap_or("?"),
        game.session.lives,
        sink.calls.len()
    );
}
