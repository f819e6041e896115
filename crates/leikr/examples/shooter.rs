//! Shooter — thrust ship, lasers, and pursuing flyers.
//!
//! A headless space scene: the player is a thrust-driven ship that rotates
//! and fires ballistic shots; enemies are flyers that patrol until the ship
//! gets close, then give chase. Ammo is tracked on the session, and shots
//! are deactivated once they fly out of range but stay in the stage until
//! the scene is torn down.
//!
//! Run with: `cargo run -p leikr --example shooter`

use leikr::prelude::*;

const SHOT_RANGE: f32 = 12.0;

struct Space {
    stage: Stage,
    policy: CollisionPolicy,
}

impl Space {
    fn new() -> Self {
        Self {
            stage: Stage::new(),
            policy: CollisionPolicy::default(),
        }
    }

    fn fire(&mut self, session: &mut GameSession) {
        if session.ammo == 0 {
            return;
        }
        let Some(player) = self.stage.player() else {
            return;
        };
        let shot = Entity::builder(EntityKind::Projectile)
            .at(player.position)
            .size(0.2, 0.2)
            .speed(6.0)
            .rotation(player.rotation)
            .texture(TextureHandle(3))
            .build()
            .expect("valid shot");
        self.stage.insert(shot);
        session.ammo -= 1;
        log::debug!("fired, {} rounds left", session.ammo);
    }
}

impl Scene for Space {
    fn enter(&mut self, session: &mut GameSession) {
        self.stage = Stage::new();

        self.stage
            .spawn(
                Entity::builder(EntityKind::Player)
                    .at(Vec3::new(0.0, -2.0, 0.0))
                    .size(0.8, 0.8)
                    .motion(MotionModel::Thrust)
                    .thrust_power(5.0)
                    .rotate_speed(0.05)
                    .lives(session.lives)
                    .texture(TextureHandle(0)),
            )
            .expect("valid ship");

        for x in [-1.0, 2.0, 4.0] {
            self.stage
                .spawn(
                    Entity::builder(EntityKind::Enemy)
                        .at(Vec3::new(x, 2.0, 0.0))
                        .size(0.8, 0.8)
                        .motion(MotionModel::Thrust)
                        .ai(AiKind::Flyer {
                            trigger: 3.0,
                            patrol_min_x: -1.0,
                            patrol_max_x: 4.0,
                            patrol_speed: 1.0,
                            pursuit_accel: 3.0,
                        })
                        .texture(TextureHandle(1)),
                )
                .expect("valid flyer");
        }
    }

    fn update(&mut self, dt: f32, input: &Buttons<Button>, session: &mut GameSession) {
        if input.just_pressed(Button::Fire) {
            self.fire(session);
        }

        let Some(player) = self.stage.player_mut() else {
            session.goto("done");
            return;
        };
        if input.pressed(Button::ThrustUp) {
            player.intend(Intent::ThrustUp);
        }
        if input.pressed(Button::ThrustDown) {
            player.intend(Intent::ThrustDown);
        }
        if input.pressed(Button::RotateCcw) {
            player.intend(Intent::RotateCcw);
        }
        if input.pressed(Button::RotateCw) {
            player.intend(Intent::RotateCw);
        }

        self.stage.step(dt, &self.policy);

        // Spent or out-of-range shots go dark; their slots are kept.
        let origin = self.stage.player().map(|p| p.position);
        if let Some(origin) = origin {
            for id in self
                .stage
                .entities()
                .iter()
                .filter(|e| {
                    e.kind() == EntityKind::Projectile
                        && e.is_active()
                        && e.position.distance(origin) > SHOT_RANGE
                })
                .map(|e| e.id())
                .collect::<Vec<_>>()
            {
                if let Some(shot) = self.stage.get_mut(id) {
                    shot.deactivate();
                }
            }
        }

        if let Some(player) = self.stage.player() {
            session.lives = player.lives;
        }
        if self.stage.active_count(EntityKind::Enemy) == 0 {
            log::info!("all flyers down");
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
        log::info!(
            "out of the fight with {} lives and {} rounds",
            session.lives,
            session.ammo
        );
    }
    fn update(&mut self, _dt: f32, _input: &Buttons<Button>, _session: &mut GameSession) {}
    fn render(&self, _sink: &mut dyn RenderSink) {}
}

fn main() {
    leikr::init_logger();

    let mut game = Game::new()
        .session(GameSession::new(3, 24))
        .scene("space", Box::new(Space::new()))
        .scene("done", Box::new(Done))
        .start("space");

    let mut sink = RecordingSink::new();
    for frame in 0u32..900 {
        // Scripted input: climb toward the flyers, firing bursts.
        if frame < 120 {
            game.input.press(Button::ThrustUp);
        } else {
            game.input.release(Button::ThrustUp);
        }
        if frame % 30 == 0 {
            game.input.press(Button::Fire);
        } else {
            game.input.release(Button::Fire);
        }

        game.advance(1.0 / 60.0);

        sink.clear();
        game.render(&mut sink);

        if game.active_scene() == Some("done") {
            break;
        }
    }

    log::info!(
        "done: scene '{}', last frame drew {} quads",
        game.active_scene().unwrap_or("?"),
        sink.calls.len()
    );
}
