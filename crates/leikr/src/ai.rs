//! Enemy behavior state machines.
//!
//! Each AI-controlled entity carries an [`Ai`]: a behavior kind with its
//! tuning parameters and the current [`AiState`]. The machine runs once per
//! tick before integration and steers the entity by writing `movement`,
//! `velocity`, or `acceleration`.
//!
//! The machines are one-directional: once a proximity transition fires, the
//! entity never returns to `Idle`. That is a deliberate simplification of
//! the behavior being modeled, not an oversight.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, TickIntents};
use crate::math::Vec3;

/// Behavior kind with per-kind tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AiKind {
    /// Marches left forever. Stateless.
    Walker,
    /// Holds position until the target comes within `trigger` distance,
    /// then walks toward it — on x only, or on both axes with `track_y`.
    Guard { trigger: f32, track_y: bool },
    /// Ping-pongs between two x bounds at constant speed; switches to
    /// two-axis accelerated pursuit when the target comes within `trigger`.
    Flyer {
        trigger: f32,
        patrol_min_x: f32,
        patrol_max_x: f32,
        patrol_speed: f32,
        pursuit_accel: f32,
    },
    /// Chases horizontally once triggered, and queues a jump every time it
    /// touches ground while attacking.
    Jumper { trigger: f32 },
}

/// Current state of an AI machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    Idle,
    Walking,
    Patrolling,
    Attacking,
}

/// An entity's AI controller: kind, state, and patrol bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ai {
    kind: AiKind,
    state: AiState,
    /// Flyer patrol direction: `true` while heading toward the left bound.
    patrol_left: bool,
}

impl Ai {
    pub fn new(kind: AiKind) -> Self {
        let state = match kind {
            AiKind::Walker => AiState::Walking,
            AiKind::Guard { .. } | AiKind::Jumper { .. } => AiState::Idle,
            AiKind::Flyer { .. } => AiState::Patrolling,
        };
        Self {
            kind,
            state,
            patrol_left: true,
        }
    }

    pub fn kind(&self) -> AiKind {
        self.kind
    }

    pub fn state(&self) -> AiState {
        self.state
    }
}

/// Whether the target is within triggering distance of the entity.
fn near(entity: &Entity, target: Option<Vec3>, trigger: f32) -> bool {
    target.is_some_and(|t| entity.position.distance(t) < trigger)
}

/// Run one tick of the entity's AI. Steering is written directly into the
/// entity's kinematic fields; integration picks it up afterwards.
pub(crate) fn drive(entity: &mut Entity, target: Option<Vec3>) {
    // Extract/reinsert so the machine can borrow the entity mutably.
    let Some(mut ai) = entity.take_ai() else {
        return;
    };

    match ai.kind {
        AiKind::Walker => {
            entity.movement = Vec3::new(-1.0, 0.0, 0.0);
        }

        AiKind::Guard { trigger, track_y } => match ai.state {
            AiState::Idle => {
                if near(entity, target, trigger) {
                    ai.state = AiState::Walking;
                }
            }
            AiState::Walking => {
                if let Some(t) = target {
                    entity.movement.x = if entity.position.x > t.x { -1.0 } else { 1.0 };
                    if track_y {
                        entity.movement.y = if entity.position.y > t.y { -1.0 } else { 1.0 };
                    }
                }
            }
            _ => {}
        },

        AiKind::Flyer {
            trigger,
            patrol_min_x,
            patrol_max_x,
            patrol_speed,
            pursuit_accel,
        } => match ai.state {
            AiState::Idle | AiState::Patrolling => {
                if near(entity, target, trigger) {
                    ai.state = AiState::Attacking;
                } else if ai.state == AiState::Patrolling {
                    if ai.patrol_left {
                        if entity.position.x > patrol_min_x {
                            entity.velocity.x = -patrol_speed;
                        } else {
                            ai.patrol_left = false;
                            entity.velocity.x = patrol_speed;
                        }
                    } else if entity.position.x < patrol_max_x {
                        entity.velocity.x = patrol_speed;
                    } else {
                        ai.patrol_left = true;
                        entity.velocity.x = -patrol_speed;
                    }
                }
            }
            AiState::Attacking => {
                if let Some(t) = target {
                    entity.acceleration.x = if entity.position.x > t.x {
                        -pursuit_accel
                    } else {
                        pursuit_accel
                    };
                    entity.acceleration.y = if entity.position.y > t.y {
                        -pursuit_accel
                    } else {
                        pursuit_accel
                    };
                }
            }
            _ => {}
        },

        AiKind::Jumper { trigger } => match ai.state {
            AiState::Idle => {
                if near(entity, target, trigger) {
                    ai.state = AiState::Attacking;
                }
            }
            AiState::Attacking => {
                if let Some(t) = target {
                    entity.movement.x = if entity.position.x > t.x { -1.0 } else { 1.0 };
                }
            }
            _ => {}
        },
    }

    entity.put_ai(ai);
}

/// Post-Y-pass hook: an attacking jumper that touched ground this tick
/// queues a jump, consumed at the end of the same update.
pub(crate) fn ground_reaction(entity: &mut Entity, tick: &mut TickIntents) {
    if let Some(ai) = entity.ai() {
        if matches!(ai.kind(), AiKind::Jumper { .. })
            && ai.state() == AiState::Attacking
            && entity.contacts().bottom
        {
            tick.jump = true;
        }
    }
}
