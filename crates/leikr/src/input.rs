//! Pre-debounced button state.
//!
//! The core never sees raw platform events. The embedding input layer polls
//! its windowing library once per frame and feeds [`Buttons`] via
//! [`press`](Buttons::press) / [`release`](Buttons::release); scene code then
//! reads level state (`pressed`) and edge state (`just_pressed` /
//! `just_released`).
//!
//! Edge state is cleared by [`end_frame`](Buttons::end_frame), which the
//! driver calls after the simulation has consumed a frame's input.

use std::collections::HashSet;
use std::hash::Hash;

/// The actions a game built on this core responds to.
///
/// Movement is level-triggered; jump, thrust, rotate, and fire are typically
/// consumed as edges and turned into single-tick intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    Jump,
    ThrustUp,
    ThrustDown,
    ThrustLeft,
    ThrustRight,
    RotateCw,
    RotateCcw,
    Fire,
    Confirm,
}

/// Tracks the state of a set of boolean inputs.
///
/// - `pressed`: currently held down
/// - `just_pressed`: pressed this frame (not held last frame)
/// - `just_released`: released this frame
///
/// Generic over the button type so embedders can also track their own raw
/// key codes with the same mechanism.
pub struct Buttons<T: Eq + Hash + Copy> {
    pressed: HashSet<T>,
    just_pressed: HashSet<T>,
    just_released: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Buttons<T> {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    /// Returns `true` if the input is currently held down.
    pub fn pressed(&self, input: T) -> bool {
        self.pressed.contains(&input)
    }

    /// Returns `true` if the input was pressed this frame.
    pub fn just_pressed(&self, input: T) -> bool {
        self.just_pressed.contains(&input)
    }

    /// Returns `true` if the input was released this frame.
    pub fn just_released(&self, input: T) -> bool {
        self.just_released.contains(&input)
    }

    /// Record a press. Repeated presses without a release are ignored, so
    /// key-repeat does not retrigger edges.
    pub fn press(&mut self, input: T) {
        if self.pressed.insert(input) {
            self.just_pressed.insert(input);
        }
    }

    /// Record a release.
    pub fn release(&mut self, input: T) {
        if self.pressed.remove(&input) {
            self.just_released.insert(input);
        }
    }

    /// Clear edge state. Level state (`pressed`) persists until released.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for Buttons<T> {
    fn default() -> Self {
        Self::new()
    }
}
