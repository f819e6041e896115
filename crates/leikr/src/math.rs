//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. [`Rect`] selects a sub-region of a texture in UV
//! space — for example, a single frame of a sprite sheet.

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// A normalized rectangle within a texture (UV space, 0.0–1.0).
///
/// Coordinates follow atlas convention: (0,0) is the top-left corner of the
/// texture and (1,1) the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// The full texture, (0,0) to (1,1).
    pub const FULL: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ONE,
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Width of the rectangle in UV units.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the rectangle in UV units.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_covers_unit_square() {
        let r = Rect::FULL;
        assert_eq!(r.min, Vec2::ZERO);
        assert_eq!(r.max, Vec2::ONE);
        assert_eq!(r.width(), 1.0);
        assert_eq!(r.height(), 1.0);
    }
}
