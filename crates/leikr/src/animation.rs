//! Sprite-sheet animation.
//!
//! A sprite sheet is a single texture containing a uniform grid of frames.
//! [`SpriteSheet`] describes the grid, [`AnimationSet`] holds one frame
//! sequence per facing direction, and [`SpriteAnimation`] drives playback:
//! while an entity is moving, frame time accumulates and the frame index
//! advances modulo the clip length.
//!
//! ```text
//!  ┌────┬────┬────┬────┐
//!  │ 0  │ 1  │ 2  │ 3  │   4-column, 2-row sprite sheet
//!  ├────┼────┼────┼────┤   frame index = row * columns + column
//!  │ 4  │ 5  │ 6  │ 7  │
//!  └────┴────┴────┴────┘
//! ```

use std::fmt;

use crate::math::{Rect, Vec2};

/// Playback rate for walking animations, in frames per second.
pub const FRAME_RATE: f32 = 4.0;

/// Invalid animation configuration, rejected at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// The sheet grid has zero columns or rows.
    ZeroGrid,
    /// A facing direction was given an empty frame sequence.
    EmptyClip,
    /// A clip references a frame index beyond the sheet's grid.
    FrameOutOfRange { frame: u32, frame_count: u32 },
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationError::ZeroGrid => write!(f, "sprite sheet grid must be non-zero"),
            AnimationError::EmptyClip => write!(f, "animation clip has no frames"),
            AnimationError::FrameOutOfRange { frame, frame_count } => {
                write!(f, "frame {frame} out of range for a {frame_count}-frame sheet")
            }
        }
    }
}

impl std::error::Error for AnimationError {}

// ── SpriteSheet ─────────────────────────────────────────────────────────

/// A uniform grid of animation frames within one texture.
///
/// Frame indices are row-major (left-to-right, top-to-bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheet {
    columns: u32,
    rows: u32,
}

impl SpriteSheet {
    /// Create a sheet description. Rejects a zero-sized grid.
    pub fn new(columns: u32, rows: u32) -> Result<Self, AnimationError> {
        if columns == 0 || rows == 0 {
            return Err(AnimationError::ZeroGrid);
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of frames in the grid.
    pub fn frame_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// UV sub-rectangle of a frame: `u = (index % cols) / cols`,
    /// `v = (index / cols) / rows`, cell size `1/cols × 1/rows`.
    pub fn frame_rect(&self, index: u32) -> Rect {
        let u = (index % self.columns) as f32 / self.columns as f32;
        let v = (index / self.columns) as f32 / self.rows as f32;
        let cell = Vec2::new(1.0 / self.columns as f32, 1.0 / self.rows as f32);
        Rect::new(Vec2::new(u, v), Vec2::new(u, v) + cell)
    }
}

// ── Facing & AnimationSet ───────────────────────────────────────────────

/// Which way a sprite is facing. Selects the frame sequence to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
    Up,
    Down,
}

/// One owned frame sequence per facing direction.
///
/// Every sequence must be non-empty; the frames are freed with the set, no
/// manual cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSet {
    left: Vec<u32>,
    right: Vec<u32>,
    up: Vec<u32>,
    down: Vec<u32>,
}

impl AnimationSet {
    /// Build a set with distinct clips per facing. Rejects empty clips.
    pub fn new(
        left: Vec<u32>,
        right: Vec<u32>,
        up: Vec<u32>,
        down: Vec<u32>,
    ) -> Result<Self, AnimationError> {
        if left.is_empty() || right.is_empty() || up.is_empty() || down.is_empty() {
            return Err(AnimationError::EmptyClip);
        }
        Ok(Self {
            left,
            right,
            up,
            down,
        })
    }

    /// Build a set that plays the same clip for every facing — common for
    /// sheets with a single walk cycle.
    pub fn uniform(frames: Vec<u32>) -> Result<Self, AnimationError> {
        if frames.is_empty() {
            return Err(AnimationError::EmptyClip);
        }
        Ok(Self {
            left: frames.clone(),
            right: frames.clone(),
            up: frames.clone(),
            down: frames,
        })
    }

    /// The frame sequence for a facing direction. Never empty.
    pub fn clip(&self, facing: Facing) -> &[u32] {
        match facing {
            Facing::Left => &self.left,
            Facing::Right => &self.right,
            Facing::Up => &self.up,
            Facing::Down => &self.down,
        }
    }

    fn max_frame(&self) -> u32 {
        [&self.left, &self.right, &self.up, &self.down]
            .iter()
            .flat_map(|clip| clip.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

// ── SpriteAnimation ─────────────────────────────────────────────────────

/// Playback state over a sheet and a facing set.
///
/// Advanced once per simulation tick. The frame index only moves while the
/// entity is moving, and always stays within the active clip.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimation {
    sheet: SpriteSheet,
    set: AnimationSet,
    facing: Facing,
    index: usize,
    timer: f32,
}

impl SpriteAnimation {
    /// Combine a sheet and a facing set. Rejects clips that reference
    /// frames beyond the sheet's grid.
    pub fn new(sheet: SpriteSheet, set: AnimationSet) -> Result<Self, AnimationError> {
        let max = set.max_frame();
        if max >= sheet.frame_count() {
            return Err(AnimationError::FrameOutOfRange {
                frame: max,
                frame_count: sheet.frame_count(),
            });
        }
        Ok(Self {
            sheet,
            set,
            facing: Facing::Right,
            index: 0,
            timer: 0.0,
        })
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Switch the active clip. The frame index is wrapped into the new
    /// clip's range so it stays valid.
    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
        self.index %= self.set.clip(facing).len();
    }

    /// Index into the active clip, always in `[0, clip.len())`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Advance playback by one tick. Only animates while `moving`; at
    /// `1/FRAME_RATE` accumulated the timer resets and the index steps
    /// modulo the clip length.
    pub fn advance(&mut self, dt: f32, moving: bool) {
        if !moving {
            return;
        }
        self.timer += dt;
        if self.timer >= 1.0 / FRAME_RATE {
            self.timer = 0.0;
            self.index = (self.index + 1) % self.set.clip(self.facing).len();
        }
    }

    /// The current atlas frame index.
    pub fn frame(&self) -> u32 {
        self.set.clip(self.facing)[self.index]
    }

    /// UV rectangle of the current frame.
    pub fn uv(&self) -> Rect {
        self.sheet.frame_rect(self.frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn walker() -> SpriteAnimation {
        let sheet = SpriteSheet::new(4, 2).unwrap();
        let set = AnimationSet::new(vec![0, 1, 2], vec![4, 5, 6], vec![3], vec![7]).unwrap();
        SpriteAnimation::new(sheet, set).unwrap()
    }

    #[test]
    fn zero_grid_rejected() {
        assert_eq!(SpriteSheet::new(0, 4), Err(AnimationError::ZeroGrid));
    }

    #[test]
    fn empty_clip_rejected() {
        assert_eq!(
            AnimationSet::uniform(vec![]).unwrap_err(),
            AnimationError::EmptyClip
        );
    }

    #[test]
    fn out_of_range_frame_rejected() {
        let sheet = SpriteSheet::new(2, 2).unwrap();
        let set = AnimationSet::uniform(vec![0, 4]).unwrap();
        assert!(matches!(
            SpriteAnimation::new(sheet, set),
            Err(AnimationError::FrameOutOfRange { frame: 4, .. })
        ));
    }

    #[test]
    fn frame_rect_indexes_row_major() {
        let sheet = SpriteSheet::new(4, 2).unwrap();
        let rect = sheet.frame_rect(5); // row 1, column 1
        assert_relative_eq!(rect.min.x, 0.25);
        assert_relative_eq!(rect.min.y, 0.5);
        assert_relative_eq!(rect.width(), 0.25);
        assert_relative_eq!(rect.height(), 0.5);
    }

    #[test]
    fn index_stays_in_range_over_many_ticks() {
        let mut anim = walker();
        for _ in 0..1000 {
            anim.advance(1.0 / 60.0, true);
            assert!(anim.index() < 3);
        }
    }

    #[test]
    fn idle_does_not_animate() {
        let mut anim = walker();
        for _ in 0..120 {
            anim.advance(1.0 / 60.0, false);
        }
        assert_eq!(anim.index(), 0);
    }

    #[test]
    fn advances_at_four_frames_per_second() {
        let mut anim = walker();
        // 15 ticks at 1/60 s == 0.25 s == exactly one frame at 4 fps.
        for _ in 0..15 {
            anim.advance(1.0 / 60.0, true);
        }
        assert_eq!(anim.index(), 1);
    }

    #[test]
    fn facing_switch_wraps_index() {
        let mut anim = walker();
        anim.set_facing(Facing::Left);
        anim.index = 2;
        anim.set_facing(Facing::Up); // 1-frame clip
        assert_eq!(anim.index(), 0);
        assert_eq!(anim.frame(), 3);
    }
}
