//! Render-sink boundary.
//!
//! The core does not own a GPU device. Each frame it hands the renderer one
//! textured quad per visible entity: a model matrix, an opaque texture
//! handle, and a UV rectangle (the full texture, or one sprite-sheet frame).
//! The embedding renderer implements [`RenderSink`] over whatever graphics
//! API it uses.
//!
//! For sinks that want pre-built vertex data, [`quad_vertices`] expands a
//! quad into the classic 6-vertex / 2-triangle form with world-space
//! positions, ready to upload as-is. `#[repr(C)]` plus the `bytemuck`
//! traits let a `&[QuadVertex]` be cast to `&[u8]` without copies.

use bytemuck::{Pod, Zeroable};

use crate::math::{Mat4, Rect, Vec3};

/// Opaque identifier for a texture owned by the embedding renderer.
///
/// The core never inspects it; scene code gets handles from the renderer's
/// asset layer and attaches them to entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TextureHandle(pub u32);

/// Receives one draw request per visible entity per frame.
pub trait RenderSink {
    fn draw_quad(&mut self, model: Mat4, texture: TextureHandle, uv: Rect);
}

/// Per-vertex data for one quad corner: world-space position and UV.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Expand a quad into two triangles.
///
/// The unit quad spans ±0.5 around the model origin and is transformed by
/// `model` on the CPU. UVs follow atlas convention (v grows downward), so
/// the bottom-left corner samples `(min.x, max.y)`.
pub fn quad_vertices(model: &Mat4, uv: Rect) -> [QuadVertex; 6] {
    let corner = |x: f32, y: f32, u: f32, v: f32| {
        let p = model.transform_point3(Vec3::new(x, y, 0.0));
        QuadVertex {
            position: [p.x, p.y, p.z],
            uv: [u, v],
        }
    };

    let bl = corner(-0.5, -0.5, uv.min.x, uv.max.y);
    let br = corner(0.5, -0.5, uv.max.x, uv.max.y);
    let tr = corner(0.5, 0.5, uv.max.x, uv.min.y);
    let tl = corner(-0.5, 0.5, uv.min.x, uv.min.y);

    [bl, br, tr, bl, tr, tl]
}

// ── RecordingSink ───────────────────────────────────────────────────────

/// A draw request captured by [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub model: Mat4,
    pub texture: TextureHandle,
    pub uv: Rect,
}

/// A sink that records draw requests instead of rendering them.
///
/// Used by tests and headless runs to observe what would be drawn.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<DrawCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderSink for RecordingSink {
    fn draw_quad(&mut self, model: Mat4, texture: TextureHandle, uv: Rect) {
        self.calls.push(DrawCall { model, texture, uv });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use approx::assert_relative_eq;

    #[test]
    fn quad_is_two_ccw_triangles() {
        let verts = quad_vertices(&Mat4::IDENTITY, Rect::FULL);
        assert_eq!(verts[0].position, [-0.5, -0.5, 0.0]);
        assert_eq!(verts[1].position, [0.5, -0.5, 0.0]);
        assert_eq!(verts[2].position, [0.5, 0.5, 0.0]);
        // Second triangle shares the diagonal.
        assert_eq!(verts[3], verts[0]);
        assert_eq!(verts[4], verts[2]);
        assert_eq!(verts[5].position, [-0.5, 0.5, 0.0]);
    }

    #[test]
    fn v_axis_is_flipped_for_atlas_space() {
        let uv = Rect::new(Vec2::new(0.25, 0.5), Vec2::new(0.5, 1.0));
        let verts = quad_vertices(&Mat4::IDENTITY, uv);
        // Bottom-left vertex samples the bottom of the frame.
        assert_eq!(verts[0].uv, [0.25, 1.0]);
        // Top-right vertex samples the top.
        assert_eq!(verts[2].uv, [0.5, 0.5]);
    }

    #[test]
    fn model_matrix_moves_the_quad() {
        let model = Mat4::from_translation(Vec3::new(3.0, -2.0, 0.0));
        let verts = quad_vertices(&model, Rect::FULL);
        assert_relative_eq!(verts[0].position[0], 2.5);
        assert_relative_eq!(verts[0].position[1], -2.5);
    }

    #[test]
    fn recording_sink_captures_calls() {
        let mut sink = RecordingSink::new();
        sink.draw_quad(Mat4::IDENTITY, TextureHandle(7), Rect::FULL);
        assert_eq!(sink.calls.len(), 1);
        assert_eq!(sink.calls[0].texture, TextureHandle(7));
    }
}
