//! Renderer boundary: what the engine hands to a drawing backend.
//!
//! The engine never draws. Each tick that needs a frame produces a `Scene`:
//! every picture fragment (textured), then the highlighted capture zone
//! blended on top with its authoritative transform.

use serde::{Deserialize, Serialize};

use crate::geom2::Aff2;
use crate::mesh::Mesh;
use crate::puzzle::{Puzzle, Window};

/// Image resource key, `image{n}.png`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

impl TextureId {
    pub fn file_name(&self) -> String {
        format!("image{}.png", self.0)
    }

    /// Next id in the cycle `0..count`.
    pub fn next(self, count: u32) -> Self {
        let count = count.max(1);
        TextureId((self.0 % count + 1) % count)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    /// Fragment sampled from the puzzle image.
    Textured,
    /// Capture zone drawn as a translucent overlay.
    Highlight,
}

impl Blend {
    /// Constant colour mixed in by the mesh shader.
    pub const CONST_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.1];

    /// Weight of the texture sample against `CONST_COLOR`.
    pub fn blend_factor(self) -> [f32; 4] {
        match self {
            Blend::Textured => [1.0; 4],
            Blend::Highlight => [0.0; 4],
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DrawItem<'a> {
    pub mesh_index: usize,
    pub mesh: &'a Mesh,
    pub transform: Aff2,
    pub blend: Blend,
}

#[derive(Clone, Debug)]
pub struct Scene<'a> {
    pub window: Window,
    pub texture: TextureId,
    pub items: Vec<DrawItem<'a>>,
}

impl<'a> Scene<'a> {
    /// Fragments use the animated transform when animation is on; the
    /// highlight always uses the zone's authoritative transform.
    pub fn build(puzzle: &'a Puzzle, texture: TextureId, animation_enabled: bool) -> Self {
        let mut items: Vec<DrawItem<'a>> = puzzle
            .pictures()
            .map(|(i, m)| DrawItem {
                mesh_index: i,
                mesh: m,
                transform: *m.draw_transform(animation_enabled),
                blend: Blend::Textured,
            })
            .collect();
        if let Some(i) = puzzle.highlight() {
            if let Some(m) = puzzle.mesh(i) {
                items.push(DrawItem {
                    mesh_index: i,
                    mesh: m,
                    transform: *m.local_to_world(),
                    blend: Blend::Highlight,
                });
            }
        }
        Scene {
            window: *puzzle.window(),
            texture,
            items,
        }
    }
}

/// Drawing backend driven by `App`.
pub trait Renderer {
    /// Drop GPU resources held for the outgoing puzzle.
    fn release_buffers(&mut self);
    /// Create GPU resources for every mesh of the incoming puzzle.
    fn upload_buffers(&mut self, puzzle: &Puzzle);
    fn render(&mut self, scene: &Scene<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Move;
    use crate::testing::one_zone_puzzle;

    #[test]
    fn texture_ids_cycle() {
        assert_eq!(TextureId(9).next(10), TextureId(0));
        assert_eq!(TextureId(3).next(10), TextureId(4));
        assert_eq!(TextureId(0).file_name(), "image0.png");
    }

    #[test]
    fn texture_id_past_count_wraps_without_overflow() {
        assert_eq!(TextureId(u32::MAX).next(10), TextureId(6));
        assert_eq!(TextureId(u32::MAX).next(u32::MAX), TextureId(1));
        assert_eq!(TextureId(12).next(10), TextureId(3));
        assert_eq!(TextureId(5).next(0), TextureId(0));
    }

    #[test]
    fn scene_lists_fragments_then_highlight() {
        let mut p = one_zone_puzzle();
        p.set_highlight(Some(0));
        let scene = Scene::build(&p, TextureId(2), true);
        let idx: Vec<usize> = scene.items.iter().map(|d| d.mesh_index).collect();
        assert_eq!(idx, vec![1, 2, 3, 4, 0]);
        assert_eq!(scene.items[4].blend, Blend::Highlight);
        assert!(scene.items[..4].iter().all(|d| d.blend == Blend::Textured));
        assert_eq!(scene.texture, TextureId(2));
    }

    #[test]
    fn animation_flag_selects_transform() {
        let mut p = one_zone_puzzle();
        p.apply_move(Move::new(0, 0)).unwrap();
        let animated = Scene::build(&p, TextureId(0), true);
        assert_eq!(animated.items[0].transform, Aff2::identity());
        let direct = Scene::build(&p, TextureId(0), false);
        assert_eq!(direct.items[0].transform, *p.meshes()[1].local_to_world());
    }
}
