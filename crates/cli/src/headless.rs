//! Renderer that draws nothing and counts what it was asked to draw.

use symgroup::render::{Blend, Renderer, Scene};
use symgroup::Puzzle;

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: usize,
    pub buffers: usize,
    pub highlighted_frames: usize,
}

impl Renderer for HeadlessRenderer {
    fn release_buffers(&mut self) {
        tracing::debug!(buffers = self.buffers, "release_buffers");
        self.buffers = 0;
    }

    fn upload_buffers(&mut self, puzzle: &Puzzle) {
        // one vertex and one index buffer per mesh
        self.buffers = puzzle.meshes().len() * 2;
        tracing::debug!(buffers = self.buffers, "upload_buffers");
    }

    fn render(&mut self, scene: &Scene<'_>) {
        self.frames += 1;
        if scene.items.iter().any(|d| d.blend == Blend::Highlight) {
            self.highlighted_frames += 1;
        }
        tracing::trace!(frame = self.frames, items = scene.items.len(), texture = %scene.texture.file_name(), "render");
    }
}
