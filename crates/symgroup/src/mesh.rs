//! Capture zones and picture fragments.
//!
//! A `Mesh` is a set of CCW triangles over its own vertex buffer plus two
//! local-to-world transforms: the authoritative one (changed only by moves)
//! and the animated one that trails it for display.
//!
//! Capture zones are never moved; their queries use the local vertices as
//! world coordinates. Fragments are queried through their authoritative
//! transform.

use nalgebra::Vector2;

use crate::cfg::STRADDLE_NUDGE;
use crate::error::{PuzzleError, Result};
use crate::geom2::{centroid, lerp, point_in_triangle, slerp, triangle_area2, Aff2};

/// Vertex indices of a counter-clockwise triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle(pub [u32; 3]);

/// Role of a mesh. Only capture zones own symmetries.
#[derive(Clone, Debug)]
pub enum MeshKind {
    /// Indices 0/1 are the CCW/CW rotations, indices ≥ 2 are reflections.
    Capture { symmetries: Vec<Aff2> },
    Picture,
}

#[derive(Clone, Debug)]
pub struct Mesh {
    name: String,
    kind: MeshKind,
    vertices: Vec<Vector2<f64>>,
    triangles: Vec<Triangle>,
    /// Cached at construction; vertices never change.
    area: f64,
    local_to_world: Aff2,
    anim_local_to_world: Aff2,
}

impl Mesh {
    /// Build a mesh with identity transforms; every triangle index must be in range.
    pub fn new(
        name: impl Into<String>,
        kind: MeshKind,
        vertices: Vec<Vector2<f64>>,
        triangles: Vec<Triangle>,
    ) -> Result<Self> {
        let name = name.into();
        if triangles.is_empty() {
            return Err(PuzzleError::EmptyMesh { file: name });
        }
        for (k, tri) in triangles.iter().enumerate() {
            if let Some(&bad) = tri.0.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(PuzzleError::InvalidVertexIndex {
                    file: name,
                    triangle: k,
                    vertex: bad,
                    count: vertices.len(),
                });
            }
        }
        let area = triangles
            .iter()
            .map(|tri| triangle_area2(tri.0.map(|i| vertices[i as usize])))
            .sum();
        Ok(Self {
            name,
            kind,
            vertices,
            triangles,
            area,
            local_to_world: Aff2::identity(),
            anim_local_to_world: Aff2::identity(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &MeshKind {
        &self.kind
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        matches!(self.kind, MeshKind::Capture { .. })
    }

    #[inline]
    pub fn is_picture(&self) -> bool {
        matches!(self.kind, MeshKind::Picture)
    }

    /// Symmetry list of a capture zone; empty for fragments.
    pub fn symmetries(&self) -> &[Aff2] {
        match &self.kind {
            MeshKind::Capture { symmetries } => symmetries,
            MeshKind::Picture => &[],
        }
    }

    pub fn vertices(&self) -> &[Vector2<f64>] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn local_to_world(&self) -> &Aff2 {
        &self.local_to_world
    }

    pub fn anim_local_to_world(&self) -> &Aff2 {
        &self.anim_local_to_world
    }

    /// Transform handed to the renderer.
    pub fn draw_transform(&self, animation_enabled: bool) -> &Aff2 {
        if animation_enabled {
            &self.anim_local_to_world
        } else {
            &self.local_to_world
        }
    }

    #[inline]
    fn corners(&self, tri: &Triangle) -> [Vector2<f64>; 3] {
        tri.0.map(|i| self.vertices[i as usize])
    }

    /// Inside (or on the boundary of) at least one triangle.
    pub fn contains_point(&self, p: Vector2<f64>) -> bool {
        self.triangles
            .iter()
            .any(|tri| point_in_triangle(self.corners(tri), p))
    }

    /// Sum of `|e1 × e2|` over triangles (twice the area), from local vertices.
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Centroid of triangle `k` mapped through the authoritative transform.
    fn world_centroid(&self, k: usize) -> Option<Vector2<f64>> {
        let tri = self.triangles.get(k)?;
        Some(self.local_to_world.apply(centroid(self.corners(tri))))
    }

    /// Whether this zone owns `fragment`: one interior sample, the first
    /// triangle's centroid, decides. Fragments must not straddle zone edges.
    pub fn captures(&self, fragment: &Mesh) -> bool {
        if !self.is_capture() || !fragment.is_picture() {
            return false;
        }
        fragment
            .world_centroid(0)
            .is_some_and(|p| self.contains_point(p))
    }

    /// True when the fragment's sample points disagree about membership in
    /// this zone, i.e. the fragment crosses the zone boundary. The first sample
    /// is the one `captures` uses.
    pub fn straddled_by(&self, fragment: &Mesh) -> bool {
        if !self.is_capture() || !fragment.is_picture() {
            return false;
        }
        let mut inside = fragment.world_samples().map(|p| self.contains_point(p));
        match inside.next() {
            Some(first) => inside.any(|b| b != first),
            None => false,
        }
    }

    /// Per triangle: its centroid, then each corner pulled slightly toward
    /// that centroid. Corners lying on a shared edge then classify with the
    /// triangle they belong to.
    fn world_samples(&self) -> impl Iterator<Item = Vector2<f64>> + '_ {
        self.triangles.iter().flat_map(move |tri| {
            let corners = self.corners(tri);
            let c = centroid(corners);
            std::iter::once(c)
                .chain(corners.into_iter().map(move |v| v + (c - v) * STRADDLE_NUDGE))
                .map(move |p| self.local_to_world.apply(p))
        })
    }

    /// `local_to_world ← symmetry ∘ local_to_world`.
    pub fn apply_symmetry(&mut self, symmetry: &Aff2) {
        self.local_to_world = symmetry.compose(&self.local_to_world);
    }

    /// All 9 homogeneous components of the animated transform within `eps` of
    /// the authoritative one. Snaps the animated transform exactly when true.
    pub fn animation_settled(&mut self, eps: f64) -> bool {
        if self.anim_local_to_world.max_abs_diff(&self.local_to_world) < eps {
            self.anim_local_to_world = self.local_to_world;
            true
        } else {
            false
        }
    }

    /// One animation step: slerp each axis and lerp the translation by `rate`.
    /// The axes move independently and may be briefly non-orthonormal.
    pub fn advance_animation(&mut self, rate: f64) {
        let from = self.anim_local_to_world;
        let to = self.local_to_world;
        self.anim_local_to_world = Aff2::from_axes(
            slerp(from.x_axis(), to.x_axis(), rate),
            slerp(from.y_axis(), to.y_axis(), rate),
            lerp(from.translation(), to.translation(), rate),
        );
    }

    /// Interleaved `x, y` vertex positions for a GPU vertex buffer.
    pub fn vertex_buffer_data(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.x as f32, v.y as f32])
            .collect()
    }

    /// Flattened triangle indices for a GPU index buffer.
    pub fn index_buffer_data(&self) -> Vec<u32> {
        self.triangles.iter().flat_map(|t| t.0).collect()
    }

    #[cfg(test)]
    pub(crate) fn set_local_to_world(&mut self, f: Aff2) {
        self.local_to_world = f;
    }
}
