//! Puzzle descriptions and asynchronous loading.
//!
//! A `PuzzleSource` hands out already-decoded descriptions; this module turns
//! them into a fully built `Puzzle`. Mesh geometry is fetched as an all-of-N
//! join and any failure aborts the whole load, so callers never see a partly
//! built puzzle.

use std::collections::HashMap;
use std::future::Future;

use futures_util::future::try_join_all;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::cfg::RIGID_EPS;
use crate::error::{PuzzleError, Result};
use crate::geom2::Aff2;
use crate::mesh::{Mesh, MeshKind, Triangle};
use crate::puzzle::{Puzzle, Window};

/// Puzzle resource key, `Puzzle{n}.json`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PuzzleId(pub u32);

impl PuzzleId {
    pub fn file_name(&self) -> String {
        format!("Puzzle{}.json", self.0)
    }

    /// Next id in the cycle `1..=count`.
    pub fn next(self, count: u32) -> Self {
        if self.0 >= count.max(1) {
            PuzzleId(1)
        } else {
            PuzzleId(self.0 + 1)
        }
    }
}

impl Default for PuzzleId {
    fn default() -> Self {
        PuzzleId(1)
    }
}

impl std::fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Puzzle {}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointDesc {
    pub x: f64,
    pub y: f64,
}

impl From<PointDesc> for Vector2<f64> {
    fn from(p: PointDesc) -> Self {
        Vector2::new(p.x, p.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowDesc {
    pub min_point: PointDesc,
    pub max_point: PointDesc,
}

impl From<WindowDesc> for Window {
    fn from(w: WindowDesc) -> Self {
        Window::new(w.min_point.into(), w.max_point.into())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearDesc {
    pub x_axis: PointDesc,
    pub y_axis: PointDesc,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymmetryDesc {
    pub linear_transform: LinearDesc,
    pub translation: PointDesc,
}

impl From<&SymmetryDesc> for Aff2 {
    fn from(s: &SymmetryDesc) -> Self {
        Aff2::from_axes(
            s.linear_transform.x_axis.into(),
            s.linear_transform.y_axis.into(),
            s.translation.into(),
        )
    }
}

impl From<&Aff2> for SymmetryDesc {
    fn from(f: &Aff2) -> Self {
        let point = |v: Vector2<f64>| PointDesc { x: v.x, y: v.y };
        SymmetryDesc {
            linear_transform: LinearDesc {
                x_axis: point(f.x_axis()),
                y_axis: point(f.y_axis()),
            },
            translation: point(f.translation()),
        }
    }
}

/// Entry of a puzzle's mesh list, tagged by `"type"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MeshRef {
    #[serde(rename = "capture_mesh")]
    Capture {
        file: String,
        #[serde(default)]
        symmetry_list: Vec<SymmetryDesc>,
    },
    #[serde(rename = "picture_mesh")]
    Picture { file: String },
}

impl MeshRef {
    pub fn file(&self) -> &str {
        match self {
            MeshRef::Capture { file, .. } | MeshRef::Picture { file } => file,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleDesc {
    pub window: WindowDesc,
    pub mesh_list: Vec<MeshRef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshGeometry {
    pub vertex_list: Vec<PointDesc>,
    pub triangle_list: Vec<[u32; 3]>,
}

impl From<&Mesh> for MeshGeometry {
    fn from(m: &Mesh) -> Self {
        MeshGeometry {
            vertex_list: m.vertices().iter().map(|v| PointDesc { x: v.x, y: v.y }).collect(),
            triangle_list: m.triangles().iter().map(|t| t.0).collect(),
        }
    }
}

/// Supplier of decoded puzzle descriptions and mesh geometry.
pub trait PuzzleSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn puzzle(&self, id: PuzzleId) -> impl Future<Output = std::result::Result<PuzzleDesc, Self::Error>>;

    fn mesh(&self, file: &str) -> impl Future<Output = std::result::Result<MeshGeometry, Self::Error>>;
}

/// Fetch a description and all of its meshes, then build the puzzle.
pub async fn fetch_puzzle<S: PuzzleSource>(source: &S, id: PuzzleId) -> Result<Puzzle> {
    let desc = source
        .puzzle(id)
        .await
        .map_err(|e| PuzzleError::resource(id.file_name(), e))?;
    let geometries = try_join_all(desc.mesh_list.iter().map(|r| {
        let file = r.file();
        async move {
            source
                .mesh(file)
                .await
                .map_err(|e| PuzzleError::resource(file, e))
        }
    }))
    .await?;
    let meshes = desc
        .mesh_list
        .into_iter()
        .zip(geometries)
        .map(|(r, g)| build_mesh(r, g))
        .collect::<Result<Vec<_>>>()?;
    let puzzle = Puzzle::new(desc.window.into(), meshes);
    for (zone, fragment) in puzzle.straddling_fragments() {
        tracing::warn!(%id, zone, fragment, "fragment straddles capture zone boundary");
    }
    tracing::info!(
        %id,
        meshes = puzzle.meshes().len(),
        zones = puzzle.capture_zones().count(),
        "puzzle loaded"
    );
    Ok(puzzle)
}

fn build_mesh(r: MeshRef, g: MeshGeometry) -> Result<Mesh> {
    let (file, kind) = match r {
        MeshRef::Capture {
            file,
            symmetry_list,
        } => {
            let symmetries: Vec<Aff2> = symmetry_list.iter().map(Aff2::from).collect();
            for (k, s) in symmetries.iter().enumerate() {
                if !s.is_rigid_eps(RIGID_EPS) {
                    tracing::warn!(file = %file, symmetry = k, "symmetry is not a rigid motion");
                }
            }
            (file, MeshKind::Capture { symmetries })
        }
        MeshRef::Picture { file } => (file, MeshKind::Picture),
    };
    let vertices = g.vertex_list.into_iter().map(Vector2::from).collect();
    let triangles = g.triangle_list.into_iter().map(Triangle).collect();
    let mesh = Mesh::new(file, kind, vertices, triangles)?;
    tracing::debug!(
        file = mesh.name(),
        triangles = mesh.triangles().len(),
        symmetries = mesh.symmetries().len(),
        "mesh built"
    );
    Ok(mesh)
}

/// A source that was never given the requested resource.
#[derive(Debug, thiserror::Error)]
#[error("resource {0} not found")]
pub struct NotFound(pub String);

/// In-memory source, for built-in puzzles and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    puzzles: HashMap<PuzzleId, PuzzleDesc>,
    meshes: HashMap<String, MeshGeometry>,
}

impl MemorySource {
    pub fn with_puzzle(mut self, id: PuzzleId, desc: PuzzleDesc) -> Self {
        self.puzzles.insert(id, desc);
        self
    }

    pub fn with_mesh(mut self, file: impl Into<String>, geometry: MeshGeometry) -> Self {
        self.meshes.insert(file.into(), geometry);
        self
    }
}

impl PuzzleSource for MemorySource {
    type Error = NotFound;

    async fn puzzle(&self, id: PuzzleId) -> std::result::Result<PuzzleDesc, NotFound> {
        self.puzzles
            .get(&id)
            .cloned()
            .ok_or_else(|| NotFound(id.file_name()))
    }

    async fn mesh(&self, file: &str) -> std::result::Result<MeshGeometry, NotFound> {
        self.meshes
            .get(file)
            .cloned()
            .ok_or_else(|| NotFound(file.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::demo_source;

    #[test]
    fn ids_cycle_and_name_files() {
        assert_eq!(PuzzleId(1).file_name(), "Puzzle1.json");
        assert_eq!(PuzzleId(4).next(5), PuzzleId(5));
        assert_eq!(PuzzleId(5).next(5), PuzzleId(1));
        assert_eq!(PuzzleId(1).to_string(), "Puzzle 1");
    }

    #[test]
    fn loads_every_mesh() {
        let p = pollster::block_on(fetch_puzzle(&demo_source(), PuzzleId(1))).unwrap();
        assert_eq!(p.meshes().len(), 5);
        assert_eq!(p.capture_zones().count(), 1);
        assert_eq!(p.meshes()[0].symmetries().len(), 6);
        assert_eq!(p.captured_by(0), vec![1, 2, 3, 4]);
        assert!(p.is_solved());
        assert_eq!(p.window().min, Vector2::new(-1.0, -1.0));
    }

    #[test]
    fn symmetry_desc_maps_axes_to_columns() {
        let s = SymmetryDesc {
            linear_transform: LinearDesc {
                x_axis: PointDesc { x: 0.0, y: 1.0 },
                y_axis: PointDesc { x: -1.0, y: 0.0 },
            },
            translation: PointDesc { x: 2.0, y: 0.0 },
        };
        let f = Aff2::from(&s);
        assert!((f.apply(Vector2::new(1.0, 0.0)) - Vector2::new(2.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn missing_mesh_aborts_the_load() {
        let mut src = demo_source();
        src.meshes.remove("piece2.json");
        let err = pollster::block_on(fetch_puzzle(&src, PuzzleId(1))).unwrap_err();
        match err {
            PuzzleError::ResourceLoad { resource, .. } => assert_eq!(resource, "piece2.json"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_puzzle_is_a_resource_error() {
        let err = pollster::block_on(fetch_puzzle(&demo_source(), PuzzleId(9))).unwrap_err();
        assert!(matches!(err, PuzzleError::ResourceLoad { .. }));
    }

    #[test]
    fn bad_triangle_index_is_rejected() {
        let src = demo_source().with_mesh(
            "piece0.json",
            MeshGeometry {
                vertex_list: vec![PointDesc { x: 0.0, y: 0.0 }],
                triangle_list: vec![[0, 1, 2]],
            },
        );
        let err = pollster::block_on(fetch_puzzle(&src, PuzzleId(1))).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidVertexIndex { .. }));
    }

    #[test]
    fn mesh_list_uses_type_tags() {
        let json = r#"{
            "window": {"min_point": {"x": -1, "y": -1}, "max_point": {"x": 1, "y": 1}},
            "mesh_list": [
                {"type": "picture_mesh", "file": "a.json"},
                {"type": "capture_mesh", "file": "z.json", "symmetry_list": [
                    {"linear_transform": {"x_axis": {"x": 0, "y": 1}, "y_axis": {"x": -1, "y": 0}},
                     "translation": {"x": 0, "y": 0}}
                ]},
                {"type": "capture_mesh", "file": "bare.json"}
            ]
        }"#;
        let desc: PuzzleDesc = serde_json::from_str(json).unwrap();
        assert!(matches!(desc.mesh_list[0], MeshRef::Picture { .. }));
        match &desc.mesh_list[1] {
            MeshRef::Capture { symmetry_list, .. } => assert_eq!(symmetry_list.len(), 1),
            other => panic!("expected capture, got {other:?}"),
        }
        assert_eq!(desc.mesh_list[2].file(), "bare.json");
    }
}
