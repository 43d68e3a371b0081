//! Error types for the puzzle engine.
//!
//! Geometry queries never fail (absence is `None`); errors come from loading
//! resources and from moves that do not name a capture-zone symmetry.

use thiserror::Error;

/// Result type alias using [`PuzzleError`].
pub type Result<T> = std::result::Result<T, PuzzleError>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PuzzleError {
    /// A puzzle description or mesh file could not be fetched or decoded.
    #[error("failed to load {resource}")]
    ResourceLoad {
        resource: String,
        #[source]
        source: BoxError,
    },

    /// A triangle references a vertex outside the mesh's vertex list.
    #[error("mesh {file}: triangle {triangle} references vertex {vertex} (vertex count {count})")]
    InvalidVertexIndex {
        file: String,
        triangle: usize,
        vertex: u32,
        count: usize,
    },

    /// A mesh has no triangles.
    #[error("mesh {file} has no triangles")]
    EmptyMesh { file: String },

    /// The move does not name a capture zone and one of its symmetries.
    #[error("move (zone {zone}, symmetry {symmetry}) does not name a capture-zone symmetry")]
    InvalidMove { zone: usize, symmetry: usize },

    /// No capture zone with at least one symmetry exists.
    #[error("puzzle has no capture zones with symmetries")]
    NoCaptureZones,

    /// A newer load was started before this one finished.
    #[error("load {ticket} was superseded by load {current}")]
    StaleLoad { ticket: u64, current: u64 },
}

impl PuzzleError {
    pub(crate) fn resource<E>(resource: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PuzzleError::ResourceLoad {
            resource: resource.into(),
            source: Box::new(source),
        }
    }
}
