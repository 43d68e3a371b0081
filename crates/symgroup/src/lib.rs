//! Geometry and state engine for 2D symmetry-group puzzles.
//!
//! A puzzle is a set of capture zones, each with a finite group of rigid
//! symmetries, over picture fragments that carry their own transform. A move
//! applies one zone symmetry to every fragment inside that zone; the puzzle is
//! solved when every fragment is back at the identity.
//!
//! Layout
//! - `geom2`: transforms, triangle tests, slerp/lerp.
//! - `mesh`: capture zones and fragments (containment, capture, animation).
//! - `puzzle`: mesh collection, move queue, scrambles.
//! - `load`: decoded descriptions and the async all-of-N loader.
//! - `input`, `render`, `app`: the boundary a front end drives.
//!
//! Drawing, file formats and event wiring live outside this crate.

pub mod app;
pub mod cfg;
pub mod error;
pub mod geom2;
pub mod input;
pub mod load;
pub mod mesh;
pub mod puzzle;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::{App, LoadTicket, Tick};
pub use cfg::PlayCfg;
pub use error::{PuzzleError, Result};
pub use geom2::Aff2;
pub use mesh::{Mesh, MeshKind, Triangle};
pub use puzzle::{Move, Puzzle, Window};

/// Common exports for front ends.
pub mod prelude {
    pub use crate::app::{App, LoadTicket, Tick};
    pub use crate::cfg::PlayCfg;
    pub use crate::error::{PuzzleError, Result};
    pub use crate::geom2::Aff2;
    pub use crate::input::{click_move, wheel_move, ScreenRect};
    pub use crate::load::{fetch_puzzle, MemorySource, PuzzleId, PuzzleSource};
    pub use crate::mesh::{Mesh, MeshKind, Triangle};
    pub use crate::puzzle::{Move, Puzzle, Window};
    pub use crate::render::{Blend, DrawItem, Renderer, Scene, TextureId};
    pub use nalgebra::Vector2 as Vec2;
}
