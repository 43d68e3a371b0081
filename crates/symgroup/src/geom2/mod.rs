//! Planar geometry primitives for the puzzle engine.
//!
//! Purpose
//! - Rigid transforms (`Aff2`) for symmetries and fragment placement.
//! - Triangle containment and area, the building blocks of mesh queries.
//! - Slerp/lerp used by the move animation.
//!
//! Conventions
//! - Points and vectors are `nalgebra::Vector2<f64>`.
//! - Triangles are counter-clockwise; containment is boundary-inclusive.

mod interp;
mod types;
mod util;

pub use interp::{lerp, slerp, slerp_eps};
pub use types::Affine2 as Aff2;
pub use util::{centroid, cross, point_in_triangle, triangle_area2};
