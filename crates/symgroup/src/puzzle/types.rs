use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// One move: symmetry `symmetry` of the capture zone at mesh index `zone`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub zone: usize,
    pub symmetry: usize,
}

impl Move {
    #[inline]
    pub fn new(zone: usize, symmetry: usize) -> Self {
        Self { zone, symmetry }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.zone, self.symmetry)
    }
}

/// Visible world rectangle `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            min: Vector2::new(-1.0, -1.0),
            max: Vector2::new(1.0, 1.0),
        }
    }
}

impl Window {
    #[inline]
    pub fn new(min: Vector2<f64>, max: Vector2<f64>) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn size(&self) -> Vector2<f64> {
        self.max - self.min
    }
}
