//! Pointer input: screen → world mapping and move selection.
//!
//! - Click: among the zone's reflections (indices ≥ 2), the one whose image
//!   of the clicked point lies nearest that point, i.e. the mirror line the
//!   user clicked closest to.
//! - Wheel: rotation index 0 (CCW) for non-negative delta, 1 (CW) otherwise.

use nalgebra::Vector2;

use crate::puzzle::{Move, Puzzle, Window};

/// First symmetry index that is a reflection.
pub const FIRST_REFLECTION: usize = 2;

/// Client-space rectangle of the drawing surface (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ScreenRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl Window {
    /// Linear remap of a client-space point into the window; `None` for an
    /// empty rectangle.
    pub fn screen_to_world(&self, x: f64, y: f64, rect: &ScreenRect) -> Option<Vector2<f64>> {
        let w = rect.right - rect.left;
        let h = rect.bottom - rect.top;
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let u = (x - rect.left) / w;
        let v = 1.0 - (y - rect.top) / h;
        Some(self.min + self.size().component_mul(&Vector2::new(u, v)))
    }
}

/// Reflection move for a click at world point `p`.
pub fn click_move(puzzle: &Puzzle, p: Vector2<f64>) -> Option<Move> {
    let zone = puzzle.find_capture_mesh_containing_point(p)?;
    let mut best: Option<(usize, f64)> = None;
    for (k, s) in puzzle.mesh(zone)?.symmetries().iter().enumerate().skip(FIRST_REFLECTION) {
        let d = (s.apply(p) - p).norm();
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((k, d));
        }
    }
    best.map(|(k, _)| Move::new(zone, k))
}

/// Rotation move for a wheel event at world point `p`.
pub fn wheel_move(puzzle: &Puzzle, p: Vector2<f64>, delta_y: f64) -> Option<Move> {
    let zone = puzzle.find_capture_mesh_containing_point(p)?;
    let k = if delta_y < 0.0 { 1 } else { 0 };
    puzzle.symmetry(Move::new(zone, k))?;
    Some(Move::new(zone, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{one_zone_puzzle, two_zone_puzzle};
    use nalgebra::vector;

    #[test]
    fn screen_corners_map_to_window_corners() {
        let w = Window::new(vector![-2.0, -1.0], vector![2.0, 1.0]);
        let rect = ScreenRect::new(10.0, 20.0, 810.0, 420.0);
        let bl = w.screen_to_world(10.0, 420.0, &rect).unwrap();
        assert!((bl - w.min).norm() < 1e-12);
        let tr = w.screen_to_world(810.0, 20.0, &rect).unwrap();
        assert!((tr - w.max).norm() < 1e-12);
        let mid = w.screen_to_world(410.0, 220.0, &rect).unwrap();
        assert!(mid.norm() < 1e-12);
        assert!(w
            .screen_to_world(0.0, 0.0, &ScreenRect::new(5.0, 5.0, 5.0, 9.0))
            .is_none());
    }

    #[test]
    fn click_picks_nearest_mirror() {
        let p = one_zone_puzzle();
        // Just above the x-axis mirror (index 2).
        assert_eq!(click_move(&p, vector![0.7, 0.05]), Some(Move::new(0, 2)));
        // Just right of the y-axis mirror (index 3).
        assert_eq!(click_move(&p, vector![0.05, -0.7]), Some(Move::new(0, 3)));
        // On the diagonal y = x (index 4).
        assert_eq!(click_move(&p, vector![0.5, 0.52]), Some(Move::new(0, 4)));
        // Near the anti-diagonal (index 5).
        assert_eq!(click_move(&p, vector![-0.5, 0.48]), Some(Move::new(0, 5)));
        assert_eq!(click_move(&p, vector![3.0, 3.0]), None);
    }

    #[test]
    fn wheel_direction_picks_rotation() {
        let p = two_zone_puzzle();
        assert_eq!(wheel_move(&p, vector![1.2, 0.3], 120.0), Some(Move::new(5, 0)));
        assert_eq!(wheel_move(&p, vector![-1.2, 0.3], -120.0), Some(Move::new(0, 1)));
        assert_eq!(wheel_move(&p, vector![0.0, 5.0], 1.0), None);
    }
}
