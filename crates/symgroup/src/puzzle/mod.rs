//! Puzzle state: meshes, window, highlight and the pending-move queue.
//!
//! Purpose
//! - Resolve world points to capture zones (smallest containing zone wins).
//! - Apply moves: compose a zone symmetry onto every fragment the zone owns.
//!   This is the only place fragment transforms change.
//! - Step and test the per-fragment animation.
//!
//! Queue discipline
//! - FIFO: moves are applied in the order they were enqueued, one per settled
//!   tick (see `App::tick`).

mod scramble;
mod types;

pub use scramble::scramble_moves;
pub use types::{Move, Window};

use std::collections::VecDeque;

use nalgebra::Vector2;

use crate::cfg::{INVERSE_EPS, SOLVED_EPS};
use crate::error::{PuzzleError, Result};
use crate::geom2::Aff2;
use crate::mesh::Mesh;

#[derive(Clone, Debug, Default)]
pub struct Puzzle {
    meshes: Vec<Mesh>,
    window: Window,
    highlight: Option<usize>,
    queue: VecDeque<Move>,
}

impl Puzzle {
    pub fn new(window: Window, meshes: Vec<Mesh>) -> Self {
        Self {
            meshes,
            window,
            highlight: None,
            queue: VecDeque::new(),
        }
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub fn set_highlight(&mut self, index: Option<usize>) {
        self.highlight = index.filter(|&i| self.meshes.get(i).is_some_and(Mesh::is_capture));
    }

    /// `(mesh index, zone)` for every capture zone, in mesh order.
    pub fn capture_zones(&self) -> impl Iterator<Item = (usize, &Mesh)> + '_ {
        self.meshes.iter().enumerate().filter(|(_, m)| m.is_capture())
    }

    pub fn pictures(&self) -> impl Iterator<Item = (usize, &Mesh)> + '_ {
        self.meshes.iter().enumerate().filter(|(_, m)| m.is_picture())
    }

    /// Smallest-area capture zone containing `p`; the first one on exact ties.
    pub fn find_capture_mesh_containing_point(&self, p: Vector2<f64>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, zone) in self.capture_zones() {
            if !zone.contains_point(p) {
                continue;
            }
            let area = zone.area();
            if best.is_none_or(|(_, a)| area < a) {
                best = Some((i, area));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Symmetry named by `mv`, if `mv.zone` is a capture zone and the index is in range.
    pub fn symmetry(&self, mv: Move) -> Option<&Aff2> {
        self.meshes.get(mv.zone)?.symmetries().get(mv.symmetry)
    }

    /// Indices of the fragments `zone` currently owns.
    pub fn captured_by(&self, zone: usize) -> Vec<usize> {
        let Some(z) = self.meshes.get(zone) else {
            return Vec::new();
        };
        self.pictures()
            .filter(|(_, frag)| z.captures(frag))
            .map(|(i, _)| i)
            .collect()
    }

    /// Apply `mv` to every fragment its zone owns; returns how many moved.
    pub fn apply_move(&mut self, mv: Move) -> Result<usize> {
        let symmetry = *self.symmetry(mv).ok_or(PuzzleError::InvalidMove {
            zone: mv.zone,
            symmetry: mv.symmetry,
        })?;
        let owned = self.captured_by(mv.zone);
        for &i in &owned {
            self.meshes[i].apply_symmetry(&symmetry);
        }
        tracing::debug!(zone = mv.zone, symmetry = mv.symmetry, moved = owned.len(), "apply_move");
        Ok(owned.len())
    }

    /// The move in the same zone that undoes `mv`, if the zone lists one.
    pub fn inverse_move(&self, mv: Move) -> Option<Move> {
        let s = self.symmetry(mv)?;
        let id = Aff2::identity();
        self.meshes[mv.zone]
            .symmetries()
            .iter()
            .position(|candidate| candidate.compose(s).approx_eq(&id, INVERSE_EPS))
            .map(|k| Move::new(mv.zone, k))
    }

    /// Queue a move for the ticker; rejects moves that name no zone symmetry.
    pub fn enqueue(&mut self, mv: Move) -> Result<()> {
        if self.symmetry(mv).is_none() {
            return Err(PuzzleError::InvalidMove {
                zone: mv.zone,
                symmetry: mv.symmetry,
            });
        }
        self.queue.push_back(mv);
        Ok(())
    }

    pub fn pending_moves(&self) -> impl ExactSizeIterator<Item = &Move> + '_ {
        self.queue.iter()
    }

    pub fn has_pending_moves(&self) -> bool {
        !self.queue.is_empty()
    }

    pub(crate) fn pop_move(&mut self) -> Option<Move> {
        self.queue.pop_front()
    }

    pub fn clear_moves(&mut self) {
        self.queue.clear();
    }

    /// Conjunction over fragments. Every fragment is visited so each settled
    /// one snaps to its target, even when another is still moving.
    pub fn animation_settled(&mut self, eps: f64) -> bool {
        self.meshes
            .iter_mut()
            .filter(|m| m.is_picture())
            .fold(true, |all, m| m.animation_settled(eps) && all)
    }

    pub fn advance_animation(&mut self, rate: f64) {
        for m in self.meshes.iter_mut().filter(|m| m.is_picture()) {
            m.advance_animation(rate);
        }
    }

    /// Every fragment's authoritative transform is the identity within `eps`.
    pub fn is_solved_eps(&self, eps: f64) -> bool {
        let id = Aff2::identity();
        self.pictures()
            .all(|(_, m)| m.local_to_world().approx_eq(&id, eps))
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.is_solved_eps(SOLVED_EPS)
    }

    /// `(zone, fragment)` pairs violating the no-straddling authoring contract.
    pub fn straddling_fragments(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (zi, zone) in self.capture_zones() {
            for (fi, frag) in self.pictures() {
                if zone.straddled_by(frag) {
                    out.push((zi, fi));
                }
            }
        }
        out
    }

    #[cfg(test)]
    pub(crate) fn mesh_mut(&mut self, index: usize) -> &mut Mesh {
        &mut self.meshes[index]
    }
}
