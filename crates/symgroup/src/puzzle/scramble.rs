//! Random scrambles built from valid zone symmetries.
//!
//! Every generated move is a symmetry of its zone, so the scrambled state is
//! reachable from solved and therefore solvable.

use rand::Rng;

use super::{Move, Puzzle};
use crate::error::{PuzzleError, Result};

/// Draw `count` moves: a uniform capture zone (re-drawn while equal to the
/// previous zone), then a uniform symmetry of that zone.
///
/// Zones without symmetries are skipped. With a single eligible zone the
/// no-repeat rule cannot be met and is waived.
pub fn scramble_moves<R: Rng + ?Sized>(
    puzzle: &Puzzle,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Move>> {
    let zones: Vec<(usize, usize)> = puzzle
        .capture_zones()
        .map(|(i, z)| (i, z.symmetries().len()))
        .filter(|&(_, n)| n > 0)
        .collect();
    if zones.is_empty() {
        return Err(PuzzleError::NoCaptureZones);
    }
    let mut moves = Vec::with_capacity(count);
    let mut last: Option<usize> = None;
    for _ in 0..count {
        let mut pick = rng.gen_range(0..zones.len());
        while zones.len() > 1 && Some(pick) == last {
            pick = rng.gen_range(0..zones.len());
        }
        last = Some(pick);
        let (zone, n_sym) = zones[pick];
        moves.push(Move::new(zone, rng.gen_range(0..n_sym)));
    }
    Ok(moves)
}

impl Puzzle {
    /// Generate a scramble and append it to the move queue.
    pub fn scramble<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<Vec<Move>> {
        let moves = scramble_moves(self, count, rng)?;
        self.queue.extend(moves.iter().copied());
        tracing::info!(count = moves.len(), "scramble queued");
        Ok(moves)
    }
}
