//! Tolerances and play settings.
//!
//! Policy
//! - Numeric thresholds are fixed constants; `PlayCfg` carries the few knobs a
//!   front end may want to change (animation, hover, resource cycling).

/// Degeneracy threshold on `a·b` for the antipodal and coincident slerp branches.
pub const SLERP_EPS: f64 = 0.01;
/// Per-component threshold below which an animated transform snaps to its target.
pub const SETTLE_EPS: f64 = 0.1;
/// Fraction of the remaining distance covered per animation tick.
pub const ANIMATION_RATE: f64 = 0.2;
/// Per-component tolerance for the identity check in `Puzzle::is_solved`.
pub const SOLVED_EPS: f64 = 1e-5;
/// Tolerance for `MᵀM ≈ I` when validating loaded symmetries.
pub const RIGID_EPS: f64 = 1e-6;
/// Tolerance for recognising `S ∘ S' = id` in inverse-move lookup.
pub const INVERSE_EPS: f64 = 1e-6;
/// Fraction of the way from a triangle corner to its centroid used when
/// sampling corners for the straddling check.
pub const STRADDLE_NUDGE: f64 = 1e-4;
pub const SCRAMBLE_LEN: usize = 30;

/// Play settings owned by the application context.
#[derive(Clone, Copy, Debug)]
pub struct PlayCfg {
    pub animation_rate: f64,
    pub settle_eps: f64,
    pub solved_eps: f64,
    pub scramble_len: usize,
    /// Animate moves; when off, the puzzle is always considered settled.
    pub animation_enabled: bool,
    /// Highlight the capture zone under the pointer.
    pub hover_highlights: bool,
    /// Puzzle ids cycle through `1..=puzzle_count`.
    pub puzzle_count: u32,
    /// Texture ids cycle through `0..texture_count`.
    pub texture_count: u32,
}

impl Default for PlayCfg {
    fn default() -> Self {
        Self {
            animation_rate: ANIMATION_RATE,
            settle_eps: SETTLE_EPS,
            solved_eps: SOLVED_EPS,
            scramble_len: SCRAMBLE_LEN,
            animation_enabled: true,
            hover_highlights: true,
            puzzle_count: 5,
            texture_count: 10,
        }
    }
}
