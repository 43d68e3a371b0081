//! Application context: the live puzzle plus everything a front end toggles.
//!
//! `App` replaces ambient globals. It owns the puzzle, the current puzzle and
//! texture ids, the play settings and the load generation counter; the
//! renderer is passed to each call that may draw.
//!
//! Ticking
//! - Unsettled → advance the animation and draw.
//! - Settled with a frame owed → draw the snapped pose once.
//! - Otherwise → apply at most one queued move and draw.
//!
//! Loading
//! - `begin_load` hands out a ticket carrying a fresh generation; only the
//!   ticket of the latest generation may commit. The live puzzle is replaced
//!   only by a fully built one.

use nalgebra::Vector2;
use rand::Rng;

use crate::cfg::PlayCfg;
use crate::error::{PuzzleError, Result};
use crate::input::{click_move, wheel_move};
use crate::load::{fetch_puzzle, PuzzleId, PuzzleSource};
use crate::puzzle::{Move, Puzzle};
use crate::render::{Renderer, Scene, TextureId};

/// Proof that a load was started; see `App::commit_load`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    id: PuzzleId,
}

impl LoadTicket {
    pub fn id(&self) -> PuzzleId {
        self.id
    }
}

/// What a call to `App::tick` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Animated,
    SettleRender,
    Moved(Move),
    Idle,
}

#[derive(Debug, Default)]
pub struct App {
    cfg: PlayCfg,
    puzzle: Puzzle,
    puzzle_id: PuzzleId,
    texture: TextureId,
    generation: u64,
    settle_render: bool,
}

impl App {
    pub fn new(cfg: PlayCfg) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    pub fn cfg(&self) -> &PlayCfg {
        &self.cfg
    }

    pub fn cfg_mut(&mut self) -> &mut PlayCfg {
        &mut self.cfg
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn puzzle_id(&self) -> PuzzleId {
        self.puzzle_id
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn set_texture(&mut self, texture: TextureId) {
        self.texture = texture;
    }

    /// Advance to the next image in the cycle and return it.
    pub fn next_texture(&mut self) -> TextureId {
        self.texture = self.texture.next(self.cfg.texture_count);
        self.texture
    }

    /// Id that follows the current puzzle in the cycle.
    pub fn next_puzzle_id(&self) -> PuzzleId {
        self.puzzle_id.next(self.cfg.puzzle_count)
    }

    /// Start a load; any earlier outstanding ticket becomes stale.
    pub fn begin_load(&mut self, id: PuzzleId) -> LoadTicket {
        self.generation += 1;
        tracing::debug!(%id, generation = self.generation, "load started");
        LoadTicket {
            generation: self.generation,
            id,
        }
    }

    /// Swap in a loaded puzzle if `ticket` is still current. On any error the
    /// live puzzle is left untouched.
    pub fn commit_load<R: Renderer + ?Sized>(
        &mut self,
        ticket: LoadTicket,
        loaded: Result<Puzzle>,
        renderer: &mut R,
    ) -> Result<()> {
        if ticket.generation != self.generation {
            tracing::warn!(id = %ticket.id, ticket = ticket.generation, current = self.generation, "discarding stale load");
            if let Err(e) = &loaded {
                tracing::debug!(id = %ticket.id, error = %e, "stale load had also failed");
            }
            return Err(PuzzleError::StaleLoad {
                ticket: ticket.generation,
                current: self.generation,
            });
        }
        let puzzle = loaded.inspect_err(|e| {
            tracing::warn!(id = %ticket.id, error = %e, "load failed; keeping current puzzle");
        })?;
        renderer.release_buffers();
        self.puzzle = puzzle;
        self.puzzle_id = ticket.id;
        self.settle_render = false;
        renderer.upload_buffers(&self.puzzle);
        self.render(renderer);
        Ok(())
    }

    /// Fetch and commit in one step.
    pub async fn load<S, R>(&mut self, source: &S, id: PuzzleId, renderer: &mut R) -> Result<()>
    where
        S: PuzzleSource,
        R: Renderer + ?Sized,
    {
        let ticket = self.begin_load(id);
        let loaded = fetch_puzzle(source, id).await;
        self.commit_load(ticket, loaded, renderer)
    }

    /// Settled for scheduling purposes; always true with animation off.
    pub fn is_settled(&mut self) -> bool {
        !self.cfg.animation_enabled || self.puzzle.animation_settled(self.cfg.settle_eps)
    }

    /// Solved under the configured tolerance.
    pub fn is_solved(&self) -> bool {
        self.puzzle.is_solved_eps(self.cfg.solved_eps)
    }

    pub fn tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Tick {
        if !self.is_settled() {
            self.puzzle.advance_animation(self.cfg.animation_rate);
            self.render(renderer);
            self.settle_render = true;
            return Tick::Animated;
        }
        if self.settle_render {
            self.settle_render = false;
            self.render(renderer);
            return Tick::SettleRender;
        }
        let Some(mv) = self.puzzle.pop_move() else {
            return Tick::Idle;
        };
        match self.puzzle.apply_move(mv) {
            Ok(_) => {
                self.render(renderer);
                Tick::Moved(mv)
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping queued move");
                Tick::Idle
            }
        }
    }

    /// Tick until idle or `max_ticks`; returns the number of ticks taken.
    pub fn run_until_idle<R: Renderer + ?Sized>(&mut self, renderer: &mut R, max_ticks: usize) -> usize {
        for n in 0..max_ticks {
            if self.tick(renderer) == Tick::Idle {
                return n;
            }
        }
        max_ticks
    }

    pub fn enqueue(&mut self, mv: Move) -> Result<()> {
        self.puzzle.enqueue(mv)
    }

    /// Queue the reflection nearest to a click at world point `p`.
    pub fn click(&mut self, p: Vector2<f64>) -> Option<Move> {
        let mv = click_move(&self.puzzle, p)?;
        self.puzzle.enqueue(mv).ok()?;
        Some(mv)
    }

    /// Queue a rotation for a wheel event at world point `p`.
    pub fn wheel(&mut self, p: Vector2<f64>, delta_y: f64) -> Option<Move> {
        let mv = wheel_move(&self.puzzle, p, delta_y)?;
        self.puzzle.enqueue(mv).ok()?;
        Some(mv)
    }

    /// Update the highlighted zone; true when a redraw is needed.
    pub fn hover(&mut self, p: Vector2<f64>) -> bool {
        let target = if self.cfg.hover_highlights {
            self.puzzle.find_capture_mesh_containing_point(p)
        } else {
            None
        };
        if target == self.puzzle.highlight() {
            return false;
        }
        self.puzzle.set_highlight(target);
        true
    }

    /// Queue a scramble of `cfg.scramble_len` moves.
    pub fn scramble<G: Rng + ?Sized>(&mut self, rng: &mut G) -> Result<Vec<Move>> {
        self.puzzle.scramble(self.cfg.scramble_len, rng)
    }

    pub fn scene(&self) -> Scene<'_> {
        Scene::build(&self.puzzle, self.texture, self.cfg.animation_enabled)
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.render(&self.scene());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{demo_source, one_zone_puzzle, two_zone_puzzle};
    use nalgebra::vector;
    use rand::{rngs::StdRng, SeedableRng};

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        releases: usize,
        uploads: usize,
        last_items: usize,
    }

    impl Renderer for Recorder {
        fn release_buffers(&mut self) {
            self.releases += 1;
        }
        fn upload_buffers(&mut self, _puzzle: &Puzzle) {
            self.uploads += 1;
        }
        fn render(&mut self, scene: &Scene<'_>) {
            self.frames += 1;
            self.last_items = scene.items.len();
        }
    }

    fn loaded_app(puzzle: Puzzle) -> (App, Recorder) {
        let mut app = App::new(PlayCfg::default());
        let mut r = Recorder::default();
        let t = app.begin_load(PuzzleId(1));
        app.commit_load(t, Ok(puzzle), &mut r).unwrap();
        (app, r)
    }

    #[test]
    fn load_swaps_and_renders() {
        let mut app = App::new(PlayCfg::default());
        let mut r = Recorder::default();
        pollster::block_on(app.load(&demo_source(), PuzzleId(1), &mut r)).unwrap();
        assert_eq!(app.puzzle().meshes().len(), 5);
        assert_eq!((r.releases, r.uploads, r.frames), (1, 1, 1));
        assert_eq!(r.last_items, 4);
        assert_eq!(app.puzzle_id(), PuzzleId(1));
        assert_eq!(app.next_puzzle_id(), PuzzleId(2));
    }

    #[test]
    fn failed_load_keeps_live_puzzle() {
        let (mut app, mut r) = loaded_app(two_zone_puzzle());
        let err = pollster::block_on(app.load(&demo_source(), PuzzleId(3), &mut r)).unwrap_err();
        assert!(matches!(err, PuzzleError::ResourceLoad { .. }));
        assert_eq!(app.puzzle().meshes().len(), 10);
        assert_eq!(r.releases, 1);
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let mut app = App::new(PlayCfg::default());
        let mut r = Recorder::default();
        let first = app.begin_load(PuzzleId(1));
        let second = app.begin_load(PuzzleId(2));
        app.commit_load(second, Ok(two_zone_puzzle()), &mut r).unwrap();
        let err = app
            .commit_load(first, Ok(one_zone_puzzle()), &mut r)
            .unwrap_err();
        assert!(matches!(err, PuzzleError::StaleLoad { ticket: 1, current: 2 }));
        assert_eq!(app.puzzle().meshes().len(), 10);
        assert_eq!(app.puzzle_id(), PuzzleId(2));
    }

    #[test]
    fn reload_clears_queue_highlight_and_pending_frame() {
        let (mut app, mut r) = loaded_app(one_zone_puzzle());
        app.enqueue(Move::new(0, 0)).unwrap();
        app.enqueue(Move::new(0, 1)).unwrap();
        assert!(app.hover(vector![0.5, 0.5]));
        assert_eq!(app.tick(&mut r), Tick::Moved(Move::new(0, 0)));
        assert_eq!(app.tick(&mut r), Tick::Animated);

        let t = app.begin_load(PuzzleId(2));
        app.commit_load(t, Ok(two_zone_puzzle()), &mut r).unwrap();
        assert_eq!(app.puzzle().pending_moves().len(), 0);
        assert_eq!(app.puzzle().highlight(), None);
        assert_eq!(app.tick(&mut r), Tick::Idle);
    }

    #[test]
    fn stale_failed_load_reports_staleness() {
        let mut app = App::new(PlayCfg::default());
        let mut r = Recorder::default();
        let first = app.begin_load(PuzzleId(1));
        let _second = app.begin_load(PuzzleId(2));
        let err = app
            .commit_load(first, Err(PuzzleError::NoCaptureZones), &mut r)
            .unwrap_err();
        assert!(matches!(err, PuzzleError::StaleLoad { ticket: 1, current: 2 }));
        assert_eq!(r.frames, 0);
    }

    #[test]
    fn one_move_per_settled_tick() {
        let (mut app, mut r) = loaded_app(one_zone_puzzle());
        app.enqueue(Move::new(0, 0)).unwrap();
        app.enqueue(Move::new(0, 2)).unwrap();
        assert_eq!(app.tick(&mut r), Tick::Moved(Move::new(0, 0)));
        let mut animated = 0;
        loop {
            match app.tick(&mut r) {
                Tick::Animated => animated += 1,
                Tick::SettleRender => break,
                other => panic!("unexpected {other:?} while animating"),
            }
        }
        assert!(animated > 0 && animated <= 20);
        assert_eq!(app.tick(&mut r), Tick::Moved(Move::new(0, 2)));
        app.run_until_idle(&mut r, 100);
        assert_eq!(app.tick(&mut r), Tick::Idle);
        assert!(app.is_settled());
    }

    #[test]
    fn without_animation_moves_apply_back_to_back() {
        let (mut app, mut r) = loaded_app(one_zone_puzzle());
        app.cfg_mut().animation_enabled = false;
        app.enqueue(Move::new(0, 0)).unwrap();
        app.enqueue(Move::new(0, 1)).unwrap();
        assert_eq!(app.tick(&mut r), Tick::Moved(Move::new(0, 0)));
        assert_eq!(app.tick(&mut r), Tick::Moved(Move::new(0, 1)));
        assert_eq!(app.tick(&mut r), Tick::Idle);
        assert!(app.puzzle().is_solved());
    }

    #[test]
    fn scramble_then_unscramble_through_ticks() {
        let (mut app, mut r) = loaded_app(two_zone_puzzle());
        let mut rng = StdRng::seed_from_u64(99);
        let moves = app.scramble(&mut rng).unwrap();
        assert_eq!(moves.len(), 30);
        let ticks = app.run_until_idle(&mut r, 10_000);
        assert!(ticks < 10_000);
        for mv in moves.iter().rev() {
            let inv = app.puzzle().inverse_move(*mv).unwrap();
            app.enqueue(inv).unwrap();
        }
        app.run_until_idle(&mut r, 10_000);
        assert!(app.is_solved());
    }

    #[test]
    fn hover_tracks_zone_and_respects_toggle() {
        let (mut app, _r) = loaded_app(two_zone_puzzle());
        assert!(app.hover(vector![-1.0, 0.5]));
        assert_eq!(app.puzzle().highlight(), Some(0));
        assert!(!app.hover(vector![-1.2, 0.4]));
        assert!(app.hover(vector![1.0, 0.5]));
        assert_eq!(app.puzzle().highlight(), Some(5));
        app.cfg_mut().hover_highlights = false;
        assert!(app.hover(vector![1.0, 0.5]));
        assert_eq!(app.puzzle().highlight(), None);
        assert!(!app.hover(vector![-1.0, 0.5]));
    }

    #[test]
    fn click_and_wheel_enqueue() {
        let (mut app, _r) = loaded_app(one_zone_puzzle());
        assert_eq!(app.click(vector![0.7, 0.05]), Some(Move::new(0, 2)));
        assert_eq!(app.wheel(vector![0.3, 0.3], -1.0), Some(Move::new(0, 1)));
        assert_eq!(app.click(vector![4.0, 4.0]), None);
        let queued: Vec<Move> = app.puzzle().pending_moves().copied().collect();
        assert_eq!(queued, vec![Move::new(0, 2), Move::new(0, 1)]);
    }

    #[test]
    fn texture_cycles_through_count() {
        let mut app = App::new(PlayCfg {
            texture_count: 3,
            ..PlayCfg::default()
        });
        assert_eq!(app.next_texture(), TextureId(1));
        assert_eq!(app.next_texture(), TextureId(2));
        assert_eq!(app.next_texture(), TextureId(0));
        app.set_texture(TextureId(7));
        assert_eq!(app.scene().texture, TextureId(7));
    }
}
