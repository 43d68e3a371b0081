//! Scramble a one-zone square puzzle, tick it to rest, then undo the scramble.
//!
//! Usage:
//!   cargo run -p symgroup --example scramble_demo -- [seed]

use rand::{rngs::StdRng, SeedableRng};
use symgroup::load::{
    LinearDesc, MemorySource, MeshGeometry, MeshRef, PointDesc, PuzzleDesc, PuzzleId,
    SymmetryDesc, WindowDesc,
};
use symgroup::render::{Renderer, Scene};
use symgroup::{Aff2, App, PlayCfg, Puzzle};

struct FrameCounter(usize);

impl Renderer for FrameCounter {
    fn release_buffers(&mut self) {}
    fn upload_buffers(&mut self, _puzzle: &Puzzle) {}
    fn render(&mut self, _scene: &Scene<'_>) {
        self.0 += 1;
    }
}

fn p(x: f64, y: f64) -> PointDesc {
    PointDesc { x, y }
}

fn quad(x0: f64, y0: f64, s: f64) -> MeshGeometry {
    MeshGeometry {
        vertex_list: vec![p(x0, y0), p(x0 + s, y0), p(x0 + s, y0 + s), p(x0, y0 + s)],
        triangle_list: vec![[0, 1, 2], [0, 2, 3]],
    }
}

fn source() -> MemorySource {
    let c = nalgebra::Vector2::zeros();
    let mut symmetry_list: Vec<SymmetryDesc> = vec![
        (&Aff2::rotation_about(c, std::f64::consts::FRAC_PI_2)).into(),
        (&Aff2::rotation_about(c, -std::f64::consts::FRAC_PI_2)).into(),
    ];
    // Reflections across x = 0 and y = 0, written out as the file format has them.
    for (xx, yy) in [(-1.0, 1.0), (1.0, -1.0)] {
        symmetry_list.push(SymmetryDesc {
            linear_transform: LinearDesc {
                x_axis: p(xx, 0.0),
                y_axis: p(0.0, yy),
            },
            translation: p(0.0, 0.0),
        });
    }
    let mut mesh_list = vec![MeshRef::Capture {
        file: "zone.json".into(),
        symmetry_list,
    }];
    let mut src = MemorySource::default().with_mesh("zone.json", quad(-1.0, -1.0, 2.0));
    for (k, (x0, y0)) in [(-1.0, -1.0), (0.0, -1.0), (0.0, 0.0), (-1.0, 0.0)]
        .into_iter()
        .enumerate()
    {
        let file = format!("piece{k}.json");
        src = src.with_mesh(file.clone(), quad(x0, y0, 1.0));
        mesh_list.push(MeshRef::Picture { file });
    }
    src.with_puzzle(
        PuzzleId(1),
        PuzzleDesc {
            window: WindowDesc {
                min_point: p(-1.0, -1.0),
                max_point: p(1.0, 1.0),
            },
            mesh_list,
        },
    )
}

fn main() {
    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2025);
    let mut app = App::new(PlayCfg::default());
    let mut frames = FrameCounter(0);
    if let Err(e) = pollster::block_on(app.load(&source(), PuzzleId(1), &mut frames)) {
        eprintln!("load failed: {e}");
        return;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let moves = match app.scramble(&mut rng) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("scramble failed: {e}");
            return;
        }
    };
    let ticks = app.run_until_idle(&mut frames, 100_000);
    println!("scrambled {} moves in {ticks} ticks, solved={}", moves.len(), app.puzzle().is_solved());
    for mv in moves.iter().rev() {
        if let Some(inv) = app.puzzle().inverse_move(*mv) {
            let _ = app.enqueue(inv);
        }
    }
    let ticks = app.run_until_idle(&mut frames, 100_000);
    println!("unscrambled in {ticks} ticks, solved={}, frames={}", app.puzzle().is_solved(), frames.0);
}
