mod headless;
mod provenance;
mod source;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use nalgebra::Vector2;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use serde_json::json;
use symgroup::input::{click_move, wheel_move};
use symgroup::load::PuzzleId;
use symgroup::{Aff2, App, MeshKind, Move, PlayCfg};
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::headless::HeadlessRenderer;
use crate::source::FsSource;

/// Ticks allowed before a play run is considered stuck.
const MAX_TICKS: usize = 1_000_000;

#[derive(Parser)]
#[command(name = "symgroup")]
#[command(about = "Load, play and scramble symmetry-group puzzles headlessly")]
struct Cmd {
    /// Directory holding Puzzle{n}.json and the mesh files it names
    #[arg(long, env = "SYMGROUP_PUZZLE_DIR", default_value = "puzzles")]
    puzzle_dir: PathBuf,

    /// Apply moves instantly instead of animating them
    #[arg(long)]
    no_animation: bool,

    /// Log at debug level
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Summarize the meshes of a puzzle
    Inspect {
        #[arg(long, default_value_t = 1)]
        puzzle: u32,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Feed moves, clicks and wheel events, then tick to rest
    Play {
        #[arg(long, default_value_t = 1)]
        puzzle: u32,
        /// Explicit move as ZONE:SYMMETRY; repeatable
        #[arg(long = "move", value_parser = parse_move)]
        moves: Vec<Move>,
        /// Click at world point X,Y; repeatable
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        click: Vec<Vector2<f64>>,
        /// Wheel event at X,Y with vertical delta D, as X,Y,D; repeatable
        #[arg(long, value_parser = parse_wheel, allow_hyphen_values = true)]
        wheel: Vec<(Vector2<f64>, f64)>,
        /// Pointer position X,Y held while playing; highlights its zone
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        hover: Option<Vector2<f64>>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Scramble with a seeded rng and optionally undo it
    Scramble {
        #[arg(long, default_value_t = 1)]
        puzzle: u32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        count: Option<usize>,
        /// Queue the inverse sequence afterwards and check the result
        #[arg(long)]
        unscramble: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Report which capture zone a world point falls in
    Probe {
        #[arg(long, default_value_t = 1)]
        puzzle: u32,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let builder = SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr);
    if cmd.verbose {
        builder.with_max_level(tracing::Level::DEBUG).init();
    } else {
        builder.init();
    }

    let cfg = PlayCfg {
        animation_enabled: !cmd.no_animation,
        ..PlayCfg::default()
    };
    let source = FsSource::new(&cmd.puzzle_dir);
    match cmd.action {
        Action::Inspect { puzzle, out } => inspect(&source, cfg, puzzle, out.as_deref()),
        Action::Play {
            puzzle,
            moves,
            click,
            wheel,
            hover,
            out,
        } => play(
            &source,
            cfg,
            puzzle,
            Inputs {
                moves: &moves,
                clicks: &click,
                wheels: &wheel,
                hover,
            },
            out.as_deref(),
        ),
        Action::Scramble {
            puzzle,
            seed,
            count,
            unscramble,
            out,
        } => {
            let mut cfg = cfg;
            if let Some(count) = count {
                cfg.scramble_len = count;
            }
            scramble(&source, cfg, puzzle, seed, unscramble, out.as_deref())
        }
        Action::Probe { puzzle, x, y } => probe(&source, cfg, puzzle, Vector2::new(x, y)),
    }
}

fn load(source: &FsSource, cfg: PlayCfg, puzzle: u32) -> Result<(App, HeadlessRenderer)> {
    let mut app = App::new(cfg);
    let mut renderer = HeadlessRenderer::default();
    pollster::block_on(app.load(source, PuzzleId(puzzle), &mut renderer)).with_context(|| {
        format!(
            "loading {} from {}",
            PuzzleId(puzzle).file_name(),
            source.root().display()
        )
    })?;
    Ok((app, renderer))
}

#[derive(Serialize)]
struct MeshSummary {
    index: usize,
    name: String,
    kind: &'static str,
    triangles: usize,
    area: f64,
    symmetries: usize,
    captures: Vec<usize>,
}

fn inspect(source: &FsSource, cfg: PlayCfg, puzzle: u32, out: Option<&Path>) -> Result<()> {
    let (app, _) = load(source, cfg, puzzle)?;
    let p = app.puzzle();
    let meshes: Vec<MeshSummary> = p
        .meshes()
        .iter()
        .enumerate()
        .map(|(index, m)| MeshSummary {
            index,
            name: m.name().to_string(),
            kind: match m.kind() {
                MeshKind::Capture { .. } => "capture",
                MeshKind::Picture => "picture",
            },
            triangles: m.triangles().len(),
            area: m.area(),
            symmetries: m.symmetries().len(),
            captures: if m.is_capture() {
                p.captured_by(index)
            } else {
                Vec::new()
            },
        })
        .collect();
    let w = p.window();
    let report = json!({
        "puzzle": puzzle,
        "window": {"min": [w.min.x, w.min.y], "max": [w.max.x, w.max.y]},
        "meshes": meshes,
        "straddling": p.straddling_fragments(),
    });
    emit(&report, out, json!({"command": "inspect", "puzzle": puzzle}))
}

struct Inputs<'a> {
    moves: &'a [Move],
    clicks: &'a [Vector2<f64>],
    wheels: &'a [(Vector2<f64>, f64)],
    hover: Option<Vector2<f64>>,
}

fn play(source: &FsSource, cfg: PlayCfg, puzzle: u32, input: Inputs<'_>, out: Option<&Path>) -> Result<()> {
    let (mut app, mut renderer) = load(source, cfg, puzzle)?;
    if let Some(p) = input.hover {
        if app.hover(p) {
            app.render(&mut renderer);
        }
    }
    for mv in input.moves {
        app.enqueue(*mv)?;
    }
    for p in input.clicks {
        match app.click(*p) {
            Some(mv) => tracing::info!(%mv, x = p.x, y = p.y, "click queued"),
            None => tracing::warn!(x = p.x, y = p.y, "click hit no zone"),
        }
    }
    for (p, delta) in input.wheels {
        match app.wheel(*p, *delta) {
            Some(mv) => tracing::info!(%mv, x = p.x, y = p.y, delta, "wheel queued"),
            None => tracing::warn!(x = p.x, y = p.y, delta, "wheel hit no zone"),
        }
    }
    let applied: Vec<Move> = app.puzzle().pending_moves().copied().collect();
    let ticks = run(&mut app, &mut renderer)?;
    let p = app.puzzle();
    let transforms: Vec<[f64; 6]> = p
        .meshes()
        .iter()
        .map(|m| affine_row(m.local_to_world()))
        .collect();
    let report = json!({
        "puzzle": puzzle,
        "moves": applied.iter().map(Move::to_string).collect::<Vec<_>>(),
        "ticks": ticks,
        "frames": renderer.frames,
        "highlighted_frames": renderer.highlighted_frames,
        "highlight": p.highlight(),
        "solved": app.is_solved(),
        "transforms": transforms,
    });
    emit(
        &report,
        out,
        json!({
            "command": "play",
            "puzzle": puzzle,
            "animation": app.cfg().animation_enabled,
            "moves": report["moves"].clone(),
        }),
    )
}

fn scramble(
    source: &FsSource,
    cfg: PlayCfg,
    puzzle: u32,
    seed: u64,
    unscramble: bool,
    out: Option<&Path>,
) -> Result<()> {
    let (mut app, mut renderer) = load(source, cfg, puzzle)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let moves = app.scramble(&mut rng)?;
    let scramble_ticks = run(&mut app, &mut renderer)?;
    let solved_after_scramble = app.is_solved();

    let mut undo_ticks = None;
    if unscramble {
        for mv in moves.iter().rev() {
            let inv = app
                .puzzle()
                .inverse_move(*mv)
                .ok_or_else(|| anyhow!("move {mv} has no inverse in its zone"))?;
            app.enqueue(inv)?;
        }
        undo_ticks = Some(run(&mut app, &mut renderer)?);
    }
    let report = json!({
        "puzzle": puzzle,
        "seed": seed,
        "moves": moves.iter().map(Move::to_string).collect::<Vec<_>>(),
        "ticks": scramble_ticks,
        "solved_after_scramble": solved_after_scramble,
        "unscramble_ticks": undo_ticks,
        "solved": app.is_solved(),
        "frames": renderer.frames,
    });
    emit(
        &report,
        out,
        json!({
            "command": "scramble",
            "puzzle": puzzle,
            "seed": seed,
            "count": app.cfg().scramble_len,
            "unscramble": unscramble,
        }),
    )
}

fn probe(source: &FsSource, cfg: PlayCfg, puzzle: u32, p: Vector2<f64>) -> Result<()> {
    let (app, _) = load(source, cfg, puzzle)?;
    let pz = app.puzzle();
    let zone = pz.find_capture_mesh_containing_point(p);
    let mesh = zone.and_then(|z| pz.mesh(z));
    let report = json!({
        "point": [p.x, p.y],
        "zone": zone,
        "name": mesh.map(|m| m.name().to_string()),
        "area": mesh.map(|m| m.area()),
        "click": click_move(pz, p).map(|mv| mv.to_string()),
        "wheel_up": wheel_move(pz, p, 1.0).map(|mv| mv.to_string()),
        "wheel_down": wheel_move(pz, p, -1.0).map(|mv| mv.to_string()),
    });
    emit(&report, None, json!({}))
}

fn run(app: &mut App, renderer: &mut HeadlessRenderer) -> Result<usize> {
    let ticks = app.run_until_idle(renderer, MAX_TICKS);
    if ticks == MAX_TICKS {
        bail!("puzzle did not come to rest within {MAX_TICKS} ticks");
    }
    tracing::info!(ticks, frames = renderer.frames, buffers = renderer.buffers, "at rest");
    Ok(ticks)
}

fn affine_row(a: &Aff2) -> [f64; 6] {
    [a.m[(0, 0)], a.m[(1, 0)], a.m[(0, 1)], a.m[(1, 1)], a.t.x, a.t.y]
}

/// Print the report; with `out` also write it there plus a provenance sidecar.
fn emit(report: &serde_json::Value, out: Option<&Path>, params: serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(report)?;
    println!("{text}");
    if let Some(out) = out {
        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(out, &text).with_context(|| format!("writing {}", out.display()))?;
        let prov = provenance::write_sidecar(out, params)?;
        tracing::info!(out = %out.display(), provenance = %prov.display(), "report written");
    }
    Ok(())
}

fn parse_move(s: &str) -> Result<Move, String> {
    let (zone, symmetry) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ZONE:SYMMETRY, got {s:?}"))?;
    let zone = zone.trim().parse().map_err(|e| format!("zone {zone:?}: {e}"))?;
    let symmetry = symmetry
        .trim()
        .parse()
        .map_err(|e| format!("symmetry {symmetry:?}: {e}"))?;
    Ok(Move::new(zone, symmetry))
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got {s:?}"));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part.trim().parse().map_err(|e| format!("{part:?}: {e}"))?;
    }
    Ok(out)
}

fn parse_point(s: &str) -> Result<Vector2<f64>, String> {
    let [x, y] = parse_floats::<2>(s)?;
    Ok(Vector2::new(x, y))
}

fn parse_wheel(s: &str) -> Result<(Vector2<f64>, f64), String> {
    let [x, y, d] = parse_floats::<3>(s)?;
    Ok((Vector2::new(x, y), d))
}
