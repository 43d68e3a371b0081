//! Small hand-built puzzles shared by unit tests.

use nalgebra::{vector, Vector2};
use std::f64::consts::FRAC_PI_2;

use crate::geom2::Aff2;
use crate::load::{MemorySource, MeshGeometry, MeshRef, PointDesc, PuzzleDesc, PuzzleId, WindowDesc};
use crate::mesh::{Mesh, MeshKind, Triangle};
use crate::puzzle::{Puzzle, Window};

/// Axis-aligned square as two CCW triangles.
pub(crate) fn square(name: &str, kind: MeshKind, min: Vector2<f64>, side: f64) -> Mesh {
    Mesh::new(
        name,
        kind,
        vec![
            min,
            min + vector![side, 0.0],
            min + vector![side, side],
            min + vector![0.0, side],
        ],
        vec![Triangle([0, 1, 2]), Triangle([0, 2, 3])],
    )
    .unwrap()
}

/// D4 symmetries of a square centred at `c`: CCW, CW, then four reflections.
pub(crate) fn square_symmetries(c: Vector2<f64>) -> Vec<Aff2> {
    let mut out = vec![
        Aff2::rotation_about(c, FRAC_PI_2),
        Aff2::rotation_about(c, -FRAC_PI_2),
    ];
    for dir in [vector![1.0, 0.0], vector![0.0, 1.0], vector![1.0, 1.0], vector![1.0, -1.0]] {
        out.push(Aff2::reflection_about(c, dir).unwrap());
    }
    out
}

/// Square zone of half-width `h` centred at `c` plus its four quadrant fragments.
pub(crate) fn square_zone_with_quadrants(c: Vector2<f64>, h: f64) -> Vec<Mesh> {
    let mut meshes = vec![square(
        "zone",
        MeshKind::Capture {
            symmetries: square_symmetries(c),
        },
        c - vector![h, h],
        2.0 * h,
    )];
    for (k, offset) in [vector![-h, -h], vector![0.0, -h], vector![0.0, 0.0], vector![-h, 0.0]]
        .into_iter()
        .enumerate()
    {
        meshes.push(square(&format!("piece{k}"), MeshKind::Picture, c + offset, h));
    }
    meshes
}

/// One square zone at the origin with four fragments (mesh 0 is the zone).
pub(crate) fn one_zone_puzzle() -> Puzzle {
    Puzzle::new(
        Window::new(vector![-1.0, -1.0], vector![1.0, 1.0]),
        square_zone_with_quadrants(vector![0.0, 0.0], 1.0),
    )
}

/// Two side-by-side zones centred at (-1, 0) and (1, 0); zones are meshes 0 and 5.
pub(crate) fn two_zone_puzzle() -> Puzzle {
    let mut meshes = square_zone_with_quadrants(vector![-1.0, 0.0], 1.0);
    meshes.extend(square_zone_with_quadrants(vector![1.0, 0.0], 1.0));
    Puzzle::new(Window::new(vector![-2.0, -1.0], vector![2.0, 1.0]), meshes)
}

/// `one_zone_puzzle` served as `Puzzle1.json` with one file per mesh.
pub(crate) fn demo_source() -> MemorySource {
    let puzzle = one_zone_puzzle();
    let mut src = MemorySource::default();
    let mut mesh_list = Vec::new();
    for m in puzzle.meshes() {
        let file = format!("{}.json", m.name());
        mesh_list.push(if m.is_capture() {
            MeshRef::Capture {
                file: file.clone(),
                symmetry_list: m.symmetries().iter().map(Into::into).collect(),
            }
        } else {
            MeshRef::Picture { file: file.clone() }
        });
        src = src.with_mesh(file, MeshGeometry::from(m));
    }
    let w = puzzle.window();
    src.with_puzzle(
        PuzzleId(1),
        PuzzleDesc {
            window: WindowDesc {
                min_point: PointDesc { x: w.min.x, y: w.min.y },
                max_point: PointDesc { x: w.max.x, y: w.max.y },
            },
            mesh_list,
        },
    )
}
