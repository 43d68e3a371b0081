//! Puzzle files on disk: `<root>/Puzzle{n}.json` plus one JSON file per mesh.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use symgroup::load::{MeshGeometry, PuzzleDesc, PuzzleId, PuzzleSource};

#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> io::Result<T> {
        let path = self.root.join(file);
        let bytes = std::fs::read(&path)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("{}: {e}", path.display()))
        })
    }
}

impl PuzzleSource for FsSource {
    type Error = io::Error;

    async fn puzzle(&self, id: PuzzleId) -> io::Result<PuzzleDesc> {
        self.read_json(&id.file_name())
    }

    async fn mesh(&self, file: &str) -> io::Result<MeshGeometry> {
        self.read_json(file)
    }
}
