//! Sidecar files recording how a report was produced.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Overrides the revision lookup, e.g. in packaged builds without a checkout.
const REV_ENV: &str = "SYMGROUP_CODE_REV";

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    engine_version: &'static str,
    callsite: String,
    params: Value,
    report: &'a Path,
}

/// Write `<stem>.provenance.json` beside `report` and return its path.
#[track_caller]
pub fn write_sidecar(report: &Path, params: Value) -> Result<PathBuf> {
    let at = Location::caller();
    let sidecar = Sidecar {
        code_rev: code_rev(),
        engine_version: symgroup::VERSION,
        callsite: format!("{}:{}", at.file(), at.line()),
        params,
        report,
    };
    let path = sidecar_path(report);
    fs::write(&path, serde_json::to_vec_pretty(&sidecar)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(report: &Path) -> PathBuf {
    let stem = report
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    report.with_file_name(format!("{stem}.provenance.json"))
}

/// `SYMGROUP_CODE_REV`, else the short git revision of this checkout, else "unknown".
fn code_rev() -> String {
    std::env::var(REV_ENV)
        .ok()
        .filter(|rev| !rev.is_empty())
        .or_else(|| {
            let out = Command::new("git")
                .args(["-C", env!("CARGO_MANIFEST_DIR"), "rev-parse", "--short", "HEAD"])
                .output()
                .ok()?;
            out.status
                .success()
                .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
