pub mod fieldvisits;
pub mod observations;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{bail, Context, Result};

/// Accept either an export file directly or a directory holding dated
/// exports, in which case the newest match wins.
pub(crate) fn resolve_export(path: &Path, pattern: &str) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if path.is_dir() {
        let full_pattern = path.join(pattern);
        let full_pattern = full_pattern
            .to_str()
            .with_context(|| format!("non-UTF-8 path {}", path.display()))?;

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in glob::glob(full_pattern)? {
            let candidate = entry?;
            let modified = std::fs::metadata(&candidate)?.modified()?;
            if newest.as_ref().map(|(t, _)| modified > *t).unwrap_or(true) {
                newest = Some((modified, candidate));
            }
        }
        return newest
            .map(|(_, found)| found)
            .with_context(|| format!("no file matching {pattern} under {}", path.display()));
    }
    bail!("input path {} does not exist", path.display())
}
