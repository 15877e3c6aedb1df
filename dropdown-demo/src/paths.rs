//! Where the demo keeps its files.
//!
//! ```text
//! <config dir>/config.json      optional, see `config::DemoConfig`
//! <cache dir>/latest.log        log of the current run
//! <cache dir>/YYYYmmdd_HHMMSS.log   earlier runs, newest MAX_OLD_LOGS kept
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const LATEST_LOG: &str = "latest.log";

/// Archived logs kept next to `latest.log`.
pub const MAX_OLD_LOGS: usize = 10;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "tuidom", "dropdown-demo")
}

pub fn config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
}

pub fn log_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

pub fn log_file() -> Option<PathBuf> {
    log_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archive the previous run's log and prune old archives. Does nothing when
/// no home directory is known.
pub fn rotate_logs() -> io::Result<()> {
    match log_dir() {
        Some(dir) => rotate_logs_in(&dir, MAX_OLD_LOGS),
        None => Ok(()),
    }
}

/// Rename `dir/latest.log` to a timestamped name, then delete all but the
/// `keep` newest archives. Archive names sort by age.
pub fn rotate_logs_in(dir: &Path, keep: usize) -> io::Result<()> {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        fs::rename(&latest, dir.join(format!("{stamp}.log")))?;
    }

    let mut archived: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "log"))
            .filter(|p| p.file_name().is_some_and(|name| name != LATEST_LOG))
            .collect(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    archived.sort();

    let excess = archived.len().saturating_sub(keep);
    for path in &archived[..excess] {
        fs::remove_file(path)?;
    }
    Ok(())
}
