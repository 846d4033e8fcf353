use crate::{error::WorldError, world::Snapshot};
use log::warn;
use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, ".bak")
}

fn temp_path(path: &Path) -> PathBuf {
    with_suffix(path, ".tmp")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Reads the snapshot at `path`. A missing or unparsable primary falls back
/// to the backup left by the previous save.
pub async fn load_snapshot(path: &Path) -> Result<Option<Snapshot>, WorldError> {
    let backup = backup_path(path);

    let primary_error = match read_snapshot(path).await {
        Ok(Some(snapshot)) => return Ok(Some(snapshot)),
        Ok(None) => return read_snapshot(&backup).await,
        Err(error) => error,
    };

    match read_snapshot(&backup).await {
        Ok(Some(snapshot)) => {
            warn!(
                "Snapshot {} is unreadable, using backup: {}",
                path.display(),
                primary_error
            );
            Ok(Some(snapshot))
        }
        _ => Err(primary_error),
    }
}

async fn read_snapshot(path: &Path) -> Result<Option<Snapshot>, WorldError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Writes the snapshot next to `path`, keeps the previous file as a backup,
/// then renames the new file into place. The primary is never left half
/// written.
pub async fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), WorldError> {
    let bytes = serde_json::to_vec_pretty(snapshot)?;
    let temp = temp_path(path);

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }

    tokio::fs::write(&temp, bytes).await?;

    match tokio::fs::copy(path, backup_path(path)).await {
        Ok(_) => {}
        Err(error) if error.kind() == ErrorKind::NotFound => {}
        Err(error) => return Err(error.into()),
    }

    tokio::fs::rename(&temp, path).await?;
    Ok(())
}
