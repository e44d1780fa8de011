//! Working location: the drive and directory a repository is fetched into.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// A drive/volume prefix plus a directory.
///
/// Without a drive the directory is taken relative to the process's
/// current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingLocation {
    drive: Option<PathBuf>,
    directory: PathBuf,
}

impl WorkingLocation {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            drive: None,
            directory: directory.into(),
        }
    }

    pub fn with_drive(mut self, drive: impl Into<PathBuf>) -> Self {
        self.drive = Some(drive.into());
        self
    }

    pub fn drive(&self) -> Option<&Path> {
        self.drive.as_deref()
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Drive prefix of the current directory (`C:` and friends).
    ///
    /// Always `None` on platforms without drive prefixes.
    pub fn current_drive() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        match cwd.components().next() {
            Some(Component::Prefix(prefix)) => Some(PathBuf::from(prefix.as_os_str())),
            _ => None,
        }
    }

    /// Full path of the working directory.
    ///
    /// A bare drive such as `D:` is anchored at its root, so `D:` + `work`
    /// yields `D:\work` rather than the drive-relative `D:work`.
    pub fn path(&self) -> PathBuf {
        match &self.drive {
            Some(drive) => {
                let mut root = drive.clone();
                if !root.has_root() {
                    root.push(std::path::MAIN_SEPARATOR_STR);
                }
                root.join(&self.directory)
            }
            None => self.directory.clone(),
        }
    }

    /// Delete any existing directory at [`path`](Self::path) and create it empty.
    ///
    /// Returns the absolute path, so commands run inside it do not resolve
    /// a relative directory a second time.
    pub fn recreate(&self) -> Result<PathBuf> {
        let path = self.path();
        let path = std::path::absolute(&path).map_err(|err| Error::io(&path, err))?;
        if path.exists() {
            info!(path = %path.display(), "Removing existing working directory");
            remove_dir_all_force(&path)?;
        }
        fs::create_dir_all(&path).map_err(|err| Error::io(&path, err))?;
        debug!(path = %path.display(), "Created working directory");
        Ok(path)
    }
}

/// Recursively remove `path`, clearing read-only attributes first.
///
/// Hosts sometimes hand out files (git pack files in particular) marked
/// read-only, which blocks deletion on Windows.
pub fn remove_dir_all_force(path: &Path) -> Result<()> {
    clear_readonly(path)?;
    fs::remove_dir_all(path).map_err(|err| Error::io(path, err))
}

#[allow(clippy::permissions_set_readonly_false)]
fn clear_readonly(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|err| Error::io(path, err))?;
    if metadata.file_type().is_symlink() {
        return Ok(());
    }

    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions).map_err(|err| Error::io(path, err))?;
    }

    if metadata.is_dir() {
        for entry in fs::read_dir(path).map_err(|err| Error::io(path, err))? {
            let entry = entry.map_err(|err| Error::io(path, err))?;
            clear_readonly(&entry.path())?;
        }
    }
    Ok(())
}
