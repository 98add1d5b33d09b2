//! Atomic file replacement.
//!
//! Text is staged in a hidden sibling of the target and renamed over it, so a
//! reader sees either the previous file or the complete new one.

use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use cap_std::fs::{Dir, OpenOptions};

use crate::error::TranscodeError;
use crate::fs_access::open_parent;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Replace the file at `path` with `contents`.
///
/// # Errors
///
/// Returns [`TranscodeError::Write`] if the parent directory cannot be
/// opened or the staged file cannot be written or renamed into place.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), TranscodeError> {
    let fail = |err: io::Error| TranscodeError::Write {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    let (dir, file_name) = open_parent(path).map_err(fail)?;
    StagedFile::write(&dir, file_name, contents)
        .and_then(|staged| staged.commit(file_name))
        .map_err(fail)?;

    // Directory sync is best-effort.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
    Ok(())
}

/// Hidden sibling file, removed on drop unless committed.
struct StagedFile<'dir> {
    dir: &'dir Dir,
    name: String,
    committed: bool,
}

impl<'dir> StagedFile<'dir> {
    fn write(dir: &'dir Dir, target: &Path, contents: &[u8]) -> io::Result<Self> {
        let name = format!(
            ".{}.{}.{}.tmp",
            target.to_string_lossy(),
            process::id(),
            SEQUENCE.fetch_add(1, Ordering::Relaxed)
        );
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let mut file = dir.open_with(&name, &options)?;
        let staged = Self {
            dir,
            name,
            committed: false,
        };

        file.write_all(contents)?;
        file.sync_all()?;
        Ok(staged)
    }

    fn commit(mut self, target: &Path) -> io::Result<()> {
        replace(self.dir, &self.name, target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile<'_> {
    fn drop(&mut self) {
        if !self.committed {
            drop(self.dir.remove_file(&self.name));
        }
    }
}

#[cfg(windows)]
fn replace(dir: &Dir, staged: &str, target: &Path) -> io::Result<()> {
    // Rename does not overwrite on Windows.
    if let Err(err) = dir.remove_file(target)
        && err.kind() != io::ErrorKind::NotFound
    {
        return Err(err);
    }
    dir.rename(staged, dir, target)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, staged: &str, target: &Path) -> io::Result<()> {
    dir.rename(staged, dir, target)
}
