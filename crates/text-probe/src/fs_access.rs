//! Ambient file access through `cap-std`.

use std::io::{self, Read};
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir, fs::File};

/// Open the parent directory of `path` and return it with the bare file name.
///
/// A path without a directory component resolves against the working
/// directory. Used for staging writes beside their target.
pub(crate) fn open_parent(path: &Path) -> io::Result<(Dir, &Path)> {
    let file_name = path
        .file_name()
        .map(Path::new)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path must name a file"))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((directory, file_name))
}

/// Read the whole file at `path` as raw bytes.
///
/// The path resolves as the operating system resolves it, so symlinks are
/// followed wherever they point.
pub(crate) fn read_bytes(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open_ambient(path, ambient_authority())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}
