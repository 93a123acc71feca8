//! Filesystem helpers built on `cap-std` and `camino`.
//!
//! Every operation opens the containing directory with ambient authority and
//! then works relative to it, so callers only ever hand over UTF-8 paths.
#![forbid(unsafe_code)]

use std::io::{self, Read};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// What, if anything, lives at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Nothing exists at the path.
    Missing,
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Something else, such as a socket or device.
    Other,
}

/// Read a UTF-8 text file in full.
///
/// # Errors
///
/// Returns any I/O error raised while opening or reading `path`, including
/// [`io::ErrorKind::InvalidData`] when the contents are not UTF-8.
pub fn read_utf8_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_parent(path)?;
    let mut file = dir.open(name.as_str())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Classify whatever lives at `path`.
///
/// # Errors
///
/// Returns I/O errors other than [`io::ErrorKind::NotFound`].
pub fn path_kind(path: &Utf8Path) -> io::Result<PathKind> {
    let (dir, name) = match open_parent(path) {
        Ok(opened) => opened,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(PathKind::Missing),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) if meta.is_file() => Ok(PathKind::File),
        Ok(meta) if meta.is_dir() => Ok(PathKind::Directory),
        Ok(_) => Ok(PathKind::Other),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(PathKind::Missing),
        Err(err) => Err(err),
    }
}

/// Create every missing directory above `path`.
///
/// # Errors
///
/// Returns any I/O error raised while opening the base directory or creating
/// the missing components.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

fn open_parent(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
        .to_owned();
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split a directory path into an ambient base directory and the relative
/// remainder beneath it.
fn split_base(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();
    let (base, relative) = match std_path.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR_STR);
            let relative = path
                .strip_prefix(&base)
                .or_else(|_| path.strip_prefix(prefix))
                .map_err(|_| io::Error::other("failed to strip prefix from path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR);
            let relative = path
                .strip_prefix(&base)
                .map_err(|_| io::Error::other("failed to strip root from path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), path.to_path_buf()),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}
