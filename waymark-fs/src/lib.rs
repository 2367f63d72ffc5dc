//! Capability-based filesystem helpers built on `cap-std` and `camino`.
//!
//! Every helper starts from ambient authority exactly once, at the nearest
//! directory it can open, and performs the rest of its work through the
//! resulting [`fs_utf8::Dir`] handle.
#![forbid(unsafe_code)]

use std::io::{self, Read};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Read a whole UTF-8 text file.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut file = fs_utf8::File::open_ambient(path, ambient_authority())?;
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(text)
}

/// What, if anything, lives at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Nothing exists at the path, or its parent directory is missing.
    Missing,
    /// A regular file.
    File,
    /// Something other than a regular file, such as a directory.
    NotFile,
}

/// Inspect `path` through a capability on its parent directory.
pub fn path_kind(path: &Utf8Path) -> io::Result<PathKind> {
    let (dir, name) = match parent_and_name(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(PathKind::Missing),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) if meta.is_file() => Ok(PathKind::File),
        Ok(_) => Ok(PathKind::NotFile),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(PathKind::Missing),
        Err(err) => Err(err),
    }
}

/// Create `path` and any missing ancestors, then open it as a capability.
pub fn create_dir_all(path: &Utf8Path) -> io::Result<fs_utf8::Dir> {
    let (root, relative) = split_at_root(path)?;
    if relative.as_str().is_empty() {
        return Ok(root);
    }
    root.create_dir_all(&relative)?;
    root.open_dir(&relative)
}

/// Open the directory containing `path` and return it with the file name.
fn parent_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `path` into an ambient root directory and the remainder below it.
///
/// Absolute paths are opened at the filesystem root (or the drive prefix on
/// Windows); relative paths at the current directory.
fn split_at_root(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();
    let (root, relative) = match std_path.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let root = Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR_STR);
            let relative = path
                .strip_prefix(&root)
                .or_else(|_| path.strip_prefix(prefix))
                .map_err(|_| io::Error::other(format!("cannot strip {prefix} from {path}")))?;
            (root, relative.to_owned())
        }
        Some(Component::RootDir) => {
            let root = Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR);
            let relative = path
                .strip_prefix(&root)
                .map_err(|_| io::Error::other(format!("cannot strip the root from {path}")))?;
            (root, relative.to_owned())
        }
        _ => (Utf8PathBuf::from("."), path.to_owned()),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&root, ambient_authority())?;
    Ok((dir, relative))
}
