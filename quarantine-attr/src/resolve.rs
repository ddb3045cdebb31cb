//! Turns the paths given on the command line into a flat list of targets.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::QuarantineError;

/// Directory extensions treated as a single item and always cleaned in full.
pub const BUNDLE_EXTENSIONS: &[&str] = &[
    "app",
    "framework",
    "bundle",
    "plugin",
    "kext",
    "appex",
    "xpc",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
    Bundle,
    Symlink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub kind: TargetKind,
}

/// A root or subdirectory that could not be inspected or listed.
#[derive(Debug)]
pub struct Unresolved {
    pub path: PathBuf,
    pub error: QuarantineError,
}

pub type Resolved = Result<Target, Unresolved>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
    /// Act on the path itself. Bundles are still expanded.
    Path(PathBuf),
    /// Act on the path and everything below it.
    Folder(PathBuf),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// How far below a folder root to descend. `None` is unlimited, `Some(1)`
    /// stops at immediate children.
    pub max_depth: Option<usize>,
    pub follow_symlinks: bool,
}

/// Expands `roots` in order.
///
/// Every root contributes itself first, followed by its descendants in
/// depth-first pre-order with siblings sorted by name. Failures take the
/// position of the entry they belong to and never stop the expansion of
/// anything else.
pub fn resolve(roots: &[Root], options: &ResolveOptions) -> Vec<Resolved> {
    let mut out = Vec::new();
    for root in roots {
        let (path, folder) = match root {
            Root::Path(path) => (path, false),
            Root::Folder(path) => (path, true),
        };
        let target = match inspect(path, options.follow_symlinks) {
            Ok(target) => target,
            Err(error) => {
                debug!("cannot inspect '{}': {}", path.display(), error);
                out.push(Err(Unresolved {
                    path: path.clone(),
                    error,
                }));
                continue;
            }
        };
        let kind = target.kind;
        out.push(Ok(target));

        let max_depth = match kind {
            TargetKind::Bundle => None,
            TargetKind::Directory if folder => options.max_depth,
            _ => continue,
        };
        let mut walker = Walker {
            follow_symlinks: options.follow_symlinks,
            visited: HashSet::new(),
            out: &mut out,
        };
        walker.walk(path, 1, max_depth);
    }
    out
}

pub fn is_bundle(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            BUNDLE_EXTENSIONS
                .iter()
                .any(|bundle| ext.eq_ignore_ascii_case(bundle))
        })
}

fn inspect(path: &Path, follow_symlinks: bool) -> Result<Target, QuarantineError> {
    let md = if follow_symlinks {
        fs::metadata(path)?
    } else {
        fs::symlink_metadata(path)?
    };
    let file_type = md.file_type();
    let kind = if file_type.is_symlink() {
        TargetKind::Symlink
    } else if file_type.is_dir() {
        if is_bundle(path) {
            TargetKind::Bundle
        } else {
            TargetKind::Directory
        }
    } else {
        TargetKind::File
    };
    Ok(Target {
        path: path.to_path_buf(),
        kind,
    })
}

struct Walker<'a> {
    follow_symlinks: bool,
    visited: HashSet<(u64, u64)>,
    out: &'a mut Vec<Resolved>,
}

impl Walker<'_> {
    fn walk(&mut self, dir: &Path, depth: usize, max_depth: Option<usize>) {
        if max_depth.map_or(false, |max| depth > max) {
            return;
        }
        if self.follow_symlinks {
            if let Some(id) = dir_id(dir) {
                if !self.visited.insert(id) {
                    debug!("'{}' already visited, skipping", dir.display());
                    return;
                }
            }
        }

        let children = match children(dir) {
            Ok(children) => children,
            Err(error) => {
                debug!("cannot list '{}': {}", dir.display(), error);
                self.out.push(Err(Unresolved {
                    path: dir.to_path_buf(),
                    error,
                }));
                return;
            }
        };
        for child in children {
            match inspect(&child, self.follow_symlinks) {
                Ok(target) => {
                    let kind = target.kind;
                    self.out.push(Ok(target));
                    match kind {
                        TargetKind::Directory => self.walk(&child, depth + 1, max_depth),
                        TargetKind::Bundle => self.walk(&child, depth + 1, None),
                        _ => {}
                    }
                }
                Err(error) => self.out.push(Err(Unresolved { path: child, error })),
            }
        }
    }
}

fn children(dir: &Path) -> Result<Vec<PathBuf>, QuarantineError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        entries.push(entry?);
    }
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries.into_iter().map(|entry| entry.path()).collect())
}

#[cfg(unix)]
fn dir_id(dir: &Path) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    fs::metadata(dir).ok().map(|md| (md.dev(), md.ino()))
}

#[cfg(not(unix))]
fn dir_id(_: &Path) -> Option<(u64, u64)> {
    None
}
