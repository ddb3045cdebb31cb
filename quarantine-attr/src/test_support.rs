//! Scratch-tree helpers shared by the unit tests and `tests/cli.rs`.
//!
//! Both include this file as a child of their crate root, so everything is
//! reached through `super`.

use std::path::{Path, PathBuf};

use super::{xattr, QuarantineError, QUARANTINE_ATTR};

pub const SAMPLE_VALUE: &[u8] = b"0083;6530f1a2;Safari;";

/// Marks `path` as quarantined. Returns `false` when the scratch filesystem
/// does not accept the attribute, in which case the caller skips the test.
pub fn tag(path: &Path) -> bool {
    match xattr::set(path, QUARANTINE_ATTR, SAMPLE_VALUE, true) {
        Ok(()) => true,
        Err(QuarantineError::Unsupported) | Err(QuarantineError::PermissionDenied) => {
            eprintln!("skipping: no user extended attributes on {}", path.display());
            false
        }
        Err(e) => panic!("cannot tag {}: {}", path.display(), e),
    }
}

/// A directory with all permission bits cleared, restored on drop.
pub struct Locked(PathBuf);

impl Locked {
    /// Returns `None` when running as root, which can list it anyway.
    #[cfg(unix)]
    pub fn new(dir: &Path) -> Option<Self> {
        use std::os::unix::fs::PermissionsExt;
        if unsafe { libc::geteuid() } == 0 {
            eprintln!("skipping: permissions are not enforced for root");
            return None;
        }
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o000)).unwrap();
        Some(Locked(dir.to_path_buf()))
    }

    #[cfg(not(unix))]
    pub fn new(_: &Path) -> Option<Self> {
        None
    }
}

impl Drop for Locked {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&self.0, std::fs::Permissions::from_mode(0o755));
        }
    }
}
