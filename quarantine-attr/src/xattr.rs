//! Extended attribute access for a single path.
//!
//! `follow` selects whether a symlink is resolved before the attribute call
//! or the link itself is inspected.

use std::io;
use std::path::Path;

use crate::QuarantineError;

/// Name under which the quarantine marker is stored on this platform.
///
/// Linux only accepts namespaced names, and files copied off a Mac with
/// their attributes preserved carry the marker in the `user.` namespace.
#[cfg(target_os = "macos")]
pub const QUARANTINE_ATTR: &str = "com.apple.quarantine";
#[cfg(not(target_os = "macos"))]
pub const QUARANTINE_ATTR: &str = "user.com.apple.quarantine";

/// Returns whether `name` is set on `path`.
pub fn has(path: &Path, name: &str, follow: bool) -> Result<bool, QuarantineError> {
    match sys::get(path, name, follow) {
        Ok(()) => Ok(true),
        Err(e) if sys::is_missing_attr(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Removes `name` from `path`. Returns `false` if it was not set.
pub fn remove(path: &Path, name: &str, follow: bool) -> Result<bool, QuarantineError> {
    match sys::remove(path, name, follow) {
        Ok(()) => Ok(true),
        Err(e) if sys::is_missing_attr(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Sets `name` on `path`, replacing any existing value.
pub fn set(path: &Path, name: &str, value: &[u8], follow: bool) -> Result<(), QuarantineError> {
    sys::set(path, name, value, follow).map_err(QuarantineError::from)
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
fn c_str(bytes: &[u8]) -> io::Result<std::ffi::CString> {
    std::ffi::CString::new(bytes)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "embedded NUL byte"))
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
fn c_args(path: &Path, name: &str) -> io::Result<(std::ffi::CString, std::ffi::CString)> {
    use std::os::unix::ffi::OsStrExt;
    Ok((c_str(path.as_os_str().as_bytes())?, c_str(name.as_bytes())?))
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "macos"))]
fn check(ret: isize) -> io::Result<()> {
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(any(target_os = "linux", target_os = "android"))]
mod sys {
    use std::io;
    use std::path::Path;

    use super::{c_args, check};

    pub fn is_missing_attr(e: &io::Error) -> bool {
        e.raw_os_error() == Some(libc::ENODATA)
    }

    pub fn get(path: &Path, name: &str, follow: bool) -> io::Result<()> {
        let (path, name) = c_args(path, name)?;
        let ret = unsafe {
            if follow {
                libc::getxattr(path.as_ptr(), name.as_ptr(), std::ptr::null_mut(), 0)
            } else {
                libc::lgetxattr(path.as_ptr(), name.as_ptr(), std::ptr::null_mut(), 0)
            }
        };
        check(ret)
    }

    pub fn remove(path: &Path, name: &str, follow: bool) -> io::Result<()> {
        let (path, name) = c_args(path, name)?;
        let ret = unsafe {
            if follow {
                libc::removexattr(path.as_ptr(), name.as_ptr())
            } else {
                libc::lremovexattr(path.as_ptr(), name.as_ptr())
            }
        };
        check(ret as isize)
    }

    pub fn set(path: &Path, name: &str, value: &[u8], follow: bool) -> io::Result<()> {
        let (path, name) = c_args(path, name)?;
        let data = value.as_ptr() as *const libc::c_void;
        let ret = unsafe {
            if follow {
                libc::setxattr(path.as_ptr(), name.as_ptr(), data, value.len(), 0)
            } else {
                libc::lsetxattr(path.as_ptr(), name.as_ptr(), data, value.len(), 0)
            }
        };
        check(ret as isize)
    }
}

#[cfg(target_os = "macos")]
mod sys {
    use std::io;
    use std::path::Path;

    use super::{c_args, check};

    fn options(follow: bool) -> libc::c_int {
        if follow {
            0
        } else {
            libc::XATTR_NOFOLLOW
        }
    }

    pub fn is_missing_attr(e: &io::Error) -> bool {
        e.raw_os_error() == Some(libc::ENOATTR)
    }

    pub fn get(path: &Path, name: &str, follow: bool) -> io::Result<()> {
        let (path, name) = c_args(path, name)?;
        let ret = unsafe {
            libc::getxattr(
                path.as_ptr(),
                name.as_ptr(),
                std::ptr::null_mut(),
                0,
                0,
                options(follow),
            )
        };
        check(ret)
    }

    pub fn remove(path: &Path, name: &str, follow: bool) -> io::Result<()> {
        let (path, name) = c_args(path, name)?;
        let ret = unsafe { libc::removexattr(path.as_ptr(), name.as_ptr(), options(follow)) };
        check(ret as isize)
    }

    pub fn set(path: &Path, name: &str, value: &[u8], follow: bool) -> io::Result<()> {
        let (path, name) = c_args(path, name)?;
        let ret = unsafe {
            libc::setxattr(
                path.as_ptr(),
                name.as_ptr(),
                value.as_ptr() as *const libc::c_void,
                value.len(),
                0,
                options(follow),
            )
        };
        check(ret as isize)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "macos")))]
mod sys {
    use std::io;
    use std::path::Path;

    pub fn is_missing_attr(_: &io::Error) -> bool {
        false
    }

    pub fn get(_: &Path, _: &str, _: bool) -> io::Result<()> {
        Err(unsupported())
    }

    pub fn remove(_: &Path, _: &str, _: bool) -> io::Result<()> {
        Err(unsupported())
    }

    pub fn set(_: &Path, _: &str, _: &[u8], _: bool) -> io::Result<()> {
        Err(unsupported())
    }

    fn unsupported() -> io::Error {
        io::Error::new(io::ErrorKind::Unsupported, "no extended attribute support")
    }
}
