//! Process-wide Ctrl-C flag.
//!
//! The first SIGINT only raises the flag so targets already being processed
//! can finish; a second one terminates the process.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

pub fn flag() -> &'static AtomicBool {
    &INTERRUPTED
}

pub fn is_set() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

#[cfg(unix)]
extern "C" fn on_sigint(_: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
    unsafe { libc::signal(libc::SIGINT, libc::SIG_DFL) };
}

#[cfg(unix)]
pub fn install() -> io::Result<()> {
    let handler = on_sigint as extern "C" fn(libc::c_int) as libc::sighandler_t;
    if unsafe { libc::signal(libc::SIGINT, handler) } == libc::SIG_ERR {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn install() -> io::Result<()> {
    Ok(())
}
