//! Process-wide core dump suppression.
//!
//! Runs at most once per process. Failure only costs a layer of hardening,
//! so it is logged and reported through the return value, never as an error.

use std::io;
use std::sync::OnceLock;

use tracing::{debug, warn};

static OUTCOME: OnceLock<bool> = OnceLock::new();

/// Asks the OS not to write core dumps for this process.
///
/// The first call performs the syscalls; later calls return the cached
/// outcome. Returns whether suppression is in effect.
pub fn disable_core_dumps() -> bool {
    *OUTCOME.get_or_init(|| match suppress() {
        Ok(()) => {
            debug!("core dumps disabled for this process");
            true
        }
        Err(err) => {
            warn!(error = %err, "could not disable core dumps, continuing without");
            false
        }
    })
}

#[cfg(unix)]
fn suppress() -> io::Result<()> {
    let limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    if unsafe { libc::setrlimit(libc::RLIMIT_CORE, &limit) } != 0 {
        return Err(io::Error::last_os_error());
    }

    // Also blocks ptrace attachment by non-root peers.
    #[cfg(target_os = "linux")]
    if unsafe { libc::prctl(libc::PR_SET_DUMPABLE, 0, 0, 0, 0) } != 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

#[cfg(not(unix))]
fn suppress() -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "core dump suppression is only implemented for unix",
    ))
}
