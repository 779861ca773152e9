//! Interrupt handling
//!
//! Ctrl+C must reach the currently running command line and leave the
//! recipe failed with an interruption reason. The handler records the
//! interrupt in an atomic and forwards SIGINT to the foreground child;
//! the executor checks the flag between waits.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Once;

#[cfg(unix)]
use nix::sys::signal::{kill, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// PID of the current foreground child (or -1 if none)
static FOREGROUND_PID: AtomicI32 = AtomicI32::new(-1);

/// Set by the handler when an interrupt arrives
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

static INSTALL: Once = Once::new();

/// Install the interrupt handler (idempotent)
pub fn install() {
    INSTALL.call_once(|| {
        let _ = ctrlc::set_handler(|| {
            INTERRUPTED.store(true, Ordering::SeqCst);
            forward_to_foreground();
        });
    });
}

#[cfg(unix)]
fn forward_to_foreground() {
    let pid = FOREGROUND_PID.load(Ordering::SeqCst);
    if pid > 0 {
        let _ = kill(Pid::from_raw(pid), Signal::SIGINT);
    }
}

#[cfg(not(unix))]
fn forward_to_foreground() {}

/// Record the child currently owning the terminal
pub fn set_foreground_pid(pid: i32) {
    FOREGROUND_PID.store(pid, Ordering::SeqCst);
}

/// Clear the foreground child record
pub fn clear_foreground_pid() {
    FOREGROUND_PID.store(-1, Ordering::SeqCst);
}

/// Has an interrupt arrived since the last check?
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Reset the interrupt flag (start of an invocation, and tests)
pub fn reset() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}
