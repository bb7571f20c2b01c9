//! Interrupt plumbing for long-running commands.
//!
//! The line editor reads in raw mode, where Ctrl-C is delivered as a key
//! press, so the handler installed here only fires while a command is
//! running. It sets a process-wide interrupt flag (polled by the file
//! follower once per cycle) and forwards SIGINT to the registered foreground
//! child, so a cancelled command returns control to the prompt instead of
//! taking the whole shell down.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static FOREGROUND_PID: AtomicI32 = AtomicI32::new(-1);

/// Install the Ctrl-C handler. Call once at startup; later calls are no-ops
/// as far as behavior is concerned.
pub fn install() {
    let _ = ctrlc::set_handler(|| {
        INTERRUPTED.store(true, Ordering::SeqCst);
        if let Some(pid) = foreground_pid() {
            forward_sigint(pid);
        }
    });
}

/// The process-wide interrupt flag, for loops that poll it.
pub fn interrupt_flag() -> &'static AtomicBool {
    &INTERRUPTED
}

/// Check and clear the interrupt flag.
pub fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}

/// Register `pid` as the foreground child for signal forwarding.
pub fn set_foreground_pid(pid: u32) {
    FOREGROUND_PID.store(pid as i32, Ordering::SeqCst);
}

/// Clear the foreground child.
pub fn clear_foreground_pid() {
    FOREGROUND_PID.store(-1, Ordering::SeqCst);
}

fn foreground_pid() -> Option<i32> {
    let pid = FOREGROUND_PID.load(Ordering::SeqCst);
    (pid > 0).then_some(pid)
}

#[cfg(unix)]
fn forward_sigint(pid: i32) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let _ = kill(Pid::from_raw(pid), Signal::SIGINT);
}

#[cfg(not(unix))]
fn forward_sigint(_pid: i32) {}
