//! External-process service.
//!
//! Everything the shell does not implement itself goes through here: the
//! dispatch fallback hands a whole line to `sh -c`, and several builtins
//! shell out to the system tool they wrap. Children run with inherited
//! stdio so output streams straight to the terminal, and each child is
//! registered as the foreground process while the shell waits on it, so a
//! Ctrl-C is forwarded there (see [`crate::signals`]) and the prompt comes
//! back.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::shell::ShellError;
use crate::signals;

/// Run a raw command line through the host interpreter, verbatim.
///
/// A spawn failure is the only error surfaced; a non-zero exit from a child
/// that did start is visible only through its own output.
pub fn run_line(line: &str) -> Result<ExitStatus, ShellError> {
    let child = Command::new("sh")
        .arg("-c")
        .arg(line)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|_| ShellError::Spawn(line.to_string()))?;
    wait_foreground(child).map_err(|_| ShellError::Spawn(line.to_string()))
}

/// Run a program with explicit arguments, streaming output to the terminal.
pub fn run_argv(program: &str, args: &[&str]) -> io::Result<ExitStatus> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()?;
    wait_foreground(child)
}

/// Launch a program and return without waiting (desktop hand-offs).
pub fn spawn_detached(program: &str, args: &[&str]) -> io::Result<()> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(drop)
}

fn wait_foreground(mut child: Child) -> io::Result<ExitStatus> {
    signals::set_foreground_pid(child.id());
    let status = child.wait();
    signals::clear_foreground_pid();
    status
}

/// Walk `PATH` for an executable named `name`.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// Whether `path` is a regular file the current user may execute.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_sh_on_path() {
        let found = find_on_path("sh").expect("sh should be on PATH");
        assert!(is_executable(&found));
    }

    #[test]
    fn missing_program_is_not_found() {
        assert!(find_on_path("definitely-not-a-real-tool-xyz").is_none());
    }

    #[test]
    fn directories_are_not_executables() {
        assert!(!is_executable(Path::new("/")));
    }
}
