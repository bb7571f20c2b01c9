use std::env;
use std::fs;
use std::path::PathBuf;

use mintsh::Shell;

/// Get home directory
pub(crate) fn dirs_home() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}

/// Load and execute ~/.mintshrc if it exists.
///
/// Blank lines and `#` comments are skipped; each remaining line goes
/// through the normal dispatch path, so the file can define aliases, set
/// environment variables, or run any builtin. Failures are reported as
/// warnings and do not stop the remaining lines.
pub(crate) fn load_mintshrc(shell: &mut Shell) {
    let rc_path = match dirs_home() {
        Some(home) => home.join(".mintshrc"),
        None => return,
    };

    let content = match fs::read_to_string(&rc_path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Err(e) = shell.execute_line(trimmed) {
            eprintln!("Warning: ~/.mintshrc line {}: {}", line_num + 1, e);
        }
    }

    // Startup lines are configuration, not part of the interactive session.
    shell.session.clear_history();
}
