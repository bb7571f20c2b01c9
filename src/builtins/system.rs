//! System builtins: process, disk, environment, and desktop hand-offs.

use std::env;

use crate::display::{paint, Color};
use crate::executor;
use crate::shell::{Shell, ShellError};

impl Shell {
    pub(crate) fn builtin_ps(&mut self) -> Result<(), ShellError> {
        executor::run_argv("ps", &["-e", "-o", "pid,comm,%cpu,%mem"])
            .map_err(|e| ShellError::Exec(format!("ps: {e}")))?;
        Ok(())
    }

    #[cfg(unix)]
    pub(crate) fn builtin_df(&mut self) -> Result<(), ShellError> {
        let stats = nix::sys::statvfs::statvfs("/")
            .map_err(|e| ShellError::Exec(format!("df: {e}")))?;
        let frag = stats.fragment_size() as f64;
        const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
        let total = stats.blocks() as f64 * frag / GIB;
        let avail = stats.blocks_available() as f64 * frag / GIB;
        println!("/ {total:.1}G {avail:.1}G");
        Ok(())
    }

    #[cfg(not(unix))]
    pub(crate) fn builtin_df(&mut self) -> Result<(), ShellError> {
        Err(ShellError::Exec("df: unsupported platform".to_string()))
    }

    pub(crate) fn builtin_whoami(&mut self) -> Result<(), ShellError> {
        let user = env::var("USER")
            .map_err(|_| ShellError::NotFound("whoami: unknown user".to_string()))?;
        println!("{user}");
        Ok(())
    }

    pub(crate) fn builtin_date(&mut self) {
        let now = chrono::Local::now();
        println!(
            "{}",
            paint(Color::Gray, &now.format("%a %b %e %H:%M:%S %Y").to_string())
        );
    }

    pub(crate) fn builtin_clear(&mut self) {
        print!("\x1b[2J\x1b[H");
        use std::io::Write;
        let _ = std::io::stdout().flush();
    }

    pub(crate) fn builtin_env(&mut self) {
        for (key, value) in env::vars() {
            println!("{key}={value}");
        }
    }

    /// Mutates this process's environment; only child processes spawned
    /// afterwards see the change, never the parent shell.
    pub(crate) fn builtin_setenv(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let (name, value) = match (argv.get(1), argv.get(2)) {
            (Some(name), Some(value)) => (name, value),
            _ => return Err(ShellError::Usage("setenv NAME VALUE")),
        };
        env::set_var(name, value);
        Ok(())
    }

    pub(crate) fn builtin_which(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let name = argv.get(1).ok_or(ShellError::Usage("which <cmd>"))?;
        match executor::find_on_path(name) {
            Some(path) => println!("{}", path.display()),
            None => println!("which: not found"),
        }
        Ok(())
    }

    pub(crate) fn builtin_uptime(&mut self) {
        if let Some(seconds) = proc_uptime_seconds() {
            println!("{}{} seconds", paint(Color::Cyan, "uptime: "), seconds);
        } else {
            println!(
                "{}{} seconds",
                paint(Color::Cyan, "uptime (process): "),
                self.started.elapsed().as_secs()
            );
        }
    }

    pub(crate) fn builtin_edit(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let file = argv.get(1).ok_or(ShellError::Usage("edit <file>"))?;
        let editor = match env::var("EDITOR") {
            Ok(editor) if !editor.is_empty() => editor,
            _ if executor::find_on_path("code").is_some() => "code".to_string(),
            _ => "nano".to_string(),
        };
        executor::run_argv(&editor, &[file])
            .map_err(|e| ShellError::Exec(format!("edit: {editor}: {e}")))?;
        Ok(())
    }

    pub(crate) fn builtin_open(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let file = argv.get(1).ok_or(ShellError::Usage("open <file>"))?;
        executor::spawn_detached("xdg-open", &[file])
            .map_err(|e| ShellError::Exec(format!("open: {e}")))
    }

    pub(crate) fn builtin_top(&mut self) -> Result<(), ShellError> {
        let tool = if executor::find_on_path("htop").is_some() {
            "htop"
        } else {
            "top"
        };
        executor::run_argv(tool, &[]).map_err(|e| ShellError::Exec(format!("top: {e}")))?;
        Ok(())
    }

    pub(crate) fn builtin_net(&mut self) -> Result<(), ShellError> {
        let result = if executor::find_on_path("ip").is_some() {
            executor::run_argv("ip", &["addr"])
        } else {
            executor::run_argv("ifconfig", &["-a"])
        };
        result.map_err(|e| ShellError::Exec(format!("net: {e}")))?;
        Ok(())
    }

    pub(crate) fn builtin_notify(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let message = argv.get(1).ok_or(ShellError::Usage("notify <message>"))?;
        executor::run_argv("notify-send", &["mintsh", message])
            .map_err(|e| ShellError::Exec(format!("notify: {e}")))?;
        Ok(())
    }

    pub(crate) fn builtin_ping(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let host = argv.get(1).ok_or(ShellError::Usage("ping <host> [-c N]"))?;
        let mut count: u32 = 4;
        let mut rest = argv[2..].iter();
        while let Some(flag) = rest.next() {
            if flag == "-c" {
                count = rest
                    .next()
                    .and_then(|n| n.parse().ok())
                    .ok_or(ShellError::Usage("ping <host> [-c N]"))?;
            }
        }
        executor::run_argv("ping", &["-c", &count.to_string(), host])
            .map_err(|e| ShellError::Exec(format!("ping: {e}")))?;
        Ok(())
    }
}

/// Seconds of system uptime, when the host exposes them.
fn proc_uptime_seconds() -> Option<u64> {
    let content = std::fs::read_to_string("/proc/uptime").ok()?;
    let first = content.split_whitespace().next()?;
    Some(first.parse::<f64>().ok()? as u64)
}
