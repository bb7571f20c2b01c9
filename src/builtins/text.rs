//! Text builtins: reading, searching, and rewriting files.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::display::{paint, Color};
use crate::follow;
use crate::shell::{Shell, ShellError};
use crate::signals;

/// Lines shown by `head` and plain `tail`.
const HEAD_TAIL_LINES: usize = 10;

impl Shell {
    pub(crate) fn builtin_cat(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(1).ok_or(ShellError::Usage("cat <file>"))?;
        for line in open_lines(path, "cat")? {
            println!("{}", line.map_err(|e| ShellError::Exec(format!("cat: {e}")))?);
        }
        Ok(())
    }

    pub(crate) fn builtin_echo(&mut self, argv: &[String]) {
        println!("{}", argv[1..].join(" "));
    }

    pub(crate) fn builtin_grep(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let (pattern, path) = match (argv.get(1), argv.get(2)) {
            (Some(pattern), Some(path)) => (pattern, path),
            _ => return Err(ShellError::Usage("grep <pattern> <file>")),
        };
        for (idx, line) in open_lines(path, "grep")?.enumerate() {
            let line = line.map_err(|e| ShellError::Exec(format!("grep: {e}")))?;
            if line.contains(pattern.as_str()) {
                println!(
                    "{}{}",
                    paint(Color::Magenta, &format!("{}: ", idx + 1)),
                    line
                );
            }
        }
        Ok(())
    }

    pub(crate) fn builtin_wc(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(1).ok_or(ShellError::Usage("wc <file>"))?;
        let (mut lines, mut words, mut chars) = (0usize, 0usize, 0usize);
        for line in open_lines(path, "wc")? {
            let line = line.map_err(|e| ShellError::Exec(format!("wc: {e}")))?;
            lines += 1;
            chars += line.len() + 1;
            words += line.split_whitespace().count();
        }
        println!("{lines} {words} {chars} {path}");
        Ok(())
    }

    pub(crate) fn builtin_head(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(1).ok_or(ShellError::Usage("head <file>"))?;
        for line in open_lines(path, "head")?.take(HEAD_TAIL_LINES) {
            println!("{}", line.map_err(|e| ShellError::Exec(format!("head: {e}")))?);
        }
        Ok(())
    }

    pub(crate) fn builtin_tail(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(1).ok_or(ShellError::Usage("tail <file>"))?;
        let mut window: Vec<String> = Vec::with_capacity(HEAD_TAIL_LINES + 1);
        for line in open_lines(path, "tail")? {
            window.push(line.map_err(|e| ShellError::Exec(format!("tail: {e}")))?);
            if window.len() > HEAD_TAIL_LINES {
                window.remove(0);
            }
        }
        for line in window {
            println!("{line}");
        }
        Ok(())
    }

    /// The `tail -f` branch: hand the terminal to the file follower until
    /// the interrupt flag cancels it.
    pub(crate) fn builtin_tail_follow(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(2).ok_or(ShellError::Usage("tail -f <file>"))?;
        signals::take_interrupt(); // drop any stale flag before blocking
        let result = follow::follow(
            Path::new(path),
            signals::interrupt_flag(),
            &mut io::stdout(),
        );
        signals::take_interrupt();
        result.map_err(|e| ShellError::Exec(format!("tail -f: {e}")))
    }

    pub(crate) fn builtin_sort(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(1).ok_or(ShellError::Usage("sort <file>"))?;
        let mut lines = read_all_lines(path, "sort")?;
        lines.sort();
        for line in lines {
            println!("{line}");
        }
        Ok(())
    }

    pub(crate) fn builtin_uniq(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(1).ok_or(ShellError::Usage("uniq <file>"))?;
        let mut previous: Option<String> = None;
        for line in open_lines(path, "uniq")? {
            let line = line.map_err(|e| ShellError::Exec(format!("uniq: {e}")))?;
            if previous.as_deref() != Some(line.as_str()) {
                println!("{line}");
            }
            previous = Some(line);
        }
        Ok(())
    }

    /// In-place substring replacement with a `.bak` safety copy. The backup
    /// is written before the edit, so a failure mid-edit leaves it behind.
    pub(crate) fn builtin_replace(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let (path, old, new) = match (argv.get(1), argv.get(2), argv.get(3)) {
            (Some(path), Some(old), Some(new)) => (path, old, new),
            _ => return Err(ShellError::Usage("replace <file> <old> <new>")),
        };
        let content = fs::read_to_string(path)
            .map_err(|e| ShellError::Exec(format!("replace: cannot open: {e}")))?;
        let backup = format!("{path}.bak");
        fs::write(&backup, &content).map_err(|e| ShellError::Exec(format!("replace: {e}")))?;
        fs::write(path, content.replace(old.as_str(), new))
            .map_err(|e| ShellError::Exec(format!("replace: {e}")))?;
        println!("replaced (backup -> {backup})");
        Ok(())
    }
}

fn open_lines(
    path: &str,
    command: &str,
) -> Result<impl Iterator<Item = io::Result<String>>, ShellError> {
    let file =
        File::open(path).map_err(|e| ShellError::Exec(format!("{command}: cannot open: {e}")))?;
    Ok(BufReader::new(file).lines())
}

fn read_all_lines(path: &str, command: &str) -> Result<Vec<String>, ShellError> {
    open_lines(path, command)?
        .collect::<io::Result<_>>()
        .map_err(|e| ShellError::Exec(format!("{command}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::Shell;

    fn arg(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn replace_edits_in_place_and_keeps_a_backup() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "old stays old forever").unwrap();
        let path = file.to_str().unwrap();

        let mut shell = Shell::new();
        shell
            .builtin_replace(&arg(&["replace", path, "old", "new"]))
            .unwrap();

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "new stays new forever"
        );
        assert_eq!(
            fs::read_to_string(format!("{path}.bak")).unwrap(),
            "old stays old forever"
        );
    }

    #[test]
    fn replace_on_missing_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let path = path.to_str().unwrap();

        let mut shell = Shell::new();
        let err = shell
            .builtin_replace(&arg(&["replace", path, "a", "b"]))
            .unwrap_err();
        assert!(!err.is_warning());
        assert!(!Path::new(&format!("{path}.bak")).exists());
    }

    #[test]
    fn missing_file_is_an_exec_error_not_a_panic() {
        let mut shell = Shell::new();
        let err = shell
            .builtin_cat(&arg(&["cat", "/definitely/not/here"]))
            .unwrap_err();
        assert!(matches!(err, ShellError::Exec(_)));
    }

    #[test]
    fn tail_follow_requires_a_file_argument() {
        let mut shell = Shell::new();
        assert!(matches!(
            shell.builtin_tail_follow(&arg(&["tail", "-f"])),
            Err(ShellError::Usage(_))
        ));
    }
}
