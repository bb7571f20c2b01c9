//! Session builtins: help, the history log, aliases, and bookmarks.

use std::path::PathBuf;

use crate::display::{paint, Color};
use crate::shell::{Shell, ShellError};

impl Shell {
    pub(crate) fn builtin_help(&mut self) {
        print!("{}", paint(Color::Cyan, "Commands (mint look):\n"));
        print!(
            "  help, exit, quit           - this message / quit\n\
             \x20 ls [dir]                   - list directory\n\
             \x20 ls -l [dir]                - long listing (permissions, size, mtime)\n\
             \x20 pwd                        - print working dir\n\
             \x20 cd <dir>                   - change dir\n\
             \x20 cat <file>                 - show file\n\
             \x20 edit <file>                - open file with $EDITOR/code/nano\n\
             \x20 echo <text>                - print text\n\
             \x20 history                    - show command history\n\
             \x20 history -c                 - clear history\n\
             \x20 grep <pat> <file>          - search for pattern in file\n\
             \x20 wc <file>                  - count lines/words/chars\n\
             \x20 head <file>                - first 10 lines\n\
             \x20 tail <file>                - last 10 lines\n\
             \x20 tail -f <file>             - follow appended writes (Ctrl-C to stop)\n\
             \x20 chmod <octal> <file>       - change permissions (e.g. 755)\n\
             \x20 ln <target> <link>         - create symbolic link\n\
             \x20 du [dir]                   - disk usage (simple)\n\
             \x20 sort <file>                - sort file lines\n\
             \x20 uniq <file>                - unique adjacent lines\n\
             \x20 tree [dir]                 - tree view (simple)\n\
             \x20 mkdir [-p] <dir>           - create directory\n\
             \x20 rm <file> / rmdir <dir>    - remove file / remove tree\n\
             \x20 touch <file>               - create empty file\n\
             \x20 cp <src> <dst>             - copy (recursive)\n\
             \x20 mv <src> <dst>             - move/rename\n\
             \x20 find [dir]                 - list tree recursively\n\
             \x20 ps                         - process list\n\
             \x20 df                         - disk/free info\n\
             \x20 whoami                     - current user\n\
             \x20 date                       - show date/time\n\
             \x20 clear                      - clear screen\n\
             \x20 which <cmd>                - find executable in PATH\n\
             \x20 open <file>                - open with default application\n\
             \x20 env                        - show environment variables\n\
             \x20 setenv NAME VALUE          - set environment variable\n\
             \x20 stat <file>                - show file metadata\n\
             \x20 count [dir]                - count files and directories (recursive)\n\
             \x20 alias name='command'       - create alias\n\
             \x20 unalias name               - remove alias\n\
             \x20 aliases                    - list aliases\n\
             \x20 bookmark <name>            - save cwd under <name>\n\
             \x20 bookmarks                  - list bookmarks\n\
             \x20 unbookmark <name>          - remove bookmark\n\
             \x20 goto <name>                - cd to bookmark\n\
             \x20 replace <file> <old> <new> - in-file simple replace (creates .bak)\n\
             \x20 uptime                     - show system uptime\n\
             \x20 ping <host> [-c N]         - wrapper around system ping\n\
             \x20 hash <file>                - show SHA-256 of file\n\
             \x20 compress <file> <out.zip>  - wrapper to create archive\n\
             \x20 extract <archive>          - extract archive (unzip/tar)\n\
             \x20 top                        - launch top/htop\n\
             \x20 net                        - show network interfaces\n\
             \x20 notify <message>           - desktop notification\n\
             \x20 calc \"expr\"               - simple calculator (+ - * / parentheses)\n\
             \x20 random [min] [max] [count] - generate integers\n"
        );
    }

    pub(crate) fn builtin_history(&mut self, argv: &[String]) {
        if argv.get(1).map(String::as_str) == Some("-c") {
            self.session.clear_history();
            println!("history cleared");
            return;
        }
        for (idx, line) in self.session.history().iter().enumerate() {
            println!("{}  {}", idx + 1, line);
        }
    }

    pub(crate) fn builtin_alias(&mut self, argv: &[String]) -> Result<(), ShellError> {
        if argv.len() < 2 {
            return Err(ShellError::Usage("alias name='command'"));
        }
        // The definition may have been split by the tokenizer; the raw text
        // is the arguments joined back with single spaces.
        let definition = argv[1..].join(" ");
        let Some((name, value)) = definition.split_once('=') else {
            return Err(ShellError::Usage("alias name='command'"));
        };
        let value = strip_wrapping_quotes(value);
        self.session.aliases.define(name, value);
        println!("alias {} -> {}", paint(Color::MintGreen, name), value);
        Ok(())
    }

    pub(crate) fn builtin_unalias(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let name = argv.get(1).ok_or(ShellError::Usage("unalias name"))?;
        if !self.session.aliases.remove(name) {
            return Err(ShellError::NotFound("unalias: not found".to_string()));
        }
        println!("unalias: removed");
        Ok(())
    }

    pub(crate) fn builtin_aliases(&mut self) {
        for (name, value) in self.session.aliases.iter() {
            println!("{}='{}'", paint(Color::MintGreen, name), value);
        }
    }

    pub(crate) fn builtin_bookmark(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let name = argv.get(1).ok_or(ShellError::Usage("bookmark <name>"))?;
        let cwd = std::env::current_dir()
            .map_err(|e| ShellError::Exec(format!("bookmark: {e}")))?;
        println!(
            "bookmarked {} -> {}",
            paint(Color::MintGreen, name),
            cwd.display()
        );
        self.session.set_bookmark(name, cwd);
        Ok(())
    }

    pub(crate) fn builtin_bookmarks(&mut self) {
        if !self.session.has_bookmarks() {
            println!("{}", paint(Color::Gray, "(no bookmarks)"));
            return;
        }
        for (name, path) in self.session.bookmarks() {
            println!("{} -> {}", paint(Color::MintGreen, name), path.display());
        }
    }

    pub(crate) fn builtin_unbookmark(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let name = argv.get(1).ok_or(ShellError::Usage("unbookmark <name>"))?;
        if !self.session.remove_bookmark(name) {
            return Err(ShellError::NotFound("unbookmark: not found".to_string()));
        }
        println!("removed");
        Ok(())
    }

    /// Change directory to a saved bookmark. The path is resolved now, not
    /// at bookmark time, so a stale bookmark fails here and leaves the
    /// working directory unchanged.
    pub(crate) fn builtin_goto(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let name = argv.get(1).ok_or(ShellError::Usage("goto <name>"))?;
        let path: PathBuf = self
            .session
            .bookmark(name)
            .ok_or_else(|| ShellError::NotFound("goto: not found".to_string()))?
            .to_path_buf();
        std::env::set_current_dir(&path).map_err(|e| ShellError::Exec(format!("goto: {e}")))?;
        println!(
            "cwd -> {}",
            paint(Color::MintGreen, &path.display().to_string())
        );
        Ok(())
    }
}

/// Strip one layer of matching quotes from an alias value, if present.
fn strip_wrapping_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
