//! The dispatch engine: one line in, exactly one action out.

use std::time::Instant;

use thiserror::Error;

use crate::alias;
use crate::builtins::Builtin;
use crate::executor;
use crate::lexer::split_line;
use crate::session::Session;

/// The uniform error contract for command handlers.
///
/// Every error is reported at the prompt and the loop continues; nothing in
/// here ever terminates the interpreter.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Missing or malformed arguments to a builtin. The command aborts with
    /// no side effects beyond this message.
    #[error("usage: {0}")]
    Usage(&'static str),
    /// A lookup miss (unknown alias, bookmark, user). Reported softly.
    #[error("{0}")]
    NotFound(String),
    /// A builtin failed mid-flight; the message carries the command name and
    /// the underlying OS error text.
    #[error("{0}")]
    Exec(String),
    /// The external-process fallback could not start the host interpreter.
    #[error("failed to run: {0}")]
    Spawn(String),
}

impl ShellError {
    /// Usage notes and lookup misses are warnings; the rest are errors.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Usage(_) | Self::NotFound(_))
    }
}

/// What the interpreter loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// The shell: session state plus the dispatch machinery. One instance per
/// process, owned by the single interpreter thread.
pub struct Shell {
    pub session: Session,
    pub(crate) started: Instant,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Shell {
            session: Session::new(),
            started: Instant::now(),
        }
    }

    /// Execute one raw input line to completion.
    ///
    /// The line goes through the alias pass, is tokenized, dispatched, and
    /// finally appended to the history log exactly as dispatched. Errors are
    /// returned for the caller to report; the only state they leave behind
    /// is whatever had already completed (e.g. `replace` keeps its backup).
    pub fn execute_line(&mut self, raw: &str) -> Result<Outcome, ShellError> {
        let line = alias::substitute(raw, &self.session.aliases);
        let argv = split_line(&line);
        let Some(first) = argv.first() else {
            return Ok(Outcome::Continue);
        };

        let builtin = Builtin::lookup(first);
        let result = self.dispatch(builtin, &argv, &line);

        // The log keeps what was dispatched, not what was typed. A line that
        // just cleared the log is not retained, so `history` right after
        // `history -c` prints nothing.
        let cleared_log = builtin == Some(Builtin::History)
            && argv.get(1).map(String::as_str) == Some("-c");
        if !cleared_log {
            self.session.record(&line);
        }
        result
    }

    /// Route a tokenized line to its handler, or fall through to the host
    /// interpreter with the verbatim line. A recognized name always
    /// terminates handling here, whatever its handler does.
    fn dispatch(
        &mut self,
        builtin: Option<Builtin>,
        argv: &[String],
        line: &str,
    ) -> Result<Outcome, ShellError> {
        let Some(builtin) = builtin else {
            executor::run_line(line)?;
            return Ok(Outcome::Continue);
        };

        match builtin {
            Builtin::Exit => return Ok(Outcome::Exit),
            Builtin::Help => self.builtin_help(),
            Builtin::Ls => self.builtin_ls(argv)?,
            Builtin::Pwd => self.builtin_pwd()?,
            Builtin::Cd => self.builtin_cd(argv)?,
            Builtin::Cat => self.builtin_cat(argv)?,
            Builtin::Edit => self.builtin_edit(argv)?,
            Builtin::Mkdir => self.builtin_mkdir(argv)?,
            Builtin::Rm => self.builtin_rm(argv)?,
            Builtin::Rmdir => self.builtin_rmdir(argv)?,
            Builtin::Touch => self.builtin_touch(argv)?,
            Builtin::Cp => self.builtin_cp(argv)?,
            Builtin::Mv => self.builtin_mv(argv)?,
            Builtin::Find => self.builtin_find(argv)?,
            Builtin::Tree => self.builtin_tree(argv)?,
            Builtin::Ps => self.builtin_ps()?,
            Builtin::Df => self.builtin_df()?,
            Builtin::Whoami => self.builtin_whoami()?,
            Builtin::Date => self.builtin_date(),
            Builtin::Clear => self.builtin_clear(),
            Builtin::Echo => self.builtin_echo(argv),
            Builtin::Grep => self.builtin_grep(argv)?,
            Builtin::Wc => self.builtin_wc(argv)?,
            Builtin::Head => self.builtin_head(argv)?,
            // `tail -f` is a dispatch-time branch, not a separate command:
            // the second token selects the follower over the static handler.
            Builtin::Tail => {
                if argv.get(1).map(String::as_str) == Some("-f") {
                    self.builtin_tail_follow(argv)?
                } else {
                    self.builtin_tail(argv)?
                }
            }
            Builtin::Chmod => self.builtin_chmod(argv)?,
            Builtin::Ln => self.builtin_ln(argv)?,
            Builtin::Du => self.builtin_du(argv)?,
            Builtin::Sort => self.builtin_sort(argv)?,
            Builtin::Uniq => self.builtin_uniq(argv)?,
            Builtin::History => self.builtin_history(argv),
            Builtin::Which => self.builtin_which(argv)?,
            Builtin::Open => self.builtin_open(argv)?,
            Builtin::Env => self.builtin_env(),
            Builtin::Setenv => self.builtin_setenv(argv)?,
            Builtin::Stat => self.builtin_stat(argv)?,
            Builtin::Count => self.builtin_count(argv)?,
            Builtin::Alias => self.builtin_alias(argv)?,
            Builtin::Unalias => self.builtin_unalias(argv)?,
            Builtin::Aliases => self.builtin_aliases(),
            Builtin::Uptime => self.builtin_uptime(),
            Builtin::Ping => self.builtin_ping(argv)?,
            Builtin::Hash => self.builtin_hash(argv)?,
            Builtin::Compress => self.builtin_compress(argv)?,
            Builtin::Extract => self.builtin_extract(argv)?,
            Builtin::Calc => self.builtin_calc(argv)?,
            Builtin::Random => self.builtin_random(argv)?,
            Builtin::Bookmark => self.builtin_bookmark(argv)?,
            Builtin::Bookmarks => self.builtin_bookmarks(),
            Builtin::Unbookmark => self.builtin_unbookmark(argv)?,
            Builtin::Goto => self.builtin_goto(argv)?,
            Builtin::Replace => self.builtin_replace(argv)?,
            Builtin::Top => self.builtin_top()?,
            Builtin::Net => self.builtin_net()?,
            Builtin::Notify => self.builtin_notify(argv)?,
        }
        Ok(Outcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests that touch the process-wide working directory take this lock.
    static CWD_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn empty_line_is_a_no_op() {
        let mut shell = Shell::new();
        assert_eq!(shell.execute_line("   ").unwrap(), Outcome::Continue);
        assert!(shell.session.history().is_empty());
    }

    #[test]
    fn exit_and_quit_stop_the_loop() {
        let mut shell = Shell::new();
        assert_eq!(shell.execute_line("exit").unwrap(), Outcome::Exit);
        assert_eq!(shell.execute_line("quit").unwrap(), Outcome::Exit);
    }

    #[test]
    fn history_numbers_lines_in_dispatch_order() {
        let mut shell = Shell::new();
        shell.execute_line("echo a").unwrap();
        shell.execute_line("echo b").unwrap();
        assert_eq!(shell.session.history(), ["echo a", "echo b"]);
    }

    #[test]
    fn history_records_the_post_substitution_text() {
        let mut shell = Shell::new();
        shell.session.aliases.define("say", "echo");
        shell.execute_line("say hello").unwrap();
        assert_eq!(shell.session.history(), ["echo hello"]);
    }

    #[test]
    fn clearing_history_does_not_retain_the_clearing_line() {
        let mut shell = Shell::new();
        shell.execute_line("echo a").unwrap();
        shell.execute_line("history -c").unwrap();
        assert!(shell.session.history().is_empty());
    }

    #[test]
    fn usage_errors_still_record_the_line() {
        let mut shell = Shell::new();
        let err = shell.execute_line("cd").unwrap_err();
        assert!(err.is_warning());
        assert_eq!(shell.session.history(), ["cd"]);
    }

    #[test]
    fn builtins_never_reach_the_fallback() {
        // `echo` resolves in the table; an unknown word does not.
        assert!(Builtin::lookup("echo").is_some());
        assert!(Builtin::lookup("uname").is_none());
    }

    #[test]
    fn bookmark_set_goto_restores_directory() {
        let _guard = CWD_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().canonicalize().unwrap();
        let mut shell = Shell::new();
        shell.session.set_bookmark("work", target.clone());

        let before = std::env::current_dir().unwrap();
        shell.execute_line("goto work").unwrap();
        assert_eq!(std::env::current_dir().unwrap(), target);
        std::env::set_current_dir(before).unwrap();
    }

    #[test]
    fn goto_missing_bookmark_is_a_soft_error() {
        let _guard = CWD_LOCK.lock().unwrap();
        let mut shell = Shell::new();
        let before = std::env::current_dir().unwrap();
        let err = shell.execute_line("goto missing").unwrap_err();
        assert!(err.is_warning());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}
