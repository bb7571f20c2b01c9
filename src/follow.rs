//! Polling file follower for `tail -f`.
//!
//! Two phases: catch-up (replay the trailing window of the file) and follow
//! (poll for appended lines until cancelled). This is a plain polling loop,
//! not an OS-level change notification.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Wait between end-of-file checks while following.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// At most this many trailing bytes are replayed on attach.
pub const REPLAY_BYTES: u64 = 4096;

/// Stream `path` to `out`: replay the trailing window, then keep emitting
/// appended lines until `cancel` is set.
///
/// The cancel flag is checked once per poll cycle, and the function returns
/// `Ok(())` to its caller when it is set, so the interpreter loop resumes
/// after a cancelled follow. Only whole lines are emitted: a read that ends
/// before a newline (the writer is mid-append) is rewound and retried on the
/// next cycle. For a file that is only appended to, every appended line is
/// emitted exactly once, in order; truncating or rewriting the file during a
/// follow is not supported.
pub fn follow<W: Write>(path: &Path, cancel: &AtomicBool, out: &mut W) -> io::Result<()> {
    let file = File::open(path)?;
    let start = file.metadata()?.len().saturating_sub(REPLAY_BYTES);
    let mut reader = BufReader::new(file);
    reader.seek(SeekFrom::Start(start))?;

    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            if cancel.load(Ordering::SeqCst) {
                return Ok(());
            }
            thread::sleep(POLL_INTERVAL);
        } else if line.ends_with('\n') {
            out.write_all(line.as_bytes())?;
            out.flush()?;
        } else {
            // Partial line at end of file; rewind and pick it up whole once
            // the newline lands.
            reader.seek(SeekFrom::Current(-(read as i64)))?;
            if cancel.load(Ordering::SeqCst) {
                return Ok(());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write as _;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Test sink the follower thread and the assertions can share.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn append(path: &PathBuf, text: &str) {
        let mut f = OpenOptions::new().append(true).open(path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
    }

    fn settle() {
        // Comfortably more than one poll interval.
        thread::sleep(Duration::from_millis(600));
    }

    fn start_follower(
        path: &PathBuf,
    ) -> (SharedBuf, Arc<AtomicBool>, thread::JoinHandle<io::Result<()>>) {
        let out = SharedBuf::default();
        let cancel = Arc::new(AtomicBool::new(false));
        let handle = {
            let path = path.clone();
            let cancel = Arc::clone(&cancel);
            let mut out = out.clone();
            thread::spawn(move || follow(&path, &cancel, &mut out))
        };
        (out, cancel, handle)
    }

    #[test]
    fn catches_up_then_emits_appends_without_duplication() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log");
        std::fs::write(&path, "A\nB\n").unwrap();

        let (out, cancel, handle) = start_follower(&path);
        settle();
        assert_eq!(out.contents(), "A\nB\n");

        append(&path, "C\n");
        settle();
        assert_eq!(out.contents(), "A\nB\nC\n");

        cancel.store(true, Ordering::SeqCst);
        handle.join().unwrap().unwrap();
        assert_eq!(out.contents(), "A\nB\nC\n");
    }

    #[test]
    fn partial_lines_are_held_until_the_newline_lands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log");
        std::fs::write(&path, "A\n").unwrap();

        let (out, cancel, handle) = start_follower(&path);
        settle();
        append(&path, "Be");
        settle();
        assert_eq!(out.contents(), "A\n", "incomplete line must not be emitted");

        append(&path, "e\n");
        settle();
        assert_eq!(out.contents(), "A\nBee\n");

        cancel.store(true, Ordering::SeqCst);
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn attach_replays_at_most_the_trailing_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log");
        let mut content = String::new();
        for i in 0..800 {
            content.push_str(&format!("line-{i:04}\n"));
        }
        std::fs::write(&path, &content).unwrap();

        let (out, cancel, handle) = start_follower(&path);
        settle();
        cancel.store(true, Ordering::SeqCst);
        handle.join().unwrap().unwrap();

        let got = out.contents();
        assert!(got.len() as u64 <= REPLAY_BYTES);
        assert!(got.ends_with("line-0799\n"));
        assert!(!got.contains("line-0000"));
    }

    #[test]
    fn missing_file_fails_with_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let cancel = AtomicBool::new(true);
        let mut out = Vec::new();
        assert!(follow(&path, &cancel, &mut out).is_err());
    }
}
