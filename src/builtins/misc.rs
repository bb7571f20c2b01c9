//! Odds and ends: the calculator, random numbers, digests, and archives.

use std::fs::File;

use sha2::{Digest, Sha256};

use crate::calc;
use crate::display::{paint, Color};
use crate::executor;
use crate::shell::{Shell, ShellError};

impl Shell {
    pub(crate) fn builtin_calc(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let expr = argv.get(1).ok_or(ShellError::Usage("calc \"expression\""))?;
        let result = calc::eval_expr(expr);
        println!("{}", paint(Color::Orange, &result.to_string()));
        Ok(())
    }

    pub(crate) fn builtin_random(&mut self, argv: &[String]) -> Result<(), ShellError> {
        use rand::Rng;

        const USAGE: &str = "random [min] [max] [count]";
        let parse = |idx: usize, default: i64| -> Result<i64, ShellError> {
            match argv.get(idx) {
                Some(raw) => raw.parse().map_err(|_| ShellError::Usage(USAGE)),
                None => Ok(default),
            }
        };
        let min = parse(1, 0)?;
        let max = parse(2, 100)?;
        let count = parse(3, 1)?;
        if min > max || count < 1 {
            return Err(ShellError::Usage(USAGE));
        }

        let mut rng = rand::thread_rng();
        let numbers: Vec<String> = (0..count)
            .map(|_| paint(Color::BrightGreen, &rng.gen_range(min..=max).to_string()))
            .collect();
        println!("{}", numbers.join(" "));
        Ok(())
    }

    pub(crate) fn builtin_hash(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(1).ok_or(ShellError::Usage("hash <file>"))?;
        let mut file =
            File::open(path).map_err(|e| ShellError::Exec(format!("hash: cannot open: {e}")))?;
        let mut hasher = Sha256::new();
        std::io::copy(&mut file, &mut hasher)
            .map_err(|e| ShellError::Exec(format!("hash: {e}")))?;
        println!("{}  {}", hex::encode(hasher.finalize()), path);
        Ok(())
    }

    pub(crate) fn builtin_compress(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let (src, out) = match (argv.get(1), argv.get(2)) {
            (Some(src), Some(out)) => (src, out),
            _ => return Err(ShellError::Usage("compress <file/dir> <out.zip>")),
        };
        executor::run_argv("zip", &["-r", out, src])
            .map_err(|e| ShellError::Exec(format!("compress: {e}")))?;
        Ok(())
    }

    /// Try `unzip` first; when it rejects the archive, fall back to `tar`.
    pub(crate) fn builtin_extract(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let archive = argv.get(1).ok_or(ShellError::Usage("extract <archive>"))?;
        let unzip = executor::run_argv("unzip", &[archive]);
        let unzipped = matches!(unzip, Ok(status) if status.success());
        if !unzipped {
            executor::run_argv("tar", &["-xf", archive])
                .map_err(|e| ShellError::Exec(format!("extract: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::Shell;

    fn arg(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn calc_requires_an_expression() {
        let mut shell = Shell::new();
        assert!(matches!(
            shell.builtin_calc(&arg(&["calc"])),
            Err(ShellError::Usage(_))
        ));
    }

    #[test]
    fn random_rejects_inverted_ranges_and_bad_numbers() {
        let mut shell = Shell::new();
        assert!(matches!(
            shell.builtin_random(&arg(&["random", "9", "1"])),
            Err(ShellError::Usage(_))
        ));
        assert!(matches!(
            shell.builtin_random(&arg(&["random", "x"])),
            Err(ShellError::Usage(_))
        ));
    }

    #[test]
    fn hash_digests_known_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, b"abc").unwrap();

        // Checked against the SHA-256 test vector for "abc".
        let mut hasher = Sha256::new();
        hasher.update(b"abc");
        assert_eq!(
            hex::encode(hasher.finalize()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        let mut shell = Shell::new();
        shell
            .builtin_hash(&arg(&["hash", file.to_str().unwrap()]))
            .unwrap();
    }

    #[test]
    fn hash_on_missing_file_is_an_exec_error() {
        let mut shell = Shell::new();
        assert!(matches!(
            shell.builtin_hash(&arg(&["hash", "/no/such/file"])),
            Err(ShellError::Exec(_))
        ));
    }
}
