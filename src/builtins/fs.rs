//! Filesystem builtins: listing, traversal, and metadata edits.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use crate::display::{paint, Color};
use crate::executor;
use crate::shell::{Shell, ShellError};

impl Shell {
    pub(crate) fn builtin_ls(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let mut target = ".";
        let mut long = false;
        match argv.get(1).map(String::as_str) {
            Some("-l") => {
                long = true;
                if let Some(dir) = argv.get(2) {
                    target = dir;
                }
            }
            Some(dir) => target = dir,
            None => {}
        }

        let mut entries: Vec<fs::DirEntry> = fs::read_dir(target)
            .map_err(|e| ShellError::Exec(format!("ls: {e}")))?
            .filter_map(Result::ok)
            .collect();
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry
                .file_type()
                .map_err(|e| ShellError::Exec(format!("ls: {e}")))?;

            if long {
                let meta = entry
                    .metadata()
                    .map_err(|e| ShellError::Exec(format!("ls: {e}")))?;
                let size = if meta.is_file() { meta.len() } else { 0 };
                let mtime = meta
                    .modified()
                    .map(format_mtime)
                    .unwrap_or_else(|_| "-".to_string());
                print!(
                    "{} {} {} ",
                    paint(Color::Gray, &perms_to_string(mode_of(&meta))),
                    paint(Color::Orange, &format!("{size:>8}")),
                    paint(Color::Gray, &mtime),
                );
            }

            if file_type.is_symlink() {
                println!("{}", paint(Color::Magenta, &name));
            } else if file_type.is_dir() {
                println!("{}", paint(Color::Blue, &name));
            } else if executor::is_executable(&entry.path()) {
                println!("{}", paint(Color::BrightGreen, &name));
            } else {
                println!("{name}");
            }
        }
        Ok(())
    }

    pub(crate) fn builtin_pwd(&mut self) -> Result<(), ShellError> {
        let cwd =
            std::env::current_dir().map_err(|e| ShellError::Exec(format!("pwd: {e}")))?;
        println!("{}", paint(Color::MintGreen, &cwd.display().to_string()));
        Ok(())
    }

    pub(crate) fn builtin_cd(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let dir = argv.get(1).ok_or(ShellError::Usage("cd <dir>"))?;
        std::env::set_current_dir(dir).map_err(|e| ShellError::Exec(format!("cd: {e}")))
    }

    pub(crate) fn builtin_mkdir(&mut self, argv: &[String]) -> Result<(), ShellError> {
        match argv.get(1).map(String::as_str) {
            Some("-p") => {
                let path = argv.get(2).ok_or(ShellError::Usage("mkdir -p <path>"))?;
                fs::create_dir_all(path).map_err(|e| ShellError::Exec(format!("mkdir: {e}")))?;
            }
            Some(path) => {
                fs::create_dir(path).map_err(|e| ShellError::Exec(format!("mkdir: {e}")))?;
            }
            None => return Err(ShellError::Usage("mkdir [-p] <dir>")),
        }
        println!("created");
        Ok(())
    }

    pub(crate) fn builtin_rm(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(1).ok_or(ShellError::Usage("rm <file>"))?;
        let target = Path::new(path);
        let removed = if target.is_dir() {
            fs::remove_dir(target)
        } else {
            fs::remove_file(target)
        };
        removed.map_err(|e| ShellError::Exec(format!("rm: {e}")))?;
        println!("removed");
        Ok(())
    }

    pub(crate) fn builtin_rmdir(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(1).ok_or(ShellError::Usage("rmdir <dir>"))?;
        let mut entries: u64 = 0;
        walk(Path::new(path), &mut |_| entries += 1)
            .map_err(|e| ShellError::Exec(format!("rmdir: {e}")))?;
        fs::remove_dir_all(path).map_err(|e| ShellError::Exec(format!("rmdir: {e}")))?;
        println!("removed {} entries", entries + 1);
        Ok(())
    }

    pub(crate) fn builtin_touch(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(1).ok_or(ShellError::Usage("touch <file>"))?;
        fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| ShellError::Exec(format!("touch: cannot create: {e}")))?;
        Ok(())
    }

    pub(crate) fn builtin_cp(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let (src, dst) = match (argv.get(1), argv.get(2)) {
            (Some(src), Some(dst)) => (src, dst),
            _ => return Err(ShellError::Usage("cp <src> <dst>")),
        };
        copy_recursive(Path::new(src), Path::new(dst))
            .map_err(|e| ShellError::Exec(format!("cp: {e}")))?;
        println!("copied");
        Ok(())
    }

    pub(crate) fn builtin_mv(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let (src, dst) = match (argv.get(1), argv.get(2)) {
            (Some(src), Some(dst)) => (src, dst),
            _ => return Err(ShellError::Usage("mv <src> <dst>")),
        };
        fs::rename(src, dst).map_err(|e| ShellError::Exec(format!("mv: {e}")))?;
        println!("moved");
        Ok(())
    }

    pub(crate) fn builtin_ln(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let (target, link) = match (argv.get(1), argv.get(2)) {
            (Some(target), Some(link)) => (target, link),
            _ => return Err(ShellError::Usage("ln <target> <link>")),
        };
        make_symlink(target, link).map_err(|e| ShellError::Exec(format!("ln: {e}")))?;
        println!("symlink created");
        Ok(())
    }

    pub(crate) fn builtin_chmod(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let (digits, path) = match (argv.get(1), argv.get(2)) {
            (Some(digits), Some(path)) => (digits, path),
            _ => return Err(ShellError::Usage("chmod <octal> <file>")),
        };
        let mode = parse_octal_mode(digits).ok_or(ShellError::Usage("chmod <octal> <file>"))?;
        set_mode(path, mode).map_err(|e| ShellError::Exec(format!("chmod: {e}")))
    }

    pub(crate) fn builtin_stat(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let path = argv.get(1).ok_or(ShellError::Usage("stat <file>"))?;
        let target = Path::new(path);
        if !target.exists() {
            return Err(ShellError::NotFound("stat: not found".to_string()));
        }
        let meta = fs::metadata(target).map_err(|e| ShellError::Exec(format!("stat: {e}")))?;
        let size = if meta.is_file() {
            meta.len().to_string()
        } else {
            "-".to_string()
        };
        let kind = if meta.is_dir() {
            "directory"
        } else if meta.is_file() {
            "file"
        } else {
            "other"
        };
        let mtime = meta
            .modified()
            .map(format_mtime)
            .unwrap_or_else(|_| "-".to_string());
        println!("{}{}", paint(Color::Gray, "path: "), target.display());
        println!("{}{}", paint(Color::Gray, "size: "), size);
        println!("{}{}", paint(Color::Gray, "type: "), kind);
        println!(
            "{}{}",
            paint(Color::Gray, "perm: "),
            perms_to_string(mode_of(&meta))
        );
        println!("{}{}", paint(Color::Gray, "mtime: "), mtime);
        Ok(())
    }

    pub(crate) fn builtin_du(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let target = argv.get(1).map(String::as_str).unwrap_or(".");
        let mut total: u64 = 0;
        walk(Path::new(target), &mut |entry| {
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                total += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        })
        .map_err(|e| ShellError::Exec(format!("du: {e}")))?;
        println!("{}K\t{}", total / 1024, target);
        Ok(())
    }

    pub(crate) fn builtin_count(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let target = argv.get(1).map(String::as_str).unwrap_or(".");
        let (mut files, mut dirs) = (0u64, 0u64);
        walk(Path::new(target), &mut |entry| {
            match entry.file_type() {
                Ok(t) if t.is_dir() => dirs += 1,
                Ok(t) if t.is_file() => files += 1,
                _ => {}
            }
        })
        .map_err(|e| ShellError::Exec(format!("count: {e}")))?;
        println!(
            "{}{}    {}{}",
            paint(Color::Cyan, "files: "),
            files,
            paint(Color::Cyan, "dirs: "),
            dirs
        );
        Ok(())
    }

    pub(crate) fn builtin_find(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let target = argv.get(1).map(String::as_str).unwrap_or(".");
        walk(Path::new(target), &mut |entry| {
            println!("{}", entry.path().display());
        })
        .map_err(|e| ShellError::Exec(format!("find: {e}")))
    }

    pub(crate) fn builtin_tree(&mut self, argv: &[String]) -> Result<(), ShellError> {
        let target = argv.get(1).map(String::as_str).unwrap_or(".");
        println!("{target}");
        print_tree(Path::new(target), "").map_err(|e| ShellError::Exec(format!("tree: {e}")))
    }
}

/// Depth-first walk calling `visit` on every entry under `dir`. Symlinked
/// directories are not descended into.
fn walk(dir: &Path, visit: &mut dyn FnMut(&fs::DirEntry)) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        visit(&entry);
        if entry.file_type()?.is_dir() {
            walk(&entry.path(), visit)?;
        }
    }
    Ok(())
}

fn copy_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        fs::create_dir_all(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &dst.join(entry.file_name()))?;
        }
    } else {
        fs::copy(src, dst)?;
    }
    Ok(())
}

/// Sorted tree view, directories first, in the usual box-drawing layout.
fn print_tree(root: &Path, prefix: &str) -> io::Result<()> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        } else {
            files.push(entry.path());
        }
    }
    dirs.sort();
    files.sort();

    for (i, dir) in dirs.iter().enumerate() {
        let last = i + 1 == dirs.len() && files.is_empty();
        let name = dir.file_name().unwrap_or_default().to_string_lossy();
        println!(
            "{prefix}{}{}",
            if last { "└── " } else { "├── " },
            paint(Color::Blue, &name)
        );
        let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
        print_tree(dir, &child_prefix)?;
    }
    for (i, file) in files.iter().enumerate() {
        let last = i + 1 == files.len();
        let name = file.file_name().unwrap_or_default().to_string_lossy();
        println!("{prefix}{}{}", if last { "└── " } else { "├── " }, name);
    }
    Ok(())
}

/// Accept `755`, `0755`, or longer strings whose last three digits carry the
/// owner/group/other bits.
fn parse_octal_mode(digits: &str) -> Option<u32> {
    let mut s = digits.strip_prefix('0').unwrap_or(digits).to_string();
    while s.len() < 3 {
        s.insert(0, '0');
    }
    let tail: Vec<u32> = s
        .chars()
        .skip(s.len() - 3)
        .map(|c| c.to_digit(8))
        .collect::<Option<_>>()?;
    Some(tail[0] << 6 | tail[1] << 3 | tail[2])
}

pub(crate) fn format_mtime(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(unix)]
fn mode_of(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

#[cfg(not(unix))]
fn mode_of(_meta: &fs::Metadata) -> u32 {
    0
}

fn perms_to_string(mode: u32) -> String {
    let mut s = String::with_capacity(9);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        s.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        s.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        s.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    s
}

#[cfg(unix)]
fn set_mode(path: &str, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &str, _mode: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "permission bits are unix-only",
    ))
}

#[cfg(unix)]
fn make_symlink(target: &str, link: &str) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn make_symlink(_target: &str, _link: &str) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are unix-only",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::Shell;

    fn arg(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn touch_then_rm_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("new.txt");
        let file = file.to_str().unwrap();
        let mut shell = Shell::new();

        shell.builtin_touch(&arg(&["touch", file])).unwrap();
        assert!(Path::new(file).exists());
        shell.builtin_rm(&arg(&["rm", file])).unwrap();
        assert!(!Path::new(file).exists());
    }

    #[test]
    fn mkdir_p_creates_nested_paths() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        let mut shell = Shell::new();
        shell
            .builtin_mkdir(&arg(&["mkdir", "-p", nested.to_str().unwrap()]))
            .unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn cp_copies_directories_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("inner")).unwrap();
        fs::write(src.join("inner/f.txt"), "data").unwrap();
        let dst = dir.path().join("dst");

        let mut shell = Shell::new();
        shell
            .builtin_cp(&arg(&[
                "cp",
                src.to_str().unwrap(),
                dst.to_str().unwrap(),
            ]))
            .unwrap();
        assert_eq!(fs::read_to_string(dst.join("inner/f.txt")).unwrap(), "data");
    }

    #[test]
    fn rmdir_removes_tree() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("t");
        fs::create_dir_all(target.join("sub")).unwrap();
        fs::write(target.join("sub/f"), "x").unwrap();

        let mut shell = Shell::new();
        shell
            .builtin_rmdir(&arg(&["rmdir", target.to_str().unwrap()]))
            .unwrap();
        assert!(!target.exists());
    }

    #[test]
    fn missing_args_are_usage_errors() {
        let mut shell = Shell::new();
        assert!(matches!(
            shell.builtin_cd(&arg(&["cd"])),
            Err(ShellError::Usage(_))
        ));
        assert!(matches!(
            shell.builtin_cp(&arg(&["cp", "only-src"])),
            Err(ShellError::Usage(_))
        ));
    }

    #[test]
    fn octal_mode_parsing_matches_chmod_conventions() {
        assert_eq!(parse_octal_mode("755"), Some(0o755));
        assert_eq!(parse_octal_mode("0644"), Some(0o644));
        assert_eq!(parse_octal_mode("7"), Some(0o007));
        assert_eq!(parse_octal_mode("abc"), None);
    }

    #[cfg(unix)]
    #[test]
    fn chmod_applies_the_requested_bits() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, "x").unwrap();

        let mut shell = Shell::new();
        shell
            .builtin_chmod(&arg(&["chmod", "600", file.to_str().unwrap()]))
            .unwrap();
        let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn perms_render_as_rwx_triplets() {
        assert_eq!(perms_to_string(0o755), "rwxr-xr-x");
        assert_eq!(perms_to_string(0o600), "rw-------");
    }
}
