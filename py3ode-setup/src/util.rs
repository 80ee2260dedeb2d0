use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

pub fn join_paths_for_env(paths: &[PathBuf]) -> Option<String> {
    std::env::join_paths(paths)
        .ok()
        .map(|v| v.to_string_lossy().into_owned())
}

/// Split tool output on whitespace. Quoting is not interpreted.
pub fn split_args(output: &str) -> Vec<String> {
    output.split_whitespace().map(str::to_string).collect()
}

/// Files directly under `dir` whose extension is `ext`, sorted by name.
///
/// Hidden files (leading `.`) are skipped. A missing directory yields an
/// empty list.
pub fn files_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(dir, e)),
    };

    let mut files = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let p = entry.path();
        if p.is_file() && p.extension().is_some_and(|e| e == ext) {
            files.push(p);
        }
    }
    files.sort();
    Ok(files)
}

/// Recursively copy every file under `from` into `to`.
pub fn copy_dir_all(from: &Path, to: &Path) -> Result<usize> {
    fs::create_dir_all(to).map_err(|e| Error::io(to, e))?;
    let mut copied = 0usize;
    for entry in fs::read_dir(from).map_err(|e| Error::io(from, e))? {
        let entry = entry.map_err(|e| Error::io(from, e))?;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        if src.is_dir() {
            copied += copy_dir_all(&src, &dst)?;
        } else {
            fs::copy(&src, &dst).map_err(|e| Error::io(&src, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_args_ignores_repeated_whitespace() {
        assert_eq!(
            split_args("  -I/usr/include \n -DdDOUBLE\t"),
            vec!["-I/usr/include".to_string(), "-DdDOUBLE".to_string()]
        );
        assert!(split_args("").is_empty());
    }

    #[test]
    fn files_with_extension_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pyx", "a.pyx", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pyx")).unwrap();

        let found = files_with_extension(dir.path(), "pyx").unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pyx", "b.pyx"]);
    }

    #[test]
    fn files_with_extension_skips_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ode.pyx"), "").unwrap();
        fs::write(dir.path().join(".ode.pyx.swp.pyx"), "").unwrap();
        fs::write(dir.path().join(".hidden.pyx"), "").unwrap();

        let found = files_with_extension(dir.path(), "pyx").unwrap();
        assert_eq!(found, vec![dir.path().join("ode.pyx")]);
    }

    #[test]
    fn files_with_extension_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let found = files_with_extension(&dir.path().join("missing"), "pyx").unwrap();
        assert!(found.is_empty());
    }
}
