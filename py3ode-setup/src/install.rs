//! Copying a finished build into site-packages.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    error::{Error, Result},
    metadata::PackageMetadata,
    util,
};

/// Copy everything staged in `lib_dir` into `target_dir` and record the
/// distribution with an egg-info file. Returns the paths written.
pub fn install_tree(
    lib_dir: &Path,
    target_dir: &Path,
    metadata: &PackageMetadata,
    python_version: &str,
) -> Result<Vec<PathBuf>> {
    if !lib_dir.is_dir() {
        return Err(Error::io(
            lib_dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "nothing has been built"),
        ));
    }
    fs::create_dir_all(target_dir).map_err(|e| Error::io(target_dir, e))?;

    let mut written = Vec::new();
    for entry in fs::read_dir(lib_dir).map_err(|e| Error::io(lib_dir, e))? {
        let entry = entry.map_err(|e| Error::io(lib_dir, e))?;
        let src = entry.path();
        let dst = target_dir.join(entry.file_name());
        if src.is_dir() {
            util::copy_dir_all(&src, &dst)?;
        } else {
            fs::copy(&src, &dst).map_err(|e| Error::io(&src, e))?;
        }
        info!("copying {} -> {}", src.display(), target_dir.display());
        written.push(dst);
    }

    let egg_info = target_dir.join(egg_info_name(metadata, python_version));
    fs::write(&egg_info, metadata.pkg_info()).map_err(|e| Error::io(&egg_info, e))?;
    info!("Writing {}", egg_info.display());
    written.push(egg_info);

    Ok(written)
}

/// `<name>-<version>-py<X.Y>.egg-info`
pub fn egg_info_name(metadata: &PackageMetadata, python_version: &str) -> String {
    format!("{}-py{python_version}.egg-info", metadata.fullname())
}
