//! Source archive (`sdist`).
//!
//! Both generated variants ship in the archive so the module can be built
//! where Cython is not installed.

use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use flate2::{Compression, write::GzEncoder};
use log::{debug, info};

use crate::{
    config::{BuildConfig, CONFIG_FILE},
    error::{Error, Result},
    generate::{FRAGMENT_DIR, FRAGMENT_EXT, SWITCH_FILE, Variant},
    util,
};

/// Top-level files copied when present.
const OPTIONAL_FILES: [&str; 8] = [
    "AUTHORS",
    "README.md",
    "README.txt",
    "LICENSE",
    "ChangeLog",
    "install_ode.sh",
    SWITCH_FILE,
    CONFIG_FILE,
];

type Archive = tar::Builder<GzEncoder<fs::File>>;

/// Write `<dist_dir>/<name>-<version>.tar.gz` and return its path.
pub fn sdist(cfg: &BuildConfig, dist_dir: &Path) -> Result<PathBuf> {
    let fullname = cfg.metadata.fullname();
    let ar_path = dist_dir.join(format!("{fullname}.tar.gz"));
    fs::create_dir_all(dist_dir).map_err(|e| Error::io(dist_dir, e))?;

    let root = PathBuf::from(&fullname);
    let io_err = |e: std::io::Error| Error::io(&ar_path, e);

    let tar_file = fs::File::create(&ar_path).map_err(io_err)?;
    let mut archive = tar::Builder::new(GzEncoder::new(tar_file, Compression::best()));

    append_text(&mut archive, &root.join("PKG-INFO"), &cfg.metadata.pkg_info())
        .map_err(io_err)?;

    for variant in Variant::ALL {
        let src = cfg.project_path(variant.output_name());
        if !src.is_file() {
            return Err(Error::MissingSource { path: src });
        }
        append_file(&mut archive, &src, &root.join(variant.output_name()))?;
    }

    let fragments =
        util::files_with_extension(&cfg.project_path(FRAGMENT_DIR), FRAGMENT_EXT)?;
    append_all(&mut archive, &fragments, &root.join(FRAGMENT_DIR))?;

    for package in &cfg.metadata.packages {
        let files = util::files_with_extension(&cfg.project_path(package), "py")?;
        append_all(&mut archive, &files, &root.join(package))?;
    }

    for name in OPTIONAL_FILES {
        let p = cfg.project_path(name);
        if p.is_file() {
            append_file(&mut archive, &p, &root.join(name))?;
        } else {
            debug!("not packaged (missing): {}", p.display());
        }
    }

    archive
        .into_inner()
        .and_then(|gz| gz.finish())
        .map_err(io_err)?;

    info!("Source archive created at: {}", ar_path.display());
    Ok(ar_path)
}

fn append_all(archive: &mut Archive, files: &[PathBuf], dir: &Path) -> Result<()> {
    for file in files {
        let Some(name) = file.file_name() else {
            continue;
        };
        append_file(archive, file, &dir.join(name))?;
    }
    Ok(())
}

fn append_file(archive: &mut Archive, src: &Path, name: &Path) -> Result<()> {
    archive
        .append_path_with_name(src, name)
        .map_err(|e| Error::io(src, e))?;
    debug!("added {}", name.display());
    Ok(())
}

fn append_text(archive: &mut Archive, name: &Path, body: &str) -> std::io::Result<()> {
    let bytes = body.as_bytes();
    let mut header = tar::Header::new_gnu();
    header.set_mode(0o644);
    header.set_size(bytes.len() as u64);
    header.set_cksum();
    archive.append_data(&mut header, name, Cursor::new(bytes))
}
