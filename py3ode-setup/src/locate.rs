//! Finding the ODE headers.
//!
//! The include dirs of the candidate table are searched for `ode/ode.h`. Not
//! finding it anywhere aborts the run. Finding it more than once only warns:
//! the complete search path list is still handed to the compiler, which
//! resolves the ambiguity by its own search order.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::{
    config::BuildConfig,
    error::{Error, Result},
    platform::SearchPaths,
};

/// The header whose presence marks an ODE installation, relative to an include dir.
pub const ODE_HEADER: &str = "ode/ode.h";

/// Outcome of a successful search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Located {
    /// Include dirs that contain the header, in search order.
    pub matches: Vec<PathBuf>,
    /// The full search path list, unchanged.
    pub search: SearchPaths,
}

impl Located {
    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_ambiguous(&self) -> bool {
        self.matches.len() > 1
    }
}

/// Search the include dirs configured for `cfg`.
pub fn find(cfg: &BuildConfig) -> Result<Located> {
    #[allow(unused_mut)]
    let mut search = cfg.search_paths();

    #[cfg(feature = "pkg-config")]
    {
        if let Some(extra) = pkg_config_paths() {
            search.extend(extra);
        }
    }

    locate(search)
}

/// Count the include dirs of `search` that contain [`ODE_HEADER`].
pub fn locate(search: SearchPaths) -> Result<Located> {
    let matches: Vec<PathBuf> = search
        .include_dirs
        .iter()
        .filter(|dir| has_header(dir))
        .cloned()
        .collect();

    for dir in &matches {
        info!("<{ODE_HEADER}> found in {}", dir.display());
    }

    match matches.len() {
        0 => Err(Error::DependencyNotFound {
            header: ODE_HEADER.to_string(),
            searched: search.include_dirs.clone(),
        }),
        1 => Ok(Located { matches, search }),
        _ => {
            warn!("{ODE_HEADER} was found more than once. Make sure the header and lib matches.");
            Ok(Located { matches, search })
        }
    }
}

fn has_header(include_dir: &Path) -> bool {
    include_dir.join("ode").join("ode.h").is_file()
}

#[cfg(feature = "pkg-config")]
fn pkg_config_paths() -> Option<SearchPaths> {
    match pkg_config::Config::new()
        .cargo_metadata(false)
        .env_metadata(false)
        .probe("ode")
    {
        Ok(lib) => Some(SearchPaths {
            include_dirs: lib.include_paths,
            library_dirs: lib.link_paths,
        }),
        Err(e) => {
            log::debug!("pkg-config did not report ode: {e}");
            None
        }
    }
}
