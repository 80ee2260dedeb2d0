use std::path::PathBuf;

use log::{debug, info};

use crate::{
    config::BuildConfig,
    error::{Error, Result},
    flags::FlagSet,
    generate::Variant,
    locate::Located,
    util,
};

/// Everything the module builder needs, resolved up front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildPlan {
    pub variant: Variant,
    /// Generated C source for `variant`.
    pub source: PathBuf,
    pub include_dirs: Vec<PathBuf>,
    pub library_dirs: Vec<PathBuf>,
    pub flags: FlagSet,
}

impl BuildPlan {
    /// Trace the plan at debug level, or at info level with `verbose`.
    pub fn log(&self, cfg: &BuildConfig) {
        let lines = [
            format!("plan: variant={:?} source={}", self.variant, self.source.display()),
            format!(
                "plan: include dirs {}",
                util::join_paths_for_env(&self.include_dirs).unwrap_or_default()
            ),
            format!(
                "plan: library dirs {}",
                util::join_paths_for_env(&self.library_dirs).unwrap_or_default()
            ),
            format!("plan: libraries {:?}", self.flags.libraries),
            format!("plan: compile args {:?}", self.flags.compile_args),
            format!("plan: link args {:?}", self.flags.link_args),
        ];
        for line in lines {
            if cfg.verbose {
                info!("{line}");
            } else {
                debug!("{line}");
            }
        }
    }
}

/// Pick the variant selected by `cfg.trimesh` and combine it with the
/// located search paths and the assembled flags.
pub fn resolve(cfg: &BuildConfig, located: &Located, flags: FlagSet) -> Result<BuildPlan> {
    let variant = Variant::from_trimesh(cfg.trimesh);
    if variant.trimesh() {
        info!("Installing with trimesh support.");
    } else {
        info!("Installing without trimesh support.");
    }

    let source = cfg.project_path(variant.output_name());
    if !source.is_file() {
        return Err(Error::MissingSource { path: source });
    }

    Ok(BuildPlan {
        variant,
        source,
        include_dirs: located.search.include_dirs.clone(),
        library_dirs: located.search.library_dirs.clone(),
        flags,
    })
}
