//! Cython glue generation.
//!
//! `src/ode.pyx` includes `_trimesh_switch.pyx`, which this module rewrites
//! before every run to select the trimesh fragments or the dummy. The
//! interface compiler only runs when the output is missing or older than one
//! of the `src/*.pyx` fragments.

use std::{fs, io::ErrorKind, path::PathBuf};

use log::info;

use crate::{
    config::BuildConfig,
    error::{COMMAND_NOT_FOUND, Error, Result},
    freshness::{self, Freshness},
    runner::{CommandRunner, Invocation},
    util,
};

/// Switch fragment, written into the project directory.
pub const SWITCH_FILE: &str = "_trimesh_switch.pyx";
/// Directory holding the interface-description fragments.
pub const FRAGMENT_DIR: &str = "src";
/// Extension of the fragments whose mtimes decide staleness.
pub const FRAGMENT_EXT: &str = "pyx";
/// Top-level interface file handed to the compiler.
pub const ENTRY_FILE: &str = "src/ode.pyx";

const SWITCH_HEADER: &str =
    "# This file was generated by py3ode-setup and is included in ode.pyx.";

/// The two flavours of generated source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    Trimesh,
    NoTrimesh,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Trimesh, Variant::NoTrimesh];

    pub fn from_trimesh(enabled: bool) -> Self {
        if enabled { Self::Trimesh } else { Self::NoTrimesh }
    }

    pub fn trimesh(self) -> bool {
        matches!(self, Self::Trimesh)
    }

    /// Name of the generated C file, relative to the project directory.
    pub fn output_name(self) -> &'static str {
        match self {
            Self::Trimesh => "ode_trimesh.c",
            Self::NoTrimesh => "ode_notrimesh.c",
        }
    }
}

/// Contents of the switch fragment.
pub fn switch_contents(trimesh_support: bool) -> String {
    let mut body = String::from(SWITCH_HEADER);
    body.push_str("\n\n");
    if trimesh_support {
        body.push_str("include \"trimeshdata.pyx\"\n");
        body.push_str("include \"trimesh.pyx\"\n");
    } else {
        body.push_str("include \"trimesh_dummy.pyx\"\n");
    }
    body
}

/// What a generation request ended up doing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Generation {
    Created,
    Updated,
    UpToDate,
}

impl Generation {
    pub fn ran_compiler(&self) -> bool {
        !matches!(self, Self::UpToDate)
    }
}

pub struct SourceGenerator<'a, R> {
    cfg: &'a BuildConfig,
    runner: &'a R,
}

impl<'a, R: CommandRunner> SourceGenerator<'a, R> {
    pub fn new(cfg: &'a BuildConfig, runner: &'a R) -> Self {
        Self { cfg, runner }
    }

    /// Write the switch fragment for `trimesh_support`, then (re)generate
    /// `name` if it is missing or stale.
    ///
    /// A non-zero compiler status is returned as [`Error::GenerationFailed`].
    pub fn generate(&self, name: &str, trimesh_support: bool) -> Result<Generation> {
        self.write_switch(trimesh_support)?;

        let output = self.cfg.project_path(name);
        let fragments =
            util::files_with_extension(&self.cfg.project_path(FRAGMENT_DIR), FRAGMENT_EXT)?;

        let outcome = match freshness::check(&output, &fragments)? {
            Freshness::Fresh => {
                info!("{name} is up to date");
                return Ok(Generation::UpToDate);
            }
            Freshness::Missing => {
                info!("Creating {name}");
                Generation::Created
            }
            Freshness::Stale(_) => {
                info!("Updating {name}");
                Generation::Updated
            }
        };

        self.run_compiler(name)?;
        Ok(outcome)
    }

    pub fn generate_variant(&self, variant: Variant) -> Result<Generation> {
        self.generate(variant.output_name(), variant.trimesh())
    }

    /// Generate every variant, trimesh first.
    pub fn generate_all(&self) -> Result<Vec<(Variant, Generation)>> {
        Variant::ALL
            .iter()
            .map(|&v| self.generate_variant(v).map(|g| (v, g)))
            .collect()
    }

    pub fn switch_path(&self) -> PathBuf {
        self.cfg.project_path(SWITCH_FILE)
    }

    fn write_switch(&self, trimesh_support: bool) -> Result<()> {
        let path = self.switch_path();
        fs::write(&path, switch_contents(trimesh_support)).map_err(|e| Error::io(&path, e))
    }

    fn invocation(&self, name: &str) -> Invocation {
        Invocation::new(&self.cfg.tools.cython)
            .args(["-o", name, "-I.", "-Isrc", ENTRY_FILE])
            .current_dir(&self.cfg.project_dir)
    }

    fn run_compiler(&self, name: &str) -> Result<()> {
        let inv = self.invocation(name);
        info!("{inv}");

        let status = match self.runner.run(&inv) {
            Ok(out) => out.code(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::error!("{}: command not found", inv.program);
                COMMAND_NOT_FOUND
            }
            Err(e) => return Err(Error::io(&inv.program, e)),
        };

        if status != 0 {
            return Err(Error::GenerationFailed {
                output: name.to_string(),
                status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimesh_switch_has_two_includes_in_order() {
        let body = switch_contents(true);
        let includes: Vec<_> = body.lines().filter(|l| l.starts_with("include")).collect();
        assert_eq!(
            includes,
            vec!["include \"trimeshdata.pyx\"", "include \"trimesh.pyx\""]
        );
        assert!(body.starts_with('#'));
    }

    #[test]
    fn dummy_switch_has_one_include() {
        let body = switch_contents(false);
        let includes: Vec<_> = body.lines().filter(|l| l.starts_with("include")).collect();
        assert_eq!(includes, vec!["include \"trimesh_dummy.pyx\""]);
    }

    #[test]
    fn variants() {
        assert_eq!(Variant::from_trimesh(true), Variant::Trimesh);
        assert_eq!(Variant::from_trimesh(false), Variant::NoTrimesh);
        assert_eq!(Variant::Trimesh.output_name(), "ode_trimesh.c");
        assert_eq!(Variant::NoTrimesh.output_name(), "ode_notrimesh.c");
        assert!(!Variant::NoTrimesh.trimesh());
    }
}
