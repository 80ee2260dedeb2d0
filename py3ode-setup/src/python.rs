//! Querying the target Python interpreter.

use std::path::PathBuf;

use crate::{
    config::BuildConfig,
    error::{Error, Result},
    runner::{CommandRunner, Invocation},
};

const QUERY: &str = "\
import sys, sysconfig
paths = sysconfig.get_paths()
print(paths['include'])
print(paths['platlib'])
print(sysconfig.get_config_var('EXT_SUFFIX') or '')
print('%d.%d' % sys.version_info[:2])
print(sys.base_prefix)
";

/// Interpreter facts needed to compile and install an extension module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PythonInfo {
    pub include_dir: PathBuf,
    /// Default install location for platform specific modules.
    pub platlib: PathBuf,
    /// e.g. `.cpython-312-x86_64-linux-gnu.so`
    pub ext_suffix: String,
    /// `major.minor`
    pub version: String,
    pub base_prefix: PathBuf,
}

impl PythonInfo {
    /// Directory holding `pythonXY.lib` on Windows installs.
    pub fn import_lib_dir(&self) -> PathBuf {
        self.base_prefix.join("libs")
    }

    /// Parse the five lines printed by the query script.
    pub fn parse(stdout: &str) -> Result<Self> {
        let lines: Vec<&str> = stdout.lines().map(str::trim).collect();
        let [include, platlib, suffix, version, base, ..] = lines.as_slice() else {
            return Err(Error::python(format!(
                "expected 5 lines from the interpreter, got {}",
                lines.len()
            )));
        };

        let ext_suffix = if suffix.is_empty() {
            default_ext_suffix().to_string()
        } else {
            suffix.to_string()
        };

        Ok(Self {
            include_dir: PathBuf::from(*include),
            platlib: PathBuf::from(*platlib),
            ext_suffix,
            version: version.to_string(),
            base_prefix: PathBuf::from(*base),
        })
    }
}

pub fn query<R: CommandRunner>(cfg: &BuildConfig, runner: &R) -> Result<PythonInfo> {
    let inv = Invocation::new(&cfg.tools.python).args(["-c", QUERY]);
    let out = runner
        .run(&inv)
        .map_err(|e| Error::python(format!("could not run {}: {e}", cfg.tools.python)))?;
    if !out.is_success() {
        return Err(Error::python(format!(
            "{} exited with status {}",
            cfg.tools.python,
            out.code()
        )));
    }
    PythonInfo::parse(&out.stdout)
}

fn default_ext_suffix() -> &'static str {
    if cfg!(windows) { ".pyd" } else { ".so" }
}
