use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    metadata::PackageMetadata,
    platform::{Platform, SearchPaths},
};

/// Optional per-project overrides, read from `setup.toml`.
pub const CONFIG_FILE: &str = "setup.toml";

/// Names of the external tools the pipeline calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tools {
    pub cython: String,
    pub ode_config: String,
    pub python: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            cython: "cython".to_string(),
            ode_config: "ode-config".to_string(),
            python: "python3".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub project_dir: PathBuf,
    pub build_dir: PathBuf,
    pub platform: Platform,
    /// Build the module with trimesh (OPCODE) support. Must match how ODE was compiled.
    pub trimesh: bool,
    /// Extra prefixes searched after the platform table.
    pub extra_prefixes: Vec<PathBuf>,
    pub tools: Tools,
    pub target: String,
    pub host: String,
    pub opt_level: u32,
    pub verbose: bool,
    pub metadata: PackageMetadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SetupFile {
    trimesh: Option<bool>,
    ode_base: Option<PathBuf>,
    build_dir: Option<PathBuf>,
    opt_level: Option<u32>,
    extra_prefixes: Vec<PathBuf>,
    tools: ToolsFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ToolsFile {
    cython: Option<String>,
    ode_config: Option<String>,
    python: Option<String>,
}

impl BuildConfig {
    /// Built-in defaults for the host, without consulting files or the environment.
    pub fn with_defaults(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let target = default_target();
        Self {
            build_dir: project_dir.join("build"),
            project_dir,
            platform: Platform::for_target_os(env::consts::OS, None),
            trimesh: true,
            extra_prefixes: Vec::new(),
            tools: Tools::default(),
            host: target.clone(),
            target,
            opt_level: 2,
            verbose: false,
            metadata: PackageMetadata::default(),
        }
    }

    /// Defaults, then `setup.toml` (if present), then environment overrides.
    pub fn load(project_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut cfg = Self::with_defaults(project_dir);
        let file = cfg.project_dir.join(CONFIG_FILE);
        if file.exists() {
            let text = fs::read_to_string(&file).map_err(|e| Error::io(&file, e))?;
            cfg.apply_file(&text)?;
        }
        cfg.apply_env(|key| env::var(key).ok())?;
        Ok(cfg)
    }

    /// Apply the contents of a `setup.toml`.
    pub fn apply_file(&mut self, text: &str) -> Result<()> {
        let file: SetupFile = toml::from_str(text)
            .map_err(|e| Error::config(format!("{CONFIG_FILE}: {e}")))?;

        if let Some(trimesh) = file.trimesh {
            self.trimesh = trimesh;
        }
        if let Some(base) = file.ode_base {
            self.set_ode_base(base);
        }
        if let Some(dir) = file.build_dir {
            self.build_dir = self.project_dir.join(dir);
        }
        if let Some(level) = file.opt_level {
            self.opt_level = level;
        }
        self.extra_prefixes.extend(file.extra_prefixes);
        if let Some(v) = file.tools.cython {
            self.tools.cython = v;
        }
        if let Some(v) = file.tools.ode_config {
            self.tools.ode_config = v;
        }
        if let Some(v) = file.tools.python {
            self.tools.python = v;
        }
        Ok(())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("PY3ODE_TRIMESH") {
            self.trimesh = parse_flag("PY3ODE_TRIMESH", &v)?;
        }
        if let Some(v) = non_empty("ODE_BASE") {
            self.set_ode_base(PathBuf::from(v));
        }
        if let Some(v) = non_empty("PY3ODE_CYTHON") {
            self.tools.cython = v;
        }
        if let Some(v) = non_empty("PY3ODE_ODE_CONFIG") {
            self.tools.ode_config = v;
        }
        if let Some(v) = non_empty("PY3ODE_PYTHON") {
            self.tools.python = v;
        }
        if let Some(v) = non_empty("PY3ODE_VERBOSE") {
            self.verbose = parse_flag("PY3ODE_VERBOSE", &v)?;
        }
        if let Some(v) = non_empty("PY3ODE_TARGET") {
            self.target = v;
        }
        if let Some(v) = non_empty("PY3ODE_HOST") {
            self.host = v;
        }
        Ok(())
    }

    /// Only meaningful on Windows; Unix always searches the fixed prefix table.
    pub fn set_ode_base(&mut self, base: PathBuf) {
        if let Platform::Windows { ode_base } = &mut self.platform {
            *ode_base = base;
        }
    }

    pub fn search_paths(&self) -> SearchPaths {
        let mut paths = self.platform.search_paths();
        paths.extend(SearchPaths::from_prefixes(
            self.extra_prefixes.iter().map(PathBuf::as_path),
        ));
        paths
    }

    /// Resolve `relative` against the project directory. Absolute paths are
    /// returned unchanged.
    pub fn project_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_dir.join(relative)
    }

    /// Where the built module and helper package are staged.
    pub fn lib_dir(&self) -> PathBuf {
        self.build_dir.join("lib")
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    let v = value.trim();
    if v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("on") {
        Ok(true)
    } else if v == "0" || v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("off") {
        Ok(false)
    } else {
        Err(Error::config(format!("{key}: expected a boolean, got `{value}`")))
    }
}

/// Host triple assembled from `std::env::consts`, used unless `PY3ODE_TARGET` is set.
pub fn default_target() -> String {
    let arch = env::consts::ARCH;
    match env::consts::OS {
        "windows" => format!("{arch}-pc-windows-msvc"),
        "macos" => format!("{arch}-apple-darwin"),
        "linux" => format!("{arch}-unknown-linux-gnu"),
        os => format!("{arch}-unknown-{os}"),
    }
}
