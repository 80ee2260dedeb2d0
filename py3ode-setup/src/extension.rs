//! Compiling and linking the `ode` extension module.
//!
//! `cc` discovers the C compiler for the configured target and compiles the
//! generated source into objects. The shared-object link is then issued with
//! the same tool through the [`CommandRunner`].

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    config::BuildConfig,
    error::{Error, Result},
    plan::BuildPlan,
    python::PythonInfo,
    runner::{CommandRunner, Invocation},
    util,
};

/// Files produced by a module build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltModule {
    pub module: PathBuf,
    /// Pure-Python files staged next to the module.
    pub helpers: Vec<PathBuf>,
}

/// Linker dialect of the discovered compiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStyle {
    /// `cl.exe /LD ... /link ...`
    Msvc,
    /// gcc/clang on macOS: loadable bundle resolved against the interpreter.
    Bundle,
    /// gcc/clang elsewhere.
    Shared,
}

pub struct ExtensionBuilder<'a, R> {
    cfg: &'a BuildConfig,
    runner: &'a R,
}

impl<'a, R: CommandRunner> ExtensionBuilder<'a, R> {
    pub fn new(cfg: &'a BuildConfig, runner: &'a R) -> Self {
        Self { cfg, runner }
    }

    pub fn build(&self, plan: &BuildPlan, python: &PythonInfo) -> Result<BuiltModule> {
        let temp_dir = self.cfg.build_dir.join("temp");
        let lib_dir = self.cfg.lib_dir();
        for dir in [&temp_dir, &lib_dir] {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }

        let mut build = cc::Build::new();
        build
            .cargo_metadata(false)
            .cargo_warnings(false)
            .target(&self.cfg.target)
            .host(&self.cfg.host)
            .opt_level(self.cfg.opt_level)
            .debug(false)
            .pic(true)
            .warnings(false)
            .out_dir(&temp_dir)
            .file(&plan.source)
            .include(&python.include_dir);
        for dir in &plan.include_dirs {
            build.include(dir);
        }
        for arg in &plan.flags.compile_args {
            build.flag(arg);
        }

        info!("compiling {}", plan.source.display());
        let objects = build.try_compile_intermediates()?;
        let tool = build.try_get_compiler()?;

        let style = if tool.is_like_msvc() {
            LinkStyle::Msvc
        } else if self.cfg.target.contains("-apple-") {
            LinkStyle::Bundle
        } else {
            LinkStyle::Shared
        };

        let module = lib_dir.join(format!(
            "{}{}",
            self.cfg.metadata.module_name, python.ext_suffix
        ));
        let mut library_dirs = plan.library_dirs.clone();
        if style == LinkStyle::Msvc {
            library_dirs.push(python.import_lib_dir());
        }

        let mut inv = link_invocation(
            tool.path(),
            tool.args(),
            style,
            &objects,
            &library_dirs,
            plan,
            &module,
        );
        for (k, v) in tool.get_envs() {
            inv = inv.env(k.to_string_lossy(), v.to_string_lossy());
        }

        info!("{inv}");
        let out = self
            .runner
            .run(&inv)
            .map_err(|e| Error::io(tool.path(), e))?;
        if !out.is_success() {
            return Err(Error::CommandFailed {
                command: inv.to_string(),
                status: out.code(),
            });
        }

        let helpers = self.stage_helpers(&lib_dir)?;
        Ok(BuiltModule { module, helpers })
    }

    /// Copy the `.py` files of every helper package into `lib_dir`.
    pub fn stage_helpers(&self, lib_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut staged = Vec::new();
        for package in &self.cfg.metadata.packages {
            let src_dir = self.cfg.project_path(package);
            let files = util::files_with_extension(&src_dir, "py")?;
            if files.is_empty() {
                log::warn!("package directory {} has no modules", src_dir.display());
                continue;
            }

            let dst_dir = lib_dir.join(package);
            fs::create_dir_all(&dst_dir).map_err(|e| Error::io(&dst_dir, e))?;
            for file in files {
                let Some(name) = file.file_name() else {
                    continue;
                };
                let dst = dst_dir.join(name);
                fs::copy(&file, &dst).map_err(|e| Error::io(&file, e))?;
                staged.push(dst);
            }
            info!("copied package {package} to {}", dst_dir.display());
        }
        Ok(staged)
    }
}

/// The command linking `objects` into `output`.
pub fn link_invocation(
    compiler: &Path,
    base_args: &[OsString],
    style: LinkStyle,
    objects: &[PathBuf],
    library_dirs: &[PathBuf],
    plan: &BuildPlan,
    output: &Path,
) -> Invocation {
    let mut inv = Invocation::new(compiler.to_string_lossy())
        .args(base_args.iter().map(|a| a.to_string_lossy().into_owned()));

    match style {
        LinkStyle::Msvc => {
            inv = inv
                .args(objects.iter().map(|o| o.display().to_string()))
                .arg("/LD")
                .arg(format!("/Fe{}", output.display()))
                .arg("/link")
                .args(library_dirs.iter().map(|d| format!("/LIBPATH:{}", d.display())))
                .args(plan.flags.libraries.iter().map(|l| format!("{l}.lib")));
        }
        LinkStyle::Bundle | LinkStyle::Shared => {
            inv = if style == LinkStyle::Bundle {
                inv.args(["-bundle", "-undefined", "dynamic_lookup"])
            } else {
                inv.arg("-shared")
            };
            inv = inv
                .args(objects.iter().map(|o| o.display().to_string()))
                .arg("-o")
                .arg(output.display().to_string())
                .args(library_dirs.iter().map(|d| format!("-L{}", d.display())))
                .args(plan.flags.libraries.iter().map(|l| format!("-l{l}")));
        }
    }

    inv.args(plan.flags.link_args.iter().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{flags::FlagSet, generate::Variant};

    fn plan() -> BuildPlan {
        BuildPlan {
            variant: Variant::Trimesh,
            source: PathBuf::from("ode_trimesh.c"),
            include_dirs: vec![PathBuf::from("/usr/include")],
            library_dirs: vec![PathBuf::from("/usr/lib")],
            flags: FlagSet {
                libraries: vec!["ode".to_string(), "stdc++".to_string()],
                compile_args: vec![],
                link_args: vec!["-L/opt/ode/lib".to_string(), "-lode".to_string()],
            },
        }
    }

    #[test]
    fn shared_link_orders_libraries_before_extra_args() {
        let plan = plan();
        let inv = link_invocation(
            Path::new("cc"),
            &[OsString::from("-O2"), OsString::from("-fPIC")],
            LinkStyle::Shared,
            &[PathBuf::from("temp/ode_trimesh.o")],
            &plan.library_dirs,
            &plan,
            Path::new("lib/ode.so"),
        );
        assert_eq!(inv.program, "cc");
        assert_eq!(
            inv.args,
            vec![
                "-O2",
                "-fPIC",
                "-shared",
                "temp/ode_trimesh.o",
                "-o",
                "lib/ode.so",
                "-L/usr/lib",
                "-lode",
                "-lstdc++",
                "-L/opt/ode/lib",
                "-lode",
            ]
        );
    }

    #[test]
    fn bundle_link_defers_symbols() {
        let plan = plan();
        let inv = link_invocation(
            Path::new("clang"),
            &[],
            LinkStyle::Bundle,
            &[PathBuf::from("a.o")],
            &[],
            &plan,
            Path::new("ode.so"),
        );
        assert_eq!(&inv.args[..3], &["-bundle", "-undefined", "dynamic_lookup"]);
    }

    #[test]
    fn msvc_link_uses_link_section() {
        let mut plan = plan();
        plan.flags.libraries = vec!["ode".to_string(), "user32".to_string()];
        plan.flags.link_args = vec!["/NODEFAULTLIB:LIBCMT".to_string()];
        let inv = link_invocation(
            Path::new("cl.exe"),
            &[OsString::from("/nologo")],
            LinkStyle::Msvc,
            &[PathBuf::from("ode_trimesh.obj")],
            &[PathBuf::from("C:/ode/lib/releaselib")],
            &plan,
            Path::new("ode.pyd"),
        );
        assert_eq!(
            inv.args,
            vec![
                "/nologo",
                "ode_trimesh.obj",
                "/LD",
                "/Feode.pyd",
                "/link",
                "/LIBPATH:C:/ode/lib/releaselib",
                "ode.lib",
                "user32.lib",
                "/NODEFAULTLIB:LIBCMT",
            ]
        );
    }

    #[test]
    fn helpers_are_staged() {
        let dir = tempfile::tempdir().unwrap();
        let xode = dir.path().join("xode");
        fs::create_dir_all(&xode).unwrap();
        fs::write(xode.join("__init__.py"), "").unwrap();
        fs::write(xode.join("parser.py"), "").unwrap();
        fs::write(xode.join("README"), "").unwrap();

        let cfg = BuildConfig::with_defaults(dir.path());
        let runner = crate::runner::SystemRunner;
        let builder = ExtensionBuilder::new(&cfg, &runner);
        let staged = builder.stage_helpers(&cfg.lib_dir()).unwrap();
        assert_eq!(staged.len(), 2);
        assert!(cfg.lib_dir().join("xode").join("parser.py").is_file());
        assert!(!cfg.lib_dir().join("xode").join("README").exists());
    }
}
