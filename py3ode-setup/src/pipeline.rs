//! The setup steps in their required order.
//!
//! Locate ODE, assemble flags, generate both variants, then build the
//! selected one. Any step failing stops the run; later steps never see a
//! partial result.

use std::path::{Path, PathBuf};

use log::info;

use crate::{
    config::BuildConfig,
    error::{Error, Result},
    extension::{BuiltModule, ExtensionBuilder},
    flags,
    generate::{Generation, SourceGenerator, Variant},
    install,
    locate::{self, Located},
    package,
    plan::{self, BuildPlan},
    python::{self, PythonInfo},
    runner::{CommandRunner, Invocation},
};

/// Script shipped with the bindings that downloads and builds ODE.
pub const INSTALL_ODE_SCRIPT: &str = "./install_ode.sh";

pub struct Setup<'a, R> {
    cfg: &'a BuildConfig,
    runner: &'a R,
}

impl<'a, R: CommandRunner> Setup<'a, R> {
    pub fn new(cfg: &'a BuildConfig, runner: &'a R) -> Self {
        Self { cfg, runner }
    }

    /// Locate ODE and generate every variant.
    pub fn generate(&self) -> Result<(Located, Vec<(Variant, Generation)>)> {
        let located = locate::find(self.cfg)?;
        let generated = SourceGenerator::new(self.cfg, self.runner).generate_all()?;
        Ok((located, generated))
    }

    /// Everything up to (not including) compiling the module.
    pub fn prepare(&self) -> Result<BuildPlan> {
        let located = locate::find(self.cfg)?;
        let flag_set = flags::assemble(self.cfg, self.runner);
        SourceGenerator::new(self.cfg, self.runner).generate_all()?;

        let plan = plan::resolve(self.cfg, &located, flag_set)?;
        plan.log(self.cfg);
        Ok(plan)
    }

    pub fn build(&self) -> Result<BuiltModule> {
        self.build_with_python().map(|(built, _)| built)
    }

    /// Build, then install into `target` or the interpreter's platlib.
    pub fn install(&self, target: Option<&Path>) -> Result<Vec<PathBuf>> {
        let (_, py) = self.build_with_python()?;
        let target = target.map(Path::to_path_buf).unwrap_or(py.platlib);
        install::install_tree(&self.cfg.lib_dir(), &target, &self.cfg.metadata, &py.version)
    }

    fn build_with_python(&self) -> Result<(BuiltModule, PythonInfo)> {
        let plan = self.prepare()?;
        let py = python::query(self.cfg, self.runner)?;
        let built = ExtensionBuilder::new(self.cfg, self.runner).build(&plan, &py)?;
        info!("built {}", built.module.display());
        Ok((built, py))
    }

    pub fn sdist(&self, dist_dir: &Path) -> Result<PathBuf> {
        self.generate()?;
        package::sdist(self.cfg, dist_dir)
    }

    /// Run the bundled ODE installer script from the project directory.
    pub fn install_ode(&self) -> Result<()> {
        let inv = Invocation::new(INSTALL_ODE_SCRIPT).current_dir(&self.cfg.project_dir);
        info!("{inv}");
        let out = self
            .runner
            .run(&inv)
            .map_err(|e| Error::io(self.cfg.project_path(INSTALL_ODE_SCRIPT), e))?;
        if !out.is_success() {
            return Err(Error::CommandFailed {
                command: inv.to_string(),
                status: out.code(),
            });
        }
        Ok(())
    }
}
