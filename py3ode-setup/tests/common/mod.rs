//! Shared fixtures: a throwaway binding project and a scripted command runner.

#![allow(dead_code)]

use std::{
    cell::RefCell,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    process::Command,
    time::{Duration, SystemTime},
};

use py3ode_setup::{BuildConfig, CommandOutput, CommandRunner, Invocation, Platform};
use tempfile::TempDir;

pub const FRAGMENTS: [&str; 4] = [
    "ode.pyx",
    "trimesh.pyx",
    "trimeshdata.pyx",
    "trimesh_dummy.pyx",
];

/// A binding project in a temp dir with an ODE install under `ode/`.
pub struct Project {
    pub dir: TempDir,
    pub cfg: BuildConfig,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let src = root.join("src");
        fs::create_dir_all(&src).unwrap();
        let old = hours_ago(2);
        for name in FRAGMENTS {
            let p = src.join(name);
            fs::write(&p, format!("# {name}\n")).unwrap();
            set_mtime(&p, old);
        }

        let xode = root.join("xode");
        fs::create_dir_all(&xode).unwrap();
        fs::write(xode.join("__init__.py"), "").unwrap();
        fs::write(xode.join("parser.py"), "").unwrap();

        let mut cfg = BuildConfig::with_defaults(root);
        cfg.platform = Platform::Windows {
            ode_base: root.join("ode"),
        };

        let project = Self { dir, cfg };
        project.install_ode_header();
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn install_ode_header(&self) {
        let ode = self.path("ode/include/ode");
        fs::create_dir_all(&ode).unwrap();
        fs::write(ode.join("ode.h"), "/* ode */\n").unwrap();
    }

    pub fn remove_ode_header(&self) {
        fs::remove_dir_all(self.path("ode")).unwrap();
    }

    /// Switch to the Unix tables with the fixture install as an extra prefix,
    /// so the host C compiler only sees flags it understands.
    pub fn use_host_toolchain(&mut self) {
        self.cfg.platform = Platform::Unix;
        self.cfg.extra_prefixes = vec![self.path("ode")];
    }
}

/// Whether `cc` finds a working C compiler for the configured target.
pub fn host_compiler_available(cfg: &BuildConfig) -> bool {
    let tool = cc::Build::new()
        .cargo_metadata(false)
        .target(&cfg.target)
        .host(&cfg.host)
        .opt_level(0)
        .try_get_compiler();
    match tool {
        Ok(tool) if !tool.is_like_msvc() => Command::new(tool.path())
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success()),
        _ => false,
    }
}

pub fn hours_ago(hours: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(hours * 3600)
}

pub fn set_mtime(path: &Path, time: SystemTime) {
    let f = File::options().append(true).open(path).unwrap();
    f.set_modified(time).unwrap();
}

pub fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}

pub const PYTHON_INFO: &str = "/usr/include/python3.12\n/site\n.so\n3.12\n/usr\n";

/// Answers `cython`, `ode-config`, `python3`, the ODE installer script and
/// the module link.
///
/// A successful `cython` run writes its `-o` output like the real compiler,
/// and so does a successful link.
pub struct ScriptedRunner {
    pub calls: RefCell<Vec<Invocation>>,
    pub cython_status: i32,
    pub cython_missing: bool,
    pub python_stdout: Option<String>,
    pub install_status: i32,
    pub link_status: i32,
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            cython_status: 0,
            cython_missing: false,
            python_stdout: Some(PYTHON_INFO.to_string()),
            install_status: 0,
            link_status: 0,
        }
    }
}

impl ScriptedRunner {
    pub fn count(&self, program: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.program == program)
            .count()
    }

    /// The recorded link invocation, if any.
    pub fn link_call(&self) -> Option<Invocation> {
        self.calls.borrow().iter().find(|c| is_link(c)).cloned()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.program.clone())
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, inv: &Invocation) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(inv.clone());
        match inv.program.as_str() {
            "cython" => {
                if self.cython_missing {
                    return Err(io::Error::new(io::ErrorKind::NotFound, "cython"));
                }
                if self.cython_status != 0 {
                    return Ok(CommandOutput::failure(self.cython_status));
                }
                let cwd = inv.cwd.clone().unwrap_or_default();
                let out = &inv.args[1];
                fs::write(cwd.join(out), "/* generated by cython */\n")?;
                Ok(CommandOutput::success(""))
            }
            "ode-config" => Ok(CommandOutput::success("-DdDOUBLE")),
            "python3" => Ok(match &self.python_stdout {
                Some(out) => CommandOutput::success(out.clone()),
                None => CommandOutput::failure(1),
            }),
            "./install_ode.sh" => Ok(CommandOutput {
                status: Some(self.install_status),
                stdout: String::new(),
            }),
            _ if is_link(inv) => {
                if self.link_status != 0 {
                    return Ok(CommandOutput::failure(self.link_status));
                }
                if let Some(out) = link_output(inv) {
                    fs::write(out, b"\x7fELF")?;
                }
                Ok(CommandOutput::success(""))
            }
            other => Err(io::Error::new(io::ErrorKind::NotFound, other.to_string())),
        }
    }
}

pub fn is_link(inv: &Invocation) -> bool {
    inv.args
        .iter()
        .any(|a| a == "-shared" || a == "-bundle" || a == "/LD")
}

fn link_output(inv: &Invocation) -> Option<PathBuf> {
    if let Some(i) = inv.args.iter().position(|a| a == "-o") {
        return inv.args.get(i + 1).map(PathBuf::from);
    }
    inv.args
        .iter()
        .find_map(|a| a.strip_prefix("/Fe"))
        .map(PathBuf::from)
}
