//! Compiler and linker arguments for the extension module.
//!
//! `ode-config` output comes first, followed by the static platform extras,
//! so the extras win wherever the compiler lets a later flag override an
//! earlier one.

use log::debug;

use crate::{
    config::BuildConfig,
    runner::{CommandRunner, Invocation},
    util,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub libraries: Vec<String>,
    pub compile_args: Vec<String>,
    pub link_args: Vec<String>,
}

pub fn assemble<R: CommandRunner>(cfg: &BuildConfig, runner: &R) -> FlagSet {
    let mut compile_args = query(runner, &cfg.tools.ode_config, "--cflags");
    compile_args.extend(
        cfg.platform
            .extra_compile_args()
            .iter()
            .map(|s| s.to_string()),
    );

    let mut link_args = query(runner, &cfg.tools.ode_config, "--libs");
    link_args.extend(cfg.platform.extra_link_args().iter().map(|s| s.to_string()));

    FlagSet {
        libraries: cfg.platform.libraries().iter().map(|s| s.to_string()).collect(),
        compile_args,
        link_args,
    }
}

/// Whitespace-split stdout of `<tool> <request>`.
///
/// A tool that cannot be started contributes nothing. A non-zero status is
/// not checked; whatever it printed is used.
fn query<R: CommandRunner>(runner: &R, tool: &str, request: &str) -> Vec<String> {
    let inv = Invocation::new(tool).arg(request);
    match runner.run(&inv) {
        Ok(out) => util::split_args(&out.stdout),
        Err(e) => {
            debug!("`{inv}` unavailable: {e}");
            Vec::new()
        }
    }
}
