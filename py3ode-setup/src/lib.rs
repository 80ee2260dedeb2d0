//! Build and packaging tool for Py3ODE, the Python 3 bindings of the Open
//! Dynamics Engine.
//!
//! ODE itself is an external, pre-built dependency. This crate finds its
//! headers, asks `ode-config` for compiler and linker flags, regenerates the
//! Cython glue when the `.pyx` fragments changed, and compiles the `ode`
//! extension module together with the pure-Python `xode` package.
//!
//! ```rust,no_run
//! use py3ode_setup::{BuildConfig, Setup, SystemRunner};
//!
//! # fn main() -> py3ode_setup::Result<()> {
//! let cfg = BuildConfig::load(".")?;
//! let built = Setup::new(&cfg, &SystemRunner).build()?;
//! println!("{}", built.module.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extension;
pub mod flags;
pub mod freshness;
pub mod generate;
pub mod install;
pub mod locate;
pub mod metadata;
pub mod package;
pub mod pipeline;
pub mod plan;
pub mod platform;
pub mod python;
pub mod runner;
pub mod util;

pub use config::BuildConfig;
pub use error::{Error, Result};
pub use generate::{Generation, SourceGenerator, Variant};
pub use pipeline::Setup;
pub use platform::Platform;
pub use runner::{CommandOutput, CommandRunner, Invocation, SystemRunner};

/// Version information for this crate
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");
