//! Error handling for the setup pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for setup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Exit status the shell reports for a command it cannot find.
pub const COMMAND_NOT_FOUND: i32 = 127;

/// Errors that can abort a setup run
#[derive(Error, Debug)]
pub enum Error {
    /// None of the candidate include dirs contains the ODE header
    #[error(
        "<{header}> not found. You can install ODE by running the install_ode.sh script. \
         If it's already installed you may have to adjust the search paths (searched: {})",
        display_paths(.searched)
    )]
    DependencyNotFound {
        header: String,
        searched: Vec<PathBuf>,
    },

    /// The interface compiler returned a non-zero status
    #[error("An error occurred while generating the C source file {output} (status {status})")]
    GenerationFailed { output: String, status: i32 },

    /// The generated source for the selected variant is missing
    #[error("Generated source not found: {}", .path.display())]
    MissingSource { path: PathBuf },

    /// An external command other than the interface compiler failed
    #[error("Command failed with status {status}: {command}")]
    CommandFailed { command: String, status: i32 },

    /// The Python interpreter could not be queried
    #[error("Python query failed: {message}")]
    Python { message: String },

    /// Invalid configuration file or override
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// I/O operation on a specific path failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The C compiler could not be configured or failed to compile
    #[error("Compilation failed: {0}")]
    Compile(#[from] cc::Error),
}

impl Error {
    /// Create a new I/O error bound to `path`
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new Python query error
    pub fn python<S: Into<String>>(message: S) -> Self {
        Self::Python {
            message: message.into(),
        }
    }

    /// Level the error is reported at when it ends the run.
    ///
    /// A missing ODE install is reported as a warning with an install hint.
    pub fn log_level(&self) -> log::Level {
        match self {
            Self::DependencyNotFound { .. } => log::Level::Warn,
            _ => log::Level::Error,
        }
    }

    /// Process exit code for this error.
    ///
    /// A failed generation propagates the interface compiler's own status;
    /// everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::GenerationFailed { status, .. } if *status != 0 => *status,
            _ => 1,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
