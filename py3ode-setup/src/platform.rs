//! Static per-platform tables: candidate prefixes, libraries and extra flags.

use std::path::{Path, PathBuf};

/// Placeholder the Windows prefix carries until `ODE_BASE` is configured.
pub const ODE_BASE_PLACEHOLDER: &str = "insert_your_path_here";

/// Unix prefixes searched for an ODE installation, in order.
pub const UNIX_PREFIXES: [&str; 3] = ["/usr", "/usr/local", "/opt/local"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Platform {
    /// MSVC toolchain; ODE lives under a single user supplied prefix.
    Windows { ode_base: PathBuf },
    /// Linux, macOS and the BSDs.
    Unix,
}

/// Include/library directories to hand to the compiler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchPaths {
    pub include_dirs: Vec<PathBuf>,
    pub library_dirs: Vec<PathBuf>,
}

impl Platform {
    /// Pick the platform for `target_os` (as in `std::env::consts::OS`).
    pub fn for_target_os(target_os: &str, ode_base: Option<PathBuf>) -> Self {
        if target_os == "windows" {
            Self::Windows {
                ode_base: ode_base.unwrap_or_else(|| PathBuf::from(ODE_BASE_PLACEHOLDER)),
            }
        } else {
            Self::Unix
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows { .. })
    }

    pub fn search_paths(&self) -> SearchPaths {
        match self {
            Self::Windows { ode_base } => SearchPaths {
                include_dirs: vec![ode_base.join("include")],
                library_dirs: vec![ode_base.join("lib").join("releaselib")],
            },
            Self::Unix => SearchPaths::from_prefixes(UNIX_PREFIXES.iter().map(Path::new)),
        }
    }

    /// Libraries linked into the extension module.
    pub fn libraries(&self) -> &'static [&'static str] {
        match self {
            // user32 because of the MessageBox() call
            Self::Windows { .. } => &["ode", "user32"],
            Self::Unix => &["ode", "stdc++"],
        }
    }

    pub fn extra_compile_args(&self) -> &'static [&'static str] {
        match self {
            Self::Windows { .. } => &["/ML"],
            Self::Unix => &[],
        }
    }

    pub fn extra_link_args(&self) -> &'static [&'static str] {
        match self {
            Self::Windows { .. } => &["/NODEFAULTLIB:LIBCMT"],
            Self::Unix => &[],
        }
    }
}

impl SearchPaths {
    /// `<prefix>/include` and `<prefix>/lib` for every prefix.
    pub fn from_prefixes<'a, I>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut paths = Self::default();
        for base in prefixes {
            paths.include_dirs.push(base.join("include"));
            paths.library_dirs.push(base.join("lib"));
        }
        paths
    }

    /// Append dirs not already present, keeping order.
    pub fn extend(&mut self, other: SearchPaths) {
        for dir in other.include_dirs {
            if !self.include_dirs.contains(&dir) {
                self.include_dirs.push(dir);
            }
        }
        for dir in other.library_dirs {
            if !self.library_dirs.contains(&dir) {
                self.library_dirs.push(dir);
            }
        }
    }
}
