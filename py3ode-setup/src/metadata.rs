//! Distribution metadata of the Python package.

/// Metadata written into `PKG-INFO` (source archive) and the installed egg-info.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub author_email: String,
    pub license: String,
    pub url: String,
    /// Pure-Python packages shipped next to the extension module.
    pub packages: Vec<String>,
    pub python_requires: String,
    pub install_requires: Vec<String>,
    /// Import name of the extension module.
    pub module_name: String,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            name: "Py3ODE".to_string(),
            version: "1.2.0.dev5".to_string(),
            description: "Port of PyODE for Python 3".to_string(),
            author: "see file AUTHORS".to_string(),
            author_email: "filipeabperes@gmail.com".to_string(),
            license: "BSD or LGPL".to_string(),
            url: "https://github.com/belbs/Py3ODE".to_string(),
            packages: vec!["xode".to_string()],
            python_requires: ">=3".to_string(),
            install_requires: vec!["cython".to_string()],
            module_name: "ode".to_string(),
        }
    }
}

impl PackageMetadata {
    /// `<name>-<version>`, the stem of archive and egg-info names.
    pub fn fullname(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Core metadata in the `PKG-INFO` format.
    pub fn pkg_info(&self) -> String {
        let mut body = String::new();
        body.push_str("Metadata-Version: 1.2\n");
        body.push_str(&format!("Name: {}\n", self.name));
        body.push_str(&format!("Version: {}\n", self.version));
        body.push_str(&format!("Summary: {}\n", self.description));
        body.push_str(&format!("Home-page: {}\n", self.url));
        body.push_str(&format!("Author: {}\n", self.author));
        body.push_str(&format!("Author-email: {}\n", self.author_email));
        body.push_str(&format!("License: {}\n", self.license));
        body.push_str(&format!("Requires-Python: {}\n", self.python_requires));
        for req in &self.install_requires {
            body.push_str(&format!("Requires-Dist: {req}\n"));
        }
        body.push_str("Platform: UNKNOWN\n");
        body
    }
}
