use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use semver::Version;
use serde::Deserialize;

/// One entry of the host manager's resolved-package report. An alias is a
/// resolver-level wrapper around a concrete package under an alternate
/// version constraint; it carries no install path of its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ReportedPackage {
    Concrete { name: String, version: Version },
    Alias {
        #[serde(rename = "alias-of")]
        alias_of: String,
    },
}

impl ReportedPackage {
    /// The name of the underlying concrete package, aliases resolved.
    pub fn canonical_name(&self) -> &str {
        match self {
            Self::Concrete { name, .. } => name,
            Self::Alias { alias_of } => alias_of,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportRoot {
    #[serde(default)]
    pub name: Option<String>,
}

/// The resolved-package report dumped by the host package manager: the root
/// project's identity, every resolved package (alias entries included), and
/// the install-path table maintained by the host's installation manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HostReport {
    #[serde(default)]
    pub root: ReportRoot,
    #[serde(default)]
    pub packages: Vec<ReportedPackage>,
    #[serde(default)]
    pub install_paths: BTreeMap<String, String>,
}

impl HostReport {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("failed to parse resolved-package report")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| {
            format!("failed reading resolved-package report: {}", path.display())
        })?;
        Self::from_json_str(&raw).with_context(|| {
            format!("failed parsing resolved-package report: {}", path.display())
        })
    }

    /// A missing report reads as an empty one. Hooks that never consume the
    /// report tolerate its absence; a corrupt file is still an error.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_json_str(&raw).with_context(|| {
                format!("failed parsing resolved-package report: {}", path.display())
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| {
                format!("failed reading resolved-package report: {}", path.display())
            }),
        }
    }
}

/// Facade over the host package manager: the resolver's package list, the
/// installation manager's path lookup, and the root project's identity.
pub trait PackageHost {
    fn project_name(&self) -> Option<String>;
    fn resolved_packages(&self) -> Vec<ReportedPackage>;
    fn install_path_of(&self, name: &str) -> Option<String>;
}

impl PackageHost for HostReport {
    fn project_name(&self) -> Option<String> {
        self.root.name.clone()
    }

    fn resolved_packages(&self) -> Vec<ReportedPackage> {
        self.packages.clone()
    }

    fn install_path_of(&self, name: &str) -> Option<String> {
        self.install_paths.get(name).cloned()
    }
}
