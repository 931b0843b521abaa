use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MANIFEST_FILE_NAME: &str = "packlink.json";

/// Installer identity recorded on every manifest entry this tool writes.
/// Entries recorded by any other installer are left untouched during removal.
pub const INSTALLER_NAME: &str = "packlink";

/// One entry of the manifest: where a package was last seen on disk, and
/// which tool put the entry there. Install paths are compared literally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct PackageRecord {
    pub install_path: String,
    pub installer: String,
}

/// The persisted resource manifest (`packlink.json`): the project's declared
/// identity plus the packages recorded as installed, keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub packages: BTreeMap<String, PackageRecord>,
}

impl ResourceManifest {
    pub fn record(&self, name: &str) -> Option<&PackageRecord> {
        self.packages.get(name)
    }
}

#[derive(Debug, Error)]
pub enum ManifestIoError {
    #[error("failed reading resource manifest: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("resource manifest is not valid JSON: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed serializing resource manifest: {}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed writing resource manifest: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads and writes the resource manifest at a fixed path. Saves are
/// deterministic, so writing unchanged content produces identical bytes.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the manifest, creating it when absent. A freshly created
    /// manifest carries the host project's declared name and is persisted
    /// immediately, before any package is reconciled into it.
    pub fn load_or_init(
        &self,
        project_name: Option<&str>,
    ) -> Result<ResourceManifest, ManifestIoError> {
        match self.load_if_exists()? {
            Some(manifest) => Ok(manifest),
            None => {
                let manifest = ResourceManifest {
                    name: project_name.map(ToOwned::to_owned),
                    packages: BTreeMap::new(),
                };
                self.save(&manifest)?;
                Ok(manifest)
            }
        }
    }

    pub fn load_if_exists(&self) -> Result<Option<ResourceManifest>, ManifestIoError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(ManifestIoError::Read {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        let manifest = serde_json::from_str(&raw).map_err(|err| ManifestIoError::Parse {
            path: self.path.clone(),
            source: err,
        })?;
        Ok(Some(manifest))
    }

    pub fn save(&self, manifest: &ResourceManifest) -> Result<(), ManifestIoError> {
        let mut content =
            serde_json::to_string_pretty(manifest).map_err(|err| ManifestIoError::Serialize {
                path: self.path.clone(),
                source: err,
            })?;
        content.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| ManifestIoError::Write {
                    path: self.path.clone(),
                    source: err,
                })?;
            }
        }

        fs::write(&self.path, content).map_err(|err| ManifestIoError::Write {
            path: self.path.clone(),
            source: err,
        })
    }
}
