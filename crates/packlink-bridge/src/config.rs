use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "packlink.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectConfig {
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
    #[serde(default = "default_report_path")]
    pub report_path: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            report_path: default_report_path(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FactoryConfig {
    /// Fully-qualified name of the generated factory module.
    #[serde(default = "default_factory_module")]
    pub module: String,
    /// Location of the generated factory file, relative to the project root.
    #[serde(default = "default_factory_path")]
    pub path: String,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            module: default_factory_module(),
            path: default_factory_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoaderConfig {
    #[serde(default = "default_bootstrap_path")]
    pub bootstrap_path: String,
    #[serde(default = "default_module_map_path")]
    pub module_map_path: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            bootstrap_path: default_bootstrap_path(),
            module_map_path: default_module_map_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscoveryConfig {
    #[serde(default = "default_discovery_types")]
    pub types: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            types: default_discovery_types(),
        }
    }
}

/// Tool configuration read from `packlink.toml` at the project root. Every
/// section is optional; a missing file yields the defaults. The discovery
/// index is only rebuilt when a `[discovery]` section is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BridgeConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub factory: FactoryConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub discovery: Option<DiscoveryConfig>,
}

impl BridgeConfig {
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE_NAME);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed reading tool configuration: {}", path.display())
                });
            }
        };

        toml::from_str(&content)
            .with_context(|| format!("failed parsing tool configuration: {}", path.display()))
    }

    pub fn discovery_configured(&self) -> bool {
        self.discovery.is_some()
    }
}

fn default_manifest_path() -> String {
    packlink_core::MANIFEST_FILE_NAME.to_string()
}

fn default_report_path() -> String {
    ".packlink/resolved.json".to_string()
}

fn default_output_dir() -> String {
    ".packlink".to_string()
}

fn default_factory_module() -> String {
    "packlink::GeneratedFactory".to_string()
}

fn default_factory_path() -> String {
    ".packlink/factory.gen".to_string()
}

fn default_bootstrap_path() -> String {
    "loader/bootstrap.env".to_string()
}

fn default_module_map_path() -> String {
    "loader/modules.json".to_string()
}

fn default_discovery_types() -> Vec<String> {
    vec!["config".to_string(), "templates".to_string()]
}
