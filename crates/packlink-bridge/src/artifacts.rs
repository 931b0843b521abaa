use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use packlink_core::ResourceManifest;
use serde::Serialize;

use crate::config::BridgeConfig;
use crate::rebuild::ResourceBuilder;

pub const REPOSITORY_FILE_NAME: &str = "repository.json";
pub const DISCOVERY_FILE_NAME: &str = "discovery.json";
pub const FACTORY_FILE_NAME: &str = "factory.gen";

#[derive(Debug, Serialize)]
struct RepositoryFile {
    version: u32,
    packages: BTreeMap<String, RepositoryPackage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct RepositoryPackage {
    install_path: String,
    resources: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DiscoveryFile {
    version: u32,
    bindings: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// Filesystem-backed builder for the derived artifacts: the resource
/// repository, the discovery index, and the generated factory descriptor the
/// registration step later locates.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
    factory_module: String,
    factory_path: PathBuf,
    discovery_types: Vec<String>,
}

impl ArtifactWriter {
    pub fn from_config(project_root: &Path, config: &BridgeConfig) -> Self {
        Self {
            output_dir: project_root.join(&config.project.output_dir),
            factory_module: config.factory.module.clone(),
            factory_path: project_root.join(&config.factory.path),
            discovery_types: config
                .discovery
                .as_ref()
                .map(|discovery| discovery.types.clone())
                .unwrap_or_default(),
        }
    }

    pub fn repository_path(&self) -> PathBuf {
        self.output_dir.join(REPOSITORY_FILE_NAME)
    }

    pub fn discovery_path(&self) -> PathBuf {
        self.output_dir.join(DISCOVERY_FILE_NAME)
    }

    fn write_factory_descriptor(&self) -> Result<()> {
        let mut payload = String::new();
        payload.push_str(&format!("module={}\n", self.factory_module));
        payload.push_str(&format!(
            "repository={}\n",
            self.repository_path().display()
        ));
        if !self.discovery_types.is_empty() {
            payload.push_str(&format!("discovery={}\n", self.discovery_path().display()));
        }

        if let Some(parent) = self.factory_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.factory_path, payload).with_context(|| {
            format!(
                "failed writing factory descriptor: {}",
                self.factory_path.display()
            )
        })
    }
}

impl ResourceBuilder for ArtifactWriter {
    fn build_repository(&mut self, manifest: &ResourceManifest) -> Result<()> {
        let mut packages = BTreeMap::new();
        for (name, record) in &manifest.packages {
            packages.insert(
                name.clone(),
                RepositoryPackage {
                    install_path: record.install_path.clone(),
                    resources: scan_package_resources(&record.install_path)?,
                },
            );
        }

        write_json_artifact(
            &self.repository_path(),
            &RepositoryFile {
                version: 1,
                packages,
            },
        )?;
        self.write_factory_descriptor()
    }

    fn build_discovery(&mut self, manifest: &ResourceManifest) -> Result<()> {
        let mut bindings: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();
        for (name, record) in &manifest.packages {
            for resource in scan_package_resources(&record.install_path)? {
                let Some((kind, _)) = resource.split_once('/') else {
                    continue;
                };
                if !self.discovery_types.iter().any(|entry| entry == kind) {
                    continue;
                }
                bindings
                    .entry(kind.to_string())
                    .or_default()
                    .entry(name.clone())
                    .or_default()
                    .push(resource);
            }
        }

        write_json_artifact(
            &self.discovery_path(),
            &DiscoveryFile {
                version: 1,
                bindings,
            },
        )
    }
}

/// Collects the relative paths of everything under `<install-path>/resources`,
/// sorted for stable artifact output. A package without a resources directory
/// contributes an empty list.
fn scan_package_resources(install_path: &str) -> Result<Vec<String>> {
    let root = Path::new(install_path).join("resources");
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut resources = Vec::new();
    collect_resource_files(&root, &root, &mut resources)?;
    resources.sort();
    Ok(resources)
}

fn collect_resource_files(root: &Path, current: &Path, out: &mut Vec<String>) -> Result<()> {
    for entry in
        fs::read_dir(current).with_context(|| format!("failed to read {}", current.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_resource_files(root, &path, out)?;
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .with_context(|| format!("failed to relativize {}", path.display()))?;
        out.push(relative.to_string_lossy().replace('\\', "/"));
    }
    Ok(())
}

fn write_json_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed serializing {}", path.display()))?;
    content.push('\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed writing {}", path.display()))
}
