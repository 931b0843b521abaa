use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::config::BridgeConfig;
use crate::console::{status_line, Console, OutputStyle};

/// Bootstrap key naming the generated factory module.
pub const FACTORY_MODULE_KEY: &str = "PACKLINK_FACTORY_MODULE";

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("factory module file not found: {}", .0.display())]
    FactoryFileNotFound(PathBuf),
    #[error("loader bootstrap file not found: {}", .0.display())]
    BootstrapFileNotFound(PathBuf),
    #[error("loader module map file not found: {}", .0.display())]
    ModuleMapFileNotFound(PathBuf),
}

/// Registers the generated factory module with the host's loader tables:
/// writes the factory constant into the loader bootstrap and inserts the
/// module into the module map, pointing at the generated factory file. Every
/// file involved must already exist; each missing file is its own error and
/// nothing is printed for a step whose target is absent.
pub(crate) fn register_factory_module(
    project_root: &Path,
    config: &BridgeConfig,
    console: &mut impl Console,
    output: OutputStyle,
) -> Result<()> {
    let factory_path = project_root.join(&config.factory.path);
    if !factory_path.is_file() {
        return Err(LoaderError::FactoryFileNotFound(factory_path).into());
    }

    let bootstrap_path = project_root.join(&config.loader.bootstrap_path);
    if !bootstrap_path.is_file() {
        return Err(LoaderError::BootstrapFileNotFound(bootstrap_path).into());
    }
    console.write_line(&status_line(output, "Generating factory module constant"));
    insert_factory_constant(&bootstrap_path, &config.factory.module)?;

    let module_map_path = project_root.join(&config.loader.module_map_path);
    if !module_map_path.is_file() {
        return Err(LoaderError::ModuleMapFileNotFound(module_map_path).into());
    }
    console.write_line(&status_line(
        output,
        &format!(
            "Registering {} with the module-map loader",
            config.factory.module
        ),
    ));
    insert_module_map_entry(&module_map_path, &config.factory.module, &factory_path)
}

/// Sets or replaces the factory constant in the bootstrap's key=value lines,
/// leaving every other line untouched.
fn insert_factory_constant(path: &Path, module: &str) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading loader bootstrap: {}", path.display()))?;

    let mut lines: Vec<String> = Vec::new();
    let mut replaced = false;
    for line in raw.lines() {
        if line.split_once('=').map(|(key, _)| key) == Some(FACTORY_MODULE_KEY) {
            lines.push(format!("{FACTORY_MODULE_KEY}={module}"));
            replaced = true;
        } else {
            lines.push(line.to_string());
        }
    }
    if !replaced {
        lines.push(format!("{FACTORY_MODULE_KEY}={module}"));
    }

    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path, content)
        .with_context(|| format!("failed writing loader bootstrap: {}", path.display()))
}

/// Inserts the module name into the loader's module map, keyed by the
/// factory's fully-qualified name and pointing at the generated file.
fn insert_module_map_entry(path: &Path, module: &str, factory_path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading loader module map: {}", path.display()))?;
    let mut map: BTreeMap<String, String> = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing loader module map: {}", path.display()))?;

    map.insert(module.to_string(), factory_path.display().to_string());

    let mut content = serde_json::to_string_pretty(&map)
        .with_context(|| format!("failed serializing loader module map: {}", path.display()))?;
    content.push('\n');
    fs::write(path, content)
        .with_context(|| format!("failed writing loader module map: {}", path.display()))
}
