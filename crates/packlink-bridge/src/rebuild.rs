use std::path::Path;

use anyhow::Result;
use packlink_core::ResourceManifest;
use packlink_reconciler::PackageAction;

use crate::console::{action_line, status_line, Console, OutputStyle};

/// Regenerates the derived artifacts from the manifest. The default
/// implementation writes them under the project's output directory; an
/// embedding host may substitute its own build pipeline.
pub trait ResourceBuilder {
    fn build_repository(&mut self, manifest: &ResourceManifest) -> Result<()>;
    fn build_discovery(&mut self, manifest: &ResourceManifest) -> Result<()>;
}

/// One-shot guard around the expensive rebuild steps. The host manager may
/// fire the same lifecycle hook more than once per logical operation; only
/// the first invocation in a process run rebuilds.
#[derive(Debug, Default)]
pub struct RebuildTrigger {
    ran: bool,
}

impl RebuildTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_run(&self) -> bool {
        self.ran
    }

    pub fn maybe_rebuild(
        &mut self,
        actions: &[PackageAction],
        manifest: &ResourceManifest,
        builder: &mut impl ResourceBuilder,
        console: &mut impl Console,
        output: OutputStyle,
        project_root: &Path,
        build_discovery: bool,
    ) -> Result<()> {
        if self.ran {
            return Ok(());
        }

        for action in actions {
            if let Some(line) = describe_action(action, project_root, output) {
                console.write_line(&line);
            }
        }

        console.write_line(&status_line(output, "Building resource repository"));
        builder.build_repository(manifest)?;

        if build_discovery {
            console.write_line(&status_line(output, "Building resource discovery"));
            builder.build_discovery(manifest)?;
        }

        self.ran = true;
        Ok(())
    }
}

fn describe_action(
    action: &PackageAction,
    project_root: &Path,
    output: OutputStyle,
) -> Option<String> {
    let (verb, name, path) = match action {
        PackageAction::Install { name, install_path } => ("Installing", name, install_path),
        PackageAction::Reinstall {
            name, install_path, ..
        } => ("Reinstalling", name, install_path),
        PackageAction::Remove { name, install_path } => ("Removing", name, install_path),
        PackageAction::Unchanged { .. } => return None,
    };
    Some(action_line(
        output,
        verb,
        name,
        &display_path(path, project_root),
    ))
}

/// Shortens an install path to its project-relative form when it lives under
/// the project root; other paths are shown as-is.
pub fn display_path(path: &str, project_root: &Path) -> String {
    match Path::new(path).strip_prefix(project_root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.display().to_string(),
        _ => path.to_string(),
    }
}
