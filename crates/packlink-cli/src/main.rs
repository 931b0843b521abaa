use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use packlink_bridge::{
    ArtifactWriter, BridgeConfig, HookKind, HookSession, OutputStyle, TerminalConsole,
};
use packlink_core::{HostReport, ManifestStore, ReportedPackage, ResourceManifest};

#[derive(Parser, Debug)]
#[command(name = "packlink")]
#[command(
    about = "Keeps the project resource manifest in sync with the host package manager",
    long_about = None
)]
struct Cli {
    /// Project root holding the resource manifest (defaults to the working
    /// directory).
    #[arg(long)]
    project_root: Option<PathBuf>,
    /// Resolved-package report dumped by the host manager.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Disable styled output.
    #[arg(long)]
    plain: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a host lifecycle hook.
    Hook {
        #[arg(value_enum)]
        event: HookEvent,
    },
    /// Show the recorded package manifest.
    Status,
    /// Emit a shell completion script on stdout.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum HookEvent {
    PostInstall,
    PostUpdate,
    PostAutoloadDump,
}

impl From<HookEvent> for HookKind {
    fn from(event: HookEvent) -> Self {
        match event {
            HookEvent::PostInstall => HookKind::PostInstall,
            HookEvent::PostUpdate => HookKind::PostUpdate,
            HookEvent::PostAutoloadDump => HookKind::PostAutoloadDump,
        }
    }
}

fn main() -> Result<()> {
    run_cli(Cli::parse())
}

fn run_cli(cli: Cli) -> Result<()> {
    let project_root = match cli.project_root {
        Some(root) => root,
        None => std::env::current_dir().context("failed to resolve working directory")?,
    };
    let output = if cli.plain {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    };

    match cli.command {
        Commands::Hook { event } => {
            let config = BridgeConfig::load(&project_root)?;
            let report_path = cli
                .report
                .unwrap_or_else(|| project_root.join(&config.project.report_path));
            let kind = HookKind::from(event);

            // The loader hook never consumes the report, so it tolerates a
            // missing file; the install hooks require one.
            let host = match kind {
                HookKind::PostInstall | HookKind::PostUpdate => HostReport::load(&report_path)?,
                HookKind::PostAutoloadDump => HostReport::load_or_empty(&report_path)?,
            };

            let builder = ArtifactWriter::from_config(&project_root, &config);
            let mut session = HookSession::new(
                project_root,
                config,
                host,
                builder,
                TerminalConsole::default(),
                output,
            );
            session.dispatch(kind)
        }
        Commands::Status => {
            let config = BridgeConfig::load(&project_root)?;
            let store = ManifestStore::new(project_root.join(&config.project.manifest_path));
            let manifest = store.load_if_exists()?;

            let report_path = cli
                .report
                .unwrap_or_else(|| project_root.join(&config.project.report_path));
            let report = HostReport::load_or_empty(&report_path)?;

            for line in format_status_lines(manifest.as_ref(), &report) {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "packlink", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn format_status_lines(manifest: Option<&ResourceManifest>, report: &HostReport) -> Vec<String> {
    let Some(manifest) = manifest else {
        return vec!["No resource manifest found".to_string()];
    };

    let mut lines = Vec::new();
    if let Some(name) = &manifest.name {
        lines.push(format!("Project: {name}"));
    }
    if manifest.packages.is_empty() {
        lines.push("No packages recorded".to_string());
        return lines;
    }

    for (name, record) in &manifest.packages {
        let version = resolved_version(report, name)
            .map(|version| format!(" {version}"))
            .unwrap_or_default();
        lines.push(format!(
            "{name}{version} -> {} [{}]",
            record.install_path, record.installer
        ));
    }
    lines
}

fn resolved_version<'a>(report: &'a HostReport, name: &str) -> Option<&'a semver::Version> {
    report.packages.iter().find_map(|package| match package {
        ReportedPackage::Concrete {
            name: package_name,
            version,
        } if package_name == name => Some(version),
        _ => None,
    })
}
