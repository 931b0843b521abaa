use std::path::PathBuf;

use anyhow::{anyhow, Result};
use packlink_core::{ManifestStore, PackageHost, PackageSnapshot, INSTALLER_NAME};
use packlink_reconciler::{reconcile, PackageAction};

use crate::config::BridgeConfig;
use crate::console::{status_line, Console, OutputStyle};
use crate::loader::register_factory_module;
use crate::rebuild::{RebuildTrigger, ResourceBuilder};

/// Lifecycle points at which the host package manager invokes this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    PostInstall,
    PostUpdate,
    PostAutoloadDump,
}

impl HookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostInstall => "post-install",
            Self::PostUpdate => "post-update",
            Self::PostAutoloadDump => "post-autoload-dump",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "post-install" => Ok(Self::PostInstall),
            "post-update" => Ok(Self::PostUpdate),
            "post-autoload-dump" => Ok(Self::PostAutoloadDump),
            _ => Err(anyhow!("unknown lifecycle hook: {value}")),
        }
    }

    /// Closed hook-to-handler mapping; each kind resolves to a handler
    /// function reference instead of a name-based lookup.
    fn handler<H, B, C>(self) -> fn(&mut HookSession<H, B, C>) -> Result<()>
    where
        H: PackageHost,
        B: ResourceBuilder,
        C: Console,
    {
        match self {
            Self::PostInstall | Self::PostUpdate => HookSession::<H, B, C>::sync_packages,
            Self::PostAutoloadDump => HookSession::<H, B, C>::register_factory,
        }
    }
}

/// One hook-processing session, constructed once per process run. Owns the
/// two one-shot guards that keep the expensive steps from running twice when
/// the host fires a hook repeatedly within the same run.
pub struct HookSession<H, B, C> {
    project_root: PathBuf,
    config: BridgeConfig,
    host: H,
    builder: B,
    console: C,
    output: OutputStyle,
    rebuild: RebuildTrigger,
    factory_registered: bool,
}

impl<H, B, C> HookSession<H, B, C>
where
    H: PackageHost,
    B: ResourceBuilder,
    C: Console,
{
    pub fn new(
        project_root: impl Into<PathBuf>,
        config: BridgeConfig,
        host: H,
        builder: B,
        console: C,
        output: OutputStyle,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            host,
            builder,
            console,
            output,
            rebuild: RebuildTrigger::new(),
            factory_registered: false,
        }
    }

    pub fn dispatch(&mut self, kind: HookKind) -> Result<()> {
        (kind.handler())(self)
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Post-install/post-update: reconcile the manifest against the
    /// resolver's current state, persist it when it changed, then rebuild the
    /// derived artifacts at most once per run.
    pub fn sync_packages(&mut self) -> Result<()> {
        self.console
            .write_line(&status_line(self.output, "Looking for updated packages"));

        let store = ManifestStore::new(self.project_root.join(&self.config.project.manifest_path));
        let project_name = self.host.project_name();
        let mut manifest = store.load_or_init(project_name.as_deref())?;

        let snapshot = PackageSnapshot::from_host(&self.host);
        let actions = reconcile(&mut manifest, &snapshot, INSTALLER_NAME);
        if actions.iter().any(PackageAction::is_mutation) {
            store.save(&manifest)?;
        }

        self.rebuild.maybe_rebuild(
            &actions,
            &manifest,
            &mut self.builder,
            &mut self.console,
            self.output,
            &self.project_root,
            self.config.discovery_configured(),
        )
    }

    /// Post-autoload-dump: register the generated factory module with the
    /// loader tables, at most once per run. The guard is only set after every
    /// insertion succeeded.
    pub fn register_factory(&mut self) -> Result<()> {
        if self.factory_registered {
            return Ok(());
        }

        register_factory_module(
            &self.project_root,
            &self.config,
            &mut self.console,
            self.output,
        )?;
        self.factory_registered = true;
        Ok(())
    }
}
