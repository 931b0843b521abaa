mod artifacts;
mod config;
mod console;
mod loader;
mod rebuild;
mod session;

pub use artifacts::{ArtifactWriter, DISCOVERY_FILE_NAME, FACTORY_FILE_NAME, REPOSITORY_FILE_NAME};
pub use config::{
    BridgeConfig, DiscoveryConfig, FactoryConfig, LoaderConfig, ProjectConfig, CONFIG_FILE_NAME,
};
pub use console::{
    action_line, status_line, BufferConsole, Console, OutputStyle, TerminalConsole,
};
pub use loader::{LoaderError, FACTORY_MODULE_KEY};
pub use rebuild::{display_path, RebuildTrigger, ResourceBuilder};
pub use session::{HookKind, HookSession};
