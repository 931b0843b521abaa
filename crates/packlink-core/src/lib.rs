mod manifest;
mod report;
mod snapshot;

pub use manifest::{
    ManifestIoError, ManifestStore, PackageRecord, ResourceManifest, INSTALLER_NAME,
    MANIFEST_FILE_NAME,
};
pub use report::{HostReport, PackageHost, ReportRoot, ReportedPackage};
pub use snapshot::{PackageSnapshot, SnapshotEntry};
