use std::collections::HashSet;

use crate::report::PackageHost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub name: String,
    pub install_path: String,
}

/// Canonical view of the packages the host resolver currently reports,
/// rebuilt from scratch on every reconciliation. Aliases are resolved to
/// their underlying package, each name appears at most once (first-seen order
/// wins), and packages without an install path are skipped entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSnapshot {
    entries: Vec<SnapshotEntry>,
}

impl PackageSnapshot {
    pub fn from_host(host: &impl PackageHost) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for package in host.resolved_packages() {
            let name = package.canonical_name();
            if seen.contains(name) {
                continue;
            }

            // Metapackages resolve without an install path; nothing to record.
            let Some(install_path) = host.install_path_of(name) else {
                continue;
            };
            if install_path.is_empty() {
                continue;
            }

            seen.insert(name.to_string());
            entries.push(SnapshotEntry {
                name: name.to_string(),
                install_path,
            });
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
