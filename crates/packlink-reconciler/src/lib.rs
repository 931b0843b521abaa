use packlink_core::{PackageRecord, PackageSnapshot, ResourceManifest};

/// Outcome of diffing one snapshot entry or one manifest entry. Actions are
/// computed and applied within a single reconciliation call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageAction {
    Install {
        name: String,
        install_path: String,
    },
    Reinstall {
        name: String,
        previous_path: String,
        install_path: String,
    },
    Remove {
        name: String,
        install_path: String,
    },
    Unchanged {
        name: String,
    },
}

impl PackageAction {
    pub fn name(&self) -> &str {
        match self {
            Self::Install { name, .. }
            | Self::Reinstall { name, .. }
            | Self::Remove { name, .. }
            | Self::Unchanged { name } => name,
        }
    }

    /// True for every action that mutated the manifest.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Unchanged { .. })
    }
}

/// Diffs the current snapshot against the persisted manifest and applies the
/// resulting mutations in place. Install/Reinstall/Unchanged follow snapshot
/// order; Remove actions follow manifest order and come last. Entries owned
/// by a different installer are never removed.
pub fn reconcile(
    manifest: &mut ResourceManifest,
    snapshot: &PackageSnapshot,
    installer: &str,
) -> Vec<PackageAction> {
    let mut actions = Vec::new();

    for entry in snapshot.entries() {
        if let Some(record) = manifest.packages.get_mut(&entry.name) {
            if record.install_path == entry.install_path {
                actions.push(PackageAction::Unchanged {
                    name: entry.name.clone(),
                });
            } else {
                // The old directory may still exist after a layout move, so
                // path equality is the change signal, not disk state.
                let previous_path =
                    std::mem::replace(&mut record.install_path, entry.install_path.clone());
                actions.push(PackageAction::Reinstall {
                    name: entry.name.clone(),
                    previous_path,
                    install_path: entry.install_path.clone(),
                });
            }
        } else {
            manifest.packages.insert(
                entry.name.clone(),
                PackageRecord {
                    install_path: entry.install_path.clone(),
                    installer: installer.to_string(),
                },
            );
            actions.push(PackageAction::Install {
                name: entry.name.clone(),
                install_path: entry.install_path.clone(),
            });
        }
    }

    let removed: Vec<String> = manifest
        .packages
        .iter()
        .filter(|(name, record)| !snapshot.contains(name) && record.installer == installer)
        .map(|(name, _)| name.clone())
        .collect();

    for name in removed {
        if let Some(record) = manifest.packages.remove(&name) {
            actions.push(PackageAction::Remove {
                name,
                install_path: record.install_path,
            });
        }
    }

    actions
}
