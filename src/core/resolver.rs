use crate::domain::model::{ModuleSet, PackageRecord};
use crate::domain::ports::PackageIndex;

/// Maps imported module names onto installed distributions.
///
/// Private modules (leading underscore) and modules no distribution provides
/// are dropped. When several distributions provide a module the first one
/// wins; a distribution reached through several modules is recorded once.
pub fn resolve_packages<I: PackageIndex + ?Sized>(
    modules: &ModuleSet,
    index: &I,
    pin_versions: bool,
) -> PackageRecord {
    let mut resolved = PackageRecord::new();

    for module in modules {
        if module.starts_with('_') {
            tracing::debug!("Skipping private module {}", module);
            continue;
        }

        let candidates = index.distributions_for_module(module);
        let Some(package) = candidates.into_iter().next() else {
            tracing::debug!("No distribution provides {}, assuming stdlib or local", module);
            continue;
        };

        if resolved.contains_key(&package) {
            continue;
        }

        let version = if pin_versions {
            let version = index.installed_version(&package);
            if version.is_none() {
                tracing::warn!("{} is indexed but has no installed version", package);
            }
            version
        } else {
            None
        };

        tracing::debug!("Resolved {} -> {} ({:?})", module, package, version);
        resolved.insert(package, version);
    }

    resolved
}
