use crate::utils::error::Result;
use std::path::Path;

/// Read-only view of the installed package environment.
pub trait PackageIndex {
    /// Distributions providing `module`, in discovery order.
    fn distributions_for_module(&self, module: &str) -> Vec<String>;

    fn installed_version(&self, package: &str) -> Option<String>;
}

pub trait ScriptStorage {
    fn read_script(&self, path: &Path) -> Result<String>;
    fn write_script(&self, path: &Path, contents: &str) -> Result<()>;
}
