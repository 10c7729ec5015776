use crate::core::injector::inject_metadata;
use crate::core::metadata::{generate_script_metadata, PythonRequirement};
use crate::core::resolver::resolve_packages;
use crate::core::scanner::scan_imports;
use crate::domain::model::OverrideRecord;
use crate::domain::ports::PackageIndex;
use crate::utils::error::Result;

/// Per-run choices that shape the rendered header.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub pin_versions: bool,
    pub python: PythonRequirement,
    pub overrides: OverrideRecord,
}

pub struct ScriptEngine<I: PackageIndex> {
    index: I,
}

impl<I: PackageIndex> ScriptEngine<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    /// Scan, resolve, render and inject; returns the complete new source.
    pub fn run(&self, source: &str, options: &RunOptions) -> Result<String> {
        let modules = scan_imports(source)?;
        tracing::info!("Found {} imported modules", modules.len());

        let dependencies = resolve_packages(&modules, &self.index, options.pin_versions);
        tracing::info!(
            "Resolved {} third-party packages ({} manual overrides)",
            dependencies.len(),
            options.overrides.len()
        );

        let block = generate_script_metadata(&dependencies, &options.python, &options.overrides);

        Ok(inject_metadata(source, &block))
    }
}
