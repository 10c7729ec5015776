use crate::domain::model::{
    MetadataBlock, OverrideRecord, PackageRecord, PythonVersion, CLOSING_SENTINEL,
    OPENING_SENTINEL,
};
use std::collections::BTreeSet;

/// The `requires-python` constraint written into the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PythonRequirement {
    /// User supplied; a bare version such as `3.11` gains a `>=` operator.
    Explicit(String),
    /// `>=major.minor` of the interpreter whose environment was inspected.
    Running(PythonVersion),
}

impl PythonRequirement {
    pub fn render(&self) -> String {
        match self {
            PythonRequirement::Explicit(spec) if spec.starts_with(|c: char| c.is_ascii_digit()) => {
                format!(">={}", spec)
            }
            PythonRequirement::Explicit(spec) => spec.clone(),
            PythonRequirement::Running(version) => format!(">={}", version),
        }
    }
}

/// Renders the PEP 723 `script` block for the given dependencies.
///
/// Packages from both records are listed once each in ascending order. An
/// override's specifier is used verbatim (it may be empty); otherwise the
/// package is pinned with `==version` when a version is known.
pub fn generate_script_metadata(
    dependencies: &PackageRecord,
    python: &PythonRequirement,
    overrides: &OverrideRecord,
) -> MetadataBlock {
    let mut lines = vec![
        OPENING_SENTINEL.to_string(),
        format!("# requires-python = \"{}\"", python.render()),
        "# dependencies = [".to_string(),
    ];

    let packages: BTreeSet<&String> = dependencies.keys().chain(overrides.keys()).collect();

    for package in packages {
        let requirement = match (overrides.get(package), dependencies.get(package)) {
            (Some(spec), _) => format!("{}{}", package, spec),
            (None, Some(Some(version))) => format!("{}=={}", package, version),
            _ => package.to_string(),
        };
        lines.push(format!("#     \"{}\",", requirement));
    }

    lines.push("# ]".to_string());
    lines.push(CLOSING_SENTINEL.to_string());

    MetadataBlock::from_lines(lines)
}
