//! `PackageIndex` built from installed-distribution manifests.
//!
//! Mirrors what the interpreter's own `packages_distributions()` does:
//! every `*.dist-info` / `*.egg-info` entry contributes its name, version
//! and top-level modules. Modules come from `top_level.txt` when the
//! distribution ships one, otherwise they are inferred from `RECORD`.

use crate::domain::model::Distribution;
use crate::domain::ports::PackageIndex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct SitePackagesIndex {
    modules: HashMap<String, Vec<String>>,
    versions: HashMap<String, String>,
}

impl SitePackagesIndex {
    /// Scans `dirs` in order. Missing or unreadable directories are skipped.
    pub fn scan<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut distributions = Vec::new();

        for dir in dirs {
            let dir = dir.as_ref();
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", dir.display(), e);
                    continue;
                }
            };

            let mut manifests: Vec<_> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| {
                            name.ends_with(".dist-info") || name.ends_with(".egg-info")
                        })
                })
                .collect();
            manifests.sort();

            for manifest in manifests {
                match read_distribution(&manifest) {
                    Some(dist) => distributions.push(dist),
                    None => tracing::debug!("No usable metadata in {}", manifest.display()),
                }
            }
        }

        tracing::debug!("Indexed {} installed distributions", distributions.len());
        Self::from_distributions(distributions)
    }

    pub fn from_distributions<I>(distributions: I) -> Self
    where
        I: IntoIterator<Item = Distribution>,
    {
        let mut index = Self::default();

        for dist in distributions {
            for module in &dist.top_level {
                index
                    .modules
                    .entry(module.clone())
                    .or_default()
                    .push(dist.name.clone());
            }
            if let Some(version) = dist.version {
                index.versions.entry(normalize_name(&dist.name)).or_insert(version);
            }
        }

        index
    }
}

impl PackageIndex for SitePackagesIndex {
    fn distributions_for_module(&self, module: &str) -> Vec<String> {
        self.modules.get(module).cloned().unwrap_or_default()
    }

    fn installed_version(&self, package: &str) -> Option<String> {
        self.versions.get(&normalize_name(package)).cloned()
    }
}

/// PEP 503 normalization: lowercase, runs of `-`, `_`, `.` collapse to `-`.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
        } else {
            normalized.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }

    normalized
}

fn read_distribution(manifest: &Path) -> Option<Distribution> {
    // A bare `*.egg-info` file is the PKG-INFO itself.
    if manifest.is_file() {
        let (name, version) = parse_metadata(&fs::read_to_string(manifest).ok()?);
        return Some(Distribution {
            name: name?,
            version,
            top_level: Vec::new(),
        });
    }

    let metadata = fs::read_to_string(manifest.join("METADATA"))
        .or_else(|_| fs::read_to_string(manifest.join("PKG-INFO")))
        .ok()?;
    let (name, version) = parse_metadata(&metadata);
    let name = name?;

    let declared: Vec<String> = fs::read_to_string(manifest.join("top_level.txt"))
        .map(|text| {
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    // An empty or missing top_level.txt falls back to the installed files.
    let top_level = if declared.is_empty() {
        fs::read_to_string(manifest.join("RECORD"))
            .map(|record| top_level_from_record(&record))
            .unwrap_or_default()
    } else {
        declared
    };

    Some(Distribution {
        name,
        version,
        top_level,
    })
}

/// Reads `Name` and `Version` from core-metadata headers.
pub fn parse_metadata(text: &str) -> (Option<String>, Option<String>) {
    let mut name = None;
    let mut version = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim();
            match key {
                "Name" if name.is_none() && !value.is_empty() => name = Some(value.to_string()),
                "Version" if version.is_none() && !value.is_empty() => {
                    version = Some(value.to_string())
                }
                _ => {}
            }
        }
    }

    (name, version)
}

/// Infers importable top-level names from the paths listed in `RECORD`.
pub fn top_level_from_record(record: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(record.as_bytes());

    let mut names: Vec<String> = Vec::new();
    for row in reader.records() {
        let Ok(row) = row else {
            continue;
        };
        let Some(path) = row.get(0) else {
            continue;
        };
        if let Some(name) = toplevel_name(path) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

fn toplevel_name(path: &str) -> Option<String> {
    let parts: Vec<&str> = path.split(['/', '\\']).filter(|p| !p.is_empty()).collect();

    let name = match parts.as_slice() {
        [] => return None,
        [single] => module_name(single),
        [first, ..] => first.to_string(),
    };

    (!name.contains('.')).then_some(name)
}

fn module_name(file_name: &str) -> String {
    if let Some(stem) = file_name.strip_suffix(".py").or_else(|| file_name.strip_suffix(".pyc")) {
        return stem.to_string();
    }
    if file_name.ends_with(".so") || file_name.ends_with(".pyd") {
        if let Some((stem, _)) = file_name.split_once('.') {
            return stem.to_string();
        }
    }
    file_name.to_string()
}
