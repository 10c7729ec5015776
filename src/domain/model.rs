use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Top-level module names referenced by a script's imports.
pub type ModuleSet = BTreeSet<String>;

/// Resolved package name -> installed version (absent when unpinned or unknown).
pub type PackageRecord = BTreeMap<String, Option<String>>;

/// Package name -> literal version specifier suffix supplied by the user.
pub type OverrideRecord = BTreeMap<String, String>;

pub const OPENING_SENTINEL: &str = "# /// script";
pub const CLOSING_SENTINEL: &str = "# ///";

/// `major.minor` of the interpreter whose environment is inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A rendered inline script metadata header, one entry per line, no terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlock {
    lines: Vec<String>,
}

impl MetadataBlock {
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Splits literal header text into lines; used for blocks written by hand.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for MetadataBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

/// One installed distribution found in a site-packages directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub name: String,
    pub version: Option<String>,
    pub top_level: Vec<String>,
}
