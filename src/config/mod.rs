pub mod cli;
pub mod toml_config;

use crate::core::overrides::parse_overrides;
use crate::domain::model::OverrideRecord;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use toml_config::TomlConfig;

pub const DEFAULT_INTERPRETER: &str = "python3";

#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(feature = "cli", command(name = "depscripter"))]
#[cfg_attr(feature = "cli", command(about = "Add PEP 723 metadata to Python scripts."))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Path to the Python script
    pub file: PathBuf,

    /// Do not pin package versions
    #[cfg_attr(feature = "cli", arg(long))]
    pub no_pin: bool,

    /// requires-python constraint, e.g. "3.11" or ">=3.10"
    #[cfg_attr(feature = "cli", arg(short = 'p', long, value_name = "SPEC"))]
    pub python: Option<String>,

    /// Manual dependency override, e.g. "requests>=2.0" (repeatable)
    #[cfg_attr(feature = "cli", arg(short = 'm', long, value_name = "NAME[SPEC]"))]
    pub manual: Vec<String>,

    /// Modify the file in-place
    #[cfg_attr(feature = "cli", arg(long, conflicts_with = "output"))]
    pub in_place: bool,

    /// Write output to a specific file
    #[cfg_attr(feature = "cli", arg(short = 'o', long))]
    pub output: Option<PathBuf>,

    /// Python interpreter whose packages are inspected [default: python3]
    #[cfg_attr(feature = "cli", arg(long, env = "DEPSCRIPTER_PYTHON"))]
    pub interpreter: Option<String>,

    /// Scan this site-packages directory instead of the interpreter's (repeatable)
    #[cfg_attr(feature = "cli", arg(long = "site-packages", value_name = "DIR"))]
    pub site_packages: Vec<PathBuf>,

    /// TOML file with default settings
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub verbose: bool,
}

/// Where the rewritten script goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    InPlace,
    File(PathBuf),
}

/// Command line merged over the optional config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub pin_versions: bool,
    pub python: Option<String>,
    pub overrides: OverrideRecord,
    pub interpreter: String,
    pub site_packages: Vec<PathBuf>,
    pub destination: Destination,
}

impl CliConfig {
    /// Command line values win; `--manual` entries replace file overrides of
    /// the same name.
    pub fn merge(&self, file: Option<&TomlConfig>) -> Settings {
        let file = file.cloned().unwrap_or_default();

        let mut overrides = file.overrides;
        overrides.extend(parse_overrides(&self.manual));

        let site_packages = if self.site_packages.is_empty() {
            file.site_packages
                .unwrap_or_default()
                .into_iter()
                .map(PathBuf::from)
                .collect()
        } else {
            self.site_packages.clone()
        };

        let destination = match (&self.output, self.in_place) {
            (_, true) => Destination::InPlace,
            (Some(path), false) => Destination::File(path.clone()),
            (None, false) => Destination::Stdout,
        };

        Settings {
            pin_versions: !self.no_pin && file.pin.unwrap_or(true),
            python: self.python.clone().or(file.python),
            overrides,
            interpreter: self
                .interpreter
                .clone()
                .or(file.interpreter)
                .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string()),
            site_packages,
            destination,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("file", &self.file)?;
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        if let Some(python) = &self.python {
            validate_non_empty_string("python", python)?;
        }
        if let Some(interpreter) = &self.interpreter {
            validate_non_empty_string("interpreter", interpreter)?;
        }
        for dir in &self.site_packages {
            validate_path("site-packages", dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(file: &str) -> CliConfig {
        CliConfig {
            file: PathBuf::from(file),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let settings = config("script.py").merge(None);

        assert!(settings.pin_versions);
        assert_eq!(settings.python, None);
        assert!(settings.overrides.is_empty());
        assert_eq!(settings.interpreter, DEFAULT_INTERPRETER);
        assert!(settings.site_packages.is_empty());
        assert_eq!(settings.destination, Destination::Stdout);
    }

    #[test]
    fn test_command_line_wins_over_file() {
        let mut cli = config("script.py");
        cli.python = Some("3.12".to_string());
        cli.manual = vec!["requests<3".to_string()];
        cli.site_packages = vec![PathBuf::from("/cli/site")];
        cli.output = Some(PathBuf::from("out.py"));

        let mut file = TomlConfig {
            python: Some("3.9".to_string()),
            pin: Some(true),
            interpreter: Some("/usr/bin/python3.9".to_string()),
            site_packages: Some(vec!["/file/site".to_string()]),
            ..Default::default()
        };
        file.overrides.insert("requests".to_string(), ">=2".to_string());
        file.overrides.insert("rich".to_string(), String::new());

        let settings = cli.merge(Some(&file));

        assert_eq!(settings.python.as_deref(), Some("3.12"));
        assert_eq!(settings.interpreter, "/usr/bin/python3.9");
        assert_eq!(settings.site_packages, vec![PathBuf::from("/cli/site")]);
        assert_eq!(settings.overrides["requests"], "<3");
        assert_eq!(settings.overrides["rich"], "");
        assert_eq!(settings.destination, Destination::File(PathBuf::from("out.py")));
    }

    #[test]
    fn test_pinning_can_be_disabled_either_way() {
        let mut cli = config("script.py");
        cli.no_pin = true;
        assert!(!cli.merge(None).pin_versions);

        let file = TomlConfig {
            pin: Some(false),
            ..Default::default()
        };
        assert!(!config("script.py").merge(Some(&file)).pin_versions);
    }

    #[test]
    fn test_validation() {
        assert!(config("script.py").validate().is_ok());
        assert!(config("").validate().is_err());

        let mut blank_manual = config("script.py");
        blank_manual.manual = vec![" ".to_string()];
        assert!(blank_manual.validate().is_ok());

        let mut blank_python = config("script.py");
        blank_python.python = Some(String::new());
        assert!(blank_python.validate().is_err());
    }

    #[test]
    fn test_malformed_manual_entry_becomes_bare_name() {
        let mut cli = config("script.py");
        cli.manual = vec![" ".to_string(), "requests>=2".to_string()];

        let settings = cli.merge(None);

        assert_eq!(settings.overrides[" "], "");
        assert_eq!(settings.overrides["requests"], ">=2");
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_parse_arguments() {
        use clap::Parser;

        let cli = CliConfig::try_parse_from([
            "depscripter",
            "script.py",
            "--no-pin",
            "-p",
            "3.11",
            "-m",
            "requests>=2.0",
            "--manual",
            "rich",
            "--in-place",
        ])
        .unwrap();

        assert_eq!(cli.file, PathBuf::from("script.py"));
        assert!(cli.no_pin);
        assert_eq!(cli.python.as_deref(), Some("3.11"));
        assert_eq!(cli.manual, vec!["requests>=2.0", "rich"]);
        assert_eq!(cli.merge(None).destination, Destination::InPlace);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_in_place_conflicts_with_output() {
        use clap::Parser;

        let result =
            CliConfig::try_parse_from(["depscripter", "script.py", "--in-place", "-o", "out.py"]);
        assert!(result.is_err());
    }
}
