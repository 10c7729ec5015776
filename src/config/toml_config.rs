use crate::domain::model::OverrideRecord;
use crate::utils::error::{DepscripterError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Optional settings file; every key falls back to the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub python: Option<String>,
    pub pin: Option<bool>,
    pub interpreter: Option<String>,
    pub site_packages: Option<Vec<String>>,
    #[serde(default)]
    pub overrides: OverrideRecord,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DepscripterError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DepscripterError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables stay literal.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(python) = &self.python {
            validate_non_empty_string("python", python)?;
        }
        if let Some(interpreter) = &self.interpreter {
            validate_non_empty_string("interpreter", interpreter)?;
        }
        for dir in self.site_packages.iter().flatten() {
            validate_non_empty_string("site_packages", dir)?;
        }
        for name in self.overrides.keys() {
            validate_non_empty_string("overrides", name)?;
        }
        Ok(())
    }
}
