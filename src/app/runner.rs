use crate::adapters::{PythonEnvironment, SitePackagesIndex};
use crate::config::cli::LocalStorage;
use crate::config::toml_config::TomlConfig;
use crate::config::{CliConfig, Destination, Settings};
use crate::core::engine::{RunOptions, ScriptEngine};
use crate::core::metadata::PythonRequirement;
use crate::core::ScriptStorage;
use crate::utils::error::{DepscripterError, Result};
use crate::utils::validation::Validate;
use std::path::PathBuf;

/// What happened to the rewritten script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Printed(String),
    Updated(PathBuf),
    Saved(PathBuf),
}

pub fn run(config: &CliConfig) -> Result<Outcome> {
    run_with_storage(config, &LocalStorage::new())
}

pub fn run_with_storage<S: ScriptStorage>(config: &CliConfig, storage: &S) -> Result<Outcome> {
    if !config.file.exists() {
        return Err(DepscripterError::FileNotFound {
            path: config.file.clone(),
        });
    }

    let file_config = match &config.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            let file_config = TomlConfig::from_file(path)?;
            file_config.validate()?;
            Some(file_config)
        }
        None => None,
    };
    let settings = config.merge(file_config.as_ref());
    tracing::debug!("Effective settings: {:?}", settings);

    let source = storage.read_script(&config.file)?;

    let (index, python) = inspect_environment(&settings)?;
    let options = RunOptions {
        pin_versions: settings.pin_versions,
        python,
        overrides: settings.overrides,
    };

    let new_source = ScriptEngine::new(index).run(&source, &options)?;

    match settings.destination {
        Destination::Stdout => Ok(Outcome::Printed(new_source)),
        Destination::InPlace => {
            storage.write_script(&config.file, &new_source)?;
            Ok(Outcome::Updated(config.file.clone()))
        }
        Destination::File(path) => {
            storage.write_script(&path, &new_source)?;
            Ok(Outcome::Saved(path))
        }
    }
}

/// Probes the interpreter at most once, and only when the settings leave
/// the site-packages directories or the default `requires-python` unknown.
fn inspect_environment(settings: &Settings) -> Result<(SitePackagesIndex, PythonRequirement)> {
    let mut probed: Option<PythonEnvironment> = None;

    let site_packages = if settings.site_packages.is_empty() {
        let env = PythonEnvironment::probe(&settings.interpreter)?;
        let dirs = env.site_packages.clone();
        probed = Some(env);
        dirs
    } else {
        settings.site_packages.clone()
    };
    let index = SitePackagesIndex::scan(&site_packages);

    let python = match &settings.python {
        Some(spec) => PythonRequirement::Explicit(spec.clone()),
        None => {
            let env = match probed {
                Some(env) => env,
                None => PythonEnvironment::probe(&settings.interpreter)?,
            };
            PythonRequirement::Running(env.version)
        }
    };

    Ok((index, python))
}
