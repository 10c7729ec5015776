pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{PythonEnvironment, SitePackagesIndex};
pub use crate::config::{cli::LocalStorage, CliConfig};
pub use crate::core::{
    engine::{RunOptions, ScriptEngine},
    injector::inject_metadata,
    metadata::{generate_script_metadata, PythonRequirement},
    overrides::{parse_override, parse_overrides},
    resolver::resolve_packages,
    scanner::scan_imports,
};
pub use crate::utils::error::{DepscripterError, Result};
