// Adapters layer: concrete implementations backed by the host Python environment.

pub mod interpreter;
pub mod site_packages;

pub use interpreter::PythonEnvironment;
pub use site_packages::SitePackagesIndex;
