pub mod engine;
pub mod injector;
pub mod metadata;
pub mod overrides;
pub mod resolver;
pub mod scanner;

pub use crate::domain::model::{MetadataBlock, ModuleSet, OverrideRecord, PackageRecord};
pub use crate::domain::ports::{PackageIndex, ScriptStorage};
pub use crate::utils::error::Result;
