use crate::core::ScriptStorage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Scripts on the local filesystem, read and written as UTF-8.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptStorage for LocalStorage {
    fn read_script(&self, path: &Path) -> Result<String> {
        let text = fs::read_to_string(path)?;
        Ok(text)
    }

    fn write_script(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }
}
