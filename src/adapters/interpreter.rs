use crate::domain::model::PythonVersion;
use crate::utils::error::{DepscripterError, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Command;

const PROBE_SCRIPT: &str = concat!(
    "import json, sys; ",
    "print(json.dumps({'version': list(sys.version_info[:2]), 'paths': sys.path}))"
);

/// Version and import path of a Python interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonEnvironment {
    pub version: PythonVersion,
    pub site_packages: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    version: (u32, u32),
    paths: Vec<String>,
}

impl PythonEnvironment {
    /// Runs `interpreter` once and records its `sys.version_info` and `sys.path`.
    pub fn probe(interpreter: &str) -> Result<Self> {
        tracing::debug!("Probing Python interpreter {}", interpreter);

        let output = Command::new(interpreter)
            .args(["-c", PROBE_SCRIPT])
            .output()
            .map_err(|e| DepscripterError::InterpreterProbe {
                interpreter: interpreter.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(DepscripterError::InterpreterProbe {
                interpreter: interpreter.to_string(),
                message: format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let env = Self::from_probe_output(&String::from_utf8_lossy(&output.stdout)).map_err(
            |message| DepscripterError::InterpreterProbe {
                interpreter: interpreter.to_string(),
                message,
            },
        )?;

        tracing::info!(
            "Using Python {} with {} site directories",
            env.version,
            env.site_packages.len()
        );
        Ok(env)
    }

    /// Parses the probe's JSON line. Empty entries (the working directory)
    /// and paths that are not directories are dropped.
    pub fn from_probe_output(stdout: &str) -> std::result::Result<Self, String> {
        let probe: ProbeOutput = serde_json::from_str(stdout.trim())
            .map_err(|e| format!("unexpected probe output: {}", e))?;

        let site_packages = probe
            .paths
            .into_iter()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .filter(|path| path.is_dir())
            .collect();

        Ok(Self {
            version: PythonVersion::new(probe.version.0, probe.version.1),
            site_packages,
        })
    }
}
