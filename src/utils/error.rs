use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepscripterError {
    #[error("File {} not found.", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Python syntax error: {0}")]
    Parse(#[from] rustpython_parser::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Interpreter probe failed for '{interpreter}': {message}")]
    InterpreterProbe { interpreter: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Bad input from the user: missing file, invalid script, bad flags.
    High,
    /// The host environment could not be inspected or written to.
    Critical,
}

impl DepscripterError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DepscripterError::FileNotFound { .. }
            | DepscripterError::Parse(_)
            | DepscripterError::ConfigError { .. }
            | DepscripterError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            DepscripterError::IoError(_) | DepscripterError::InterpreterProbe { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DepscripterError::FileNotFound { path } => {
                format!("Error: File {} not found.", path.display())
            }
            DepscripterError::Parse(e) => format!("Could not parse the script: {}", e),
            DepscripterError::IoError(e) => format!("File operation failed: {}", e),
            DepscripterError::InterpreterProbe { interpreter, .. } => {
                format!("Could not inspect the Python environment of '{}'", interpreter)
            }
            DepscripterError::ConfigError { message } => {
                format!("Invalid configuration: {}", message)
            }
            DepscripterError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DepscripterError::FileNotFound { .. } => "Check the script path and try again",
            DepscripterError::Parse(_) => {
                "Fix the syntax error; Python 3.12 f-strings that reuse the outer quote \
                 are not supported yet"
            }
            DepscripterError::IoError(_) => "Check file permissions and available disk space",
            DepscripterError::InterpreterProbe { .. } => {
                "Pass --interpreter with a working Python, \
                 or --site-packages together with --python"
            }
            DepscripterError::ConfigError { .. }
            | DepscripterError::InvalidConfigValueError { .. } => {
                "Review the command line flags and the config file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DepscripterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_message() {
        let err = DepscripterError::FileNotFound {
            path: PathBuf::from("missing.py"),
        };
        assert_eq!(err.to_string(), "File missing.py not found.");
        assert_eq!(err.user_friendly_message(), "Error: File missing.py not found.");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_probe_failure_is_critical() {
        let err = DepscripterError::InterpreterProbe {
            interpreter: "python9".to_string(),
            message: "not found".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }
}
