//! Error types for snag

use std::path::PathBuf;
use thiserror::Error;

/// Error types for snag operations
#[derive(Debug, Error)]
pub enum SnagError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more invalid command-line switches, reported together
    #[error("The following invalid switches were used:\n{}", format_problems(.0))]
    Config(Vec<String>),

    /// Validation error (logic checks)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Permission denied for specific path
    #[error("Permission denied: {}: {source}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_problems(problems: &[String]) -> String {
    problems
        .iter()
        .map(|p| format!("\t{}", p))
        .collect::<Vec<_>>()
        .join("\n")
}

impl SnagError {
    /// Build the error for a failed IO call on `path`.
    pub fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::PermissionDenied {
            SnagError::PermissionDenied {
                path: path.to_path_buf(),
                source: error,
            }
        } else {
            SnagError::Io(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_io_error_automatic_conversion() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let error: SnagError = io_error.into();

        assert!(matches!(error, SnagError::Io(_)));
        assert!(error.to_string().contains("IO error"));
    }

    #[test]
    fn test_io_error_from_function() {
        fn returns_io_error() -> Result<(), SnagError> {
            let _file = std::fs::File::open("/nonexistent/path/file.txt")?;
            Ok(())
        }

        let result = returns_io_error();
        assert!(matches!(result, Err(SnagError::Io(_))));
    }

    #[test]
    fn test_config_error_lists_every_problem() {
        let error = SnagError::Config(vec![
            "Cannot access \"--from\" dir: /nope".to_string(),
            "Invalid value for \"--delay\" switch: -5".to_string(),
        ]);
        let text = error.to_string();

        assert!(text.starts_with("The following invalid switches were used:"));
        assert!(text.contains("\tCannot access \"--from\" dir: /nope"));
        assert!(text.contains("\tInvalid value for \"--delay\" switch: -5"));
    }

    #[test]
    fn test_permission_denied_keeps_os_detail() {
        let path = PathBuf::from("/protected/file.txt");
        let error = SnagError::from_io(
            &path,
            IoError::new(ErrorKind::PermissionDenied, "sharing violation"),
        );
        let text = error.to_string();
        assert!(text.starts_with("Permission denied: /protected/file.txt"));
        assert!(text.contains("sharing violation"));

        let source = std::error::Error::source(&error).expect("io error is kept as source");
        assert_eq!(source.to_string(), "sharing violation");
    }

    #[test]
    fn test_from_io_maps_permission_denied() {
        let path = PathBuf::from("locked.db");
        let error = SnagError::from_io(&path, IoError::new(ErrorKind::PermissionDenied, "no"));
        assert!(matches!(error, SnagError::PermissionDenied { .. }));

        let error = SnagError::from_io(&path, IoError::new(ErrorKind::NotFound, "gone"));
        assert!(matches!(error, SnagError::Io(_)));
    }
}
