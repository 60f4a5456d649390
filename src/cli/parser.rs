use crate::build::DEFAULT_CONFIG_FILE;
use crate::result::{CscBuildError, Result};
use std::path::{Path, PathBuf};

pub struct CliParser;

impl CliParser {
    /// Picks the project document: the explicit argument, else `build.xml`
    /// in the current directory.
    pub fn resolve_config_path(arg: Option<&str>) -> Result<PathBuf> {
        match arg {
            Some(path) => Self::validate_config_path(path),
            None => {
                let default = std::env::current_dir()?.join(DEFAULT_CONFIG_FILE);
                Self::validate_config_path(&default.to_string_lossy())
            }
        }
    }

    pub fn validate_config_path(path: &str) -> Result<PathBuf> {
        let config_path = PathBuf::from(path);

        if !config_path.exists() {
            return Err(CscBuildError::ConfigNotFound(config_path));
        }

        if !config_path.is_file() {
            return Err(CscBuildError::config(format!(
                "Path is not a file: {}",
                config_path.display()
            )));
        }

        Ok(std::path::absolute(Path::new(path)).unwrap_or(config_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn existing_file_is_accepted() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.xml");
        std::fs::write(&path, "<Project/>").unwrap();

        let resolved = CliParser::resolve_config_path(Some(&path.to_string_lossy())).unwrap();
        assert_eq!(resolved, path);
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.xml");

        let err = CliParser::validate_config_path(&path.to_string_lossy()).unwrap_err();
        assert!(matches!(err, CscBuildError::ConfigNotFound(_)));
    }

    #[test]
    fn directory_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = CliParser::validate_config_path(&temp.path().to_string_lossy()).unwrap_err();
        assert!(matches!(err, CscBuildError::Config(_)));
    }
}
