use crate::result::Result;
use dirs::config_dir;
use serde::Deserialize;
use smol_str::SmolStr;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const SETTINGS_FILE: &str = "toolchains.toml";

const DEFAULT_SYSTEM_ROOT: &str = r"C:\Windows";

/** Where and how the locator looks for `csc.exe`
 *
 * # File Format
 * ```toml
 * system_root = 'D:\Windows'
 * binary = "csc.exe"
 * fallback = "csc"
 * known_versions = ["v4.0.30319", "v3.5", "v2.0.50727"]
 * install_roots = ["Microsoft.NET/Framework64", "Microsoft.NET/Framework"]
 * ```
 *
 * Every key is optional; missing keys keep their defaults.
 */
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolchainSettings {
    pub system_root: Option<PathBuf>,
    pub binary: SmolStr,
    pub fallback: SmolStr,
    pub known_versions: Vec<SmolStr>,
    pub install_roots: Vec<String>,
}

impl Default for ToolchainSettings {
    fn default() -> Self {
        Self {
            system_root: None,
            binary: "csc.exe".into(),
            fallback: if cfg!(windows) { "csc.exe" } else { "csc" }.into(),
            known_versions: vec!["v4.0.30319".into(), "v3.5".into(), "v2.0.50727".into()],
            install_roots: vec![
                "Microsoft.NET/Framework64".to_string(),
                "Microsoft.NET/Framework".to_string(),
            ],
        }
    }
}

impl ToolchainSettings {
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let settings: ToolchainSettings = toml::from_str(&content)
            .inspect_err(|e| log::error!("Invalid toolchain settings in {}: {}", path.display(), e))?;

        Ok(settings)
    }

    /// Reads the per-user settings file, or returns defaults when there is none.
    pub async fn load_user() -> Result<Self> {
        match Self::user_settings_path() {
            Some(path) if path.exists() => {
                log::info!("Using toolchain settings from {}", path.display());
                Self::from_file(&path).await
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn user_settings_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("cscbuild").join(SETTINGS_FILE))
    }

    /// Explicit setting, then `%SystemRoot%`, then `C:\Windows`.
    pub fn resolve_system_root(&self) -> PathBuf {
        if let Some(root) = &self.system_root {
            return root.clone();
        }

        std::env::var_os("SystemRoot")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSTEM_ROOT))
    }
}
