use crate::compiler::ToolchainSettings;
use serde::Serialize;
use std::ffi::OsStr;
use std::fmt;
use std::path::PathBuf;

/// Result of a toolchain search. `SearchPath` is the not-found sentinel:
/// the bare name is handed to the OS, which resolves it through `PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum CompilerPath {
    Installed(PathBuf),
    SearchPath(String),
}

impl CompilerPath {
    pub fn program(&self) -> &OsStr {
        match self {
            CompilerPath::Installed(path) => path.as_os_str(),
            CompilerPath::SearchPath(name) => OsStr::new(name),
        }
    }

    pub fn is_installed(&self) -> bool {
        matches!(self, CompilerPath::Installed(_))
    }
}

impl fmt::Display for CompilerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerPath::Installed(path) => write!(f, "{}", path.display()),
            CompilerPath::SearchPath(name) => f.write_str(name),
        }
    }
}

/** Finds a `csc.exe` for a requested framework version
 *
 * # Search Order
 * 1. The requested version under each install root (64-bit root first)
 * 2. Every known version, newest first, under each install root
 * 3. The bare fallback name, resolved later through `PATH`
 *
 * `locate` never fails. A compiler that is really missing only shows up
 * when the driver tries to launch it.
 */
#[derive(Debug, Clone)]
pub struct ToolchainLocator {
    system_root: PathBuf,
    settings: ToolchainSettings,
}

impl Default for ToolchainLocator {
    fn default() -> Self {
        Self::new(ToolchainSettings::default())
    }
}

impl ToolchainLocator {
    pub fn new(settings: ToolchainSettings) -> Self {
        Self {
            system_root: settings.resolve_system_root(),
            settings,
        }
    }

    pub fn locate(&self, version: &str) -> CompilerPath {
        // Requested version first, then every known version as a fallback
        let requested = self.candidates(version);
        let known = self
            .settings
            .known_versions
            .iter()
            .flat_map(|known| self.candidates(known));

        match requested.into_iter().chain(known).find(|path| path.is_file()) {
            Some(path) => {
                log::info!("Found C# compiler for {}: {}", version, path.display());
                CompilerPath::Installed(path)
            }
            None => {
                log::warn!(
                    "No C# compiler under {}, falling back to '{}' from PATH",
                    self.system_root.display(),
                    self.settings.fallback
                );
                CompilerPath::SearchPath(self.settings.fallback.to_string())
            }
        }
    }

    /// Install-root candidates for one version, in priority order.
    pub fn candidates(&self, version: &str) -> Vec<PathBuf> {
        self.settings
            .install_roots
            .iter()
            .map(|root| {
                // Install roots are written with either separator
                root.split(['/', '\\'])
                    .filter(|part| !part.is_empty())
                    .fold(self.system_root.clone(), |path, part| path.join(part))
                    .join(version)
                    .join(self.settings.binary.as_str())
            })
            .collect()
    }
}
