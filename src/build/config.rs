use crate::build::document::{parse_xml, DocumentNode};
use crate::build::pattern;
use crate::result::{CscBuildError, Result};
use smol_str::SmolStr;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const DEFAULT_CONFIG_FILE: &str = "build.xml";
pub const DEFAULT_TOOLCHAIN_VERSION: &str = "v4.0.30319";

const PROJECT_ELEMENT: &str = "Project";
const PROPERTY_GROUP: &str = "PropertyGroup";
const ITEM_GROUP: &str = "ItemGroup";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Executable,
    Library,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildProfile {
    Debug,
    Release,
    Other(SmolStr),
}

impl OutputKind {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "dll" | "library" => OutputKind::Library,
            "exe" | "winexe" => OutputKind::Executable,
            other => {
                log::warn!("Unknown output type '{}', building an executable", other);
                OutputKind::Executable
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::Executable => ".exe",
            OutputKind::Library => ".dll",
        }
    }

    pub fn target(&self) -> &'static str {
        match self {
            OutputKind::Executable => "exe",
            OutputKind::Library => "library",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Executable => f.write_str("exe"),
            OutputKind::Library => f.write_str("dll"),
        }
    }
}

impl BuildProfile {
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        match value.as_str() {
            "debug" => BuildProfile::Debug,
            "release" => BuildProfile::Release,
            _ => BuildProfile::Other(value.into()),
        }
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildProfile::Debug => f.write_str("debug"),
            BuildProfile::Release => f.write_str("release"),
            BuildProfile::Other(name) => f.write_str(name),
        }
    }
}

/** Resolved settings for one assembly build
 *
 * # Lifecycle
 * 1. Start from defaults (`Default` uses the process working directory)
 * 2. Overlay a `<Project>` document with [`BuildConfiguration::load`]
 * 3. Hand the value to the driver; it is never mutated afterwards
 *
 * Source files and references only grow while the document is read, which
 * is why they are private and exposed as slices.
 */
#[derive(Debug, Clone)]
pub struct BuildConfiguration {
    pub output_kind: OutputKind,
    pub output_directory: PathBuf,
    pub assembly_name: SmolStr,
    pub platform: SmolStr,
    pub build_profile: BuildProfile,
    pub toolchain_version: SmolStr,
    source_files: Vec<PathBuf>,
    references: Vec<String>,
    base_directory: PathBuf,
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        let base_directory = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_base_directory(base_directory)
    }
}

impl BuildConfiguration {
    pub fn with_base_directory(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_kind: OutputKind::Executable,
            output_directory: "bin".into(),
            assembly_name: "output".into(),
            platform: "anycpu".into(),
            build_profile: BuildProfile::Release,
            toolchain_version: DEFAULT_TOOLCHAIN_VERSION.into(),
            source_files: Vec::new(),
            references: Vec::new(),
            base_directory: absolute(base_directory.into()),
        }
    }

    /** Loads a project document from disk
     *
     * # Errors
     * - `ConfigNotFound` if `path` does not exist
     * - `MalformedConfig` if the file is not XML or the root is not `<Project>`
     *
     * The directory holding the document becomes the base directory for
     * every relative path it mentions.
     */
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CscBuildError::ConfigNotFound(path.to_path_buf()));
        }

        // Relative patterns and output paths resolve against the project file
        let full_path = absolute(path.to_path_buf());
        let base_directory = full_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| full_path.clone());

        let content = fs::read_to_string(&full_path).await?;
        let document = parse_xml(&content)?;
        let config = Self::from_document(document.root_element(), base_directory)?;

        log::info!(
            "Loaded {}: {} source file(s), {} reference(s)",
            full_path.display(),
            config.source_files.len(),
            config.references.len()
        );

        Ok(config)
    }

    /// Overlays the settings found under `root` onto the defaults.
    pub fn from_document<N: DocumentNode>(
        root: N,
        base_directory: impl Into<PathBuf>,
    ) -> Result<Self> {
        if root.name() != PROJECT_ELEMENT {
            return Err(CscBuildError::malformed(CscBuildError::INVALID_ROOT));
        }

        let mut config = Self::with_base_directory(base_directory);

        // Only the first PropertyGroup counts
        if let Some(properties) = root.child(PROPERTY_GROUP) {
            config.apply_properties(&properties);
        }

        for items in root.children(ITEM_GROUP) {
            config.apply_items(&items);
        }

        Ok(config)
    }

    fn apply_properties<N: DocumentNode>(&mut self, group: &N) {
        let value = |name: &str| group.child(name).map(|node| node.text().trim().to_string());

        if let Some(kind) = value("OutputType") {
            self.output_kind = OutputKind::parse(&kind);
        }
        if let Some(dir) = value("OutputPath") {
            self.output_directory = dir.into();
        }
        if let Some(name) = value("AssemblyName") {
            self.assembly_name = name.into();
        }
        if let Some(platform) = value("Platform") {
            self.platform = platform.to_lowercase().into();
        }
        if let Some(profile) = value("Configuration") {
            self.build_profile = BuildProfile::parse(&profile);
        }
        if let Some(version) = value("FrameworkVersion") {
            self.toolchain_version = version.into();
        }
    }

    fn apply_items<N: DocumentNode>(&mut self, group: &N) {
        for compile in group.children("Compile") {
            let Some(include) = non_blank(compile.attribute("Include")) else {
                continue;
            };
            let files = pattern::expand(include, &self.base_directory);
            log::debug!("Pattern '{}' matched {} file(s)", include, files.len());
            self.source_files.extend(files);
        }

        for reference in group.children("Reference") {
            if let Some(include) = non_blank(reference.attribute("Include")) {
                self.references.push(include.trim().to_string());
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.assembly_name.is_empty() {
            return Err(CscBuildError::config(CscBuildError::EMPTY_ASSEMBLY_NAME));
        }

        if self.source_files.is_empty() {
            return Err(CscBuildError::NoSourceFiles);
        }

        Ok(())
    }

    pub fn source_files(&self) -> &[PathBuf] {
        &self.source_files
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn output_file_name(&self) -> String {
        format!("{}{}", self.assembly_name, self.output_kind.extension())
    }

    pub fn output_dir(&self) -> PathBuf {
        if self.output_directory.is_absolute() {
            self.output_directory.clone()
        } else {
            self.base_directory.join(&self.output_directory)
        }
    }

    pub fn full_output_path(&self) -> PathBuf {
        self.output_dir().join(self.output_file_name())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}
