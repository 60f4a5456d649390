use std::borrow::Cow;
use std::path::PathBuf;
use thiserror::Error;

/** Main Result type alias for cscbuild operations
 *
 * # Usage
 * ```no_run
 * use cscbuild::build::BuildConfiguration;
 * use cscbuild::result::Result;
 *
 * async fn load() -> Result<BuildConfiguration> {
 *     // Function automatically propagates CscBuildError
 *     let config = BuildConfiguration::load("build.xml").await?;
 *     config.validate()?;
 *     Ok(config)
 * }
 * ```
 */
pub type Result<T> = std::result::Result<T, CscBuildError>;

/** Error enumeration for a single build attempt
 *
 * # Error Categories
 * - **ConfigNotFound**: the project document does not exist
 * - **MalformedConfig**: the document is not XML or has no `<Project>` root
 * - **NoSourceFiles**: the inclusion patterns resolved to nothing
 * - **LaunchFailure**: the compiler process could not be started
 * - **CompilerError**: the compiler ran and returned a non-zero exit code
 * - **Config**: invalid settings (blank assembly name, bad toolchains.toml)
 * - **Io**, **TomlParse**, **JsonError**: wrapped library errors
 *
 * Every variant aborts the run and maps to exit code 1.
 */
#[derive(Error, Debug)]
pub enum CscBuildError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Malformed configuration: {0}")]
    MalformedConfig(Cow<'static, str>),

    #[error("No source files found to compile.\nCheck your <Compile Include=\"...\"/> entries in the configuration file.")]
    NoSourceFiles,

    #[error("Failed to launch compiler: {0}")]
    LaunchFailure(Cow<'static, str>),

    #[error("Build failed with exit code: {code}")]
    CompilerError {
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("Config error: {0}")]
    Config(Cow<'static, str>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CscBuildError {
    pub const INVALID_ROOT: &'static str = "Invalid XML format. Root element must be <Project>";
    pub const EMPTY_ASSEMBLY_NAME: &'static str = "Assembly name cannot be empty";

    pub fn malformed(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedConfig(msg.into())
    }

    /** Creates a LaunchFailure error with flexible message input
     *
     * # Use Cases
     * - Compiler binary absent even after the PATH fallback
     * - Permission denied on the compiler executable
     */
    pub fn launch(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::LaunchFailure(msg.into())
    }

    pub fn config(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(msg.into())
    }
}
