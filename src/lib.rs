/// cscbuild - a minimal build tool for C# assemblies
///
/// Reads a `build.xml` project document, expands its source patterns,
/// finds a `csc.exe` on the host and runs it once.
///
/// Main modules:
/// - build: Project configuration, pattern expansion and the build driver
/// - cli: Command-line interface parsing and execution
/// - commands: The user-facing build command
/// - compiler: Toolchain discovery and command-line synthesis
/// - result: Error handling and result types
/// - utils: Process execution
pub mod build;
pub mod cli;
pub mod commands;
pub mod compiler;
pub mod result;
pub mod utils;
