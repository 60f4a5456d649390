use crate::compiler::{CommandLine, CompilerPath};
use crate::result::{CscBuildError, Result};
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use which::which;

/// Everything needed to start the compiler once.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub compiler: CompilerPath,
    pub command_line: CommandLine,
    pub working_dir: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/** Capability to run an external program to completion
 *
 * Implementations capture stdout and stderr in full before reading the exit
 * status. A program that cannot be started is a `LaunchFailure`; a program
 * that runs and fails is reported through `exit_code`.
 */
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<ProcessOutput>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessManager;

impl ProcessManager {
    pub fn new() -> Self {
        Self
    }

    /// Resolves a bare program name through `PATH`, for diagnostics only.
    pub fn find_executable(&self, name: &str) -> Option<PathBuf> {
        which(name).ok()
    }

    fn command(&self, invocation: &Invocation) -> Command {
        let mut command = Command::new(invocation.compiler.program());
        command.current_dir(&invocation.working_dir);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        #[cfg(windows)]
        command.raw_arg(invocation.command_line.quoted_line());

        #[cfg(not(windows))]
        command.args(invocation.command_line.raw_args());

        command
    }
}

impl ProcessRunner for ProcessManager {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        if let CompilerPath::SearchPath(name) = &invocation.compiler {
            match self.find_executable(name) {
                Some(path) => log::info!("'{}' resolved through PATH to {}", name, path.display()),
                None => log::warn!("'{}' was not found on PATH", name),
            }
        }

        log::debug!("{} {}", invocation.compiler, invocation.command_line);

        let output = self
            .command(invocation)
            .output()
            .await
            .map_err(|e| {
                CscBuildError::launch(format!("{}: {}", invocation.compiler, e))
            })?;

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_program_is_launch_failure() {
        let temp = TempDir::new().unwrap();
        let invocation = Invocation {
            compiler: CompilerPath::Installed(temp.path().join("no-such-csc.exe")),
            command_line: CommandLine::default(),
            working_dir: temp.path().to_path_buf(),
        };

        let err = ProcessManager::new().run(&invocation).await.unwrap_err();
        assert!(matches!(err, CscBuildError::LaunchFailure(_)));
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        assert!(ProcessManager::new()
            .find_executable("cscbuild-definitely-not-a-program")
            .is_none());
    }
}
