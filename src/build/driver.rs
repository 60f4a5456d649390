use crate::build::BuildConfiguration;
use crate::compiler::{CommandLine, CommandSynthesizer, CompilerPath, ToolchainLocator};
use crate::result::{CscBuildError, Result};
use crate::utils::process::{Invocation, ProcessRunner};
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;

/// What the driver would run, without running it.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub compiler: CompilerPath,
    pub arguments: Vec<String>,
    pub command_line: String,
    pub output_path: PathBuf,
    #[serde(skip)]
    pub command: CommandLine,
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub compiler: CompilerPath,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl BuildOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn into_result(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(CscBuildError::CompilerError {
                code: self.exit_code,
                stdout: self.stdout,
                stderr: self.stderr,
            })
        }
    }
}

/** Runs one build: locate, synthesize, invoke
 *
 * # Process Flow
 * 1. Validate the configuration (`NoSourceFiles` stops here)
 * 2. Create the output directory if it is missing
 * 3. Locate the compiler
 * 4. Synthesize the command line
 * 5. Run the compiler in the project directory and collect its output
 *
 * The outcome carries the exit code; callers decide how to report it.
 */
pub struct BuildDriver<R> {
    locator: ToolchainLocator,
    runner: R,
}

impl<R: ProcessRunner> BuildDriver<R> {
    pub fn new(locator: ToolchainLocator, runner: R) -> Self {
        Self { locator, runner }
    }

    pub fn plan(&self, config: &BuildConfiguration) -> Result<BuildPlan> {
        config.validate()?;

        let compiler = self.locator.locate(&config.toolchain_version);
        let command = CommandSynthesizer::synthesize(config);

        Ok(BuildPlan {
            compiler,
            arguments: command.quoted_args(),
            command_line: command.to_string(),
            output_path: config.full_output_path(),
            command,
        })
    }

    pub async fn build(&self, config: &BuildConfiguration) -> Result<BuildOutcome> {
        config.validate()?;

        let output_dir = config.output_dir();
        if !output_dir.is_dir() {
            fs::create_dir_all(&output_dir).await?;
            log::info!("Created output directory: {}", output_dir.display());
        }

        // Validated above; plan only locates and synthesizes from here
        let plan = self.plan(config)?;
        let invocation = Invocation {
            compiler: plan.compiler,
            command_line: plan.command,
            working_dir: config.base_directory().to_path_buf(),
        };

        // A spawn failure propagates; a failing compiler is an outcome
        let output = self.runner.run(&invocation).await?;
        log::info!(
            "{} exited with code {}",
            invocation.compiler,
            output.exit_code
        );

        Ok(BuildOutcome {
            compiler: invocation.compiler,
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ToolchainSettings;
    use crate::utils::process::ProcessOutput;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRunner {
        exit_code: i32,
        calls: RefCell<Vec<Invocation>>,
    }

    impl ProcessRunner for RecordingRunner {
        async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
            self.calls.borrow_mut().push(invocation.clone());
            Ok(ProcessOutput {
                exit_code: self.exit_code,
                stdout: "compiler says hi".to_string(),
                stderr: if self.exit_code == 0 {
                    String::new()
                } else {
                    "error CS1002: ; expected".to_string()
                },
            })
        }
    }

    fn driver(exit_code: i32, system_root: &std::path::Path) -> BuildDriver<RecordingRunner> {
        let locator = ToolchainLocator::new(ToolchainSettings {
            system_root: Some(system_root.to_path_buf()),
            ..ToolchainSettings::default()
        });
        BuildDriver::new(
            locator,
            RecordingRunner {
                exit_code,
                ..RecordingRunner::default()
            },
        )
    }

    fn project(temp: &TempDir, xml: &str) -> BuildConfiguration {
        std::fs::write(temp.path().join("Program.cs"), "class P {}").unwrap();
        let doc = roxmltree::Document::parse(xml).unwrap();
        BuildConfiguration::from_document(doc.root_element(), temp.path()).unwrap()
    }

    #[tokio::test]
    async fn no_sources_aborts_before_running_anything() {
        let temp = TempDir::new().unwrap();
        let config = project(
            &temp,
            r#"<Project><ItemGroup><Compile Include="src/*.cs"/></ItemGroup></Project>"#,
        );
        let driver = driver(0, temp.path());

        let err = driver.build(&config).await.unwrap_err();
        assert!(matches!(err, CscBuildError::NoSourceFiles));
        assert!(driver.runner.calls.borrow().is_empty());
        assert!(!temp.path().join("bin").exists());
        assert!(matches!(
            driver.plan(&config),
            Err(CscBuildError::NoSourceFiles)
        ));
    }

    #[tokio::test]
    async fn successful_build_creates_output_dir_and_runs_in_project_dir() {
        let temp = TempDir::new().unwrap();
        let config = project(
            &temp,
            r#"<Project>
                 <PropertyGroup><OutputPath>out/nested</OutputPath></PropertyGroup>
                 <ItemGroup><Compile Include="Program.cs"/></ItemGroup>
               </Project>"#,
        );
        let driver = driver(0, temp.path());

        let outcome = driver.build(&config).await.unwrap();
        assert!(outcome.success());
        assert_eq!(outcome.stdout, "compiler says hi");
        assert!(temp.path().join("out/nested").is_dir());

        let calls = driver.runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].working_dir, temp.path());
        assert!(!calls[0].compiler.is_installed());
        assert_eq!(
            calls[0].command_line,
            CommandSynthesizer::synthesize(&config)
        );
    }

    #[tokio::test]
    async fn non_zero_exit_becomes_compiler_error() {
        let temp = TempDir::new().unwrap();
        let config = project(
            &temp,
            r#"<Project><ItemGroup><Compile Include="*.cs"/></ItemGroup></Project>"#,
        );

        let outcome = driver(1, temp.path()).build(&config).await.unwrap();
        assert!(!outcome.success());

        match outcome.into_result() {
            Err(CscBuildError::CompilerError { code, stderr, .. }) => {
                assert_eq!(code, 1);
                assert_eq!(stderr, "error CS1002: ; expected");
            }
            other => panic!("expected compiler error, got {:?}", other),
        }
    }

    #[test]
    fn plan_uses_installed_compiler_when_present() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("Microsoft.NET/Framework/v4.0.30319");
        std::fs::create_dir_all(&install).unwrap();
        std::fs::write(install.join("csc.exe"), "").unwrap();

        let config = project(
            &temp,
            r#"<Project><ItemGroup><Compile Include="Program.cs"/></ItemGroup></Project>"#,
        );
        let plan = driver(0, temp.path()).plan(&config).unwrap();

        assert_eq!(plan.compiler, CompilerPath::Installed(install.join("csc.exe")));
        assert_eq!(plan.arguments[1], "/target:exe");
        assert_eq!(plan.command_line, plan.arguments.join(" "));
        assert_eq!(plan.output_path, temp.path().join("bin").join("output.exe"));
    }
}
