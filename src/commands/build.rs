use crate::build::{BuildConfiguration, BuildDriver, BuildPlan};
use crate::compiler::{CompilerPath, ToolchainLocator, ToolchainSettings};
use crate::result::Result;
use crate::utils::process::ProcessManager;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub verbose: bool,
    pub dry_run: bool,
    pub json: bool,
}

pub async fn execute(config_path: &Path, options: BuildOptions) -> Result<()> {
    let mut cmd = BuildCommand::new(options);
    cmd.execute(config_path).await
}

#[derive(Default)]
pub struct BuildCommand {
    options: BuildOptions,
}

impl BuildCommand {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub async fn execute(&mut self, config_path: &Path) -> Result<()> {
        if !self.options.json {
            println!("Using configuration: {}", config_path.display());
            println!();
        }

        let config = BuildConfiguration::load(config_path).await?;

        if self.options.verbose && !self.options.json {
            print_build_info(&config);
        }

        // Project problems are reported before user settings are read
        config.validate()?;

        let settings = ToolchainSettings::load_user().await?;
        let driver = BuildDriver::new(ToolchainLocator::new(settings), ProcessManager::new());

        // Dry run: show the plan, never touch the output directory
        if self.options.dry_run {
            let plan = driver.plan(&config)?;
            return self.print_plan(&plan);
        }

        self.compile(&driver, &config).await
    }

    fn print_plan(&self, plan: &BuildPlan) -> Result<()> {
        if self.options.json {
            println!("{}", serde_json::to_string_pretty(plan)?);
        } else {
            println!("{}", describe_compiler(&plan.compiler));
            println!("{} {}", plan.compiler, plan.command_line);
        }
        Ok(())
    }

    async fn compile(
        &self,
        driver: &BuildDriver<ProcessManager>,
        config: &BuildConfiguration,
    ) -> Result<()> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!(
            "Compiling {} file(s)...",
            config.source_files().len()
        ));
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        let compile_start = Instant::now();
        let result = driver.build(config).await;
        spinner.finish_and_clear();

        let outcome = result.inspect_err(|e| log::error!("Build aborted: {}", e))?;

        // Compiler output is shown whether or not the build succeeded
        println!("{}", describe_compiler(&outcome.compiler));
        if !outcome.stdout.trim().is_empty() {
            println!("{}", outcome.stdout);
        }
        if !outcome.stderr.trim().is_empty() {
            eprintln!("{}", outcome.stderr);
        }

        let time_str = format_duration(compile_start.elapsed());
        let output_path = config.full_output_path();

        match outcome.into_result() {
            Ok(_) => {
                println!("Build succeeded: {} ({})", output_path.display(), time_str);
                log::info!(
                    "Build completed successfully: {} in {}",
                    output_path.display(),
                    time_str
                );
                Ok(())
            }
            Err(e) => {
                log::error!("{} after {}", e, time_str);
                Err(e)
            }
        }
    }
}

fn describe_compiler(compiler: &CompilerPath) -> String {
    match compiler {
        CompilerPath::Installed(path) => format!("Using C# compiler: {}", path.display()),
        CompilerPath::SearchPath(name) => format!("Using C# compiler from PATH ({})", name),
    }
}

fn print_build_info(config: &BuildConfiguration) {
    println!("=== Build Configuration ===");
    println!("Framework:     {}", config.toolchain_version);
    println!("Configuration: {}", config.build_profile);
    println!("Platform:      {}", config.platform);
    println!("Output Type:   {}", config.output_kind);
    println!("Output:        {}", config.full_output_path().display());
    println!("Source Files:  {} file(s)", config.source_files().len());
    println!("References:    {} reference(s)", config.references().len());
    println!();
}

fn format_duration(duration: std::time::Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms >= 1000 {
        let seconds = duration.as_secs_f64();
        format!("{:.2}s", seconds)
    } else {
        format!("{}ms", total_ms)
    }
}
