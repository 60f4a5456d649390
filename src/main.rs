use clap::Parser;
use cscbuild::cli::Cli;
use cscbuild::result::CscBuildError;
use dirs::config_dir;
use env_logger::Builder;
use log::LevelFilter;
use std::fs::OpenOptions;
use std::process::ExitCode;

/** Main entry point for cscbuild
 *
 * # Process Flow
 * 1. Initialize logging with file output
 * 2. Parse command line arguments using Clap
 * 3. Run the build
 * 4. Map the outcome to an exit code: 0 on success, 1 on any failure
 *
 * # Example
 * ```bash
 * # Build ./build.xml
 * cscbuild
 *
 * # Build a specific project and show the resolved settings
 * cscbuild mybuild.xml --verbose
 * ```
 */
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();

    // clap prints its own usage errors and picks the exit code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(e.exit_code().clamp(0, 255) as u8);
        }
    };

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(error: &CscBuildError) {
    log::error!("{}", error);
    eprintln!();
    eprintln!("Error: {}", error);
}

/** Initializes logging to a file in the platform config directory
 *
 * # Configuration
 * - Log file: `<config dir>/cscbuild/cscbuild.log`, appended
 * - Level: Info, overridable through `RUST_LOG`
 * - Fallback: current directory, then stderr
 */
fn init_logging() {
    let log_file = get_log_file_path();

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();

    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    log::info!("cscbuild started");
}

fn get_log_file_path() -> std::path::PathBuf {
    if let Some(config_dir) = config_dir() {
        config_dir.join("cscbuild").join("cscbuild.log")
    } else {
        std::env::current_dir()
            .map(|p| p.join("cscbuild.log"))
            .unwrap_or_else(|_| "cscbuild.log".into())
    }
}

/* Runtime Notes:
 *
 * Exit codes:
 * - 0 when the compiler ran and exited with 0, or a dry run printed its plan
 * - 1 for every cscbuild error, including a non-zero compiler exit
 * - clap's own code for argument errors
 *
 * Output:
 * - The compiler's stdout goes to stdout and its stderr to stderr, unchanged
 * - `--json` only applies to dry runs and prints nothing else on stdout
 *
 * Logging:
 * - Records go to the log file; stderr is only used when the file cannot
 *   be opened
 * - `RUST_LOG=debug` adds per-pattern match counts and the full command line
 */
