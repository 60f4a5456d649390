pub mod parser;

use crate::commands::{self, BuildOptions};
use crate::result::Result;
use clap::Parser;
use parser::CliParser;

#[derive(Parser, Debug)]
#[command(name = "cscbuild")]
#[command(about = "Simple C# build tool driven by an XML project file")]
#[command(version = "0.1.0")]
#[command(author = "Matthias Theodore \"mxp96\" Bartholomew")]
#[command(
    help_template = "{before-help}{name} v{version}\nAuthor: {author}\n\n{about-with-newline}\n{usage-heading} {usage}\n\n{all-args}{after-help}"
)]
pub struct Cli {
    #[arg(help = "Path to XML configuration file (default: build.xml in the current directory)")]
    config: Option<String>,

    #[arg(short, long, help = "Print the resolved build configuration")]
    verbose: bool,

    #[arg(long, help = "Print the compiler command line without running it")]
    dry_run: bool,

    #[arg(long, requires = "dry_run", help = "Print the dry-run plan as JSON")]
    json: bool,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config_path = CliParser::resolve_config_path(self.config.as_deref())?;
        log::info!("Using configuration: {}", config_path.display());

        let options = BuildOptions {
            verbose: self.verbose,
            dry_run: self.dry_run,
            json: self.json,
        };

        commands::build::execute(&config_path, options).await
    }
}
