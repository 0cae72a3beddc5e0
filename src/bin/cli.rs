use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use aderyngate::config::{Config, CONFIG_FILE};
use aderyngate::error::GateError;
use aderyngate::output::{self, OutputFormat};
use aderyngate::GateOptions;

#[derive(Parser)]
#[command(
    name = "aderyn-gate",
    about = "Fail or warn a CI job based on Aderyn issue counts",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Policy inputs shared by `run` and `validate`. The environment variable
/// names match how GitHub Actions exposes action inputs.
#[derive(Args)]
struct PolicyArgs {
    /// Config file path
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Severity that fails the job ("", high, low, any)
    #[arg(long, env = "INPUT_FAIL-ON")]
    fail_on: Option<String>,

    /// Severity that emits a warning ("", high, low, any)
    #[arg(long, env = "INPUT_WARN-ON")]
    warn_on: Option<String>,

    /// Directory to scan (prefer `root` in aderyn.toml)
    #[arg(long, env = "INPUT_WORKING-DIRECTORY")]
    working_directory: Option<String>,
}

impl PolicyArgs {
    fn into_options(self) -> GateOptions {
        GateOptions {
            config_path: self.config,
            fail_on: self.fail_on,
            warn_on: self.warn_on,
            working_directory: self.working_directory,
            artifact_dir: None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run Aderyn and apply the fail/warn policy
    Run {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Signal format (console, github); detected from GITHUB_ACTIONS if omitted
        #[arg(long, short = 'f')]
        format: Option<String>,

        /// Write a JSON summary of the run to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Check the fail/warn policy without running Aderyn
    Validate {
        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Generate a starter .aderyn-gate.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            policy,
            format,
            output,
        } => cmd_run(policy, format, output),
        Commands::Validate { policy } => cmd_validate(policy),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn cmd_run(
    policy: PolicyArgs,
    format_str: Option<String>,
    output_path: Option<PathBuf>,
) -> Result<i32, GateError> {
    let format = match format_str {
        Some(s) => OutputFormat::from_str_lenient(&s).unwrap_or_else(|| {
            eprintln!("Warning: unknown format '{}', using console", s);
            OutputFormat::Console
        }),
        None => OutputFormat::detect(),
    };
    let reporter = output::reporter_for(format);

    let exit = aderyngate::run_and_signal(&policy.into_options(), reporter.as_ref());

    if let (Some(out), Some(report)) = (output_path, &exit.report) {
        std::fs::write(&out, output::json::render(report)?)?;
    }

    Ok(exit.exit_code)
}

fn cmd_validate(policy: PolicyArgs) -> Result<i32, GateError> {
    let options = policy.into_options();
    let inputs = options.resolve(&options.load_config()?);
    let validated = inputs.validate()?;

    for advisory in &validated.advisories {
        println!("note: {}", advisory);
    }
    println!(
        "fail-on: {}  warn-on: {}  target: {}",
        validated.policy.fail_on,
        validated.policy.warn_on,
        inputs.target().display()
    );

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, GateError> {
    let path = PathBuf::from(CONFIG_FILE);

    if path.exists() && !force {
        eprintln!("{} already exists. Use --force to overwrite.", CONFIG_FILE);
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created {}", CONFIG_FILE);

    Ok(0)
}
