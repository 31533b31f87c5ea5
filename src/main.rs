#![allow(non_snake_case)]
use DerivativeXpert::Utils::config::AppConfig;
use DerivativeXpert::Utils::logger::{init_logger, parse_level};
use DerivativeXpert::Utils::plots::BackendKind;
use DerivativeXpert::calculus::analysis::AnalysisFacade;
use DerivativeXpert::calculus::basic_calc::BasicCalculator;
use DerivativeXpert::calculus::function::ScalarExpression;
use DerivativeXpert::cli::shell::{InteractiveShell, analysis_report, parse_interval};
use DerivativeXpert::error::CalcResult;
use DerivativeXpert::symbolic::symbolic_engine::format_number;
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML settings file
    #[arg(long, default_value = "derivative_xpert.toml")]
    config: PathBuf,
    /// log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
    /// also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// plot backend: plotters or gnuplot
    #[arg(long)]
    backend: Option<BackendKind>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive calculator (the default)
    Shell,
    /// Evaluate a constant expression
    Eval {
        /// expression without variables, e.g. "2*sin(pi/6) + log(8, 2)"
        expression: String,
    },
    /// Print a full analysis of a function of one variable
    Analyze {
        /// the function, e.g. "x^3 - 3*x"
        expression: String,
        /// restrict point and interval queries to [a, b]
        #[arg(long)]
        interval: Option<String>,
    },
}

/// Settings from the file and the flags; the flag is false when the file is missing.
fn load_config(cli: &Cli) -> CalcResult<(AppConfig, bool)> {
    let loaded = AppConfig::load(&cli.config)?;
    let found = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    if let Some(level) = &cli.log_level {
        config.logging.level = parse_level(level)?;
    }
    if let Some(file) = &cli.log_file {
        config.logging.file = Some(file.clone());
    }
    if let Some(backend) = cli.backend {
        config.plot.backend = backend;
    }
    Ok((config, found))
}

fn run(cli: Cli) -> CalcResult<()> {
    let (config, found) = load_config(&cli)?;
    init_logger(&config.log_settings())?;
    if !found {
        warn!("config file {} not found, using defaults", cli.config.display());
    }
    info!("settings: {:?}", config);
    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let stdin = io::stdin();
            let mut shell = InteractiveShell::new(stdin.lock(), io::stdout(), &config);
            shell.run()
        }
        Commands::Eval { expression } => {
            let calc = BasicCalculator::new(&expression)?;
            println!("{}", format_number(calc.evaluate_expression()).0);
            Ok(())
        }
        Commands::Analyze { expression, interval } => {
            let f = ScalarExpression::create(&expression)?
                .with_domain_check(config.analysis.domain_check);
            let interval = match interval {
                Some(text) => parse_interval(&text)?,
                None => None,
            };
            let analysis = AnalysisFacade::with_config(config.analysis_config());
            println!("{}", analysis_report(&analysis, &f, interval));
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
