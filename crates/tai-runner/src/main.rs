use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};

use tai_eval::{InterpreterConfig, StdinInput};
use tai_lexer::Lexer;
use tai_runner::{load_config, read_source, run_file, RunOutcome, RunnerError};
use tai_types::SourceFile;

/// Output format for run results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// TaiScript interpreter.
#[derive(Parser)]
#[command(name = "taiscript", version, about = "Run a TaiScript program")]
struct Cli {
    /// Path to the .tai source file
    file: PathBuf,

    /// Output format (text or json)
    #[arg(long, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Print the token stream instead of running
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree instead of running
    #[arg(long, conflicts_with = "tokens")]
    ast: bool,

    /// TOML file with interpreter settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Year used to compound the bribe base cost
    #[arg(long)]
    year: Option<i32>,

    /// Append profile commentary to the output
    #[arg(long)]
    commentary: bool,

    /// Maximum iterations of a single loop
    #[arg(long)]
    loop_limit: Option<u64>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    if cli.tokens || cli.ast {
        dump(&cli.file, cli.ast);
        return;
    }

    match run_file(&cli.file, &config, Box::new(StdinInput)) {
        Ok(outcome) => {
            report(&outcome, cli.output);
            if !outcome.success {
                process::exit(1);
            }
        }
        Err(e) => fail(&e),
    }
}

/// Logs go to stderr so program output on stdout stays clean.
/// Filter with `RUST_LOG`, e.g. `RUST_LOG=tai_eval=debug`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn build_config(cli: &Cli) -> Result<InterpreterConfig, RunnerError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => InterpreterConfig::default(),
    };
    if let Some(year) = cli.year {
        config.bribe.current_year = Some(year);
    }
    if cli.commentary {
        config.commentary = true;
    }
    if let Some(limit) = cli.loop_limit {
        config.loop_iteration_limit = Some(limit);
    }
    Ok(config)
}

fn report(outcome: &RunOutcome, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for line in &outcome.output {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(outcome)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization error: {e}\"}}"));
            println!("{json}");
        }
    }
}

fn dump(path: &Path, ast: bool) {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(e) => fail(&e),
    };
    let source_file = SourceFile::new(path.display().to_string(), source);
    if ast {
        match tai_parser::parse_source(&source_file) {
            Ok(program) => println!("{program:#?}"),
            Err(e) => fail(&e),
        }
        return;
    }
    match Lexer::new(&source_file).lex() {
        Ok(tokens) => {
            for token in tokens {
                println!("{:>4}:{:<4} {}", token.span.line, token.span.col, token.kind);
            }
        }
        Err(e) => fail(&e),
    }
}

fn fail(err: &dyn std::fmt::Display) -> ! {
    println!("Error: {err}");
    process::exit(1);
}
