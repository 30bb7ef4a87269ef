//! coderun CLI
//!
//! A command-line tool for running and grading submitted programs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coderun::{
    Config, EXAMPLE_CONFIG, ExecutionRequest, LanguageId, Runner, SingleRunResult, TestCase,
    TestSuiteResult,
};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coderun")]
#[command(about = "A tool for running and grading submitted programs")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Limits shared by `run` and `test`
#[derive(clap::Args)]
struct LimitArgs {
    /// Wall clock timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Memory limit in MB (recorded, not enforced)
    #[arg(short, long)]
    memory_limit: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration file
    Init {
        /// Output path (default: coderun.toml)
        #[arg(short, long, default_value = "coderun.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run a program once
    Run {
        /// Source file to run
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Language ID (e.g., python, cpp, csharp)
        #[arg(short, long)]
        language: String,

        /// File whose contents are written to the program's stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Run a program against test cases
    Test {
        /// Source file to grade
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Language ID (e.g., python, cpp, csharp)
        #[arg(short, long)]
        language: String,

        /// JSON array of {"input", "expectedOutput"} objects
        #[arg(long)]
        cases: PathBuf,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// List available languages
    Languages,

    /// Show effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    // Logs go to stderr so stdout carries only program output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = if let Some(ref path) = cli.config {
        info!(?path, "loading configuration");
        Config::from_file(path).context("failed to load configuration")?
    } else {
        debug!("using default configuration");
        Config::default()
    };

    match cli.command {
        Commands::Init { output, force } => init_config(&output, force).await,
        Commands::Run {
            source,
            language,
            input,
            limits,
        } => run_once(config, &source, &language, input.as_deref(), &limits).await,
        Commands::Test {
            source,
            language,
            cases,
            limits,
        } => run_tests(config, &source, &language, &cases, &limits).await,
        Commands::Languages => {
            list_languages(&config);
            Ok(())
        }
        Commands::ShowConfig => {
            show_config(&config);
            Ok(())
        }
    }
}

/// Build a request from a source file and the limit flags
async fn build_request(source: &Path, language: &str, limits: &LimitArgs) -> Result<ExecutionRequest> {
    let code = tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("failed to read source file '{}'", source.display()))?;

    let mut request = ExecutionRequest::new(code, language);
    request.timeout_seconds = limits.timeout;
    request.memory_limit_mb = limits.memory_limit;
    Ok(request)
}

async fn run_once(
    config: Config,
    source: &Path,
    language: &str,
    input: Option<&Path>,
    limits: &LimitArgs,
) -> Result<()> {
    let mut request = build_request(source, language, limits).await?;
    if let Some(path) = input {
        let data = tokio::fs::read_to_string(path)
            .await
            .context("failed to read input file")?;
        request = request.with_input(data);
    }
    request.validate().context("invalid request")?;

    info!(language, "running program");
    let result = Runner::new(config).run_once(&request).await;

    if limits.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("failed to serialize result")?
        );
    } else {
        print_single(&result);
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

fn print_single(result: &SingleRunResult) {
    if let Some(ref error) = result.compilation_error {
        eprintln!("Compilation error:\n{error}");
        return;
    }
    if let Some(ref output) = result.output {
        println!("{output}");
    }
    if let Some(ref error) = result.error {
        eprintln!("{error}");
    }
}

async fn run_tests(
    config: Config,
    source: &Path,
    language: &str,
    cases_path: &Path,
    limits: &LimitArgs,
) -> Result<()> {
    let cases_json = tokio::fs::read_to_string(cases_path)
        .await
        .with_context(|| format!("failed to read test cases '{}'", cases_path.display()))?;
    let cases: Vec<TestCase> =
        serde_json::from_str(&cases_json).context("failed to parse test cases")?;

    let request = build_request(source, language, limits)
        .await?
        .with_test_cases(cases);
    request.validate_for_tests().context("invalid request")?;

    info!(language, cases = request.cases().len(), "running test cases");
    let result = Runner::new(config).run_tests(&request).await;

    if limits.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("failed to serialize result")?
        );
    } else {
        print_suite(&result);
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

fn print_suite(result: &TestSuiteResult) {
    if let Some(ref error) = result.compilation_error {
        println!("Compilation error:\n{error}");
    }

    for (index, case) in result.test_results.iter().enumerate() {
        let verdict = if case.passed { "PASS" } else { "FAIL" };
        println!(
            "Test {:>3}: {verdict} ({} ms)",
            index + 1,
            case.execution_time_ms
        );
        if !case.passed {
            println!("  expected: {:?}", case.expected_output.trim());
            if let Some(ref actual) = case.actual_output {
                println!("  actual:   {actual:?}");
            }
            if let Some(ref error) = case.error {
                println!("  error:    {}", error.trim_end());
            }
        }
    }

    println!();
    println!(
        "Passed {}/{} in {} ms",
        result.passed_tests, result.total_tests, result.total_execution_time_ms
    );
}

fn list_languages(config: &Config) {
    println!("Available languages:\n");

    for id in LanguageId::ALL {
        let toolchain = config.toolchains.for_language(id).join(", ");
        println!("  {:<12} {:<22} ({toolchain})", id.as_str(), id.display_name());
    }
}

fn show_config(config: &Config) {
    println!("Scratch root: {}", config.scratch_root().display());
    println!("C# target framework: {}", config.csharp_target_framework);
    println!();
    println!("Default limits:");
    println!("  Timeout: {:?} s", config.default_limits.timeout_seconds);
    println!(
        "  Memory limit: {:?} MB (not enforced)",
        config.default_limits.memory_limit_mb
    );
    println!();
    println!("Toolchains:");
    for (name, program) in config.toolchains.entries() {
        println!("  {name:<8} {program}");
    }
    println!();
    println!("Output filters:");
    for id in LanguageId::ALL {
        if let Some(filter) = config.output_filter(id) {
            println!("  {:<12} {filter:?}", id.as_str());
        }
    }
}

async fn init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at '{}'. Use --force to overwrite.",
            output.display()
        );
    }

    tokio::fs::write(output, EXAMPLE_CONFIG)
        .await
        .context("failed to write configuration file")?;

    println!("Created configuration file at '{}'", output.display());
    Ok(())
}
