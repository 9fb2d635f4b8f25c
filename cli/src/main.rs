use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use cmdline_core::{Command, LoadError, validate_command};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "cmdline")]
#[command(about = "Inspect and exercise declarative command definitions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print the usage text of a command definition.
    Usage(UsageArgs),
    /// Parse tokens against a command definition and print the result as JSON.
    Parse(ParseArgs),
    /// Check a command definition for inconsistencies.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct UsageArgs {
    /// Definition file (YAML or JSON).
    #[arg(long)]
    definition: PathBuf,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Definition file (YAML or JSON).
    #[arg(long)]
    definition: PathBuf,
    /// Report missing values through the `valid` field instead of failing.
    #[arg(long)]
    no_validate: bool,
    /// Print the usage text when the definition's help option is given.
    #[arg(long)]
    usage_on_help: bool,
    /// Tokens to parse (pass them after `--`).
    #[arg(last = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Definition file (YAML or JSON).
    #[arg(long)]
    definition: PathBuf,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        CliCommand::Usage(args) => run_usage(args),
        CliCommand::Parse(args) => run_parse(args),
        CliCommand::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_usage(args: UsageArgs) -> Result<(), String> {
    let command = load_definition(&args.definition)?;
    let mut out = String::new();
    command.usage(&mut out);
    print!("{out}");
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let command = load_definition(&args.definition)?;
    tracing::debug!(
        tokens = args.tokens.len(),
        validate = !args.no_validate,
        "executing parse command"
    );

    let line = command
        .parse_with(&args.tokens, !args.no_validate)
        .map_err(|err| err.to_string())?;

    if args.usage_on_help && line.is_asking_for_help() {
        print!("{}", command.usage_string());
        return Ok(());
    }

    let raw = serde_json::to_string_pretty(&line.to_summary())
        .map_err(|err| format!("Failed to serialize parse result: {err}"))?;
    println!("{raw}");
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let command = Command::read(&args.definition)
        .map_err(|err| describe_load_error(&args.definition, err))?;

    let errors = validate_command(&command);
    if errors.is_empty() {
        println!(
            "Definition '{}' is consistent ({} option(s), {} argument(s)).",
            command.name,
            command.options.len(),
            command.arguments.len()
        );
        return Ok(());
    }

    for err in &errors {
        println!("{err}");
    }
    Err(format!("{} definition problem(s) found", errors.len()))
}

fn load_definition(path: &Path) -> Result<Command, String> {
    Command::load(path).map_err(|err| describe_load_error(path, err))
}

fn describe_load_error(path: &Path, err: LoadError) -> String {
    match err {
        LoadError::Io(err) => format!("Failed to read '{}': {err}", path.display()),
        other => format!("Failed to load '{}': {other}", path.display()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
