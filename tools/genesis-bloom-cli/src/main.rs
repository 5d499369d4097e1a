//! create-bloom-filter: Bloom filter over the public keys of a genesis file
//!
//! ```text
//! create-bloom-filter -i genesis.json -o filter.bin -n 3 -s 8388608 -a sha256
//! create-bloom-filter verify -i genesis.json -f filter.bin
//! create-bloom-filter query -f filter.bin GPH6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV
//! ```
//!
//! The artifact goes to `--output` (stdout by default); diagnostics always go
//! to stderr.

mod config;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use genesis_bloom::{
    ArtifactSink, FileSink, FilterBuild, FilterBuildApi, FilterBuildService, FilterConfig,
    GenesisKeySource, KeyFilter, WriterSink,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{load_config, FilterArgs};

/// Build a Bloom filter over every public key in a genesis file
#[derive(Parser, Debug)]
#[command(name = "create-bloom-filter", version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    build: BuildArgs,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the filter (the default when no command is given)
    Build(BuildArgs),
    /// Rebuild from a genesis file and compare with an existing artifact
    Verify(VerifyArgs),
    /// Test keys against an existing artifact
    Query(QueryArgs),
}

#[derive(Args, Debug, Clone)]
struct BuildArgs {
    /// Input genesis file, `-` for stdin
    #[arg(short, long, value_name = "IN", default_value = "-")]
    input: String,

    /// Output filter file, `-` for stdout
    #[arg(short, long, value_name = "OUT", default_value = "-")]
    output: String,

    #[command(flatten)]
    filter: FilterArgs,

    /// Hash keys on all cores
    #[arg(long)]
    parallel: bool,

    /// Print statistics as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct VerifyArgs {
    /// Input genesis file, `-` for stdin
    #[arg(short, long, value_name = "IN", default_value = "-")]
    input: String,

    /// Existing filter artifact
    #[arg(short, long, value_name = "FILTER")]
    filter_file: PathBuf,

    #[command(flatten)]
    filter: FilterArgs,

    /// Hash keys on all cores
    #[arg(long)]
    parallel: bool,
}

#[derive(Args, Debug, Clone)]
struct QueryArgs {
    /// Existing filter artifact
    #[arg(short, long, value_name = "FILTER")]
    filter_file: PathBuf,

    #[command(flatten)]
    filter: FilterArgs,

    /// Keys to test
    #[arg(required = true)]
    keys: Vec<String>,
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout may carry the artifact, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn genesis_reader(input: &str) -> Result<Box<dyn Read>> {
    if input == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file =
        fs::File::open(input).with_context(|| format!("cannot open genesis file {input}"))?;
    Ok(Box::new(io::BufReader::new(file)))
}

fn run_service<W: ArtifactSink>(
    input: &str,
    sink: W,
    config: FilterConfig,
    parallel: bool,
) -> Result<FilterBuild> {
    let source = GenesisKeySource::new(genesis_reader(input)?);
    let mut service = FilterBuildService::new(source, sink, config).with_parallel(parallel);
    service.run().context("filter build failed")
}

fn print_stats(filter: &FilterBuild, json: bool) -> Result<()> {
    if json {
        let stats = serde_json::json!({
            "keys": filter.key_count(),
            "config": filter.config(),
            "report": filter.report(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        eprintln!("got {} distinct keys", filter.key_count());
        eprintln!("{}", filter.report());
    }
    Ok(())
}

fn load_filter(path: &Path, config: FilterConfig) -> Result<KeyFilter> {
    let bytes = fs::read(path).with_context(|| format!("cannot read filter {}", path.display()))?;
    KeyFilter::from_bytes(bytes, config)
        .with_context(|| format!("{} does not fit the configured bit size", path.display()))
}

fn build(args: BuildArgs) -> Result<()> {
    let config = load_config(&args.filter)?;
    debug!(?config, input = %args.input, output = %args.output, "Starting build");

    let filter = if args.output == "-" {
        let sink = WriterSink::new(io::stdout().lock());
        run_service(&args.input, sink, config, args.parallel)?
    } else {
        run_service(&args.input, FileSink::new(&args.output), config, args.parallel)?
    };

    print_stats(&filter, args.json)
}

fn verify(args: VerifyArgs) -> Result<()> {
    let config = load_config(&args.filter)?;
    let existing = load_filter(&args.filter_file, config.clone())?;

    let rebuilt = run_service(&args.input, Vec::new(), config, args.parallel)?;

    let expected = rebuilt.buffer().as_bytes();
    let actual = existing.buffer().as_bytes();
    let differing = expected.iter().zip(actual).filter(|(e, a)| e != a).count();
    if differing > 0 {
        bail!(
            "{} differs from the rebuilt filter in {} of {} bytes",
            args.filter_file.display(),
            differing,
            expected.len()
        );
    }

    eprintln!(
        "{} matches: {} keys, w={}",
        args.filter_file.display(),
        rebuilt.key_count(),
        rebuilt.report().weight
    );
    Ok(())
}

fn query(args: QueryArgs) -> Result<()> {
    let config = load_config(&args.filter)?;
    let filter = load_filter(&args.filter_file, config)?;

    for key in &args.keys {
        let verdict = if filter.contains(key) { "maybe" } else { "absent" };
        println!("{key}\t{verdict}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Some(Command::Build(args)) => build(args),
        Some(Command::Verify(args)) => verify(args),
        Some(Command::Query(args)) => query(args),
        None => build(cli.build),
    }
}
