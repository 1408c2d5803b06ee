use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eurocross::app;
use eurocross::clock::SystemClock;
use eurocross::config::{default_config_path, Config, OutputFormat, SourceKind};
use eurocross::models::Currency;

#[derive(Parser)]
#[command(name = "eurocross")]
#[command(version, about = "Daily cross rates triangulated through EUR reference rates")]
struct Cli {
    /// Path to config file (defaults to ./eurocross.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch rates and write the cross-rate table
    Rates(RatesArgs),
    /// Show the resolved configuration
    Config,
}

#[derive(clap::Args)]
struct RatesArgs {
    /// First day of the range (YYYY-MM-DD). Defaults to a week before --to.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Day after the last day of the range (YYYY-MM-DD). Defaults to tomorrow.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// "From" currencies, comma separated. Defaults to the config, then the universe.
    #[arg(long, value_delimiter = ',')]
    base: Vec<Currency>,

    /// "To" currencies, comma separated. Defaults to the config, then the universe.
    #[arg(long, value_delimiter = ',')]
    quote: Vec<Currency>,

    /// Extra days fetched before --from for carry-forward
    #[arg(long)]
    lookback: Option<u32>,

    /// Rate feed to use
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// Override the feed's base URL
    #[arg(long)]
    source_url: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Round values to this many decimal places
    #[arg(long)]
    decimals: Option<u32>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let layer = fmt::layer().with_writer(io::stderr).with_target(verbose);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer).init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let mut config = Config::load_or_default(&config_path)?;

    match cli.command {
        Command::Config => {
            let output = app::config_output(&config_path, &config);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Rates(args) => {
            if let Some(lookback) = args.lookback {
                config.request.lookback_days = lookback;
            }
            if let Some(kind) = args.source {
                config.source.kind = kind;
            }
            if let Some(url) = args.source_url {
                config.source.base_url = Some(url);
            }
            if let Some(format) = args.format {
                config.output.format = format;
            }
            if let Some(decimals) = args.decimals {
                config.output.decimals = Some(decimals);
            }

            let (from, to) = app::resolve_range(args.from, args.to, &SystemClock)?;
            let request = app::build_request(&config, from, to, args.base, args.quote);
            let source = config.source.build();

            let output = args.output;
            let open = move || -> Result<Box<dyn Write>> {
                let out: Box<dyn Write> = match &output {
                    Some(path) => Box::new(BufWriter::new(File::create(path).with_context(
                        || format!("Failed to create output file: {}", path.display()),
                    )?)),
                    None => Box::new(BufWriter::new(io::stdout().lock())),
                };
                Ok(out)
            };

            let result = app::run_rates(&config, source, &request, open).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "rates run failed");
            }
            result?;
        }
    }

    Ok(())
}
