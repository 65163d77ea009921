use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use confstore::{Codec, Document, Format, Provider, StoreConfig, StoreOptions};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// confstore - load and save configuration from files or HTTP endpoints
#[derive(Parser)]
#[command(name = "confstore")]
#[command(about = "Load and save configuration from local files or HTTP(S) endpoints", long_about = None)]
#[command(version)]
struct Cli {
    /// Store configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// HTTP request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Document format
    #[arg(short, long, global = true, value_enum)]
    format: Option<FormatArg>,

    /// Pretty-print documents written by `put`
    #[arg(long, global = true)]
    pretty: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Subcommand)]
enum Commands {
    /// Load a document and print it
    Get {
        /// Local path, file:// URI or http(s):// URL
        path: String,
    },
    /// Save a JSON document to a path
    Put {
        /// Local path, file:// URI or http(s):// URL
        path: String,
        /// JSON input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Show which provider handles a path
    Which {
        /// Path to classify
        path: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Toml,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Format::Json,
            FormatArg::Toml => Format::Toml,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("confstore=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn store_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("Failed to load store configuration {}", path.display()))?,
        None => StoreConfig::default(),
    };

    if let Some(ms) = cli.timeout_ms {
        config.network.timeout_ms = ms;
    }
    if let Some(format) = cli.format {
        config.format = format.into();
    }
    if cli.pretty {
        config.pretty = true;
    }

    debug!("Store configuration: {:?}", config);
    Ok(config)
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// Execute the command. Returns `false` when `which` finds no provider.
fn run(cli: &Cli, out: &mut impl Write) -> Result<bool> {
    let config = store_config(cli)?;
    let options: StoreOptions = config.to_options();

    match &cli.command {
        Commands::Get { path } => {
            let document: Document = confstore::load_with(path, options)
                .with_context(|| format!("Failed to load {}", path))?;
            let printer = config.format.codec(true);
            let rendered = printer
                .encode(&document)
                .with_context(|| format!("Failed to render {} as {}", path, config.format))?;
            out.write_all(&rendered)?;
            if !rendered.ends_with(b"\n") {
                writeln!(out)?;
            }
        }
        Commands::Put { path, input } => {
            let text = read_input(input.as_ref())?;
            let document: Document =
                serde_json::from_str(&text).context("Input is not a JSON document")?;
            confstore::save_with(path, &document, options)
                .with_context(|| format!("Failed to save {}", path))?;
        }
        Commands::Which { path } => {
            let group = confstore::provider_group(options)?;
            match group.provider_for(path) {
                Some(provider) => writeln!(out, "{}", provider.name())?,
                None => {
                    writeln!(out, "none")?;
                    return Ok(false);
                }
            }
        }
    }

    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut stdout = std::io::stdout().lock();
    match run(&cli, &mut stdout) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
