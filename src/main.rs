//! KNX to Home Assistant Translator - command line entry point
//!
//! Reads a KNX ESF export and writes one artifact:
//! - `csv`: every group address with its classification
//! - `ha`: `knx:` block for copying into `configuration.yaml`
//! - `yaml`: the same block as a file for `!include`
//! - `buttons`: dashboard cards for all lights and covers

use clap::Parser;
use knx_ha_translator::{
    io::{ensure_extension, read_lines, resolve_output_path, write_artifact},
    aggregate_covers, parse_with_summary, render::render_with_groups, NameTable, OutputFormat,
    Result, TranslatorConfig, TranslatorError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Translator command line
#[derive(Parser, Debug)]
#[command(name = "knx-ha-translator")]
#[command(about = "Translate KNX ESF exports into Home Assistant configuration")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// ESF export to translate (must end with .esf)
    input: PathBuf,

    /// Output file; defaults to a name derived from the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: csv, ha, yaml or buttons
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Name overrides (ID,Name CSV)
    #[arg(long, env = "KNX_HA_NAMES")]
    names: Option<PathBuf>,

    /// Configuration overrides (Key,Value CSV)
    #[arg(long, env = "KNX_HA_CONFIG")]
    config: Option<PathBuf>,

    /// Print a JSON summary of the translation to stdout
    #[arg(long)]
    summary: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Initialize logging based on debug flag
    fn initialize_logging(&self) {
        let filter = if self.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }

    /// Validate file arguments before anything is read
    fn validate(&self) -> Result<()> {
        ensure_extension(&self.input, ".esf", "Input file")?;
        if !self.input.is_file() {
            return Err(TranslatorError::invalid_input(format!(
                "File '{}' does not exist",
                self.input.display()
            )));
        }
        if let Some(names) = &self.names {
            ensure_extension(names, ".csv", "Names file")?;
        }
        if let Some(config) = &self.config {
            ensure_extension(config, ".csv", "Configuration file")?;
            if config.file_name().and_then(|name| name.to_str()) != Some("config.csv") {
                warn!("Configuration file should be named 'config.csv' for consistency");
            }
        }
        Ok(())
    }

    fn load_config(&self) -> Result<TranslatorConfig> {
        let config = match &self.config {
            Some(path) => TranslatorConfig::from_table_file(path)?,
            None => TranslatorConfig::default(),
        };
        config.validate();
        Ok(config)
    }

    fn load_names(&self) -> Result<Option<NameTable>> {
        self.names.as_ref().map(NameTable::from_file).transpose()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.initialize_logging();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.code();
            error!("{} (error {}, {})", e, code.as_number(), code.category());
            ExitCode::from(code.exit_status())
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    cli.validate()?;

    // Tables are loaded before the output is touched so a bad table leaves no partial file
    let config = cli.load_config()?;
    let names = cli.load_names()?;

    let format = cli.format.unwrap_or(config.default_output_format);
    let output_path = resolve_output_path(&cli.input, cli.output.as_deref(), format)?;

    let lines = read_lines(&cli.input)?;
    let (records, summary) = parse_with_summary(&lines, names.as_ref(), &config);
    let groups = aggregate_covers(&records, &config);
    let summary = summary.with_covers(&groups);
    let artifact = render_with_groups(format, &records, &groups, &config)?;
    write_artifact(&output_path, &artifact, format)?;

    if !summary.unresolved_roles.is_empty() {
        warn!(
            "{} cover roles could not be resolved and were written as MISSING",
            summary.unresolved_roles.len()
        );
    }
    info!("Conversion complete. Output written to: {}", output_path.display());

    if format == OutputFormat::Yaml {
        println!(
            "You can now include the file from your main Home Assistant configuration using: \
             'homeassistant: packages: knx_import: !include {}'",
            output_path.display()
        );
    }
    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
