use std::io::Read;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use exportsmart::genai::ExportAdvisor;
use exportsmart::models::destinations::{is_known_destination, TOP_DESTINATIONS};
use exportsmart::models::{
    lookup_agreement, Currency, ExportRequest, IdentificationMode, Incoterm, TransportMode,
};
use exportsmart::ProductField;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "exportsmart", about = "Export landed-cost simulator")]
struct Cli {
    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, global = true, default_value = "config/exportsmart.toml")]
    config: PathBuf,

    /// Log output format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the trade agreement between Brazil/Mercosur and a country
    Agreement { country: String },
    /// List common export destinations
    Destinations,
    /// List the supported Incoterms
    Incoterms,
    /// Identify a product's HS code from a description, or describe an HS code
    Identify {
        input: String,
        #[arg(long, default_value = "description")]
        mode: IdentificationMode,
    },
    /// Run a landed-cost simulation
    Analyze(AnalyzeArgs),
    /// Manage saved simulations
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Read an ExportRequest JSON from a file, or `-` for stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Identify the product from this text before analyzing
    #[arg(long)]
    identify: Option<String>,

    /// What `--identify` contains
    #[arg(long, default_value = "description")]
    mode: IdentificationMode,

    #[arg(long)]
    destination: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    hs_code: Option<String>,
    #[arg(long)]
    transport: Option<TransportMode>,
    /// Code (FOB) or full label
    #[arg(long)]
    incoterm: Option<Incoterm>,
    #[arg(long)]
    currency: Option<Currency>,
    #[arg(long)]
    fob: Option<Decimal>,
    /// Zero or absent: estimated
    #[arg(long)]
    freight: Option<Decimal>,
    /// Zero or absent: estimated
    #[arg(long)]
    insurance: Option<Decimal>,

    /// Save the simulation to history after a successful analysis
    #[arg(long)]
    save: bool,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// Print every saved simulation, newest first
    List,
    /// Print one saved simulation
    Show { id: Uuid },
    /// Delete a saved simulation
    Delete { id: Uuid },
    /// Delete every saved simulation
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = exportsmart::load_config(&cli.config)?;

    match cli.command {
        Command::Agreement { country } => match lookup_agreement(&country) {
            Some(agreement) => print_json(agreement, cli.pretty)?,
            None => println!(
                "No preferential trade agreement with {}: MFN tariffs apply.",
                country.trim()
            ),
        },
        Command::Destinations => {
            for destination in TOP_DESTINATIONS {
                println!("{destination}");
            }
        }
        Command::Incoterms => {
            for incoterm in Incoterm::ALL {
                println!("{}\t{}", incoterm.code(), incoterm.label());
            }
        }
        Command::Identify { input, mode } => {
            let advisor = ExportAdvisor::from_config(&config.generation)?;
            let identification = advisor
                .identify_product(&input, mode)
                .await
                .context("Identification failed")?;
            print_json(&identification, cli.pretty)?;
        }
        Command::Analyze(args) => analyze(&config, args, cli.pretty).await?,
        Command::History(command) => history(&config, command, cli.pretty)?,
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    // Respects RUST_LOG
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn analyze(
    config: &exportsmart::models::SimulatorConfig,
    args: AnalyzeArgs,
    pretty: bool,
) -> Result<()> {
    let mut simulator =
        exportsmart::build_simulator(config).context("Failed to build simulator")?;

    if let Some(input) = &args.input {
        let form: ExportRequest =
            serde_json::from_str(&read_input(input)?).context("Failed to parse ExportRequest JSON")?;
        simulator.load_form(form);
    }

    if let Some(text) = &args.identify {
        simulator.set_input_mode(args.mode);
        simulator.set_identification_input(text.as_str());
        if simulator.identify_product().await?.is_none() {
            if let Some(message) = &simulator.state().error_message {
                bail!("{message}");
            }
        }
    }

    if let Some(destination) = args.destination {
        simulator.set_destination(destination);
    }
    if let Some(description) = args.description {
        simulator.set_field(ProductField::Description, description)?;
    }
    if let Some(hs_code) = args.hs_code {
        simulator.set_field(ProductField::HsCode, hs_code)?;
    }
    if let Some(mode) = args.transport {
        simulator.select_transport(mode);
    }
    if let Some(incoterm) = args.incoterm {
        simulator.set_incoterm(incoterm);
    }
    if let Some(currency) = args.currency {
        simulator.set_currency(currency);
    }
    if let Some(fob) = args.fob {
        simulator.set_fob_value(fob);
    }
    if let Some(freight) = args.freight {
        simulator.set_freight_cost(freight);
    }
    if let Some(insurance) = args.insurance {
        simulator.set_insurance_cost(insurance);
    }

    let destination = simulator.form().destination.trim();
    if !destination.is_empty() && !is_known_destination(destination) {
        info!(destination, "Destination is not among the common destinations, check the spelling");
    }

    if let Some(agreement) = simulator.agreement_banner() {
        info!(agreement = agreement.name, status = %agreement.status, "Trade agreement detected");
    }

    simulator.submit().await?;

    {
        let state = simulator.state();
        let analysis = state.analysis.as_ref().ok_or_else(|| {
            anyhow!(state
                .error_message
                .clone()
                .unwrap_or_else(|| "Simulation produced no result".to_string()))
        })?;
        if let Some(peak) = analysis.peak_month() {
            info!(total_usd = ?analysis.total_raw_cost(), peak_month = %peak.month, "Analysis summary");
        }
        print_json(analysis, pretty)?;
    }

    if args.save {
        let saved = simulator.save()?;
        eprintln!("Saved simulation {}", saved.id);
    }

    Ok(())
}

fn history(
    config: &exportsmart::models::SimulatorConfig,
    command: HistoryCommand,
    pretty: bool,
) -> Result<()> {
    let history = exportsmart::open_history(config).context("Failed to open history storage")?;

    match command {
        HistoryCommand::List => print_json(&history.load_all(), pretty)?,
        HistoryCommand::Show { id } => {
            let saved = history
                .get(id)
                .ok_or_else(|| anyhow!("Simulation not found: {id}"))?;
            print_json(&saved, pretty)?;
        }
        HistoryCommand::Delete { id } => {
            let remaining = history.delete_by_id(id)?;
            println!("{} saved simulation(s) remaining", remaining.len());
        }
        HistoryCommand::Clear => {
            history.clear()?;
            println!("History cleared");
        }
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read input: {input}"))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}
