use analytics::AnalyticsEngine;
use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::Config;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the StockPymes inventory analytics application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine: every setting has a default.
    dotenvy::dotenv().ok();

    // Logs go to stderr so that `analyze` output on stdout stays valid JSON.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args, config),
        Commands::Serve => web_server::run_server(config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Inventory analytics over stock, sales and history CSV files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./config.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze three CSV files and print both JSON views to stdout.
    Analyze(AnalyzeArgs),
    /// Run the HTTP service that accepts the three files as a multipart upload.
    Serve,
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// The stock file (SKU, Producto, Categoría, Talla, Color, Stock, Precio_Unitario, Umbral).
    #[arg(long)]
    stock: PathBuf,

    /// The sales file (Fecha, SKU, Unidades_Vendidas).
    #[arg(long)]
    sales: PathBuf,

    /// The history file (Fecha, SKU, Stock, Unidades_Vendidas, Reposicion, Precio_Unitario, Ingresos_Brutos).
    #[arg(long)]
    history: PathBuf,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => configuration::load_config_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => configuration::load_config()?,
    };
    Ok(config)
}

/// Handles the `analyze` command: files in, JSON out.
fn handle_analyze(args: AnalyzeArgs, config: Config) -> anyhow::Result<()> {
    let engine = AnalyticsEngine::new(config.analytics)?;
    let tables = ingestion::load_tables_from_files(&args.stock, &args.sales, &args.history)?;
    let response = engine.analyze(&tables);

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);
    Ok(())
}
