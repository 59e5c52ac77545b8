//! Fixture Catalog - CLI Entry Point

use anyhow::Result;
use clap::Parser;
use fixture_catalog::{CatalogConfig, HttpRequest, InteractionCatalog};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "fixture-catalog",
    about = "Contract fixture engine - load recorded interactions and replay stub responses",
    version
)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "fixture-catalog.yaml")]
    config: PathBuf,

    /// Extra fixture document, loaded after the configured ones
    #[arg(short, long = "document", value_name = "PATH")]
    documents: Vec<PathBuf>,

    /// Root directory for fileReference paths
    #[arg(long, value_name = "DIR")]
    external_root: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: Level,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Load all documents, report the interaction count and exit
    #[arg(long)]
    validate: bool,

    /// Method of a request to answer
    #[arg(long, requires = "url")]
    method: Option<String>,

    /// Absolute URL of a request to answer
    #[arg(long, requires = "method")]
    url: Option<String>,

    /// Print the fixture payload of the interaction with this id
    #[arg(long)]
    id: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.print_config {
        let default_config = include_str!("../demos/default-config.yaml");
        println!("{}", default_config);
        return Ok(());
    }

    // Load configuration
    let mut config = if args.config.exists() {
        info!(path = ?args.config, "Loading configuration");
        CatalogConfig::from_file(&args.config)?
    } else if args.validate && args.documents.is_empty() {
        anyhow::bail!("Configuration file not found: {:?}", args.config);
    } else {
        info!("Using default configuration (no documents)");
        CatalogConfig::default()
    };

    config.documents.extend(args.documents);
    if args.external_root.is_some() {
        config.external_root = args.external_root;
    }
    config.validate()?;

    let mut catalog = InteractionCatalog::from_config(&config);

    if args.validate {
        println!(
            "Catalog loaded ({} interactions from {} documents)",
            catalog.len(),
            catalog.file_names().len()
        );
        return Ok(());
    }

    if let Some(id) = &args.id {
        let interaction = catalog
            .interaction_by_id(id)
            .ok_or_else(|| anyhow::anyhow!("No interaction with id {}", id))?;
        println!(
            "{}",
            serde_json::to_string_pretty(&Value::Object(interaction.payload()))?
        );
    }

    if let (Some(method), Some(url)) = (args.method, args.url) {
        let request = HttpRequest::new(method, url);
        let artifact = catalog
            .get_response_artifact(&request)
            .ok_or_else(|| anyhow::anyhow!("No stub response for {} {}", request.method, request.url))?;

        println!("HTTP {}", artifact.status);
        let mut headers: Vec<_> = artifact.headers.iter().collect();
        headers.sort();
        for (name, value) in headers {
            println!("{}: {}", name, value);
        }
        println!();
        println!("{}", String::from_utf8_lossy(&artifact.body));
    }

    Ok(())
}
