//! WFS probe CLI
//!
//! Inspects a WFS layer from the command line. Results go to stdout as JSON,
//! logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use wfs_client::{keys, QueryParams, TypeName, WebFeatureService, WfsConfig};

#[derive(Parser, Debug)]
#[command(name = "wfs-probe")]
#[command(about = "Inspect WFS layers: schema, features, temporal extent and data presence")]
struct Cli {
    /// WFS server root; requests go to <url>/wfs
    #[arg(long, env = "WFS_URL", global = true)]
    url: Option<String>,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn", env = "RUST_LOG", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the fields and types of a layer
    Schema {
        /// Layer as workspace:name
        layer: String,
    },

    /// Print features of a layer as a GeoJSON-like collection (no geometry)
    Features {
        /// Layer as workspace:name
        layer: String,

        /// Extra request parameter, e.g. cql_filter="start_time AFTER 2020-01-01T00:00:00Z"
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Maximum number of features to return
        #[arg(short, long)]
        max_features: Option<u32>,
    },

    /// Print the earliest and latest value of a time field
    Extent {
        /// Layer as workspace:name
        layer: String,

        /// Time field to sort on
        #[arg(short, long)]
        field: String,
    },

    /// Print whether any record matches an optional CQL filter
    Present {
        /// Layer as workspace:name
        layer: String,

        /// CQL filter expression
        #[arg(long)]
        cql: Option<String>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

fn load_config(cli: &Cli) -> Result<WfsConfig> {
    let mut config = match &cli.config {
        Some(path) => WfsConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None if std::env::var("WFS_URL").is_ok() => WfsConfig::from_env()?,
        None => WfsConfig::new(String::new()),
    };

    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }

    config
        .validate()
        .context("No usable WFS server: pass --url, set WFS_URL or use --config")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    info!(endpoint = %config.endpoint(), version = %config.wfs_version, "Using WFS server");
    let wfs = WebFeatureService::from_config(&config)?;

    match cli.command {
        Commands::Schema { layer } => {
            let type_name = TypeName::parse(&layer)?;
            let schema = wfs
                .extract_fields_and_types(&type_name.name, &type_name.workspace)
                .await?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Commands::Features {
            layer,
            params,
            max_features,
        } => {
            let type_name = TypeName::parse(&layer)?;
            let schema = wfs
                .extract_fields_and_types(&type_name.name, &type_name.workspace)
                .await?;

            let mut query: QueryParams = params.into_iter().collect();
            if let Some(max) = max_features {
                query.insert(keys::MAX_FEATURES, max);
            }

            let features = wfs
                .get_features_as_json(&type_name.name, &type_name.workspace, &schema, &query)
                .await?;
            info!(count = features.len(), "Retrieved features");
            println!("{}", features.to_json()?);
        }
        Commands::Extent { layer, field } => {
            let type_name = TypeName::parse(&layer)?;
            match wfs
                .find_time_extent(&type_name.name, &type_name.workspace, &field)
                .await
            {
                Ok(extent) => println!("{}", serde_json::to_string_pretty(&extent)?),
                Err(e) if e.is_no_data() => {
                    info!(layer = %type_name, "Layer has no records");
                    println!("null");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Present { layer, cql } => {
            let type_name = TypeName::parse(&layer)?;
            let schema = wfs
                .extract_fields_and_types(&type_name.name, &type_name.workspace)
                .await?;

            let mut filter = QueryParams::new();
            if let Some(cql) = cql {
                filter.insert(keys::CQL_FILTER, cql);
            }

            let present = wfs
                .is_data_present(&type_name.name, &type_name.workspace, &schema, &filter)
                .await;
            println!("{}", present);
        }
    }

    Ok(())
}
