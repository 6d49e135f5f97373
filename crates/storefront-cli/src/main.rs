mod resolve;
mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use storefront_core::TieBreak;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Resolve product variants the way a product page does")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a product page visit and print the outcome as JSON.
    Resolve {
        /// Product handle, e.g. `dragonfly-lamp`.
        handle: String,

        /// Query string of the visited URL, e.g. `Color=Red&Size=M`.
        #[arg(long, default_value = "")]
        query: String,

        /// Read products from this YAML catalog instead of the configured source.
        #[arg(long, conflicts_with = "shop_url")]
        catalog: Option<PathBuf>,

        /// Fetch products from this Shopify storefront instead of the configured source.
        #[arg(long)]
        shop_url: Option<String>,

        /// Override `STOREFRONT_VARIANT_TIE_BREAK`.
        #[arg(long, value_enum)]
        tie_break: Option<TieBreakArg>,
    },
    /// Load a catalog file and check every product's invariants.
    Validate {
        /// Defaults to `STOREFRONT_CATALOG_PATH`.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TieBreakArg {
    DeclarationOrder,
    PreferAvailable,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::DeclarationOrder => TieBreak::DeclarationOrder,
            TieBreakArg::PreferAvailable => TieBreak::PreferAvailable,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let mut config = storefront_core::load_app_config_from_env()?;

    // stdout carries the JSON result
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            handle,
            query,
            catalog,
            shop_url,
            tie_break,
        } => {
            resolve::apply_source_override(&mut config, catalog, shop_url);
            if let Some(tie_break) = tie_break {
                config.tie_break = tie_break.into();
            }
            let report = resolve::run_resolve(&config, &handle, &query).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Validate { catalog } => {
            let summary = validate::run_validate(&config, catalog)?;
            println!("{summary}");
        }
    }

    Ok(())
}
