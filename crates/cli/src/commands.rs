use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use billcat_catalog::BillingPeriod;

#[derive(Parser)]
#[command(name = "billcat")]
#[command(about = "Validate and query billing catalogs.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct CatalogSource {
    /// Catalog document (JSON)
    #[arg(long, short, env = "BILLCAT_CATALOG")]
    pub catalog: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a catalog and print every problem found
    #[command(alias = "v")]
    Validate {
        #[command(flatten)]
        source: CatalogSource,
        /// Print the errors as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Resolve the plan offered for a product and billing period
    #[command(alias = "p")]
    Plan {
        #[command(flatten)]
        source: CatalogSource,
        #[arg(long)]
        product: String,
        #[arg(long)]
        period: BillingPeriod,
        /// Defaults to the catalog's default price list
        #[arg(long)]
        price_list: Option<String>,
    },
    /// List the add-on plans available on top of a base product
    #[command(alias = "a")]
    Addons {
        #[command(flatten)]
        source: CatalogSource,
        #[arg(long)]
        product: String,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
