mod commands;
mod loader;

use anyhow::Context;

use billcat_catalog::{BillingPeriod, CatalogEntity, CatalogLookup, StandaloneCatalog};
use commands::{CommandLine, Commands};

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    billcat_observability::init();

    match commands.command {
        Commands::Validate { source, json } => validate(&loader::load(&source.catalog)?, json),
        Commands::Plan {
            source,
            product,
            period,
            price_list,
        } => {
            let catalog = loader::load(&source.catalog)?.into_valid()?;
            plan(&catalog, &product, period, price_list.as_deref())
        }
        Commands::Addons { source, product } => {
            let catalog = loader::load(&source.catalog)?.into_valid()?;
            addons(&catalog, &product);
            Ok(())
        }
    }
}

fn validate(loaded: &loader::Loaded, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&loaded.errors)?);
    } else if loaded.errors.is_empty() {
        println!("catalog '{}' is valid", loaded.catalog.catalog_name());
    } else {
        for error in &loaded.errors {
            println!("{error}");
        }
    }

    if !loaded.errors.is_empty() {
        anyhow::bail!("{} validation error(s)", loaded.errors.len());
    }
    Ok(())
}

fn plan(
    catalog: &StandaloneCatalog,
    product: &str,
    period: BillingPeriod,
    price_list: Option<&str>,
) -> anyhow::Result<()> {
    let plan = catalog
        .find_current_plan_for(Some(product), Some(period), price_list)
        .context("resolving plan")?;

    println!("{} (product {}, billed {})", plan.name(), plan.product_name(), plan.billing_period());
    if plan.is_retired() {
        println!("  retired");
    }
    for phase in plan.phases() {
        let duration = phase.duration();
        let name = phase.name().unwrap_or_else(|| phase.phase_type().to_string());
        if duration.is_unlimited() {
            println!("  {name}: unlimited");
        } else {
            println!("  {name}: {} {}", duration.number, duration.unit);
        }
    }
    Ok(())
}

fn addons(catalog: &StandaloneCatalog, product: &str) {
    let listings = catalog.available_addon_listings(Some(product));
    if listings.is_empty() {
        println!("no add-ons available for '{product}'");
    }
    for listing in listings {
        println!("{} in price list {}", listing.plan.name(), listing.price_list.name());
    }
}
