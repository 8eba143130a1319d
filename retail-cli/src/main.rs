use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use retail_core::input::parse_amount;
use tracing::{debug, info};

use retail_cli::{commands, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Point-of-sale and back-office calculations for a retail store.
///
/// Reads catalogs, carts and purchase order lines from CSV files and prices
/// them with the tax rate from the store settings.
#[derive(Debug, Parser)]
#[command(name = "retail-pos", version, about)]
struct Cli {
    /// Store settings file (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price a saved cart and work out the change due.
    Quote {
        /// Cart file: sku,name,unit_price,quantity
        #[arg(long)]
        cart: PathBuf,

        /// Discount percentage, e.g. `10` or `10%`. Clamped to 0..=100.
        #[arg(long)]
        discount: Option<String>,

        /// Amount handed over by the customer.
        #[arg(long)]
        tendered: Option<String>,
    },

    /// Total a purchase order.
    OrderTotal {
        /// Line file: product,quantity_ordered,unit_cost[,quantity_received]
        #[arg(long)]
        lines: PathBuf,
    },

    /// Show products at or below their reorder point and the stock value.
    Stock {
        /// Catalog file: sku,name,category,supplier,cost_price,selling_price,quantity,min_stock,description
        #[arg(long)]
        catalog: PathBuf,
    },
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();

    let settings = retail_data::load_settings(cli.settings.as_deref()).with_context(|| {
        match &cli.settings {
            Some(path) => format!("Failed to load settings: {}", path.display()),
            None => "Failed to load default settings".to_string(),
        }
    })?;

    logging::apply_configured_level(settings.logging.level.as_deref())?;
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| settings.logging.file.as_ref().map(PathBuf::from));
    if let Some(path) = &log_file {
        logging::attach_log_file(path)?;
    }

    debug!(command = ?cli.command, "running");
    let report = match &cli.command {
        Command::Quote {
            cart,
            discount,
            tendered,
        } => {
            let mut session = retail_data::load_cart_from_file(cart)
                .with_context(|| format!("Failed to load cart: {}", cart.display()))?;
            if let Some(discount) = discount {
                session.set_discount_input(discount);
            }
            session.set_amount_tendered(tendered.as_deref().map(parse_amount));
            commands::render_quote(&settings, &session)
        }
        Command::OrderTotal { lines } => {
            let lines = retail_data::load_order_lines_from_file(lines)
                .with_context(|| format!("Failed to load order lines: {}", lines.display()))?;
            commands::render_order_total(&settings, &lines)
        }
        Command::Stock { catalog } => {
            let inventory = retail_data::load_catalog_from_file(catalog)
                .with_context(|| format!("Failed to load catalog: {}", catalog.display()))?;
            commands::render_stock(&settings, &inventory)
        }
    };

    print!("{report}");
    info!(store = %settings.name, "report printed");
    Ok(())
}
