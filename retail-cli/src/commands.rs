//! Report rendering for the `retail-pos` subcommands.
//!
//! Each renderer takes data that is already loaded and returns the text to
//! print, so the reports can be tested without touching the filesystem.

use std::fmt::Write;

use retail_core::calculations::{PurchaseOrderLine, compute_order_total};
use retail_core::{CheckoutSession, Inventory, StoreSettings};
use rust_decimal::Decimal;
use tracing::warn;

use crate::format::{format_currency, format_percent};

/// Renders cart totals, and change due when an amount was tendered.
///
/// Tax is charged at the store's configured rate.
pub fn render_quote(
    settings: &StoreSettings,
    session: &CheckoutSession,
) -> String {
    let symbol = settings.currency_symbol();
    let money = |amount: Decimal| format_currency(amount, symbol);
    let totals = session.totals(settings.tax_rate()).rounded();

    let mut out = String::new();
    let _ = writeln!(out, "{}", settings.name);
    let _ = writeln!(out, "Quote");
    let _ = writeln!(out);

    for item in session.items() {
        let _ = writeln!(
            out,
            "{:<16} {:<32} {:>4} x {:>12} {:>14}",
            item.sku,
            item.name,
            item.quantity(),
            money(item.unit_price()),
            money(item.line_total()),
        );
    }
    if session.is_empty() {
        let _ = writeln!(out, "(cart is empty)");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<24} {:>14}", "Subtotal:", money(totals.subtotal));
    if session.discount_percent() > Decimal::ZERO {
        let label = format!("Discount ({}):", format_percent(session.discount_percent()));
        let _ = writeln!(out, "{:<24} {:>14}", label, money(-totals.discount_amount));
    }
    let tax_label = format!("Tax ({}):", format_percent(settings.tax_rate_percent));
    let _ = writeln!(out, "{:<24} {:>14}", tax_label, money(totals.tax_amount));
    let _ = writeln!(out, "{:<24} {:>14}", "Total:", money(totals.total));

    if let (Some(tendered), Some(change)) =
        (session.amount_tendered(), session.change_due(settings.tax_rate()))
    {
        let _ = writeln!(out, "{:<24} {:>14}", "Tendered:", money(tendered));
        if change < Decimal::ZERO {
            warn!(total = %totals.total, %tendered, "tendered amount does not cover the total");
            let _ = writeln!(out, "{:<24} {:>14}", "Insufficient payment:", money(-change));
        } else {
            let _ = writeln!(out, "{:<24} {:>14}", "Change due:", money(change));
        }
    }

    out
}

/// Renders each purchase order line and the order total.
pub fn render_order_total(
    settings: &StoreSettings,
    lines: &[PurchaseOrderLine],
) -> String {
    let symbol = settings.currency_symbol();

    let mut out = String::new();
    for line in lines {
        let _ = writeln!(
            out,
            "{:<32} {:>6} x {:>12} {:>14}",
            line.product(),
            line.quantity_ordered(),
            format_currency(line.unit_cost(), symbol),
            format_currency(line.line_total(), symbol),
        );
    }
    let _ = writeln!(
        out,
        "{:<32} {:>36}",
        "Order total:",
        format_currency(compute_order_total(lines), symbol)
    );
    out
}

/// Renders the low-stock report followed by the inventory value.
pub fn render_stock(
    settings: &StoreSettings,
    inventory: &Inventory,
) -> String {
    let low = inventory.low_stock();

    let mut out = String::new();
    if low.is_empty() {
        let _ = writeln!(out, "All {} products are in stock.", inventory.products().len());
    } else {
        let _ = writeln!(out, "Low stock ({} of {} products)", low.len(), inventory.products().len());
        for product in low {
            let _ = writeln!(
                out,
                "{:<16} {:<32} {:>5} on hand (min {:>3})  {}",
                product.sku,
                product.name,
                product.quantity,
                product.min_stock,
                product.stock_status().label(),
            );
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Inventory value: {}",
        format_currency(inventory.inventory_value(), settings.currency_symbol())
    );
    out
}
