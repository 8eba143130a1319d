use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::CartTotals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    DigitalWallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::CreditCard => "card",
            Self::DebitCard => "debit",
            Self::DigitalWallet => "digital",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::CreditCard),
            "debit" => Some(Self::DebitCard),
            "digital" => Some(Self::DigitalWallet),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::DigitalWallet => "Digital Wallet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatus {
    Completed,
    Refunded,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("transaction {0} has already been refunded")]
pub struct RefundError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// A completed checkout.
///
/// `totals` are stored rounded to cents, exactly as printed on the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleTransaction {
    pub id: String,
    pub at: DateTime<Utc>,
    pub customer: Option<String>,
    pub cashier: String,
    pub items: Vec<SaleItem>,
    pub discount_percent: Decimal,
    pub totals: CartTotals,
    pub payment_method: PaymentMethod,
    pub amount_tendered: Option<Decimal>,
    pub change_due: Option<Decimal>,
    pub status: SaleStatus,
}

impl SaleTransaction {
    /// Total units across every item.
    pub fn units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Marks a completed sale as refunded.
    ///
    /// # Errors
    ///
    /// Returns [`RefundError`] if the sale was already refunded.
    pub fn refund(&mut self) -> Result<(), RefundError> {
        if self.status == SaleStatus::Refunded {
            return Err(RefundError(self.id.clone()));
        }
        self.status = SaleStatus::Refunded;
        Ok(())
    }
}

/// Headline figures for the sales history page.
///
/// Refunded transactions are excluded from every figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SalesSummary {
    pub total_sales: Decimal,
    pub transactions: usize,
    /// Total sales divided by transaction count; zero with no sales.
    pub average_ticket: Decimal,
}

impl SalesSummary {
    pub fn from_transactions(transactions: &[SaleTransaction]) -> Self {
        let (total_sales, count) = transactions
            .iter()
            .filter(|t| t.status == SaleStatus::Completed)
            .fold((Decimal::ZERO, 0usize), |(sum, count), t| {
                (sum + t.totals.total, count + 1)
            });

        let average_ticket = if count == 0 {
            Decimal::ZERO
        } else {
            total_sales / Decimal::from(count)
        };

        Self {
            total_sales,
            transactions: count,
            average_ticket,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn transaction(
        id: &str,
        total: Decimal,
        status: SaleStatus,
    ) -> SaleTransaction {
        SaleTransaction {
            id: id.to_string(),
            at: Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap(),
            customer: Some("John Doe".to_string()),
            cashier: "Alice Smith".to_string(),
            items: vec![
                SaleItem {
                    sku: "IPH15-128-BLK".to_string(),
                    name: "iPhone 15 128GB Black".to_string(),
                    quantity: 1,
                    unit_price: dec!(899.00),
                },
                SaleItem {
                    sku: "APP-PRO-2ND".to_string(),
                    name: "AirPods Pro 2nd Gen".to_string(),
                    quantity: 2,
                    unit_price: dec!(249.00),
                },
            ],
            discount_percent: dec!(0),
            totals: CartTotals {
                total,
                ..CartTotals::default()
            },
            payment_method: PaymentMethod::CreditCard,
            amount_tendered: None,
            change_due: None,
            status,
        }
    }

    #[test]
    fn payment_method_round_trips_through_str() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::DigitalWallet,
        ] {
            assert_eq!(PaymentMethod::parse(method.as_str()), Some(method));
        }
        assert_eq!(PaymentMethod::parse("cheque"), None);
    }

    #[test]
    fn units_sums_item_quantities() {
        assert_eq!(transaction("TXN-001", dec!(1), SaleStatus::Completed).units(), 3);
    }

    #[test]
    fn units_does_not_overflow_u32() {
        let mut sale = transaction("TXN-001", dec!(0), SaleStatus::Completed);
        for item in &mut sale.items {
            item.quantity = u32::MAX;
        }

        assert_eq!(sale.units(), sale.items.len() as u64 * u64::from(u32::MAX));
    }

    #[test]
    fn refund_marks_sale_refunded_once() {
        let mut sale = transaction("TXN-004", dec!(1726.92), SaleStatus::Completed);

        sale.refund().unwrap();

        assert_eq!(sale.status, SaleStatus::Refunded);
        assert_eq!(sale.refund(), Err(RefundError("TXN-004".to_string())));
    }

    #[test]
    fn summary_excludes_refunds() {
        let transactions = vec![
            transaction("TXN-001", dec!(1239.84), SaleStatus::Completed),
            transaction("TXN-002", dec!(871.07), SaleStatus::Completed),
            transaction("TXN-003", dec!(786.24), SaleStatus::Completed),
            transaction("TXN-004", dec!(1726.92), SaleStatus::Refunded),
        ];

        let summary = SalesSummary::from_transactions(&transactions);

        assert_eq!(summary.total_sales, dec!(2897.15));
        assert_eq!(summary.transactions, 3);
        assert_eq!(summary.average_ticket.round_dp(2), dec!(965.72));
    }

    #[test]
    fn summary_of_no_sales_is_zero() {
        assert_eq!(SalesSummary::from_transactions(&[]), SalesSummary::default());
    }
}
