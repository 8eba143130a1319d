use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency units spent per loyalty point earned.
const SPEND_PER_POINT: Decimal = Decimal::TEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerTier {
    New,
    Regular,
    Vip,
}

impl CustomerTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Regular => "Regular",
            Self::Vip => "VIP",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomerError {
    #[error("first and last name are required")]
    MissingName,

    #[error("email '{0}' is not a valid address")]
    InvalidEmail(String),

    #[error("purchase amount must be non-negative, got {0}")]
    NegativePurchase(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub total_purchases: Decimal,
    pub total_orders: u32,
    pub last_purchase: Option<NaiveDate>,
    pub loyalty_points: u32,
    pub tier: CustomerTier,
    pub notes: String,
}

impl Customer {
    /// Creates a customer with no purchase history and the `New` tier.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerError::MissingName`] when either name is blank and
    /// [`CustomerError::InvalidEmail`] when a non-empty email lacks an `@`.
    pub fn new(
        id: u32,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Self, CustomerError> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(CustomerError::MissingName);
        }
        let email = email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err(CustomerError::InvalidEmail(email.to_string()));
        }

        Ok(Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone: String::new(),
            address: String::new(),
            total_purchases: Decimal::ZERO,
            total_orders: 0,
            last_purchase: None,
            loyalty_points: 0,
            tier: CustomerTier::New,
            notes: String::new(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Adds a completed purchase to the customer's history.
    ///
    /// Earns one loyalty point per whole 10 currency units of `amount`. A
    /// `New` customer becomes `Regular`; tiers are otherwise set by staff.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerError::NegativePurchase`] for a negative amount.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use rust_decimal_macros::dec;
    /// use retail_core::{Customer, CustomerTier};
    ///
    /// let mut customer = Customer::new(4, "Sarah", "Wilson", "sarah@example.com").unwrap();
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
    ///
    /// customer.record_purchase(dec!(1726.92), date).unwrap();
    ///
    /// assert_eq!(customer.loyalty_points, 172);
    /// assert_eq!(customer.tier, CustomerTier::Regular);
    /// ```
    pub fn record_purchase(
        &mut self,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<(), CustomerError> {
        if amount < Decimal::ZERO {
            return Err(CustomerError::NegativePurchase(amount));
        }
        let points = (amount / SPEND_PER_POINT)
            .floor()
            .to_u32()
            .unwrap_or(u32::MAX);

        self.total_purchases += amount;
        self.total_orders += 1;
        self.loyalty_points = self.loyalty_points.saturating_add(points);
        self.last_purchase = Some(self.last_purchase.map_or(date, |last| last.max(date)));
        if self.tier == CustomerTier::New {
            self.tier = CustomerTier::Regular;
        }
        Ok(())
    }
}

/// Headline figures for the customer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CustomerSummary {
    pub customers: usize,
    pub vip_customers: usize,
    pub total_revenue: Decimal,
    /// Total revenue divided by customer count; zero with no customers.
    pub average_spend: Decimal,
}

impl CustomerSummary {
    pub fn from_customers(customers: &[Customer]) -> Self {
        let total_revenue: Decimal = customers.iter().map(|c| c.total_purchases).sum();
        let average_spend = if customers.is_empty() {
            Decimal::ZERO
        } else {
            total_revenue / Decimal::from(customers.len())
        };

        Self {
            customers: customers.len(),
            vip_customers: customers
                .iter()
                .filter(|c| c.tier == CustomerTier::Vip)
                .count(),
            total_revenue,
            average_spend,
        }
    }
}
