//! Free-text search over list pages.

use std::borrow::Cow;

use crate::models::{
    Category, Customer, Product, PurchaseOrder, SaleTransaction, Supplier, UnitOfMeasure,
};

/// An entity that a search box can match against.
pub trait Searchable {
    /// The text fields a search term is matched against.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Case-insensitive substring match on any search field.
    ///
    /// A blank term matches everything.
    fn matches(
        &self,
        term: &str,
    ) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.name.as_str()), Cow::Borrowed(self.sku.as_str())]
    }
}

impl Searchable for PurchaseOrder {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.po_number.as_str()), Cow::Borrowed(self.supplier.as_str())]
    }
}

impl Searchable for Supplier {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.contact_person.as_str()),
            Cow::Borrowed(self.email.as_str()),
        ]
    }
}

impl Searchable for Customer {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Owned(self.full_name()), Cow::Borrowed(self.email.as_str())]
    }
}

impl Searchable for Category {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.name.as_str())]
    }
}

impl Searchable for UnitOfMeasure {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.name.as_str()), Cow::Borrowed(self.abbreviation.as_str())]
    }
}

impl Searchable for SaleTransaction {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![Cow::Borrowed(self.id.as_str())];
        if let Some(customer) = &self.customer {
            fields.push(Cow::Borrowed(customer.as_str()));
        }
        fields
    }
}

/// Returns the items matching `term`, in their original order.
///
/// # Example
///
/// ```
/// use retail_core::{Supplier, filter_by_search};
///
/// let suppliers = vec![
///     Supplier::new(1, "Apple Inc.", "John Smith", "orders@apple.com").unwrap(),
///     Supplier::new(2, "Samsung Electronics", "Sarah Johnson", "supply@samsung.com").unwrap(),
/// ];
///
/// let found = filter_by_search(&suppliers, "SAMSUNG");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].id, 2);
/// assert_eq!(filter_by_search(&suppliers, "").len(), 2);
/// ```
pub fn filter_by_search<'a, T: Searchable>(
    items: &'a [T],
    term: &str,
) -> Vec<&'a T> {
    items.iter().filter(|item| item.matches(term)).collect()
}
