//! Product categories and units of measure.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::product::Product;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("category name is required")]
    MissingName,

    #[error("unit name is required")]
    MissingUnitName,

    #[error("unit abbreviation is required")]
    MissingAbbreviation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Catalog products filed under this category. See
    /// [`Classifications::refresh_product_counts`].
    pub product_count: usize,
}

impl Category {
    /// Creates an empty category.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::MissingName`] when the name is blank.
    pub fn new(
        id: u32,
        name: &str,
        description: &str,
    ) -> Result<Self, CategoryError> {
        if name.trim().is_empty() {
            return Err(CategoryError::MissingName);
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            product_count: 0,
        })
    }

    /// Case-insensitive match against a product's category.
    pub fn contains(
        &self,
        product: &Product,
    ) -> bool {
        product.category.trim().eq_ignore_ascii_case(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOfMeasure {
    pub id: u32,
    pub name: String,
    /// Short form printed beside quantities, e.g. `pcs` or `kg`.
    pub abbreviation: String,
    pub description: String,
}

impl UnitOfMeasure {
    /// # Errors
    ///
    /// Returns [`CategoryError`] when the name or abbreviation is blank.
    pub fn new(
        id: u32,
        name: &str,
        abbreviation: &str,
        description: &str,
    ) -> Result<Self, CategoryError> {
        if name.trim().is_empty() {
            return Err(CategoryError::MissingUnitName);
        }
        if abbreviation.trim().is_empty() {
            return Err(CategoryError::MissingAbbreviation);
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            abbreviation: abbreviation.trim().to_string(),
            description: description.trim().to_string(),
        })
    }
}

/// The categories and units a catalog can file products under.
///
/// Ids are assigned one past the highest id in use.
///
/// # Example
///
/// ```
/// use retail_core::Classifications;
///
/// let mut classifications = Classifications::new();
/// let audio = classifications.add_category("Audio", "Headphones and speakers").unwrap();
/// classifications.add_unit("Pieces", "pcs", "Individual items").unwrap();
///
/// assert_eq!(classifications.categories().len(), 1);
/// assert!(classifications.remove_category(audio).is_some());
/// assert!(classifications.categories().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Classifications {
    categories: Vec<Category>,
    units: Vec<UnitOfMeasure>,
}

impl Classifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn units(&self) -> &[UnitOfMeasure] {
        &self.units
    }

    /// Adds a category with no products and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::MissingName`] when the name is blank; nothing
    /// is added.
    pub fn add_category(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<u32, CategoryError> {
        let id = next_id(self.categories.iter().map(|c| c.id));
        let category = Category::new(id, name, description)?;
        debug!(id, name = %category.name, "category added");
        self.categories.push(category);
        Ok(id)
    }

    /// Adds a unit of measure and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError`] when the name or abbreviation is blank;
    /// nothing is added.
    pub fn add_unit(
        &mut self,
        name: &str,
        abbreviation: &str,
        description: &str,
    ) -> Result<u32, CategoryError> {
        let id = next_id(self.units.iter().map(|u| u.id));
        let unit = UnitOfMeasure::new(id, name, abbreviation, description)?;
        debug!(id, abbreviation = %unit.abbreviation, "unit added");
        self.units.push(unit);
        Ok(id)
    }

    pub fn remove_category(
        &mut self,
        id: u32,
    ) -> Option<Category> {
        let index = self.categories.iter().position(|c| c.id == id)?;
        debug!(id, "category removed");
        Some(self.categories.remove(index))
    }

    pub fn remove_unit(
        &mut self,
        id: u32,
    ) -> Option<UnitOfMeasure> {
        let index = self.units.iter().position(|u| u.id == id)?;
        debug!(id, "unit removed");
        Some(self.units.remove(index))
    }

    /// Recounts each category's products from `products`.
    ///
    /// Products whose category matches no entry are not counted anywhere.
    pub fn refresh_product_counts(
        &mut self,
        products: &[Product],
    ) {
        for category in &mut self.categories {
            category.product_count = products.iter().filter(|p| category.contains(p)).count();
        }
    }
}

fn next_id(ids: impl Iterator<Item = u32>) -> u32 {
    ids.max().map_or(1, |max| max.saturating_add(1))
}
