pub mod calculations;
pub mod input;
pub mod inventory;
pub mod models;
pub mod search;
pub mod session;

pub use inventory::{Inventory, InventoryError};
pub use models::*;
pub use search::{Searchable, filter_by_search};
pub use session::{CartItem, CheckoutError, CheckoutSession};
