mod category;
mod customer;
mod product;
mod purchase_order;
mod sale;
mod stock_movement;
mod store_settings;
mod supplier;

pub use category::{Category, CategoryError, Classifications, UnitOfMeasure};
pub use customer::{Customer, CustomerError, CustomerSummary, CustomerTier};
pub use product::{NewProduct, Product, ProductError, StockStatus, is_valid_sku};
pub use purchase_order::{
    DraftItem, OrderStatus, OrderTransitionError, PurchaseOrder, PurchaseOrderDraft,
    PurchaseOrderError,
};
pub use sale::{PaymentMethod, RefundError, SaleItem, SaleStatus, SaleTransaction, SalesSummary};
pub use stock_movement::{MovementKind, MovementSummary, StockMovement, StockMovementError};
pub use store_settings::{LoggingSettings, StoreSettings, StoreSettingsError};
pub use supplier::{Supplier, SupplierError, SupplierSpend, SupplierStatus, supplier_spend};
