pub mod contract;
pub mod db;
pub mod loader;
pub mod observers;
pub mod paginator;
pub mod provider;
pub mod records;

pub use contract::{content_uri, item_uri, Column, Route};
pub use db::{DbHelper, Selection, SortOrder};
pub use loader::Loader;
pub use observers::{ChangeObserver, SubscriptionId};
pub use paginator::Page;
pub use provider::InventoryProvider;
pub use records::{Product, ProductValues, Value};
