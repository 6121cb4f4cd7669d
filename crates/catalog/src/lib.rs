//! Product inventory: records, validation rules and role-checked operations.
//!
//! Reads are open to anyone; every mutation requires the caller's role to
//! carry [`auth::Permission::ManageProducts`].

mod error;

pub mod model;
pub mod service;
pub mod store;

pub use error::{CatalogError, Result};
pub use model::{cast_flag, cast_price, cast_stock, cast_text, coerce_price, CastError, NewProduct, Product, ProductDraft};
pub use service::{ProductAction, ProductService};
pub use store::ProductStore;
