use auth::{Permission, Principal};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::error::{CatalogError, Result};
use crate::model::{Product, ProductDraft};
use crate::store::ProductStore;

const CANNOT_ADD: &str = "Only Admin can add products";
const CANNOT_DELETE: &str = "Only Admin can delete products";

/// Product mutations, each gated on [`Permission::ManageProducts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    Add,
    Delete,
}

impl ProductAction {
    fn denial(self) -> &'static str {
        match self {
            ProductAction::Add => CANNOT_ADD,
            ProductAction::Delete => CANNOT_DELETE,
        }
    }
}

/// Role-checked product operations
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// Decide whether `caller` may perform `action`, before any payload is looked at.
    pub fn authorize(caller: &Principal, action: ProductAction) -> Result<()> {
        if caller.can(Permission::ManageProducts) {
            Ok(())
        } else {
            tracing::debug!(subject = %caller.subject_id, role = %caller.role, ?action, "product mutation forbidden");
            Err(CatalogError::Forbidden(action.denial()))
        }
    }

    /// All active products, newest first. Open to anyone.
    pub async fn list_active(&self) -> Result<Vec<Product>> {
        Ok(self.store.list_active().await?)
    }

    pub async fn create(&self, caller: &Principal, draft: ProductDraft) -> Result<Product> {
        Self::authorize(caller, ProductAction::Add)?;

        let product = Product::new(draft.validate_for_create()?);
        self.store.insert_product(&product).await?;

        tracing::info!(product_id = %product.id, subject = %caller.subject_id, "product created");
        Ok(product)
    }

    /// Delete by id. Deleting an id that does not exist still succeeds.
    pub async fn delete(&self, caller: &Principal, id: &str) -> Result<()> {
        Self::authorize(caller, ProductAction::Delete)?;

        let removed = self.store.delete_product(id).await?;
        tracing::info!(product_id = %id, removed, subject = %caller.subject_id, "product deleted");
        Ok(())
    }

    /// Insert a non-empty JSON array of products in one all-or-nothing batch.
    pub async fn bulk_create(&self, caller: &Principal, body: JsonValue) -> Result<Vec<Product>> {
        Self::authorize(caller, ProductAction::Add)?;

        let items = match body {
            JsonValue::Array(items) if !items.is_empty() => items,
            _ => return Err(CatalogError::Invalid("Send array of products".to_string())),
        };

        let products = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let draft: ProductDraft = match item {
                    JsonValue::Object(_) => serde_json::from_value(item).ok(),
                    _ => None,
                }
                .ok_or_else(|| {
                    CatalogError::Invalid(format!("Product at index {}: name and price required", index))
                })?;
                draft.validate_for_bulk(index).map(Product::new)
            })
            .collect::<Result<Vec<_>>>()?;

        self.store.insert_products(&products).await?;

        tracing::info!(count = products.len(), subject = %caller.subject_id, "products bulk created");
        Ok(products)
    }
}
