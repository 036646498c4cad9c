//! Catalog products referenced by posts.

use serde::{Deserialize, Serialize};

/// A catalog product. Products belong to the host catalog; posts only expose
/// their SKUs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub entity_id: String,
    pub sku: String,
}

impl Product {
    pub fn new(entity_id: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            sku: sku.into(),
        }
    }
}
