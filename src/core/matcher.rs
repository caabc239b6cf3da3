use crate::core::{ExportRecord, Product};
use crate::domain::model::HandleCollision;
use std::collections::HashMap;

#[derive(Debug, PartialEq)]
pub enum Match<'a> {
    Found(&'a Product),
    NotFound,
}

/// Destination products indexed by handle. When several products share a
/// handle the last one listed wins; the clash is kept in `collisions`.
pub struct HandleMatcher {
    by_handle: HashMap<String, Product>,
    collisions: Vec<HandleCollision>,
}

impl HandleMatcher {
    pub fn new(products: Vec<Product>) -> Self {
        let mut by_handle: HashMap<String, Product> = HashMap::with_capacity(products.len());
        let mut seen: HashMap<String, Vec<u64>> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for product in products {
            let ids = seen.entry(product.handle.clone()).or_default();
            if ids.len() == 1 {
                order.push(product.handle.clone());
            }
            ids.push(product.id);
            by_handle.insert(product.handle.clone(), product);
        }

        let collisions = order
            .into_iter()
            .map(|handle| {
                let product_ids = seen.remove(&handle).unwrap_or_default();
                HandleCollision {
                    handle,
                    product_ids,
                }
            })
            .collect();

        Self {
            by_handle,
            collisions,
        }
    }

    pub fn resolve(&self, record: &ExportRecord) -> Match<'_> {
        if record.handle.is_empty() {
            return Match::NotFound;
        }
        match self.by_handle.get(&record.handle) {
            Some(product) => Match::Found(product),
            None => Match::NotFound,
        }
    }

    /// Number of distinct handles that can be resolved.
    pub fn handle_count(&self) -> usize {
        self.by_handle.len()
    }

    /// Handles shared by more than one destination product, in first-seen order.
    pub fn collisions(&self) -> &[HandleCollision] {
        &self.collisions
    }
}
