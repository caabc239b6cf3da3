use crate::core::{CatalogApi, Metafield};

/// Metafields attached to one product. Failures are logged and reported as
/// an empty list so one bad product cannot abort a whole export.
pub async fn fetch_metafields<A: CatalogApi + ?Sized>(api: &A, product_id: u64) -> Vec<Metafield> {
    match api.product_metafields(product_id).await {
        Ok(metafields) => metafields,
        Err(e) => {
            tracing::error!("❌ Error getting metafields for product {}: {}", product_id, e);
            Vec::new()
        }
    }
}
