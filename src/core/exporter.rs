use crate::core::metafield_fetcher::fetch_metafields;
use crate::core::paginator::fetch_all_products;
use crate::core::{CatalogApi, ExportRecord, ExportStore, Pace, RateLimiter, Result};
use crate::domain::model::ExportReport;
use chrono::Utc;

/// Reads every product of the source store and persists the ones that carry
/// metafields as a single export.
pub struct Exporter<A: CatalogApi, E: ExportStore, R: RateLimiter> {
    source: A,
    store: E,
    limiter: R,
}

impl<A: CatalogApi, E: ExportStore, R: RateLimiter> Exporter<A, E, R> {
    pub fn new(source: A, store: E, limiter: R) -> Self {
        Self {
            source,
            store,
            limiter,
        }
    }

    pub async fn run(&self) -> Result<ExportReport> {
        tracing::info!("🚀 Starting metafields export from source store...");

        let products = fetch_all_products(&self.source).await?;
        let total = products.len();
        tracing::info!("📦 Found {} products in source store", total);

        let mut records = Vec::new();
        for (index, product) in products.iter().enumerate() {
            tracing::info!("Processing product {}/{}: {}", index + 1, total, product.title);

            let metafields = fetch_metafields(&self.source, product.id).await;
            if !metafields.is_empty() {
                tracing::info!(
                    "   Found {} metafields for: {}",
                    metafields.len(),
                    product.title
                );
                records.push(ExportRecord::from_product(product, metafields));
            }

            self.limiter.pause(Pace::MetafieldFetch).await;
        }

        let metafields = records.iter().map(|r| r.metafields.len()).sum();
        let exported_at = Utc::now();
        let export_id = self.store.save(&records, exported_at).await?;

        tracing::info!(
            "✅ Export completed! Found metafields for {} products ({} metafields) -> {}",
            records.len(),
            metafields,
            export_id
        );

        Ok(ExportReport {
            export_id,
            exported_at,
            products_scanned: total,
            records: records.len(),
            metafields,
        })
    }
}
