use crate::core::matcher::{HandleMatcher, Match};
use crate::core::paginator::fetch_all_products;
use crate::core::{
    CatalogApi, CreateOutcome, ExportId, ExportRecord, ExportStore, Metafield, Pace, Product,
    RateLimiter, Result,
};
use crate::domain::model::{ImportSummary, NotFoundProduct, RecordReport};
use crate::utils::error::TransferError;

/// Recreates exported metafields on the destination store, matching products
/// by handle. Only creates; existing metafields are left untouched.
pub struct Importer<A: CatalogApi, E: ExportStore, R: RateLimiter> {
    destination: A,
    store: E,
    limiter: R,
    strict_handles: bool,
}

impl<A: CatalogApi, E: ExportStore, R: RateLimiter> Importer<A, E, R> {
    pub fn new(destination: A, store: E, limiter: R) -> Self {
        Self {
            destination,
            store,
            limiter,
            strict_handles: false,
        }
    }

    /// Refuse to import when two destination products share a handle.
    pub fn with_strict_handles(mut self, strict: bool) -> Self {
        self.strict_handles = strict;
        self
    }

    /// Import `export_id`, or the latest recorded export when `None`.
    pub async fn run(&self, export_id: Option<&ExportId>) -> Result<ImportSummary> {
        tracing::info!("🚀 Starting metafields import to destination store...");

        let export_id = match export_id {
            Some(id) => id.clone(),
            None => self
                .store
                .latest()
                .await?
                .ok_or(TransferError::NoExportFound)?,
        };
        let rows = self.store.load(&export_id).await?;
        tracing::info!("📂 Loaded export {} ({} products)", export_id, rows.len());

        let destination_products = fetch_all_products(&self.destination).await?;
        tracing::info!(
            "📦 Found {} products in destination store",
            destination_products.len()
        );

        let matcher = HandleMatcher::new(destination_products);
        tracing::info!("✅ Created handle lookup for {} products", matcher.handle_count());

        for collision in matcher.collisions() {
            tracing::warn!(
                "⚠️  Handle '{}' is shared by destination products {:?}; using {}",
                collision.handle,
                collision.product_ids,
                collision.product_ids.last().copied().unwrap_or_default()
            );
        }
        if self.strict_handles {
            if let Some(collision) = matcher.collisions().first() {
                return Err(TransferError::HandleCollision {
                    handle: collision.handle.clone(),
                    count: collision.product_ids.len(),
                });
            }
        }

        let mut summary = ImportSummary {
            export_id: Some(export_id),
            handle_collisions: matcher.collisions().to_vec(),
            ..Default::default()
        };

        let total = rows.len();
        for (index, row) in rows.iter().enumerate() {
            let record = match row {
                Ok(record) => record,
                Err(malformed) => {
                    tracing::error!(
                        "❌ Error processing {}/{}: unreadable export {}",
                        index + 1,
                        total,
                        malformed
                    );
                    summary.errored += 1;
                    summary.malformed_rows.push(malformed.clone());
                    continue;
                }
            };
            tracing::info!("Processing {}/{}: {}", index + 1, total, record.title);

            let product = match matcher.resolve(record) {
                Match::Found(product) => product,
                Match::NotFound => {
                    tracing::warn!(
                        "⚠️  Product handle not found in destination: {} ({})",
                        record.handle,
                        record.title
                    );
                    summary.not_found += 1;
                    summary.not_found_products.push(NotFoundProduct {
                        title: record.title.clone(),
                        handle: record.handle.clone(),
                    });
                    continue;
                }
            };

            tracing::info!(
                "✅ Found matching product: {} (Handle: {})",
                product.title,
                product.handle
            );

            let mut report = RecordReport {
                title: record.title.clone(),
                handle: record.handle.clone(),
                destination_product_id: product.id,
                ..Default::default()
            };

            match self.import_record(product, record, &mut report).await {
                Ok(()) => {
                    tracing::info!(
                        "   📝 Created {} metafields ({} errors, {} already present)",
                        report.created,
                        report.errors,
                        report.duplicates
                    );
                    summary.processed += 1;
                }
                Err(e) => {
                    tracing::error!("❌ Error processing {}: {}", record.title, e);
                    summary.errored += 1;
                }
            }

            summary.metafields_created += report.created;
            summary.metafields_duplicate += report.duplicates;
            summary.metafield_errors += report.errors;
            summary.records.push(report);

            self.limiter.pause(Pace::Record).await;
        }

        log_summary(&summary);
        Ok(summary)
    }

    /// Create every metafield of `record` on `product`. Per-metafield API
    /// failures are tallied in `report`; a malformed metafield aborts the rest
    /// of the record.
    async fn import_record(
        &self,
        product: &Product,
        record: &ExportRecord,
        report: &mut RecordReport,
    ) -> Result<()> {
        for metafield in &record.metafields {
            check_metafield(metafield)?;

            match self
                .destination
                .create_metafield(product.id, metafield)
                .await
            {
                Ok(CreateOutcome::Created) => {
                    tracing::debug!("   ✅ Created metafield: {}", metafield.qualified_key());
                    report.created += 1;
                }
                Ok(CreateOutcome::AlreadyExists) => {
                    tracing::info!(
                        "   ⚠️  Metafield already exists: {}",
                        metafield.qualified_key()
                    );
                    report.duplicates += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "   ❌ Error creating metafield {}: {}",
                        metafield.qualified_key(),
                        e
                    );
                    report.errors += 1;
                }
            }

            self.limiter.pause(Pace::MetafieldCreate).await;
        }
        Ok(())
    }
}

fn check_metafield(metafield: &Metafield) -> Result<()> {
    let missing = [
        ("namespace", &metafield.namespace),
        ("key", &metafield.key),
        ("type", &metafield.r#type),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty());

    match missing {
        Some((field, _)) => Err(TransferError::MalformedMetafield {
            qualified_key: metafield.qualified_key(),
            reason: format!("{} is empty", field),
        }),
        None => Ok(()),
    }
}

fn log_summary(summary: &ImportSummary) {
    tracing::info!("Import Summary:");
    tracing::info!("✅ Successfully processed: {} products", summary.processed);
    tracing::info!("❌ Products not found: {}", summary.not_found);
    tracing::info!("⚠️  Processing errors: {}", summary.errored);
    tracing::info!(
        "📝 Metafields created: {}, already present: {}, failed: {}",
        summary.metafields_created,
        summary.metafields_duplicate,
        summary.metafield_errors
    );

    if summary.all_matched() {
        tracing::info!("🎉 All products were successfully matched by handle!");
    } else {
        tracing::info!("❌ Products not found in destination store:");
        for product in &summary.not_found_products {
            tracing::info!("   - {}", product);
        }
        tracing::info!(
            "💡 Tip: Check if these products exist in destination store with the same handles"
        );
    }

    if !summary.malformed_rows.is_empty() {
        tracing::info!("❌ Export rows that could not be read:");
        for row in &summary.malformed_rows {
            tracing::info!("   - {}", row);
        }
    }
}
