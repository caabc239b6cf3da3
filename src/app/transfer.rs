use crate::adapters::{CsvExportStore, LocalStorage, ShopifyClient};
use crate::config::TransferConfig;
use crate::core::exporter::Exporter;
use crate::core::importer::Importer;
use crate::core::{ExportId, ExportRow, ExportStore, Result};
use crate::domain::model::{ExportReport, ImportSummary};
use crate::utils::error::TransferError;

fn export_store(config: &TransferConfig) -> CsvExportStore<LocalStorage> {
    CsvExportStore::new(LocalStorage::new(&config.output.path))
}

/// Export every source product's metafields into a new artifact under
/// `output.path`.
pub async fn run_export(config: &TransferConfig) -> Result<ExportReport> {
    let source = ShopifyClient::new(&config.source, &config.api)?;
    tracing::debug!("Source store: {}", source.base_url());

    Exporter::new(source, export_store(config), config.rate_limit.limiter())
        .run()
        .await
}

/// Import `export_id`, or the latest export when `None`, into the destination store.
pub async fn run_import(
    config: &TransferConfig,
    export_id: Option<&ExportId>,
) -> Result<ImportSummary> {
    let destination = ShopifyClient::new(&config.destination, &config.api)?;
    tracing::debug!("Destination store: {}", destination.base_url());

    Importer::new(
        destination,
        export_store(config),
        config.rate_limit.limiter(),
    )
    .with_strict_handles(config.matching.strict_handles)
    .run(export_id)
    .await
}

/// Load an export without contacting either store.
pub async fn inspect_export(
    config: &TransferConfig,
    export_id: Option<&ExportId>,
) -> Result<(ExportId, Vec<ExportRow>)> {
    let store = export_store(config);
    let id = match export_id {
        Some(id) => id.clone(),
        None => store.latest().await?.ok_or(TransferError::NoExportFound)?,
    };
    let rows = store.load(&id).await?;
    Ok((id, rows))
}
