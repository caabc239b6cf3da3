//! Tabular export artifact.
//!
//! One CSV file per export run: a header row, then one row per product with
//! the product's metafields packed into a JSON array in the last column. A
//! small pointer file names the most recent export so an import can find it
//! without being told.

use crate::core::{
    ExportId, ExportRecord, ExportRow, ExportSet, ExportStore, MalformedRow, Metafield, Storage,
};
use crate::utils::error::{Result, TransferError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub const HEADERS: [&str; 6] = [
    "Title",
    "Handle",
    "SKU",
    "Source Product ID",
    "Metafields Count",
    "Metafields JSON",
];

pub const LATEST_EXPORT_POINTER: &str = "latest-export";

pub fn encode_export(records: &[ExportRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for record in records {
        let source_product_id = record
            .source_product_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        let count = record.metafields.len().to_string();
        let metafields_json = serde_json::to_string(&record.metafields)?;
        writer.write_record([
            record.title.as_str(),
            record.handle.as_str(),
            record.sku.as_str(),
            source_product_id.as_str(),
            count.as_str(),
            metafields_json.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| TransferError::IoError(std::io::Error::new(e.error().kind(), e.to_string())))
}

/// Decode an artifact row by row. A row that cannot be read back becomes a
/// `MalformedRow` and the rest of the artifact is still decoded.
pub fn decode_export(data: &[u8]) -> Vec<ExportRow> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let rows: Vec<ExportRow> = reader
        .records()
        .enumerate()
        .map(|(index, row)| {
            // Line 1 is the header.
            let line = index + 2;
            match row {
                Ok(row) => decode_row(&row, line),
                Err(e) => Err(MalformedRow {
                    row: line,
                    title: String::new(),
                    handle: String::new(),
                    reason: e.to_string(),
                }),
            }
        })
        .collect();
    rows
}

fn decode_row(row: &csv::StringRecord, line: usize) -> ExportRow {
    let column = |i: usize| row.get(i).unwrap_or("");

    let metafields: Vec<Metafield> = match column(5).trim() {
        "" => Vec::new(),
        blob => serde_json::from_str(blob).map_err(|e| MalformedRow {
            row: line,
            title: column(0).to_string(),
            handle: column(1).to_string(),
            reason: format!("invalid metafields JSON: {}", e),
        })?,
    };

    let source_product_id = match column(3).trim() {
        "" => None,
        raw => match raw.parse::<u64>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("⚠️  Row {}: unreadable source product id '{}': {}", line, raw, e);
                None
            }
        },
    };

    if let Ok(count) = column(4).trim().parse::<usize>() {
        if count != metafields.len() {
            tracing::warn!(
                "⚠️  Row {}: count column says {} metafields, JSON holds {}",
                line,
                count,
                metafields.len()
            );
        }
    }

    Ok(ExportRecord {
        title: column(0).to_string(),
        handle: column(1).to_string(),
        sku: column(2).to_string(),
        source_product_id,
        metafields,
    })
}

pub struct CsvExportStore<S: Storage> {
    storage: S,
}

impl<S: Storage> CsvExportStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

fn not_found_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(TransferError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl<S: Storage> ExportStore for CsvExportStore<S> {
    async fn save(&self, records: &ExportSet, exported_at: DateTime<Utc>) -> Result<ExportId> {
        let id = ExportId::generate(exported_at);
        let data = encode_export(records)?;

        tracing::debug!("Writing export ({} bytes) to storage", data.len());
        self.storage.write_file(id.as_str(), &data).await?;
        self.storage
            .write_file(LATEST_EXPORT_POINTER, id.as_str().as_bytes())
            .await?;

        tracing::info!("💾 Metafields data saved to: {}", id);
        Ok(id)
    }

    async fn load(&self, id: &ExportId) -> Result<Vec<ExportRow>> {
        let data = not_found_as_none(self.storage.read_file(id.as_str()).await)?
            .ok_or(TransferError::NoExportFound)?;
        Ok(decode_export(&data))
    }

    async fn latest(&self) -> Result<Option<ExportId>> {
        let pointer = not_found_as_none(self.storage.read_file(LATEST_EXPORT_POINTER).await)?;
        Ok(pointer
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
            .filter(|name| !name.is_empty())
            .map(ExportId))
    }
}
