use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// SKU of the first variant, or an empty string.
    pub fn primary_sku(&self) -> String {
        self.variants
            .first()
            .and_then(|v| v.sku.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub sku: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub value: String,
    pub r#type: String,
}

impl Metafield {
    pub fn qualified_key(&self) -> String {
        format!("{}.{}", self.namespace, self.key)
    }
}

// Older stores return integer and boolean metafields as bare JSON scalars.
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

/// One source product that carried at least one metafield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub title: String,
    pub handle: String,
    pub sku: String,
    /// `None` when a stored export carried no readable id; kept for tracing only.
    pub source_product_id: Option<u64>,
    pub metafields: Vec<Metafield>,
}

impl ExportRecord {
    pub fn from_product(product: &Product, metafields: Vec<Metafield>) -> Self {
        Self {
            title: product.title.clone(),
            handle: product.handle.clone(),
            sku: product.primary_sku(),
            source_product_id: Some(product.id),
            metafields,
        }
    }
}

pub type ExportSet = Vec<ExportRecord>;

/// A stored export row that could not be read back as a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedRow {
    /// 1-based line in the artifact, header included.
    pub row: usize,
    pub title: String,
    pub handle: String,
    pub reason: String,
}

impl fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: {} ({}): {}",
            self.row, self.title, self.handle, self.reason
        )
    }
}

/// One row of a loaded export.
pub type ExportRow = std::result::Result<ExportRecord, MalformedRow>;

/// Reference to a persisted export artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportId(pub String);

impl ExportId {
    pub fn generate(at: DateTime<Utc>) -> Self {
        Self(format!(
            "metafields-export-{}.csv",
            at.format("%Y%m%dT%H%M%S%.3fZ")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExportId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single page of the product listing, with the raw `Link` header.
#[derive(Debug, Clone, Default)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub link_header: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub export_id: ExportId,
    pub exported_at: DateTime<Utc>,
    pub products_scanned: usize,
    pub records: usize,
    pub metafields: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFoundProduct {
    pub title: String,
    pub handle: String,
}

impl fmt::Display for NotFoundProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.handle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandleCollision {
    pub handle: String,
    pub product_ids: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    pub title: String,
    pub handle: String,
    pub destination_product_id: u64,
    pub created: usize,
    pub duplicates: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub export_id: Option<ExportId>,
    pub processed: usize,
    pub not_found: usize,
    pub errored: usize,
    pub metafields_created: usize,
    pub metafields_duplicate: usize,
    pub metafield_errors: usize,
    pub not_found_products: Vec<NotFoundProduct>,
    pub malformed_rows: Vec<MalformedRow>,
    pub handle_collisions: Vec<HandleCollision>,
    pub records: Vec<RecordReport>,
}

impl ImportSummary {
    pub fn all_matched(&self) -> bool {
        self.not_found_products.is_empty()
    }
}
