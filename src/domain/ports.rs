use crate::domain::model::{
    CreateOutcome, ExportId, ExportRow, ExportSet, Metafield, ProductPage,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Product and metafield endpoints of one store.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one page of products. `page_info` is the continuation token of
    /// the previous page, `None` for the first one.
    async fn list_products(&self, page_info: Option<&str>) -> Result<ProductPage>;

    async fn product_metafields(&self, product_id: u64) -> Result<Vec<Metafield>>;

    /// Create a metafield on a product. A metafield with the same namespace and
    /// key that is already present yields `CreateOutcome::AlreadyExists`.
    async fn create_metafield(&self, product_id: u64, metafield: &Metafield)
        -> Result<CreateOutcome>;
}

/// Durable hand-off between an export run and an import run.
#[async_trait]
pub trait ExportStore: Send + Sync {
    /// Persist the whole set in one write and mark it as the latest export.
    /// `exported_at` is the moment the export is stamped with.
    async fn save(&self, records: &ExportSet, exported_at: DateTime<Utc>) -> Result<ExportId>;

    /// Load every row in stored order. Rows that cannot be read back come out
    /// as `Err` without failing the load.
    async fn load(&self, id: &ExportId) -> Result<Vec<ExportRow>>;

    /// The most recently saved export, if any.
    async fn latest(&self) -> Result<Option<ExportId>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// After each product's metafield fetch during export.
    MetafieldFetch,
    /// After each metafield creation attempt during import.
    MetafieldCreate,
    /// After each matched record during import.
    Record,
}

pub trait RateLimiter: Send + Sync {
    fn pause(&self, pace: Pace) -> impl std::future::Future<Output = ()> + Send;
}
