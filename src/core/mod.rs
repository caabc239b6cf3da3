pub mod exporter;
pub mod importer;
pub mod matcher;
pub mod metafield_fetcher;
pub mod paginator;
pub mod rate_limiter;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{
    CreateOutcome, ExportId, ExportRecord, ExportRow, ExportSet, MalformedRow, Metafield, Product,
    ProductPage,
};
pub use crate::domain::ports::{CatalogApi, ExportStore, Pace, RateLimiter, Storage};
pub use crate::utils::error::Result;
