// Adapters layer: concrete implementations of the domain ports (store API, file storage, export file).

pub mod export_sheet;
pub mod shopify;
pub mod storage;

pub use export_sheet::CsvExportStore;
pub use shopify::ShopifyClient;
pub use storage::LocalStorage;
