pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command};

pub use adapters::{CsvExportStore, LocalStorage, ShopifyClient};
pub use app::{inspect_export, run_export, run_import};
pub use config::TransferConfig;
pub use crate::core::{exporter::Exporter, importer::Importer};
pub use domain::model::{ExportId, ExportReport, ExportRow, ImportSummary, MalformedRow};
pub use utils::error::{Result, TransferError};
