pub mod transfer;

pub use transfer::{inspect_export, run_export, run_import};
