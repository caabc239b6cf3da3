//! In-memory doubles for the catalog and export ports.

use crate::core::{CatalogApi, ExportStore, Pace, RateLimiter};
use crate::domain::model::{
    CreateOutcome, ExportId, ExportRow, ExportSet, Metafield, Product, ProductPage, Variant,
};
use crate::utils::error::{Result, TransferError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

pub fn product(id: u64, handle: &str) -> Product {
    Product {
        id,
        title: format!("Product {}", handle),
        handle: handle.to_string(),
        variants: vec![Variant {
            sku: Some(format!("SKU-{}", id)),
        }],
    }
}

pub fn metafield(namespace: &str, key: &str, value: &str) -> Metafield {
    Metafield {
        namespace: namespace.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        r#type: "single_line_text_field".to_string(),
    }
}

pub fn next_link(token: &str) -> String {
    format!(
        "<https://test-shop.myshopify.com/admin/api/2023-10/products.json?limit=250&page_info={}>; rel=\"next\"",
        token
    )
}

#[derive(Default)]
struct CatalogState {
    pages: HashMap<Option<String>, ProductPage>,
    failing_pages: HashSet<Option<String>>,
    page_requests: Vec<Option<String>>,
    metafields: HashMap<u64, Vec<Metafield>>,
    failing_fetches: HashSet<u64>,
    existing: HashMap<u64, HashSet<String>>,
    failing_creates: HashSet<(u64, String)>,
    create_attempts: Vec<(u64, String)>,
    created: Vec<(u64, Metafield)>,
}

#[derive(Clone, Default)]
pub struct MockCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `products` in pages of `page_size`, chained through `Link` headers.
    pub async fn with_products(products: Vec<Product>, page_size: usize) -> Self {
        let catalog = Self::new();
        let chunks: Vec<Vec<Product>> = if products.is_empty() {
            vec![Vec::new()]
        } else {
            products.chunks(page_size).map(|c| c.to_vec()).collect()
        };
        let last = chunks.len() - 1;

        for (index, chunk) in chunks.into_iter().enumerate() {
            let token = (index > 0).then(|| format!("page-{}", index));
            let link_header = (index < last).then(|| next_link(&format!("page-{}", index + 1)));
            catalog
                .add_page(
                    token.as_deref(),
                    ProductPage {
                        products: chunk,
                        link_header,
                    },
                )
                .await;
        }
        catalog
    }

    pub async fn add_page(&self, token: Option<&str>, page: ProductPage) {
        let mut state = self.state.lock().await;
        state.pages.insert(token.map(str::to_string), page);
    }

    pub async fn fail_page(&self, token: Option<&str>) {
        let mut state = self.state.lock().await;
        state.failing_pages.insert(token.map(str::to_string));
    }

    pub async fn set_metafields(&self, product_id: u64, metafields: Vec<Metafield>) {
        let mut state = self.state.lock().await;
        state.metafields.insert(product_id, metafields);
    }

    pub async fn fail_metafields(&self, product_id: u64) {
        let mut state = self.state.lock().await;
        state.failing_fetches.insert(product_id);
    }

    pub async fn fail_create(&self, product_id: u64, qualified_key: &str) {
        let mut state = self.state.lock().await;
        state
            .failing_creates
            .insert((product_id, qualified_key.to_string()));
    }

    pub async fn page_requests(&self) -> Vec<Option<String>> {
        self.state.lock().await.page_requests.clone()
    }

    pub async fn create_attempts(&self) -> Vec<(u64, String)> {
        self.state.lock().await.create_attempts.clone()
    }

    pub async fn created(&self) -> Vec<(u64, Metafield)> {
        self.state.lock().await.created.clone()
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn list_products(&self, page_info: Option<&str>) -> Result<ProductPage> {
        let mut state = self.state.lock().await;
        let token = page_info.map(str::to_string);
        state.page_requests.push(token.clone());

        if state.failing_pages.contains(&token) {
            return Err(TransferError::HttpStatus {
                status: 500,
                body: "Internal Server Error".to_string(),
            });
        }

        state
            .pages
            .get(&token)
            .cloned()
            .ok_or_else(|| TransferError::HttpStatus {
                status: 400,
                body: format!("unknown page_info {:?}", token),
            })
    }

    async fn product_metafields(&self, product_id: u64) -> Result<Vec<Metafield>> {
        let state = self.state.lock().await;
        if state.failing_fetches.contains(&product_id) {
            return Err(TransferError::HttpStatus {
                status: 502,
                body: "Bad Gateway".to_string(),
            });
        }
        Ok(state.metafields.get(&product_id).cloned().unwrap_or_default())
    }

    async fn create_metafield(
        &self,
        product_id: u64,
        metafield: &Metafield,
    ) -> Result<CreateOutcome> {
        let mut state = self.state.lock().await;
        let qualified_key = metafield.qualified_key();
        state.create_attempts.push((product_id, qualified_key.clone()));

        if state
            .failing_creates
            .contains(&(product_id, qualified_key.clone()))
        {
            return Err(TransferError::HttpStatus {
                status: 422,
                body: r#"{"errors":{"value":["is invalid"]}}"#.to_string(),
            });
        }

        let existing = state.existing.entry(product_id).or_default();
        if !existing.insert(qualified_key) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        state.created.push((product_id, metafield.clone()));
        Ok(CreateOutcome::Created)
    }
}

#[derive(Debug, Clone)]
pub struct SavedExport {
    pub id: ExportId,
    pub exported_at: DateTime<Utc>,
    pub rows: Vec<ExportRow>,
}

impl SavedExport {
    pub fn records(&self) -> ExportSet {
        self.rows.iter().filter_map(|row| row.clone().ok()).collect()
    }
}

#[derive(Clone, Default)]
pub struct MemoryExportStore {
    exports: Arc<Mutex<Vec<SavedExport>>>,
}

impl MemoryExportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_export(records: ExportSet) -> (Self, ExportId) {
        Self::with_rows(records.into_iter().map(Ok).collect()).await
    }

    /// An export whose rows may include ones that failed to read back.
    pub async fn with_rows(rows: Vec<ExportRow>) -> (Self, ExportId) {
        let store = Self::new();
        let id = store.push(Utc::now(), rows).await;
        (store, id)
    }

    pub async fn saved(&self) -> Vec<SavedExport> {
        self.exports.lock().await.clone()
    }

    async fn push(&self, exported_at: DateTime<Utc>, rows: Vec<ExportRow>) -> ExportId {
        let mut exports = self.exports.lock().await;
        let id = ExportId(format!("memory-export-{}", exports.len() + 1));
        exports.push(SavedExport {
            id: id.clone(),
            exported_at,
            rows,
        });
        id
    }
}

#[async_trait]
impl ExportStore for MemoryExportStore {
    async fn save(&self, records: &ExportSet, exported_at: DateTime<Utc>) -> Result<ExportId> {
        let rows = records.iter().cloned().map(Ok).collect();
        Ok(self.push(exported_at, rows).await)
    }

    async fn load(&self, id: &ExportId) -> Result<Vec<ExportRow>> {
        let exports = self.exports.lock().await;
        exports
            .iter()
            .find(|saved| &saved.id == id)
            .map(|saved| saved.rows.clone())
            .ok_or(TransferError::NoExportFound)
    }

    async fn latest(&self) -> Result<Option<ExportId>> {
        Ok(self.exports.lock().await.last().map(|saved| saved.id.clone()))
    }
}

/// Records every pause instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingLimiter {
    paces: Arc<std::sync::Mutex<Vec<Pace>>>,
}

impl RecordingLimiter {
    pub fn paces(&self) -> Vec<Pace> {
        self.paces.lock().unwrap().clone()
    }
}

impl RateLimiter for RecordingLimiter {
    async fn pause(&self, pace: Pace) {
        self.paces.lock().unwrap().push(pace);
    }
}
