use crate::config::toml_config::{ApiConfig, StoreConfig};
use crate::core::{CatalogApi, CreateOutcome, Metafield, Product, ProductPage, Result};
use crate::utils::error::TransferError;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LINK};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";
const PRODUCT_FIELDS: &str = "id,title,handle,variants";

#[derive(Deserialize)]
struct ProductsResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct MetafieldsResponse {
    #[serde(default)]
    metafields: Vec<Metafield>,
}

#[derive(Serialize)]
struct CreateMetafieldRequest<'a> {
    metafield: &'a Metafield,
}

/// Admin REST client for one store.
#[derive(Clone)]
pub struct ShopifyClient {
    client: Client,
    base_url: String,
    access_token: String,
    page_size: u32,
}

impl ShopifyClient {
    pub fn new(store: &StoreConfig, api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .build()?;

        let root = store
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}", store.shop));

        Ok(Self {
            client,
            base_url: format!("{}/admin/api/{}", root.trim_end_matches('/'), api.version),
            access_token: store.access_token.clone(),
            page_size: api.page_size,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send and reject any non-2xx answer.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransferError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Whether a rejected create means the metafield is already on the product.
/// "already exists" counts on any failure status; Shopify's validation
/// wordings only on 422.
pub fn is_duplicate_conflict(status: StatusCode, body: &str) -> bool {
    if status.is_success() {
        return false;
    }
    let body = body.to_lowercase();
    if body.contains("already exists") {
        return true;
    }
    status == StatusCode::UNPROCESSABLE_ENTITY
        && (body.contains("must be unique") || body.contains("has already been taken"))
}

#[async_trait]
impl CatalogApi for ShopifyClient {
    async fn list_products(&self, page_info: Option<&str>) -> Result<ProductPage> {
        let page_size = self.page_size.to_string();
        let mut query = vec![("limit", page_size.as_str()), ("fields", PRODUCT_FIELDS)];
        if let Some(token) = page_info {
            query.push(("page_info", token));
        }

        let url = self.url("products.json");
        tracing::debug!("Making API request to: {} (page_info: {:?})", url, page_info);
        let response = self.send(self.client.get(&url).query(&query)).await?;

        let link_header = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body: ProductsResponse = response.json().await?;

        Ok(ProductPage {
            products: body.products,
            link_header,
        })
    }

    async fn product_metafields(&self, product_id: u64) -> Result<Vec<Metafield>> {
        let url = self.url(&format!("products/{}/metafields.json", product_id));
        let response = self.send(self.client.get(&url)).await?;
        let body: MetafieldsResponse = response.json().await?;
        Ok(body.metafields)
    }

    async fn create_metafield(
        &self,
        product_id: u64,
        metafield: &Metafield,
    ) -> Result<CreateOutcome> {
        let url = self.url(&format!("products/{}/metafields.json", product_id));
        let response = self
            .authorized(self.client.post(&url))
            .json(&CreateMetafieldRequest { metafield })
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::CREATED {
            return Ok(CreateOutcome::Created);
        }

        let body = response.text().await.unwrap_or_default();
        if is_duplicate_conflict(status, &body) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        if status.is_success() {
            return Err(TransferError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        Err(TransferError::HttpStatus {
            status: status.as_u16(),
            body,
        })
    }
}
