use crate::core::{CatalogApi, Product, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Largest page the Admin REST product listing accepts.
pub const MAX_PAGE_SIZE: u32 = 250;

static NEXT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>;\s*rel="next""#).expect("valid regex"));
/// Extract the `page_info` cursor of the `rel="next"` entry of a `Link` header.
/// The cursor is returned percent-decoded, ready to be sent as a query value.
pub fn next_page_info(link_header: Option<&str>) -> Option<String> {
    let header = link_header?;
    let next = Url::parse(NEXT_LINK.captures(header)?.get(1)?.as_str()).ok()?;
    next.query_pairs()
        .find(|(name, _)| name == "page_info")
        .map(|(_, value)| value.into_owned())
}

/// Walk the product listing from the first page until no next cursor is
/// returned. Pages are concatenated in the order they were served; any
/// failed page aborts the walk.
pub async fn fetch_all_products<A: CatalogApi + ?Sized>(api: &A) -> Result<Vec<Product>> {
    let mut products = Vec::new();
    let mut page_info: Option<String> = None;
    let mut page = 0usize;

    loop {
        page += 1;
        let response = api.list_products(page_info.as_deref()).await?;
        tracing::debug!(
            "📄 Page {}: {} products (cursor: {:?})",
            page,
            response.products.len(),
            page_info
        );
        products.extend(response.products);

        page_info = next_page_info(response.link_header.as_deref());
        if page_info.is_none() {
            break;
        }
    }

    Ok(products)
}
