use crate::utils::error::{Result, TransferError};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use url::Url;

static API_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-(0[1-9]|1[0-2])|unstable)$").expect("valid regex"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> TransferError {
    TransferError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Root URL that replaces `https://{shop}`, e.g. a local mock server. The
/// Admin API path is appended to it, so it carries no query or fragment.
pub fn validate_base_url(field_name: &str, url_str: &str) -> Result<()> {
    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            url_str,
            format!("Store URL must be http or https, not {}", url.scheme()),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(field_name, url_str, "Store URL cannot carry a query or fragment"));
    }
    Ok(())
}

/// A shop is a bare host such as `my-store.myshopify.com`, without scheme or path.
pub fn validate_shop_domain(field_name: &str, shop: &str) -> Result<()> {
    validate_non_empty_string(field_name, shop)?;

    if shop.contains("://") {
        return Err(invalid(field_name, shop, "Shop must be a domain without a scheme"));
    }
    if shop.contains('/') || shop.contains(char::is_whitespace) {
        return Err(invalid(field_name, shop, "Shop must be a bare domain"));
    }

    match Url::parse(&format!("https://{}", shop)) {
        Ok(url) if url.host_str().is_some() => Ok(()),
        _ => Err(invalid(field_name, shop, "Shop is not a valid host name")),
    }
}

/// Admin API versions are quarterly `YYYY-MM` releases or `unstable`.
pub fn validate_api_version(field_name: &str, version: &str) -> Result<()> {
    if API_VERSION.is_match(version) {
        Ok(())
    } else {
        Err(invalid(field_name, version, "Expected an API version like 2023-10"))
    }
}

/// Exports and the latest-export pointer live in this directory. It may not
/// exist yet, but it cannot be an existing file.
pub fn validate_output_dir(field_name: &str, path: &str) -> Result<()> {
    validate_non_empty_string(field_name, path)?;

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    if Path::new(path).is_file() {
        return Err(invalid(field_name, path, "Export folder points at an existing file"));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
