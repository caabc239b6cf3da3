use crate::core::paginator::MAX_PAGE_SIZE;
use crate::core::rate_limiter::FixedDelay;
use crate::utils::error::{Result, TransferError};
use crate::utils::validation::{
    validate_api_version, validate_base_url, validate_non_empty_string, validate_output_dir,
    validate_range, validate_shop_domain, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    pub source: StoreConfig,
    pub destination: StoreConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Connection details for one store.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub shop: String,
    pub access_token: String,
    /// Overrides `https://{shop}`; used against proxies and local mocks.
    pub base_url: Option<String>,
}

// Keep the token out of debug logs.
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("shop", &self.shop)
            .field("access_token", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub version: String,
    pub page_size: u32,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            version: "2023-10".to_string(),
            page_size: MAX_PAGE_SIZE,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub fetch_delay_ms: u64,
    pub create_delay_ms: u64,
    pub record_delay_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: 300,
            create_delay_ms: 200,
            record_delay_ms: 500,
        }
    }
}

impl RateLimitConfig {
    pub fn limiter(&self) -> FixedDelay {
        FixedDelay::new(
            Duration::from_millis(self.fetch_delay_ms),
            Duration::from_millis(self.create_delay_ms),
            Duration::from_millis(self.record_delay_ms),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub strict_handles: bool,
}

impl TransferConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TransferError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| TransferError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    fn validate_store(prefix: &str, store: &StoreConfig) -> Result<()> {
        validate_shop_domain(&format!("{}.shop", prefix), &store.shop)?;
        validate_non_empty_string(&format!("{}.access_token", prefix), &store.access_token)?;

        if ENV_VAR.is_match(&store.access_token) {
            return Err(TransferError::ConfigValidationError {
                field: format!("{}.access_token", prefix),
                message: format!(
                    "environment variable {} is not set",
                    store.access_token
                ),
            });
        }

        if let Some(base_url) = &store.base_url {
            validate_base_url(&format!("{}.base_url", prefix), base_url)?;
        }
        Ok(())
    }
}

impl Validate for TransferConfig {
    fn validate(&self) -> Result<()> {
        Self::validate_store("source", &self.source)?;
        Self::validate_store("destination", &self.destination)?;

        validate_api_version("api.version", &self.api.version)?;
        validate_range("api.page_size", self.api.page_size, 1, MAX_PAGE_SIZE)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 600)?;
        validate_output_dir("output.path", &self.output.path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[source]
shop = "source-store.myshopify.com"
access_token = "shpat_source"

[destination]
shop = "dest-store.myshopify.com"
access_token = "shpat_dest"

[output]
path = "./exports"
"#;

    #[test]
    fn test_parse_minimal_config_with_defaults() {
        let config = TransferConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.source.shop, "source-store.myshopify.com");
        assert_eq!(config.destination.access_token, "shpat_dest");
        assert_eq!(config.api.version, "2023-10");
        assert_eq!(config.api.page_size, 250);
        assert_eq!(config.rate_limit.fetch_delay_ms, 300);
        assert_eq!(config.rate_limit.create_delay_ms, 200);
        assert_eq!(config.rate_limit.record_delay_ms, 500);
        assert!(!config.matching.strict_handles);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[source]
shop = "source-store.myshopify.com"
access_token = "shpat_source"
base_url = "http://127.0.0.1:8080"

[destination]
shop = "dest-store.myshopify.com"
access_token = "shpat_dest"

[api]
version = "2024-01"
page_size = 50
timeout_seconds = 10

[rate_limit]
fetch_delay_ms = 0
create_delay_ms = 100

[output]
path = "/tmp/exports"

[matching]
strict_handles = true
"#;

        let config = TransferConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.source.base_url.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(config.api.page_size, 50);
        assert_eq!(config.rate_limit.record_delay_ms, 500);
        assert!(config.matching.strict_handles);

        let limiter = config.rate_limit.limiter();
        assert_eq!(limiter.metafield_fetch, Duration::ZERO);
        assert_eq!(limiter.metafield_create, Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MF_TEST_SOURCE_TOKEN", "shpat_from_env");

        let toml_content = MINIMAL.replace("shpat_source", "${MF_TEST_SOURCE_TOKEN}");
        let config = TransferConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.source.access_token, "shpat_from_env");

        std::env::remove_var("MF_TEST_SOURCE_TOKEN");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = MINIMAL.replace("shpat_dest", "${MF_TEST_SURELY_UNSET_TOKEN}");
        let config = TransferConfig::from_toml_str(&toml_content).unwrap();

        match config.validate() {
            Err(TransferError::ConfigValidationError { field, .. }) => {
                assert_eq!(field, "destination.access_token")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_validation() {
        let bad_shop = MINIMAL.replace("source-store.myshopify.com", "https://source-store");
        assert!(TransferConfig::from_toml_str(&bad_shop)
            .unwrap()
            .validate()
            .is_err());

        let bad_page = format!("{}\n[api]\npage_size = 500\n", MINIMAL);
        assert!(TransferConfig::from_toml_str(&bad_page)
            .unwrap()
            .validate()
            .is_err());

        let bad_version = format!("{}\n[api]\nversion = \"latest\"\n", MINIMAL);
        assert!(TransferConfig::from_toml_str(&bad_version)
            .unwrap()
            .validate()
            .is_err());

        let missing_destination = r#"
[source]
shop = "source-store.myshopify.com"
access_token = "shpat_source"

[output]
path = "./exports"
"#;
        assert!(TransferConfig::from_toml_str(missing_destination).is_err());
    }

    #[test]
    fn test_debug_hides_access_token() {
        let config = TransferConfig::from_toml_str(MINIMAL).unwrap();
        let debug = format!("{:?}", config.source);
        assert!(!debug.contains("shpat_source"));
        assert!(debug.contains("source-store.myshopify.com"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = TransferConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.path, "./exports");
    }
}
