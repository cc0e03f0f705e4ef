//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the pipeline can run with zero
//! configuration against local backends.  Configuration is always passed to
//! constructors explicitly; `from_env` exists for binaries.

use std::time::Duration;

/// Blob store client configuration.
#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    /// Upload endpoint of the hosted blob store.
    /// Env: `CUSTODIA_BLOB_ENDPOINT`
    /// Default: `http://127.0.0.1:8080/blob/upload`
    pub endpoint: String,

    /// API key sent alongside each upload, if the store requires one.
    /// Env: `CUSTODIA_BLOB_API_KEY`
    /// Default: none.
    pub api_key: Option<String>,

    /// Namespace (object-name prefix) uploads are filed under.
    /// Env: `CUSTODIA_BLOB_FOLDER`
    /// Default: `secure_pdfs`
    pub folder: String,

    /// Per-request timeout for upload and download traffic.
    /// Env: `CUSTODIA_TIMEOUT_SECS`
    /// Default: 30 s
    pub timeout: Duration,
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/blob/upload".to_string(),
            api_key: None,
            folder: custodia_shared::constants::DEFAULT_BLOB_FOLDER.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl BlobStoreConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("CUSTODIA_BLOB_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Ok(key) = std::env::var("CUSTODIA_BLOB_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }

        if let Ok(folder) = std::env::var("CUSTODIA_BLOB_FOLDER") {
            config.folder = folder;
        }

        if let Ok(val) = std::env::var("CUSTODIA_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) => config.timeout = Duration::from_secs(secs),
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid CUSTODIA_TIMEOUT_SECS, using default");
                }
            }
        }

        config
    }
}

/// Geolocation resolver configuration.
#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// JSON endpoint reporting the caller's own location.
    /// Env: `CUSTODIA_GEO_ENDPOINT`
    /// Default: `https://ipapi.co/json/`
    pub endpoint: String,

    /// Request timeout.  Resolution is best-effort, so this stays short.
    /// Default: 5 s
    pub timeout: Duration,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://ipapi.co/json/".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl GeoConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("CUSTODIA_GEO_ENDPOINT") {
            config.endpoint = endpoint;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlobStoreConfig::default();
        assert_eq!(config.folder, "secure_pdfs");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_default_geo_endpoint() {
        let config = GeoConfig::default();
        assert_eq!(config.endpoint, "https://ipapi.co/json/");
    }
}
