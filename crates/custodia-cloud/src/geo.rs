//! Best-effort geolocation.
//!
//! Location is advisory provenance data, never a gate: resolution cannot
//! fail an operation, so the resolver returns an explicit
//! [`ResolvedLocation`] instead of a `Result`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use custodia_shared::constants::UNKNOWN_LOCATION;

use crate::config::GeoConfig;

/// Outcome of a location lookup.  `Unknown` is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLocation {
    Located(String),
    Unknown,
}

impl ResolvedLocation {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Located(s) => s,
            Self::Unknown => UNKNOWN_LOCATION,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Located(s) => s,
            Self::Unknown => UNKNOWN_LOCATION.to_string(),
        }
    }
}

impl std::fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolves the caller's own coarse location for provenance stamping.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self) -> ResolvedLocation;
}

/// The two fields of the lookup answer we use.  Absent or null fields fall
/// back to "Unknown" independently in the `"City, Country"` rendering.
#[derive(Debug, Deserialize)]
struct GeoResponse {
    city: Option<String>,
    country_name: Option<String>,
}

impl GeoResponse {
    fn render(&self) -> String {
        format!(
            "{}, {}",
            self.city.as_deref().unwrap_or(UNKNOWN_LOCATION),
            self.country_name.as_deref().unwrap_or(UNKNOWN_LOCATION),
        )
    }
}

/// [`LocationResolver`] querying an ipapi.co-compatible JSON endpoint.
pub struct IpApiResolver {
    client: reqwest::Client,
    config: GeoConfig,
}

impl IpApiResolver {
    pub fn new(config: GeoConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl LocationResolver for IpApiResolver {
    async fn resolve(&self) -> ResolvedLocation {
        let response = match self
            .client
            .get(&self.config.endpoint)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "geolocation request failed");
                return ResolvedLocation::Unknown;
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "geolocation endpoint returned error");
            return ResolvedLocation::Unknown;
        }

        match response.json::<GeoResponse>().await {
            Ok(geo) => ResolvedLocation::Located(geo.render()),
            Err(e) => {
                debug!(error = %e, "geolocation response unparseable");
                ResolvedLocation::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_renders_as_unknown() {
        assert_eq!(ResolvedLocation::Unknown.as_str(), "Unknown");
        assert_eq!(ResolvedLocation::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_partial_answers_fill_in_unknown() {
        let full: GeoResponse =
            serde_json::from_str(r#"{"city":"Paris","country_name":"France"}"#).unwrap();
        assert_eq!(full.render(), "Paris, France");

        let no_city: GeoResponse =
            serde_json::from_str(r#"{"country_name":"France"}"#).unwrap();
        assert_eq!(no_city.render(), "Unknown, France");

        let null_fields: GeoResponse =
            serde_json::from_str(r#"{"city":null,"country_name":null}"#).unwrap();
        assert_eq!(null_fields.render(), "Unknown, Unknown");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_unknown() {
        let resolver = IpApiResolver::new(GeoConfig {
            endpoint: "http://127.0.0.1:1/json/".to_string(),
            ..GeoConfig::default()
        });

        assert_eq!(resolver.resolve().await, ResolvedLocation::Unknown);
    }
}
