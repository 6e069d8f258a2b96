//! Store connection settings.

use std::fmt;

use tracing::warn;
use url::{Host, Url};

use crate::error::ConfigError;

/// OAuth2 client credentials of an Admin API integration plus the store URL.
///
/// Immutable once built. The secret is kept out of `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Build credentials, validating and normalising the store URL.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = validate_base_url(&base_url.into())?;
        Ok(Self {
            base_url,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    /// Build credentials from optional sources (CLI flags or environment).
    ///
    /// Blank values count as missing, and every missing value is reported in
    /// one [`ConfigError::Missing`] so a misconfigured deployment is fixed in
    /// a single round.
    pub fn resolve(
        store_url: Option<String>,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> Result<Self, ConfigError> {
        let present = |value: Option<String>| value.filter(|text| !text.trim().is_empty());
        let (store_url, api_key, api_secret) = (present(store_url), present(api_key), present(api_secret));

        let mut missing = Vec::new();
        if store_url.is_none() {
            missing.push("STORE_URL");
        }
        if api_key.is_none() {
            missing.push("API_KEY");
        }
        if api_secret.is_none() {
            missing.push("API_SECRET");
        }

        match (store_url, api_key, api_secret) {
            (Some(store_url), Some(api_key), Some(api_secret)) => Self::new(store_url, api_key.trim(), api_secret.trim()),
            _ => Err(ConfigError::Missing(missing)),
        }
    }

    /// Store URL without a trailing slash, e.g. `https://shop.example.com`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Validate the store URL and strip trailing slashes.
///
/// Rules:
/// - must parse and carry a host
/// - scheme must be `http` or `https`
/// - plain `http` to anything but a loopback host is accepted with a warning,
///   since the client secret travels in the token request body
fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|error| invalid(error.to_string()))?;
    let host = parsed.host().ok_or_else(|| invalid("URL must include a host".to_string()))?;

    match parsed.scheme() {
        "https" => {}
        "http" if is_loopback(&host) => {}
        "http" => warn!(url = %trimmed, "STORE_URL uses plain http; credentials are sent unencrypted"),
        other => return Err(invalid(format!("unsupported scheme '{other}://', expected http or https"))),
    }

    Ok(trimmed.to_string())
}

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => domain.eq_ignore_ascii_case("localhost"),
        Host::Ipv4(address) => address.is_loopback(),
        Host::Ipv6(address) => address.is_loopback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_reports_every_missing_value() {
        let error = Credentials::resolve(None, Some("  ".into()), None).expect_err("nothing configured");

        match error {
            ConfigError::Missing(missing) => assert_eq!(missing, vec!["STORE_URL", "API_KEY", "API_SECRET"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn resolve_strips_trailing_slash() {
        let credentials = Credentials::resolve(
            Some("https://shop.example.com/".into()),
            Some("SWIA123".into()),
            Some("secret".into()),
        )
        .expect("valid configuration");

        assert_eq!(credentials.base_url(), "https://shop.example.com");
        assert_eq!(credentials.client_id(), "SWIA123");
    }

    #[test]
    fn debug_output_hides_secret() {
        let credentials = Credentials::new("http://localhost:8000", "id", "very-secret").expect("valid");

        let rendered = format!("{credentials:?}");

        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let error = Credentials::new("ftp://shop.example.com", "id", "secret").expect_err("ftp is rejected");
        assert!(error.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn accepts_plain_http_for_remote_hosts() {
        let credentials = Credentials::new("http://shop.internal", "id", "secret").expect("accepted with warning");
        assert_eq!(credentials.base_url(), "http://shop.internal");
    }

    #[test]
    fn rejects_unparseable_url() {
        assert!(matches!(
            Credentials::new("not a url", "id", "secret"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
