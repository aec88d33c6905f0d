//! Outbound URL preview fetcher.
//!
//! Every target is validated before any connection is opened: the scheme
//! must be http(s), the host must be on the configured allowlist, and
//! literal IP hosts must not point at loopback, private, or otherwise
//! internal address space. Redirects are disabled so a permitted host
//! cannot bounce the request somewhere forbidden, and response bodies
//! are read in chunks up to a hard cap.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Largest preview body we will buffer.
const MAX_PREVIEW_BYTES: usize = 64 * 1024;

/// Per-request timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from target validation or the fetch itself.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed.
    #[error("invalid url")]
    InvalidUrl,

    /// Scheme other than http/https.
    #[error("scheme not allowed")]
    SchemeNotAllowed,

    /// Host missing or not on the allowlist.
    #[error("host not allowed")]
    HostNotAllowed,

    /// Host is a literal IP in blocked address space.
    #[error("address not allowed")]
    AddressNotAllowed,

    /// The outbound request failed.
    #[error("upstream request failed")]
    Upstream(#[source] reqwest::Error),
}

/// A fetched preview: status line plus a capped body prefix.
#[derive(Debug)]
pub struct Preview {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub truncated: bool,
}

/// Fetches previews of allowlisted external URLs.
pub struct Fetcher {
    client: reqwest::Client,
    allowed_hosts: Vec<String>,
}

impl Fetcher {
    /// Build a fetcher restricted to the given hosts.
    ///
    /// Hosts are compared case-insensitively and must match exactly
    /// (no subdomain wildcards).
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Upstream` if the HTTP client cannot be built.
    pub fn new(allowed_hosts: &[String]) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(FetchError::Upstream)?;

        Ok(Self {
            client,
            allowed_hosts: allowed_hosts.iter().map(|h| h.to_lowercase()).collect(),
        })
    }

    /// Validate a target URL without connecting.
    ///
    /// # Errors
    ///
    /// Returns the first check that fails; see [`FetchError`].
    pub fn validate_target(&self, raw: &str) -> Result<Url, FetchError> {
        let url = Url::parse(raw).map_err(|_| FetchError::InvalidUrl)?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::SchemeNotAllowed);
        }

        let host = url.host_str().ok_or(FetchError::HostNotAllowed)?;

        if let Ok(ip) = host.trim_matches(['[', ']']).parse::<IpAddr>() {
            if is_blocked_ip(ip) {
                return Err(FetchError::AddressNotAllowed);
            }
        }

        if !self.allowed_hosts.iter().any(|h| h == &host.to_lowercase()) {
            return Err(FetchError::HostNotAllowed);
        }

        Ok(url)
    }

    /// Fetch a preview of the target, validating it first.
    ///
    /// # Errors
    ///
    /// Returns a validation error for disallowed targets, or
    /// `FetchError::Upstream` if the request fails.
    pub async fn fetch_preview(&self, raw: &str) -> Result<Preview, FetchError> {
        let url = self.validate_target(raw)?;

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Upstream)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = response.chunk().await.map_err(FetchError::Upstream)? {
            let remaining = MAX_PREVIEW_BYTES - body.len();
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(Preview {
            status,
            content_type,
            body,
            truncated,
        })
    }
}

/// Whether an IP address points at internal or special-purpose space.
fn is_blocked_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_blocked_v4(v4),
        IpAddr::V6(v6) => is_blocked_v6(v6),
    }
}

fn is_blocked_v4(ip: Ipv4Addr) -> bool {
    // 100.64.0.0/10 is carrier-grade NAT
    let cgnat = ip.octets()[0] == 100 && (ip.octets()[1] & 0xc0) == 64;
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || cgnat
}

fn is_blocked_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_blocked_v4(v4);
    }
    let segments = ip.segments();
    // fc00::/7 unique-local, fe80::/10 link-local
    let unique_local = (segments[0] & 0xfe00) == 0xfc00;
    let link_local = (segments[0] & 0xffc0) == 0xfe80;
    ip.is_loopback() || ip.is_unspecified() || unique_local || link_local
}
