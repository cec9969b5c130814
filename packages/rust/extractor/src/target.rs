//! Validation of caller-supplied target URLs, done before any network call.

use std::net::IpAddr;

use orgscrape_shared::{OrgScrapeError, Result};
use url::{Host, Url};

/// Parse and check a user-supplied URL.
///
/// The URL must be absolute, use `http` or `https`, and name a host. Unless
/// `allow_private` is set, loopback, private and link-local targets are
/// rejected as well.
pub fn parse_target_url(raw: &str, allow_private: bool) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(OrgScrapeError::validation("URL is required"));
    }

    let url = Url::parse(raw)
        .map_err(|e| OrgScrapeError::validation(format!("invalid URL '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(OrgScrapeError::validation(format!(
                "unsupported URL scheme '{other}': only http and https are allowed"
            )));
        }
    }

    if url.host().is_none() {
        return Err(OrgScrapeError::validation(format!("URL '{raw}' has no host")));
    }

    if !allow_private && is_private_target(&url) {
        return Err(OrgScrapeError::validation(format!(
            "URL '{raw}' points at a private or local address"
        )));
    }

    Ok(url)
}

/// Check whether a URL targets loopback, private or otherwise internal hosts.
///
/// Also applied to every redirect hop by [`PageExtractor`](crate::PageExtractor).
pub(crate) fn is_private_target(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(v4)) => is_private_ip(&IpAddr::V4(v4)),
        Some(Host::Ipv6(v6)) => is_private_ip(&IpAddr::V6(v6)),
        Some(Host::Domain(host)) => {
            let host = host.to_ascii_lowercase();
            host == "localhost"
                || host.ends_with(".localhost")
                || host.ends_with(".local")
                || host.ends_with(".internal")
        }
        None => true,
    }
}

/// Check if an IP is in a private/reserved range.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
                // 100.64.0.0/10 (Carrier-grade NAT)
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0xC0) == 64)
        }
        IpAddr::V6(v6) => {
            // ::ffff:a.b.c.d reaches the embedded IPv4 host
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_private_ip(&IpAddr::V4(v4));
            }
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique local, fe80::/10 link-local
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}
