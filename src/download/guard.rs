//! Validation of client-supplied download targets.

use std::net::{Ipv4Addr, Ipv6Addr};

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use thiserror::Error;
use url::{Host, Url};

/// Standard alphabet, padding optional.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("Invalid URL encoding")]
    InvalidEncoding,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid image source")]
    HostNotAllowed,

    #[error("Only http and https media URLs are supported")]
    UnsupportedScheme,

    #[error("Media URL points at a private address")]
    PrivateHost,
}

/// Decode the base64 `url` parameter of an image download.
///
/// A `+` sent unescaped in a query string arrives as a space, so spaces are
/// read back as `+` before decoding.
pub fn decode_image_url(encoded: &str) -> Result<Url, GuardError> {
    let cleaned: String = encoded
        .trim()
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();
    let bytes = LENIENT_BASE64
        .decode(cleaned.as_bytes())
        .map_err(|_| GuardError::InvalidEncoding)?;
    let text = String::from_utf8(bytes).map_err(|_| GuardError::InvalidEncoding)?;
    Url::parse(&text).map_err(|e| GuardError::InvalidUrl(e.to_string()))
}

/// Exact hostname match against the allow-list.
pub fn check_image_host(url: &Url, allowed: &[String]) -> Result<(), GuardError> {
    let host = url.host_str().ok_or(GuardError::HostNotAllowed)?;
    if allowed.iter().any(|h| h.eq_ignore_ascii_case(host)) {
        Ok(())
    } else {
        Err(GuardError::HostNotAllowed)
    }
}

/// Parse a `mediaUrl` and refuse targets inside the local network.
pub fn check_media_url(raw: &str, allow_private: bool) -> Result<Url, GuardError> {
    let url = Url::parse(raw).map_err(|e| GuardError::InvalidUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(GuardError::UnsupportedScheme);
    }

    let private = match url.host() {
        None => return Err(GuardError::InvalidUrl("missing host".to_string())),
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => is_private_v4(ip),
        Some(Host::Ipv6(ip)) => is_private_v6(ip),
    };

    if private && !allow_private {
        return Err(GuardError::PrivateHost);
    }
    Ok(url)
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        // carrier-grade NAT, 100.64.0.0/10
        || (ip.octets()[0] == 100 && (ip.octets()[1] & 0xc0) == 64)
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_private_v4(v4);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80
}
