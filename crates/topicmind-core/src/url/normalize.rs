//! URL normalization for duplicate detection.
//!
//! [`normalize`] maps a raw URL onto the canonical string used as the
//! registry key. Two URLs that differ only by scheme, host casing, a single
//! trailing slash, tracking parameters, or query parameter order produce the
//! same key. Path and query value casing is preserved. An explicit `:443`
//! is dropped since the output scheme is always `https`; any other explicit
//! port is kept.
//!
//! A URL without a network location normalizes to the empty string. The
//! empty string is never a valid key; use [`normalize_key`] to get a typed
//! error instead.

use url::Url;
use url::form_urlencoded;

use topicmind_types::error::RegistryError;

/// Query keys dropped during normalization (matched case-insensitively).
/// Any key starting with `utm_` is dropped as well.
pub const TRACKING_PARAMS: &[&str] = &[
    "fbclid",
    "gclid",
    "msclkid",
    "ref",
    "referrer",
    "source",
    "_ga",
    "_gl",
    "mc_cid",
    "mc_eid",
    "pk_campaign",
    "pk_kwd",
];

const HTTPS_PORT: u16 = 443;

/// The port written in the input, if any.
///
/// `Url::port` hides a port equal to the default of the input scheme, so
/// `http://host:80` would otherwise lose its port while the output scheme
/// is always `https`. Fall back to reading the raw authority in that case.
fn explicit_port(raw: &str, parsed: &Url) -> Option<u16> {
    if let Some(port) = parsed.port() {
        return Some(port);
    }
    let (_, rest) = raw.split_once("://")?;
    let authority = rest.split(['/', '\\', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let port = if host_port.starts_with('[') {
        host_port.split_once("]:")?.1
    } else {
        host_port.rsplit_once(':')?.1
    };
    port.parse().ok()
}

/// Whether a query key is a tracking parameter.
pub fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}

/// Normalize a raw URL into its canonical dedup key.
///
/// Returns an empty string when the input has no network location.
pub fn normalize(raw_url: &str) -> String {
    let trimmed = raw_url.trim();
    let Ok(parsed) = Url::parse(trimmed) else {
        return String::new();
    };
    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return String::new(),
    };

    let mut netloc = String::new();
    if !parsed.username().is_empty() {
        netloc.push_str(parsed.username());
        if let Some(password) = parsed.password() {
            netloc.push(':');
            netloc.push_str(password);
        }
        netloc.push('@');
    }
    netloc.push_str(host);
    if let Some(port) = explicit_port(trimmed, &parsed).filter(|&p| p != HTTPS_PORT) {
        netloc.push(':');
        netloc.push_str(&port.to_string());
    }

    let mut out = format!("https://{}", netloc.to_lowercase());

    let path = parsed.path();
    out.push_str(path.strip_suffix('/').unwrap_or(path));

    let mut pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    // Stable: same-key pairs keep their original relative order.
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    if !pairs.is_empty() {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        out.push('?');
        out.push_str(&query);
    }

    if let Some(fragment) = parsed.fragment() {
        out.push('#');
        out.push_str(fragment);
    }

    out
}

/// Normalize a raw URL, failing with [`RegistryError::InvalidUrl`] when it
/// cannot serve as a dedup key.
pub fn normalize_key(raw_url: &str) -> Result<String, RegistryError> {
    let normalized = normalize(raw_url);
    if normalized.is_empty() {
        Err(RegistryError::InvalidUrl(raw_url.trim().to_string()))
    } else {
        Ok(normalized)
    }
}
