//! URL parser for extracting Yandex.Disk public keys from share links.

use std::fmt;

/// Substring shared by every Yandex.Disk share-link domain
/// (`disk.yandex.ru`, `disk.yandex.kz`, `disk.yandex.com`, ...).
pub const SHARE_DOMAIN_MARKER: &str = "disk.yandex";

/// Opaque identifier of a publicly shared resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(String);

impl PublicKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty or whitespace only.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PublicKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract a public key from a share link, or pass a bare key through.
///
/// Inputs containing [`SHARE_DOMAIN_MARKER`] are reduced to their last path
/// segment; anything else is returned unchanged.
///
/// # Examples
///
/// ```
/// use yadisk_share::url_parser::extract_public_key;
///
/// let key = extract_public_key("https://disk.yandex.ru/d/abc123");
/// assert_eq!(key.as_str(), "abc123");
///
/// let key = extract_public_key("abc123");
/// assert_eq!(key.as_str(), "abc123");
/// ```
pub fn extract_public_key(raw: &str) -> PublicKey {
    if raw.contains(SHARE_DOMAIN_MARKER) {
        let last = raw.rsplit('/').next().unwrap_or(raw);
        return PublicKey(last.to_string());
    }
    PublicKey(raw.to_string())
}
