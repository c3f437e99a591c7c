use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const OBJECT_URL_PREFIX: &str = "blob:signature-pad/";

/// Handle to a blob registered with a [`BlobRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    fn generate() -> Self {
        Self(format!("{OBJECT_URL_PREFIX}{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-memory document addressed by an object URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Blob {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Contents as UTF-8, if they are valid text.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// Blobs handed out by the pad. Entries live until revoked.
#[derive(Debug, Default)]
pub struct BlobRegistry {
    blobs: HashMap<ObjectUrl, Blob>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, blob: Blob) -> ObjectUrl {
        let url = ObjectUrl::generate();
        log::debug!("Registered {} blob at {url}", blob.mime);
        self.blobs.insert(url.clone(), blob);
        url
    }

    pub fn resolve(&self, url: &str) -> Option<&Blob> {
        self.blobs.get(&ObjectUrl(url.to_owned()))
    }

    /// Releases the blob. Returns `false` when the URL was unknown.
    pub fn revoke(&mut self, url: &str) -> bool {
        self.blobs.remove(&ObjectUrl(url.to_owned())).is_some()
    }

    pub fn clear(&mut self) {
        self.blobs.clear();
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_resolve_revoke() {
        let mut registry = BlobRegistry::new();
        let url = registry.create(Blob::new("image/svg+xml", b"<svg/>".to_vec()));
        assert!(url.as_str().starts_with("blob:signature-pad/"));
        assert_eq!(registry.resolve(url.as_str()).and_then(Blob::text), Some("<svg/>"));

        assert!(registry.revoke(url.as_str()));
        assert!(registry.resolve(url.as_str()).is_none());
        assert!(!registry.revoke(url.as_str()));
    }

    #[test]
    fn test_urls_are_unique() {
        let mut registry = BlobRegistry::new();
        let a = registry.create(Blob::new("text/plain", Vec::new()));
        let b = registry.create(Blob::new("text/plain", Vec::new()));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }
}
