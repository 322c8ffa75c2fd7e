//! In-memory PDF previews
//!
//! A preview exposes finished PDF bytes under a revocable
//! `blob:report-preview/<uuid>` URL. The URL stays valid until its
//! [`PreviewHandle`] is closed or dropped.

use crate::{ExportError, Result};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;
use uuid::Uuid;

const URL_PREFIX: &str = "blob:report-preview/";

/// Shared table of open previews. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<RwLock<HashMap<String, Arc<[u8]>>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish bytes under a fresh URL
    pub fn open(&self, bytes: Arc<[u8]>) -> PreviewHandle {
        let url = format!("{}{}", URL_PREFIX, Uuid::new_v4());
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.clone(), bytes.clone());
        debug!(%url, bytes = bytes.len(), "preview opened");
        PreviewHandle {
            url,
            bytes,
            registry: self.clone(),
            revoked: false,
        }
    }

    /// Bytes behind a URL, if it has not been revoked
    pub fn fetch(&self, url: &str) -> Result<Arc<[u8]>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
            .ok_or_else(|| ExportError::PreviewNotFound(url.to_string()))
    }

    pub fn is_open(&self, url: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(url)
    }

    /// Number of open previews
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn revoke(&self, url: &str) -> bool {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url)
            .is_some();
        if removed {
            debug!(%url, "preview revoked");
        }
        removed
    }
}

/// Owner of one preview URL
#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    bytes: Arc<[u8]>,
    registry: PreviewRegistry,
    revoked: bool,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Revoke the URL
    pub fn close(mut self) {
        self.revoke_once();
    }

    fn revoke_once(&mut self) {
        if !self.revoked {
            self.registry.revoke(&self.url);
            self.revoked = true;
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.revoke_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_bytes() -> Arc<[u8]> {
        Arc::from(&b"%PDF-1.4\n%%EOF\n"[..])
    }

    #[test]
    fn test_open_fetch_close() {
        let registry = PreviewRegistry::new();
        let handle = registry.open(pdf_bytes());
        let url = handle.url().to_string();

        assert!(url.starts_with("blob:report-preview/"));
        assert_eq!(&*registry.fetch(&url).unwrap(), handle.bytes());

        handle.close();
        assert!(!registry.is_open(&url));
        assert!(matches!(registry.fetch(&url), Err(ExportError::PreviewNotFound(_))));
    }

    #[test]
    fn test_drop_revokes() {
        let registry = PreviewRegistry::new();
        let url = {
            let handle = registry.open(pdf_bytes());
            handle.url().to_string()
        };
        assert!(!registry.is_open(&url));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_urls_are_unique() {
        let registry = PreviewRegistry::new();
        let first = registry.open(pdf_bytes());
        let second = registry.open(pdf_bytes());
        assert_ne!(first.url(), second.url());
        assert_eq!(registry.len(), 2);

        drop(first);
        assert!(registry.is_open(second.url()));
        assert_eq!(registry.len(), 1);
    }
}
