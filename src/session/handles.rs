//! Registry of transient media handles.
//!
//! A handle stands for bytes the presentation layer may display or stream
//! (the loaded audio, an embedded cover image). Handles live until revoked;
//! nothing is reclaimed implicitly.

use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle {
    id: u64,
    mime: String,
    len: usize,
}

impl MediaHandle {
    #[cfg(test)]
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Default)]
pub struct MediaHandles {
    next_id: u64,
    live: HashMap<u64, Arc<[u8]>>,
}

impl MediaHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` and return a handle to them.
    pub fn create(&mut self, bytes: Arc<[u8]>, mime: &str) -> MediaHandle {
        self.next_id += 1;
        let handle = MediaHandle {
            id: self.next_id,
            mime: mime.to_string(),
            len: bytes.len(),
        };
        self.live.insert(handle.id, bytes);
        handle
    }

    #[cfg(test)]
    pub fn resolve(&self, handle: &MediaHandle) -> Option<Arc<[u8]>> {
        self.live.get(&handle.id).cloned()
    }

    /// Release `handle`. Returns false if it was already released.
    pub fn revoke(&mut self, handle: &MediaHandle) -> bool {
        self.live.remove(&handle.id).is_some()
    }

    #[cfg(test)]
    pub fn is_live(&self, handle: &MediaHandle) -> bool {
        self.live.contains_key(&handle.id)
    }

    /// Number of handles not yet revoked.
    pub fn live(&self) -> usize {
        self.live.len()
    }
}
