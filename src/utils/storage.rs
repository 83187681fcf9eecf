use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Minimal string key-value store, backed by Web Storage in the browser.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageArea {
    /// Survives reloads and new tabs.
    Local,
    /// Scoped to one tab.
    Session,
}

#[derive(Clone, Copy, Debug)]
pub struct BrowserStorage {
    area: StorageArea,
}

impl BrowserStorage {
    pub fn local() -> Self {
        BrowserStorage { area: StorageArea::Local }
    }

    pub fn session() -> Self {
        BrowserStorage { area: StorageArea::Session }
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        let storage = match self.area {
            StorageArea::Local => window.local_storage(),
            StorageArea::Session => window.session_storage(),
        };
        // Private browsing can throw here; treat it as no storage.
        storage.ok().flatten()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(s) = self.storage() {
            if s.set_item(key, value).is_err() {
                leptos::logging::warn!("[STORAGE] Failed to write key {}", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(s) = self.storage() {
            if s.remove_item(key).is_err() {
                leptos::logging::warn!("[STORAGE] Failed to remove key {}", key);
            }
        }
    }
}

/// In-memory store; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
