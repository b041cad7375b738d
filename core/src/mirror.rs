//! Client-held copy of the server's item collection.
//!
//! # Design
//! The items live behind an `Arc<Vec<Item>>`. Mutations go through
//! `Arc::make_mut`, so a snapshot taken by a renderer keeps seeing the state
//! it was handed while the mirror moves on to a new vector.
//!
//! The mirror never invents state: every mutation corresponds to a
//! successful server response. At most one entry exists per id.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::types::Item;

#[derive(Debug, Clone, Default)]
pub struct CollectionMirror {
    items: Arc<Vec<Item>>,
    etag: Option<String>,
    revision: u64,
}

impl CollectionMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Cheap handle on the current state. Later mutations do not affect it.
    pub fn snapshot(&self) -> Arc<Vec<Item>> {
        Arc::clone(&self.items)
    }

    pub fn get(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Validator of the listing the mirror currently equals, if any.
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Bumped on every state replacement.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the whole collection with a fresh listing.
    ///
    /// Duplicate ids collapse into one entry at the first position, holding
    /// the last value seen.
    pub fn replace_all(&mut self, items: Vec<Item>, etag: Option<String>) {
        let mut deduped: Vec<Item> = Vec::with_capacity(items.len());
        let mut positions: HashMap<Uuid, usize> = HashMap::with_capacity(items.len());
        for item in items {
            match positions.get(&item.id) {
                Some(&index) => deduped[index] = item,
                None => {
                    positions.insert(item.id, deduped.len());
                    deduped.push(item);
                }
            }
        }
        self.items = Arc::new(deduped);
        self.etag = etag;
        self.bump();
    }

    /// Map-and-replace the entry with the same id, or append if absent.
    pub fn upsert(&mut self, item: Item) {
        let items = Arc::make_mut(&mut self.items);
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        self.invalidate();
    }

    /// Filter out the entry with `id`. Returns whether one was present.
    pub fn remove(&mut self, id: Uuid) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        Arc::make_mut(&mut self.items).retain(|item| item.id != id);
        self.invalidate();
        true
    }

    fn invalidate(&mut self) {
        self.etag = None;
        self.bump();
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}
