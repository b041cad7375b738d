//! Domain DTOs for the item API.
//!
//! # Design
//! An `Item` is an opaque server-owned record: the server assigns `id`, and
//! every other field is carried as untyped JSON so the client never has to
//! know the resource schema. The DTOs are defined independently from the
//! server crate; integration tests catch schema drift between the two.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Every field of an item except `id`.
pub type Fields = Map<String, Value>;

/// A single item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Item {
    /// Builds an item, dropping any `id` key from `fields` so the record
    /// serializes with a single identifier.
    pub fn new(id: Uuid, mut fields: Fields) -> Self {
        fields.remove("id");
        Self { id, fields }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Outcome of a read that the server may answer from its cache validators.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// Fresh representation, with the validator the server attached to it.
    Modified { value: T, etag: Option<String> },
    /// `304 Not Modified`: the caller's copy is still current.
    NotModified,
}

impl<T> Fetched<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            Fetched::Modified { value, .. } => Some(value),
            Fetched::NotModified => None,
        }
    }
}
