//! Owner of the collection mirror and the callbacks that mutate it.
//!
//! # Design
//! Each callback follows the same shape: build a request with `ItemClient`,
//! run it through the `Transport`, parse the response, then replace state
//! in the mirror. Nothing is applied optimistically; a failed call leaves
//! the mirror as it was. The one exception is `NotFound` on an id-addressed
//! call, which drops the stale id because the server has said it is gone.
//!
//! Every callback takes `&mut self`, so a container has a single writer and
//! at most one request in flight.

use uuid::Uuid;

use crate::client::ItemClient;
use crate::error::ApiError;
use crate::mirror::CollectionMirror;
use crate::transport::Transport;
use crate::types::{Fetched, Fields, Item};

pub struct ItemContainer<T> {
    client: ItemClient,
    transport: T,
    mirror: CollectionMirror,
}

impl<T: Transport> ItemContainer<T> {
    pub fn new(client: ItemClient, transport: T) -> Self {
        Self {
            client,
            transport,
            mirror: CollectionMirror::new(),
        }
    }

    pub fn client(&self) -> &ItemClient {
        &self.client
    }

    pub fn mirror(&self) -> &CollectionMirror {
        &self.mirror
    }

    pub fn items(&self) -> &[Item] {
        self.mirror.items()
    }

    /// Read-all. A 304 against the stored etag keeps the current mirror.
    pub fn load_all(&mut self) -> Result<&[Item], ApiError> {
        let request = self.client.build_list_items(self.mirror.etag());
        let fetched = self
            .transport
            .execute(request)
            .and_then(|response| self.client.parse_list_items(response))
            .inspect_err(|err| log_failure("load_all", None, err))?;

        match fetched {
            Fetched::Modified { value, etag } => {
                tracing::debug!(count = value.len(), etag = ?etag, "replacing mirror with listing");
                self.mirror.replace_all(value, etag);
            }
            Fetched::NotModified => {
                tracing::debug!("listing not modified, keeping mirror");
            }
        }
        Ok(self.mirror.items())
    }

    /// Read-one. The fetched record replaces (or joins) its mirrored copy.
    pub fn load_one(&mut self, id: Uuid) -> Result<Item, ApiError> {
        let request = self.client.build_get_item(id);
        let result = self
            .transport
            .execute(request)
            .and_then(|response| self.client.parse_get_item(response));

        match self.settle("load_one", id, result)? {
            Fetched::Modified { value, .. } => {
                self.mirror.upsert(value.clone());
                Ok(value)
            }
            Fetched::NotModified => self.mirror.get(id).cloned().ok_or(ApiError::NotFound),
        }
    }

    /// Create. The server's record, with its assigned id, is appended.
    pub fn create(&mut self, fields: &Fields) -> Result<Item, ApiError> {
        let created = self
            .client
            .build_create_item(fields)
            .and_then(|request| self.transport.execute(request))
            .and_then(|response| self.client.parse_create_item(response))
            .inspect_err(|err| log_failure("create", None, err))?;

        tracing::debug!(id = %created.id, "appending created item");
        self.mirror.upsert(created.clone());
        Ok(created)
    }

    /// Update. The mirrored copy is replaced by the server's record.
    pub fn update(&mut self, id: Uuid, fields: &Fields) -> Result<Item, ApiError> {
        let result = self
            .client
            .build_update_item(id, fields)
            .and_then(|request| self.transport.execute(request))
            .and_then(|response| self.client.parse_update_item(response));

        let updated = self.settle("update", id, result)?;
        tracing::debug!(%id, "replacing updated item");
        self.mirror.upsert(updated.clone());
        Ok(updated)
    }

    /// Delete. The id is filtered out of the mirror.
    pub fn delete(&mut self, id: Uuid) -> Result<(), ApiError> {
        let request = self.client.build_delete_item(id);
        let result = self
            .transport
            .execute(request)
            .and_then(|response| self.client.parse_delete_item(response));

        self.settle("delete", id, result)?;
        tracing::debug!(%id, "removing deleted item");
        self.mirror.remove(id);
        Ok(())
    }

    /// Shared failure handling for calls addressed to a single id.
    fn settle<R>(&mut self, op: &str, id: Uuid, result: Result<R, ApiError>) -> Result<R, ApiError> {
        result.inspect_err(|err| {
            log_failure(op, Some(id), err);
            if err.is_not_found() && self.mirror.remove(id) {
                tracing::debug!(%id, "dropped stale item from mirror");
            }
        })
    }
}

fn log_failure(op: &str, id: Option<Uuid>, err: &ApiError) {
    match id {
        Some(id) => tracing::warn!(op, %id, error = %err, "item call failed"),
        None => tracing::warn!(op, error = %err, "item call failed"),
    }
}
