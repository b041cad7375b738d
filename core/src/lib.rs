//! Synchronous client core for a REST item collection.
//!
//! # Overview
//! Three layers, each usable on its own:
//! - `ItemClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern).
//! - `ItemContainer` owns a `CollectionMirror` and exposes one callback per
//!   REST verb: run the request through a `Transport`, then replace state.
//! - `view` renders mirror state as text.
//!
//! # Design
//! - `ItemClient` is stateless: it holds only the base URL and resource path.
//! - Items are opaque: the server assigns `id`, all other fields stay JSON.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod container;
pub mod error;
pub mod http;
pub mod mirror;
pub mod transport;
pub mod types;
pub mod view;

pub use client::ItemClient;
pub use container::ItemContainer;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mirror::CollectionMirror;
pub use transport::{Transport, UreqTransport};
pub use types::{Fetched, Fields, Item};
