//! Stateless HTTP request builder and response parser for the item API.
//!
//! # Design
//! `ItemClient` holds only a base URL and a resource path and carries no
//! mutable state between calls. Each CRUD operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the round trip,
//! keeping this layer deterministic and free of I/O.

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Fetched, Fields, Item};

const DEFAULT_RESOURCE: &str = "items";

/// Synchronous, stateless client for one REST resource collection.
#[derive(Debug, Clone)]
pub struct ItemClient {
    base_url: String,
    resource: String,
}

impl ItemClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            resource: DEFAULT_RESOURCE.to_string(),
        }
    }

    /// Point the client at a different collection, e.g. `"notes"` or
    /// `"api/v1/notes"`.
    pub fn with_resource(mut self, resource: &str) -> Self {
        self.resource = resource.trim_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.resource)
    }

    fn item_url(&self, id: Uuid) -> String {
        format!("{}/{}/{id}", self.base_url, self.resource)
    }

    /// Build the list request. Passing the etag of the previous listing makes
    /// the request conditional, so an unchanged collection comes back as 304.
    pub fn build_list_items(&self, etag: Option<&str>) -> HttpRequest {
        let headers = etag
            .map(|tag| vec![("if-none-match".to_string(), tag.to_string())])
            .unwrap_or_default();
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_url(),
            headers,
            body: None,
        }
    }

    pub fn build_get_item(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_item(&self, fields: &Fields) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection_url(),
            headers: json_headers(),
            body: Some(encode_fields(fields)?),
        })
    }

    pub fn build_update_item(&self, id: Uuid, fields: &Fields) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.item_url(id),
            headers: json_headers(),
            body: Some(encode_fields(fields)?),
        })
    }

    pub fn build_delete_item(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_items(&self, response: HttpResponse) -> Result<Fetched<Vec<Item>>, ApiError> {
        parse_fetched(response)
    }

    pub fn parse_get_item(&self, response: HttpResponse) -> Result<Fetched<Item>, ApiError> {
        parse_fetched(response)
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        check_status(&response, &[200, 201])?;
        decode(&response.body)
    }

    pub fn parse_update_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    /// Delete responses have no guaranteed shape; only the status matters.
    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 202, 204])
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

/// The id travels in the path only, so an embedded `id` key is dropped.
fn encode_fields(fields: &Fields) -> Result<String, ApiError> {
    let body = if fields.contains_key("id") {
        let mut stripped = fields.clone();
        stripped.remove("id");
        serde_json::to_string(&stripped)
    } else {
        serde_json::to_string(fields)
    };
    body.map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn parse_fetched<T: DeserializeOwned>(response: HttpResponse) -> Result<Fetched<T>, ApiError> {
    if response.status == 304 {
        return Ok(Fetched::NotModified);
    }
    check_status(&response, &[200])?;
    let etag = response.header("etag").map(str::to_string);
    Ok(Fetched::Modified {
        value: decode(&response.body)?,
        etag,
    })
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, accepted: &[u16]) -> Result<(), ApiError> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ItemClient {
        ItemClient::new("http://localhost:3000")
    }

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn build_list_items_produces_correct_request() {
        let req = client().build_list_items(None);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/items");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_items_with_etag_is_conditional() {
        let req = client().build_list_items(Some("\"v7\""));
        assert_eq!(req.header("If-None-Match"), Some("\"v7\""));
    }

    #[test]
    fn build_get_item_produces_correct_request() {
        let req = client().build_get_item(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:3000/items/00000000-0000-0000-0000-000000000000"
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_item_produces_correct_request() {
        let input = fields(json!({ "title": "Buy milk", "done": false }));
        let req = client().build_create_item(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/items");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "title": "Buy milk", "done": false }));
    }

    #[test]
    fn build_update_item_drops_embedded_id() {
        let input = fields(json!({ "id": "ignored", "title": "Updated" }));
        let req = client().build_update_item(Uuid::nil(), &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "title": "Updated" }));
    }

    #[test]
    fn build_delete_item_produces_correct_request() {
        let req = client().build_delete_item(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn custom_resource_path_is_normalized() {
        let client = ItemClient::new("http://localhost:3000/").with_resource("/api/notes/");
        assert_eq!(client.build_list_items(None).path, "http://localhost:3000/api/notes");
        assert_eq!(
            client.build_delete_item(Uuid::nil()).path,
            "http://localhost:3000/api/notes/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ItemClient::new("http://localhost:3000/");
        assert_eq!(client.build_list_items(None).path, "http://localhost:3000/items");
    }

    #[test]
    fn parse_list_items_success_keeps_etag() {
        let response = HttpResponse::new(
            200,
            r#"[{"id":"00000000-0000-0000-0000-000000000001","title":"Test"}]"#,
        )
        .with_header("ETag", "\"v1\"");
        match client().parse_list_items(response).unwrap() {
            Fetched::Modified { value, etag } => {
                assert_eq!(value.len(), 1);
                assert_eq!(value[0].field("title"), Some(&json!("Test")));
                assert_eq!(etag.as_deref(), Some("\"v1\""));
            }
            Fetched::NotModified => panic!("expected a fresh listing"),
        }
    }

    #[test]
    fn parse_list_items_not_modified() {
        let response = HttpResponse::new(304, "");
        let fetched = client().parse_list_items(response).unwrap();
        assert_eq!(fetched, Fetched::NotModified);
    }

    #[test]
    fn parse_list_items_bad_json() {
        let err = client().parse_list_items(HttpResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_get_item_not_found() {
        let err = client().parse_get_item(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_create_item_accepts_200_and_201() {
        let body = r#"{"id":"00000000-0000-0000-0000-000000000001","title":"New"}"#;
        for status in [200, 201] {
            let item = client().parse_create_item(HttpResponse::new(status, body)).unwrap();
            assert_eq!(item.field("title"), Some(&json!("New")));
        }
    }

    #[test]
    fn parse_create_item_wrong_status() {
        let err = client()
            .parse_create_item(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_update_item_success() {
        let response = HttpResponse::new(
            200,
            r#"{"id":"00000000-0000-0000-0000-000000000001","title":"Updated","done":true}"#,
        );
        let item = client().parse_update_item(response).unwrap();
        assert_eq!(item.field("done"), Some(&json!(true)));
    }

    #[test]
    fn parse_delete_item_ignores_body_shape() {
        for (status, body) in [(204, ""), (200, "{\"deleted\":true}"), (202, "queued")] {
            assert!(client().parse_delete_item(HttpResponse::new(status, body)).is_ok());
        }
    }

    #[test]
    fn parse_delete_item_not_found() {
        let err = client().parse_delete_item(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
