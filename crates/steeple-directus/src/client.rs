use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::DirectusError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for one Directus instance. Cheap to clone; all requests share
/// the same connection pool and optional static bearer token.
#[derive(Debug, Clone)]
pub struct DirectusClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl DirectusClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, DirectusError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn get(&self, path: &str) -> Result<Value, DirectusError> {
        debug!(path, "GET");
        let resp = self.request(reqwest::Method::GET, path).send().await?;
        handle_response(resp).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, DirectusError> {
        debug!(path, "POST");
        let resp = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        handle_response(resp).await
    }

    /// GET `/collections` — every collection the instance knows about.
    pub async fn list_collections(&self) -> Result<Vec<Value>, DirectusError> {
        Ok(into_list(self.get("/collections").await?))
    }

    /// POST `/collections`.
    pub async fn create_collection(&self, body: &Value) -> Result<Value, DirectusError> {
        self.post("/collections", body).await
    }

    /// GET `/fields/{collection}`.
    pub async fn list_fields(&self, collection: &str) -> Result<Vec<Value>, DirectusError> {
        Ok(into_list(self.get(&format!("/fields/{collection}")).await?))
    }

    /// POST `/fields/{collection}`.
    pub async fn create_field(
        &self,
        collection: &str,
        body: &Value,
    ) -> Result<Value, DirectusError> {
        self.post(&format!("/fields/{collection}"), body).await
    }

    /// GET `/relations`.
    pub async fn list_relations(&self) -> Result<Vec<Value>, DirectusError> {
        Ok(into_list(self.get("/relations").await?))
    }

    /// POST `/relations`.
    pub async fn create_relation(&self, body: &Value) -> Result<Value, DirectusError> {
        self.post("/relations", body).await
    }

    /// GET `/server/ping` — connectivity probe.
    pub async fn ping(&self) -> Result<(), DirectusError> {
        let resp = self.request(reqwest::Method::GET, "/server/ping").send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(DirectusError::api(status.as_u16(), extract_message(status.as_u16(), &body)))
        }
    }

    /// Whether any item in `collection` already uses `slug`.
    pub async fn item_exists_by_slug(
        &self,
        collection: &str,
        slug: &str,
    ) -> Result<bool, DirectusError> {
        let resp = self
            .request(reqwest::Method::GET, &format!("/items/{collection}"))
            .query(&[("filter[slug][_eq]", slug), ("limit", "1")])
            .send()
            .await?;
        let items = into_list(handle_response(resp).await?);
        Ok(!items.is_empty())
    }

    /// POST `/items/{collection}`.
    pub async fn create_item(
        &self,
        collection: &str,
        body: &Value,
    ) -> Result<Value, DirectusError> {
        self.post(&format!("/items/{collection}"), body).await
    }
}

/// Unwrap a 2xx response body, or turn a non-2xx one into a
/// [`DirectusError::Api`] carrying the envelope message.
async fn handle_response(resp: reqwest::Response) -> Result<Value, DirectusError> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(DirectusError::api(
            status.as_u16(),
            extract_message(status.as_u16(), &body),
        ));
    }

    if body.is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(&body)?;
    Ok(unwrap_data(value))
}

/// Directus wraps payloads as `{"data": ...}`; some endpoints and proxies
/// return the payload bare. Accept both.
fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn into_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Pull the human-readable message out of the conventional Directus error
/// envelope `{"errors": [{"message": ...}]}`, falling back to the raw body.
fn extract_message(status: u16, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body)
        && let Some(message) = json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|e| e.first())
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
    {
        return message.to_string();
    }
    if body.is_empty() {
        format!("HTTP {status} with empty body")
    } else {
        body.to_string()
    }
}
