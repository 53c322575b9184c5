//! HTTP client for the platform's paginated list endpoints.
//!
//! Every list endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true, "data": { "<items_key>": [...], "page": 1, "per_page": 20, "total": 42 }, "message": "..." }
//! ```
//!
//! Connection failures and non-2xx statuses are reported as
//! [`FetchErrorKind::Transport`](fitchlist_types::FetchErrorKind), a 2xx
//! envelope with `success: false` as `Server`, and an undecodable 2xx body
//! as `Parse`. A non-2xx answer keeps the envelope's message when it has one.

use async_trait::async_trait;
use fitchlist_core::{FilterEncoding, QueryParams};
use fitchlist_engine::PageFetcher;
use fitchlist_types::{FetchError, FetchRequest, PageResult, Record, RowKey};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::config::ApiConfig;
use crate::resource::ResourceConfig;
use crate::Result;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: String,
}

/// Shared HTTP client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Url::parse(&config.base_url)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an endpoint path below the base URL.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_matches('/'));
        Ok(Url::parse(&url)?)
    }

    /// Bind a configured resource (with its path parameters) to this client.
    pub fn resource(
        &self,
        name: &str,
        resource: &ResourceConfig,
        params: &HashMap<String, String>,
    ) -> Result<ResourceFetcher> {
        let endpoint = resource.resolve_endpoint(name, params)?;
        let url = self.endpoint_url(&endpoint)?;
        Ok(ResourceFetcher {
            client: self.clone(),
            url,
            items_key: resource.items_key.clone(),
            key_field: resource.key_field.clone(),
            encoding: resource.filter_encoding()?,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> std::result::Result<Envelope, FetchError> {
        let response = self
            .authorize(request)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::transport(describe_transport(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(describe_transport(&e)))?;

        let envelope = serde_json::from_str::<Envelope>(&body);

        if !status.is_success() {
            let message = match envelope {
                Ok(envelope) if !envelope.message.is_empty() => envelope.message,
                _ => format!("Server responded with {}", status),
            };
            return Err(FetchError::transport(message));
        }

        let envelope = envelope.map_err(|e| FetchError::parse(format!("Malformed response: {}", e)))?;
        if !envelope.success {
            let message = if envelope.message.is_empty() {
                "Request was not successful".to_string()
            } else {
                envelope.message
            };
            return Err(FetchError::server(message));
        }

        Ok(envelope)
    }

    async fn fetch_page(
        &self,
        url: &Url,
        items_key: &str,
        key_field: &str,
        encoding: FilterEncoding,
        request: &FetchRequest,
    ) -> std::result::Result<PageResult<Record>, FetchError> {
        let mut url = url.clone();
        url.set_query(Some(
            &QueryParams::from_request(request).to_query_string(encoding),
        ));
        tracing::debug!(%url, "GET");

        let envelope = self.send(self.http.get(url)).await?;
        decode_page(envelope.data, items_key, key_field)
    }

    /// `DELETE <endpoint>/<key>`.
    pub async fn delete(&self, url: &Url, key: &RowKey) -> std::result::Result<(), FetchError> {
        let target = format!("{}/{}", url.as_str().trim_end_matches('/'), key);
        tracing::debug!(url = %target, "DELETE");
        self.send(self.http.delete(&target)).await?;
        Ok(())
    }
}

fn describe_transport(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Request timed out".to_string()
    } else if err.is_connect() {
        "Could not connect to the server".to_string()
    } else {
        format!("Request failed: {}", err)
    }
}

fn decode_page(
    data: Value,
    items_key: &str,
    key_field: &str,
) -> std::result::Result<PageResult<Record>, FetchError> {
    let Value::Object(mut data) = data else {
        return Err(FetchError::parse("Response has no data object"));
    };
    let Some(Value::Array(raw_items)) = data.remove(items_key) else {
        return Err(FetchError::parse(format!(
            "Response data has no '{}' array",
            items_key
        )));
    };

    let items = raw_items
        .into_iter()
        .map(|item| Record::from_json(item, key_field))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| FetchError::parse(format!("Bad {} item: {}", items_key, e)))?;

    let total = data
        .get("total")
        .and_then(Value::as_u64)
        .unwrap_or(items.len() as u64);

    Ok(PageResult::new(items, total))
}

/// One resource bound to an [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ResourceFetcher {
    client: ApiClient,
    url: Url,
    items_key: String,
    key_field: String,
    encoding: FilterEncoding,
}

impl ResourceFetcher {
    /// Fully resolved list URL. Used to scope persisted view state.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn delete(&self, key: &RowKey) -> std::result::Result<(), FetchError> {
        self.client.delete(&self.url, key).await
    }
}

#[async_trait]
impl PageFetcher<Record> for ResourceFetcher {
    async fn fetch(&self, request: &FetchRequest) -> std::result::Result<PageResult<Record>, FetchError> {
        self.client
            .fetch_page(
                &self.url,
                &self.items_key,
                &self.key_field,
                self.encoding,
                request,
            )
            .await
    }
}
