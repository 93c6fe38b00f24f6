//! The one HTTP client every request goes through.
use std::time::Duration;

use log::info;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    error::{FacetError, Result},
    facet_api::FacetApi,
    helpers::{log_page, normalize_link},
    models::{Config, Page},
};

/// Issues base-path-relative requests against the configured API server.
///
/// Cheap to clone, the inner [`reqwest::Client`] is reference counted.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        Url::parse(&config.api_base_url)
            .map_err(|err| FacetError::InvalidUrl(format!("{}: {err}", config.api_base_url)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone().filter(|token| !token.is_empty()),
        })
    }

    /// Absolute URL for `path`. Absolute links pointing elsewhere pass through.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// Server cursor link in the relative form this client is fed with.
    pub fn relative(&self, link: &str) -> String {
        normalize_link(&self.base_url, link)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        info!("{} {}", method, path);
        let request = self.client.request(method, self.url(path));
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::NOT_FOUND => Err(FacetError::NotFound(path.to_string())),
            StatusCode::BAD_REQUEST => {
                let payload = response.json::<Value>().await.unwrap_or(Value::Null);
                Err(FacetError::Validation(payload))
            }
            _ => Err(FacetError::Status {
                status: status.as_u16(),
                url: path.to_string(),
            }),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Allows to use ApiClient for every page, form and export via real requests.
impl FacetApi for ApiClient {
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.request(Method::POST, path).json(body);
        let response = self.send(request, path).await?;
        Self::decode(response).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let request = self.request(Method::PUT, path).json(body);
        let response = self.send(request, path).await?;
        Self::decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }

    async fn get_page<T: DeserializeOwned>(&self, path: &str) -> Result<Page<T>> {
        let mut page: Page<T> = self.get_json(path).await?;
        page.next = page.next.map(|link| self.relative(&link));
        page.previous = page.previous.map(|link| self.relative(&link));
        log_page(path, &page);
        Ok(page)
    }
}
