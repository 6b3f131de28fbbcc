use color_eyre::{eyre::eyre, Result};
use futures::future::BoxFuture;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::config::Config;
use crate::retry::RetryPolicy;

use super::api_types::ArticlesResponse;
use super::error::FetchError;
use super::types::UrgentNewsItem;

/// Upstream endpoint the proxy should forward to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
  TopHeadlines,
  Everything,
}

impl Endpoint {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::TopHeadlines => "top-headlines",
      Self::Everything => "everything",
    }
  }
}

/// A proxied request: the endpoint plus pass-through query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
  pub endpoint: Endpoint,
  pub params: Vec<(&'static str, String)>,
}

impl ProxyRequest {
  pub fn new(endpoint: Endpoint) -> Self {
    Self {
      endpoint,
      params: Vec::new(),
    }
  }

  pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
    self.params.push((name, value.to_string()));
    self
  }

  /// Add the parameter only when `value` is not blank.
  pub fn param_if_present(self, name: &'static str, value: &str) -> Self {
    if value.trim().is_empty() {
      self
    } else {
      self.param(name, value)
    }
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .params
      .iter()
      .find(|(k, _)| *k == name)
      .map(|(_, v)| v.as_str())
  }
}

/// The proxy boundary, as the fetchers see it.
pub trait NewsTransport: Send + Sync {
  /// `GET /api/news` with the request's endpoint and parameters
  fn get_articles<'a>(
    &'a self,
    request: &'a ProxyRequest,
  ) -> BoxFuture<'a, Result<ArticlesResponse, FetchError>>;

  /// `GET /api/urgent-news`
  fn get_urgent(&self) -> BoxFuture<'_, Result<UrgentNewsItem, FetchError>>;
}

/// HTTP client for the same-origin news proxy.
#[derive(Clone)]
pub struct ProxyClient {
  client: reqwest::Client,
  base_url: Url,
  retry: RetryPolicy,
}

impl ProxyClient {
  pub fn new(config: &Config) -> Result<Self> {
    let base_url = Url::parse(&config.proxy.base_url)
      .map_err(|e| eyre!("Invalid proxy URL {}: {}", config.proxy.base_url, e))?;

    let client = reqwest::Client::builder()
      .timeout(config.proxy.timeout())
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      client,
      base_url,
      retry: config.retry.policy(),
    })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Build the `/api/news` URL for a request.
  pub fn news_url(&self, request: &ProxyRequest) -> Url {
    let mut url = self.base_url.clone();
    url.set_path("/api/news");
    url.set_query(None);
    {
      let mut query = url.query_pairs_mut();
      query.append_pair("endpoint", request.endpoint.as_str());
      for (name, value) in &request.params {
        query.append_pair(name, value);
      }
    }
    url
  }

  pub fn urgent_url(&self) -> Url {
    let mut url = self.base_url.clone();
    url.set_path("/api/urgent-news");
    url.set_query(None);
    url
  }

  /// GET a JSON body, retrying transport failures and 5xx responses.
  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
    info!(url = %url, "fetching from proxy");
    self
      .retry
      .run_if(|| self.get_json_once(url.clone()), FetchError::is_retryable)
      .await
  }

  async fn get_json_once<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
    let response = self
      .client
      .get(url)
      .header(ACCEPT, "application/json")
      .send()
      .await?;

    let status = response.status();
    let body = response.bytes().await?;
    debug!(status = status.as_u16(), bytes = body.len(), "proxy response");

    if !status.is_success() {
      return Err(FetchError::from_status(status.as_u16(), &body));
    }

    Ok(serde_json::from_slice(&body)?)
  }
}

impl NewsTransport for ProxyClient {
  fn get_articles<'a>(
    &'a self,
    request: &'a ProxyRequest,
  ) -> BoxFuture<'a, Result<ArticlesResponse, FetchError>> {
    Box::pin(self.get_json(self.news_url(request)))
  }

  fn get_urgent(&self) -> BoxFuture<'_, Result<UrgentNewsItem, FetchError>> {
    Box::pin(self.get_json(self.urgent_url()))
  }
}
