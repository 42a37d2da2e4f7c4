// src/hub/client.rs
// =============================================================================
// HTTP client for the Docker Hub API.
//
// Endpoints used:
// - GET /v2/namespaces/{ns}/repositories/{name}/tags?page=P&page_size=N
// - GET /v2/namespaces/{ns}/repositories/{name}
//
// The reqwest::Client and the base URL are injected (see Config), so tests can
// point the client at a local mock server instead of the real hub.
//
// There is no retry and no authentication: one request, one answer.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::filter::filter_images;
use super::pages::Continuation;
use super::types::{Detail, FindOptions, Image, TagPage};
use crate::config::Config;

#[derive(Debug, Clone)]
pub struct HubClient {
    http: Client,
    base: Url,
    namespace: String,
}

impl HubClient {
    // Builds a client with a fresh reqwest::Client
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self::with_client(http, config))
    }

    // Builds a client around an existing reqwest::Client
    pub fn with_client(http: Client, config: &Config) -> Self {
        HubClient {
            http,
            base: config.hub_url.clone(),
            namespace: config.namespace.clone(),
        }
    }

    /// URL of the first tag page for `opts`.
    pub fn tags_url(&self, opts: &FindOptions) -> Result<Url> {
        let mut url = self.repository_url(&opts.name)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("invalid base URL: {}", self.base))?
            .push("tags");
        url.query_pairs_mut()
            .append_pair("page", &opts.page.to_string())
            .append_pair("page_size", &opts.page_size.to_string());
        Ok(url)
    }

    /// URL of the repository metadata for `name`.
    pub fn repository_url(&self, name: &str) -> Result<Url> {
        let (namespace, repository) = split_name(name, &self.namespace)?;

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("invalid base URL: {}", self.base))?
            .pop_if_empty()
            .extend(["v2", "namespaces", namespace, "repositories", repository]);
        Ok(url)
    }

    /// Returns the continuation that fetches the first page for `opts`.
    ///
    /// Nothing is requested until the continuation is used.
    pub fn find_images(&self, opts: &FindOptions) -> Result<Continuation> {
        let url = self.tags_url(opts)?;
        Ok(Continuation::new(self.clone(), repository_name(&opts.name), url.into()))
    }

    // Fetches and decodes one page of tags
    //
    // Returns the images on the page and the next page URL, if any
    pub async fn fetch_page(&self, repository: &str, url: &str) -> Result<(Vec<Image>, Option<String>)> {
        let page: TagPage = self.get_json(url).await?;

        let next = page.next_url().map(str::to_string);
        let images = page
            .results
            .into_iter()
            .map(|record| Image::from_record(repository, record))
            .collect::<Vec<_>>();

        tracing::debug!(repository, count = images.len(), has_next = next.is_some(), "fetched tag page");
        Ok((images, next))
    }

    /// Batch mode: one page, filtered and truncated.
    pub async fn find_batch(&self, opts: &FindOptions) -> Result<Vec<Image>> {
        let url = self.tags_url(opts)?;
        let (images, _) = self
            .fetch_page(&repository_name(&opts.name), url.as_str())
            .await
            .context("failed to fetch images")?;

        let mut images = filter_images(images, opts.tag.as_deref(), opts.after);
        if let Some(limit) = opts.limit {
            images.truncate(limit);
        }
        Ok(images)
    }

    /// Fetches the repository metadata for `name`.
    pub async fn fetch_detail(&self, name: &str) -> Result<Detail> {
        let url = self.repository_url(name)?;
        self.get_json(url.as_str())
            .await
            .with_context(|| format!("failed to fetch detail of '{}'", name))
    }

    // GET + status check + JSON decode, shared by every endpoint
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(url, "GET");

        let request = self
            .http
            .get(url)
            .build()
            .with_context(|| format!("failed to create request for {}", url))?;

        let response = self
            .http
            .execute(request)
            .await
            .with_context(|| format!("failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("request to {} failed: HTTP {}", url, status));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode response from {}", url))
    }
}

// Splits "bitnami/redis" into ("bitnami", "redis")
//
// A bare "nginx" uses the default namespace
fn split_name<'a>(name: &'a str, default_namespace: &'a str) -> Result<(&'a str, &'a str)> {
    let (namespace, repository) = match name.split_once('/') {
        Some((namespace, repository)) => (namespace, repository),
        None => (default_namespace, name),
    };

    if namespace.is_empty() || repository.is_empty() || repository.contains('/') {
        return Err(anyhow!("invalid repository name: '{}'", name));
    }

    Ok((namespace, repository))
}

// The name printed in front of each tag ("nginx" -> "nginx")
fn repository_name(name: &str) -> String {
    name.trim_matches('/').to_string()
}
