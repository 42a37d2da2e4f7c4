// src/hub/pages.rs
// =============================================================================
// Lazy, pull-based pagination.
//
// A Continuation is "the request for the next page", not yet sent. Calling
// fetch() sends it and gives back:
// - the images on that page
// - the continuation for the page after it, or None if this was the last one
//
// fetch() takes `self` by value, so a continuation can only be used once and
// there is no way back to an earlier page. Whoever holds the continuation
// decides when (and whether) the next request happens - in the pager session
// that's the user pressing a key.
// =============================================================================

use anyhow::{Context, Result};

use super::client::HubClient;
use super::types::Image;

/// One fetched page.
#[derive(Debug)]
pub struct Page {
    pub images: Vec<Image>,
    /// `None` once the API reports no further pages
    pub next: Option<Continuation>,
}

impl Page {
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// A deferred "fetch this page" request.
#[derive(Debug, Clone)]
pub struct Continuation {
    client: HubClient,
    repository: String,
    url: String,
}

impl Continuation {
    pub fn new(client: HubClient, repository: String, url: String) -> Self {
        Continuation { client, repository, url }
    }

    /// The URL this continuation will request.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends the request and returns the page plus what comes after it.
    pub async fn fetch(self) -> Result<Page> {
        let (images, next) = self
            .client
            .fetch_page(&self.repository, &self.url)
            .await
            .context("failed to fetch images")?;

        let next = next.map(|url| Continuation {
            client: self.client,
            repository: self.repository,
            url,
        });

        Ok(Page { images, next })
    }
}
