// src/hub/types.rs
// =============================================================================
// Data types for the Docker Hub API.
//
// Two groups live here:
// - Wire types: mirror the JSON the API sends back (TagPage, TagRecord, ...)
// - App types: what the rest of the program works with (Image, FindOptions)
//
// The API is not very strict about its fields (some come back as null), so
// nearly everything has #[serde(default)] and Option where null shows up.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A single image tag, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// The repository the tag belongs to (e.g. "nginx")
    pub repository: String,
    /// The tag name (e.g. "1.25-alpine")
    pub tag: String,
    /// Full size of the tag in bytes
    pub size: u64,
    /// When the tag was last updated
    pub created: Option<DateTime<Utc>>,
    /// Content digest ("sha256:...")
    pub digest: String,
}

impl Image {
    // Builds an Image out of one tag record of a page
    pub fn from_record(repository: &str, record: TagRecord) -> Self {
        Image {
            repository: repository.to_string(),
            tag: record.name,
            size: record.full_size.unwrap_or_default(),
            created: record.last_updated,
            digest: record.digest.unwrap_or_default(),
        }
    }
}

/// What the user asked for on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOptions {
    /// Repository name (e.g. "nginx")
    pub name: String,
    /// Page number to start from (1-based)
    pub page: u32,
    /// Number of tags per page
    pub page_size: u32,
    /// Tags whose name contains this are left out (batch mode)
    pub tag: Option<String>,
    /// Maximum number of images to print (batch mode)
    pub limit: Option<usize>,
    /// Only images updated strictly after this instant (batch mode)
    pub after: Option<DateTime<Utc>>,
}

impl FindOptions {
    pub fn new(name: impl Into<String>) -> Self {
        FindOptions {
            name: name.into(),
            page: 1,
            page_size: 25,
            tag: None,
            limit: None,
            after: None,
        }
    }
}

// One page of the tag list:
// {count, next, previous, results: [...]}
#[allow(dead_code)]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<TagRecord>,
}

impl TagPage {
    // The API sends `null` for the last page; an empty string means the same
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref().filter(|url| !url.is_empty())
    }
}

// One tag inside `results`
#[allow(dead_code)]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagRecord {
    pub name: String,
    #[serde(default)]
    pub full_size: Option<u64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub tag_status: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub images: Vec<TagPlatform>,
}

// Per-platform entry of a tag (one per architecture/os)
#[allow(dead_code)]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagPlatform {
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_pulled: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_pushed: Option<DateTime<Utc>>,
}

/// Repository metadata from `/v2/namespaces/{ns}/repositories/{name}`.
#[allow(dead_code)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Detail {
    pub user: String,
    pub name: String,
    pub namespace: String,
    pub repository_type: Option<String>,
    pub status: i64,
    pub status_description: Option<String>,
    pub description: Option<String>,
    pub is_private: bool,
    pub is_automated: bool,
    pub star_count: u64,
    pub pull_count: u64,
    pub last_updated: Option<DateTime<Utc>>,
    pub date_registered: Option<DateTime<Utc>>,
    pub collaborator_count: u64,
    // Free-form on the API side, so we keep it as raw JSON
    pub affiliation: Option<serde_json::Value>,
    pub hub_user: Option<String>,
    pub has_starred: bool,
    pub full_description: Option<String>,
    pub permissions: Permissions,
    pub media_types: Vec<String>,
    pub content_types: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub admin: bool,
}
