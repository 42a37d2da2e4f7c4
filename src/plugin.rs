// src/plugin.rs
// =============================================================================
// Docker CLI plugin handshake.
//
// The Docker CLI discovers plugins by running `docker-<name>
// docker-cli-plugin-metadata` and reading one JSON object from stdout:
//
//   {"SchemaVersion":"0.1.0","Vendor":"...","Version":"...",
//    "ShortDescription":"...","URL":"..."}
//
// After that, `docker find nginx` runs `docker-find find nginx`.
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

pub const SCHEMA_VERSION: &str = "0.1.0";
pub const VENDOR: &str = "nomagicln";
pub const SHORT_DESCRIPTION: &str = "Find images";
pub const URL: &str = "https://github.com/nomagicln";

/// Plugin metadata, in the field names the Docker CLI expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub schema_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vendor: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub short_description: String,
    #[serde(rename = "URL", skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl Metadata {
    pub fn new(vendor: &str, version: &str, description: &str, url: &str) -> Self {
        Metadata {
            schema_version: SCHEMA_VERSION.to_string(),
            vendor: vendor.to_string(),
            version: version.to_string(),
            short_description: description.to_string(),
            url: url.to_string(),
        }
    }

    // The metadata for this binary
    pub fn current() -> Self {
        Metadata::new(VENDOR, env!("CARGO_PKG_VERSION"), SHORT_DESCRIPTION, URL)
    }
}

// Writes the metadata as one JSON line
pub fn write_metadata<W: Write>(out: &mut W, metadata: &Metadata) -> Result<()> {
    serde_json::to_writer(&mut *out, metadata).context("failed to encode plugin metadata")?;
    writeln!(out).context("failed to write plugin metadata")?;
    Ok(())
}
