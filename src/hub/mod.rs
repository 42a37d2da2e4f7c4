// src/hub/mod.rs
// =============================================================================
// This module talks to the Docker Hub API.
//
// Submodules:
// - types: JSON wire types and the Image / FindOptions / Detail records
// - client: HubClient, which builds URLs and performs the GET requests
// - pages: Continuation, the lazy "fetch the next page" value
// - filter: client-side filters used by batch mode
// =============================================================================

mod client;
mod filter;
mod pages;
mod types;

pub use client::HubClient;
pub use pages::Continuation;
pub use types::{Detail, FindOptions, Image};
