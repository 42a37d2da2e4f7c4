// src/hub/filter.rs
// Client-side filters for batch mode.

use chrono::{DateTime, Utc};

use super::types::Image;

// Applies the batch filters to one page of images
//
// - `exclude`: tags whose name contains this substring are dropped.
//   Note: this EXCLUDES matches; `--tag rc` hides release candidates.
//   An empty string is treated as "no filter".
// - `after`: only images updated strictly after the cutoff are kept;
//   images without a timestamp never pass a cutoff.
pub fn filter_images(
    images: Vec<Image>,
    exclude: Option<&str>,
    after: Option<DateTime<Utc>>,
) -> Vec<Image> {
    let exclude = exclude.filter(|s| !s.is_empty());

    images
        .into_iter()
        .filter(|image| match exclude {
            Some(needle) => !image.tag.contains(needle),
            None => true,
        })
        .filter(|image| match after {
            Some(cutoff) => image.created.is_some_and(|created| created > cutoff),
            None => true,
        })
        .collect()
}
