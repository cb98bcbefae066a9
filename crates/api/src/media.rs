//! Resolution of opaque media object ids into retrievable URLs.
//!
//! Image uploads live in an external blob store; entities only carry object
//! ids. The store exposes objects at `<base>/<object-id>`, so resolution is
//! a pure formatting step against the configured base URL.

use uuid::Uuid;

/// Public URL for a single media object.
pub fn object_url(base_url: &str, object_id: Uuid) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), object_id)
}

/// Public URLs for an entity's image list, in stored order.
pub fn object_urls(base_url: &str, object_ids: &[Uuid]) -> Vec<String> {
    object_ids
        .iter()
        .map(|id| object_url(base_url, *id))
        .collect()
}
