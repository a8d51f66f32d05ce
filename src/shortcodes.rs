//! Shortcode extraction from fetched posts.

use crate::json_utils::shortcode_of;
use crate::model::Extracted;
use serde_json::Value;

/// Collect post shortcodes in first-seen order.
///
/// Duplicates are passed through untouched; uniqueness is the retrieval layer's business.
/// Posts without a usable shortcode are skipped and counted in `skipped`.
pub fn extract_shortcodes(posts: &[Value]) -> Extracted<String> {
    let mut out = Extracted::default();
    for post in posts {
        match shortcode_of(post) {
            Some(code) => out.kept.push(code),
            None => out.skipped += 1,
        }
    }
    if out.skipped > 0 {
        tracing::warn!(skipped = out.skipped, "posts without a shortcode were skipped");
    }
    out
}
