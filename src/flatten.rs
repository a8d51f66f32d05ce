//! Comment flattening: walk each raw collection, whatever its nesting, and emit one
//! `FlatComment` per comment-shaped object. Replies nested in a comment are emitted too,
//! right after their parent, and are not repeated in the parent's pass-through fields.

use crate::json_utils::{comment_likes_of, comment_owner_of, is_comment_entry};
use crate::model::{Extracted, FlatComment, RawCommentCollection};
use serde_json::Value;

/// Flatten all collections, in collection order. Within a collection the document
/// order of the raw tree is kept (object keys iterate in the order serde_json stores them).
///
/// Entries with no usable `comment_owner` are dropped and counted in `skipped`.
pub fn flatten_comments(collections: &[RawCommentCollection]) -> Extracted<FlatComment> {
    let mut out = Extracted::default();
    for c in collections {
        let before = out.kept.len();
        visit(&c.payload, &c.shortcode, &mut out);
        tracing::debug!(shortcode = %c.shortcode, comments = out.kept.len() - before, "flattened collection");
    }
    if out.skipped > 0 {
        tracing::warn!(dropped = out.skipped, "comment entries without an owner were dropped");
    }
    out
}

/// Number of comment-shaped objects in a raw tree, attributable or not,
/// including replies nested inside other comments.
pub fn count_comment_entries(v: &Value) -> usize {
    match v {
        Value::Array(items) => items.iter().map(count_comment_entries).sum(),
        Value::Object(obj) => {
            let own = usize::from(is_comment_entry(v));
            own + obj.values().map(count_comment_entries).sum::<usize>()
        }
        _ => 0,
    }
}

fn holds_comments(v: &Value) -> bool {
    count_comment_entries(v) > 0
}

fn visit(v: &Value, shortcode: &str, out: &mut Extracted<FlatComment>) {
    match v {
        Value::Array(items) => {
            for item in items {
                visit(item, shortcode, out);
            }
        }
        Value::Object(obj) if is_comment_entry(v) => {
            // parent first, then its replies
            match to_flat(v, shortcode) {
                Some(fc) => out.kept.push(fc),
                None => out.skipped += 1,
            }
            for child in obj.values().filter(|c| c.is_array() || c.is_object()) {
                visit(child, shortcode, out);
            }
        }
        Value::Object(obj) => {
            for child in obj.values() {
                visit(child, shortcode, out);
            }
        }
        // scalars never hold comments
        _ => {}
    }
}

fn to_flat(v: &Value, shortcode: &str) -> Option<FlatComment> {
    let obj = v.as_object()?;
    let comment_owner = comment_owner_of(v)?;
    let comment_likes = comment_likes_of(v);
    let extra = obj
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "shortcode" | "comment_owner" | "comment_likes"))
        .filter(|(_, val)| !holds_comments(val))
        .map(|(k, val)| (k.clone(), val.clone()))
        .collect();
    Some(FlatComment { shortcode: shortcode.to_string(), comment_owner, comment_likes, extra })
}
