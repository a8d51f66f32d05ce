use serde_json::Value;

/// Keys that mark an object as a comment entry. Any one of them is enough.
pub const COMMENT_KEYS: [&str; 4] = ["comment_owner", "comment_likes", "comment_text", "comment_id"];

/// Extract a post's shortcode (`shortcode`, or the shorter `code` alias).
/// Empty or non-string values count as missing.
pub fn shortcode_of(v: &Value) -> Option<String> {
    ["shortcode", "code"]
        .iter()
        .filter_map(|k| v.get(*k).and_then(|x| x.as_str()))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Extract the commenting account. Whitespace-only names are treated as absent.
pub fn comment_owner_of(v: &Value) -> Option<String> {
    v.get("comment_owner")
        .and_then(|x| x.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Likes received by a comment. Absent, null, negative or non-numeric values count as 0.
pub fn comment_likes_of(v: &Value) -> u64 {
    match v.get("comment_likes") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Heuristic: an object is a comment entry if it carries any comment field.
pub fn is_comment_entry(v: &Value) -> bool {
    v.as_object()
        .map(|obj| COMMENT_KEYS.iter().any(|k| obj.contains_key(*k)))
        .unwrap_or(false)
}
