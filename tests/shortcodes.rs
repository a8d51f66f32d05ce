#[path = "common/mod.rs"]
mod common;

use ambassadors::extract_shortcodes;
use common::*;
use serde_json::json;

/// First-seen order, duplicates passed through, `code` accepted as an alias.
#[test]
fn keeps_order_and_duplicates() {
    let mut input = posts(&["B3", "A1", "B3"]);
    input.push(json!({"code": "Z9", "caption": "aliased"}));

    let out = extract_shortcodes(&input);
    assert_eq!(out.kept, vec!["B3", "A1", "B3", "Z9"]);
    assert_eq!(out.skipped, 0);
}

/// Posts without a usable shortcode are skipped and counted; the rest go through.
#[test]
fn skips_posts_without_shortcode() {
    let input = vec![
        json!({"caption": "no id"}),
        json!({"shortcode": ""}),
        json!({"shortcode": 12345}),
        json!({"shortcode": "ok"}),
        json!("not an object"),
    ];
    let out = extract_shortcodes(&input);
    assert_eq!(out.kept, vec!["ok"]);
    assert_eq!(out.skipped, 4);
}

#[test]
fn no_posts_no_shortcodes() {
    let out = extract_shortcodes(&[]);
    assert!(out.kept.is_empty());
    assert_eq!(out.skipped, 0);
}
