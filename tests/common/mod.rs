#![allow(dead_code)]

use ambassadors::{PostSource, RawCommentCollection};
use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// The two-post scenario:
///   p1: a (2 likes)
///   p2: a (5 likes), b (1 like)
/// Expected: a = 2 posts / 2 comments / 7 likes, b = 1 / 1 / 1.
pub fn scenario_collections() -> Vec<RawCommentCollection> {
    vec![
        RawCommentCollection::new("p1", json!([{"comment_owner":"a","comment_likes":2}])),
        RawCommentCollection::new("p2", json!([
            {"comment_owner":"a","comment_likes":5},
            {"comment_owner":"b","comment_likes":1}
        ])),
    ]
}

/// A payload shaped like a paginated scraper response: pages wrapping edges wrapping
/// nodes, with a malformed entry (null owner) and some noise that is not a comment.
pub fn paginated_payload() -> Value {
    json!({
        "post": {"shortcode": "ignored", "likes": 1200, "caption": "new drop"},
        "pages": [
            {"cursor": "abc", "edges": [
                {"node": {"comment_owner": "alice", "comment_likes": 3, "comment_text": "love it"}},
                {"node": {"comment_owner": "bob", "comment_text": "nice"}}
            ]},
            {"cursor": null, "edges": [
                {"node": {"comment_owner": null, "comment_likes": 9, "comment_text": "ghost"}},
                {"node": {"comment_owner": "alice", "comment_likes": "4", "comment_text": "again"}}
            ]}
        ],
        "tags": ["summer", "tennis"]
    })
}

/// Posts as a retrieval layer would return them, newest first.
pub fn posts(codes: &[&str]) -> Vec<Value> {
    codes
        .iter()
        .enumerate()
        .map(|(i, c)| json!({"shortcode": c, "taken_at": 1_700_000_000 + i as i64, "caption": format!("post {i}")}))
        .collect()
}

/// In-memory retrieval layer. Shortcodes listed in `failing` error out on fetch.
#[derive(Default)]
pub struct MockSource {
    pub posts: Vec<Value>,
    pub comments: HashMap<String, Value>,
    pub failing: HashSet<String>,
    pub fetched: Vec<String>,
}

impl MockSource {
    pub fn new(posts: Vec<Value>) -> Self {
        Self { posts, ..Default::default() }
    }
    pub fn with_comments(mut self, shortcode: &str, payload: Value) -> Self {
        self.comments.insert(shortcode.to_string(), payload);
        self
    }
    pub fn failing_on(mut self, shortcode: &str) -> Self {
        self.failing.insert(shortcode.to_string());
        self
    }
}

impl PostSource for MockSource {
    fn fetch_recent_posts(&mut self, _account: &str, max_count: usize) -> Result<Vec<Value>> {
        Ok(self.posts.iter().take(max_count).cloned().collect())
    }

    fn fetch_comments(&mut self, shortcode: &str) -> Result<Value> {
        self.fetched.push(shortcode.to_string());
        if self.failing.contains(shortcode) {
            return Err(anyhow!("rate limited on {shortcode}"));
        }
        Ok(self.comments.get(shortcode).cloned().unwrap_or_else(|| json!([])))
    }
}

/// Fresh scratch directory that outlives the test (inspect it on failure).
pub fn scratch_dir() -> PathBuf {
    tempfile::tempdir().unwrap().into_path()
}

/// Read a text file line-by-line into strings (skips empty lines).
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// File names directly under `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut v: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    v.sort();
    v
}
