//! Producer interface for posts and comments, and an offline implementation that
//! replays snapshot files.

use crate::config::SnapshotFormat;
use crate::snapshot::{discover_post_snapshots, file_component, read_json_snapshot, SnapshotStore};
use anyhow::{anyhow, bail, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What the pipeline needs from a retrieval layer (scraper, API client, replay).
pub trait PostSource {
    /// Up to `max_count` most recent posts of `account`, newest first. May return fewer.
    fn fetch_recent_posts(&mut self, account: &str, max_count: usize) -> Result<Vec<Value>>;

    /// Raw comment collection of one post, in whatever nesting the backend produces.
    fn fetch_comments(&mut self, shortcode: &str) -> Result<Value>;
}

/// Replays a snapshot directory written by `SnapshotStore`.
pub struct SnapshotSource {
    dir: PathBuf,
    comments: BTreeMap<String, PathBuf>,
}

impl SnapshotSource {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            bail!("snapshot directory {} does not exist", dir.display());
        }
        let comments = discover_post_snapshots(&dir);
        tracing::info!(dir = %dir.display(), posts = comments.len(), "opened snapshot source");
        Ok(Self { dir, comments })
    }

    /// Shortcodes with a comment snapshot on disk.
    pub fn shortcodes(&self) -> impl Iterator<Item = &str> {
        self.comments.keys().map(String::as_str)
    }

    fn posts_file(&self, account: &str) -> Option<PathBuf> {
        [SnapshotFormat::Json, SnapshotFormat::Zst]
            .into_iter()
            .map(|f| SnapshotStore::new(&self.dir, f).posts_path(account))
            .find(|p| p.is_file())
    }
}

impl PostSource for SnapshotSource {
    fn fetch_recent_posts(&mut self, account: &str, max_count: usize) -> Result<Vec<Value>> {
        let path = self
            .posts_file(account)
            .ok_or_else(|| anyhow!("no posts snapshot for account {account} in {}", self.dir.display()))?;
        match read_json_snapshot(&path)? {
            Value::Array(mut posts) => {
                posts.truncate(max_count);
                Ok(posts)
            }
            other => bail!("{}: expected a JSON array of posts, found {}", path.display(), type_name(&other)),
        }
    }

    fn fetch_comments(&mut self, shortcode: &str) -> Result<Value> {
        let path = self
            .comments
            .get(&file_component(shortcode))
            .ok_or_else(|| anyhow!("no comment snapshot for shortcode {shortcode}"))?;
        read_json_snapshot(path)
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
