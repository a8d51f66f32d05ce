//! Audit snapshots: raw posts, raw comment collections and flat comments as pretty JSON
//! (optionally zstd-compressed), plus discovery of previously written per-post files.

use crate::config::SnapshotFormat;
use crate::model::{FlatComment, RawCommentCollection};
use crate::util::write_atomic;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;
use zstd::stream::read::Decoder;
use zstd::stream::write::Encoder as ZstdEncoder;

const ZSTD_LEVEL: i32 = 9;

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("static regex"))
}

fn post_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^post_(.+?)\.json(\.zst)?$").expect("static regex"))
}

/// Make a shortcode/account safe to embed in a file name.
pub fn file_component(s: &str) -> String {
    unsafe_chars().replace_all(s, "_").into_owned()
}

#[derive(Clone, Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
    format: SnapshotFormat,
}

impl SnapshotStore {
    pub fn new(dir: impl AsRef<Path>, format: SnapshotFormat) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), format }
    }

    pub fn posts_path(&self, account: &str) -> PathBuf {
        self.dir.join(format!("{}_all-user-posts.{}", file_component(account), self.format.extension()))
    }
    pub fn post_comments_path(&self, shortcode: &str) -> PathBuf {
        self.dir.join(format!("post_{}.{}", file_component(shortcode), self.format.extension()))
    }
    pub fn raw_batch_path(&self, account: &str, num_posts: usize) -> PathBuf {
        self.dir.join(format!("{}_{}_last_posts_raw.{}", file_component(account), num_posts, self.format.extension()))
    }
    pub fn flat_path(&self, account: &str, num_posts: usize) -> PathBuf {
        self.dir.join(format!("{}_{}_last_posts.{}", file_component(account), num_posts, self.format.extension()))
    }

    pub fn write_posts(&self, account: &str, posts: &[Value]) -> Result<PathBuf> {
        let p = self.posts_path(account);
        self.write_json(&p, &posts)?;
        Ok(p)
    }

    pub fn write_post_comments(&self, shortcode: &str, payload: &Value) -> Result<PathBuf> {
        let p = self.post_comments_path(shortcode);
        self.write_json(&p, payload)?;
        Ok(p)
    }

    /// All raw payloads as one array, in shortcode order.
    pub fn write_raw_batch(&self, account: &str, num_posts: usize, collections: &[RawCommentCollection]) -> Result<PathBuf> {
        let p = self.raw_batch_path(account, num_posts);
        let payloads: Vec<&Value> = collections.iter().map(|c| &c.payload).collect();
        self.write_json(&p, &payloads)?;
        Ok(p)
    }

    pub fn write_flat(&self, account: &str, num_posts: usize, comments: &[FlatComment]) -> Result<PathBuf> {
        let p = self.flat_path(account, num_posts);
        self.write_json(&p, &comments)?;
        Ok(p)
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let format = self.format;
        write_atomic(path, |w| {
            match format {
                SnapshotFormat::Json => serde_json::to_writer_pretty(w, value)?,
                SnapshotFormat::Zst => {
                    let mut enc = ZstdEncoder::new(w, ZSTD_LEVEL)?;
                    serde_json::to_writer_pretty(&mut enc, value)?;
                    enc.finish()?;
                }
            }
            Ok(())
        })
        .with_context(|| format!("writing snapshot {}", path.display()))?;
        tracing::debug!(path = %path.display(), "snapshot written");
        Ok(())
    }
}

/// Read a JSON snapshot; `.zst` files are decompressed on the fly.
pub fn read_json_snapshot(path: &Path) -> Result<Value> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let r: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("zst") {
        Box::new(Decoder::new(f).with_context(|| format!("zstd decoder for {}", path.display()))?)
    } else {
        Box::new(f)
    };
    serde_json::from_reader(BufReader::new(r)).with_context(|| format!("parse {}", path.display()))
}

/// Map shortcode -> `post_{shortcode}.json[.zst]` found directly under `dir`.
/// When both encodings exist for one shortcode the plain JSON file wins.
pub fn discover_post_snapshots(dir: &Path) -> BTreeMap<String, PathBuf> {
    let mut map = BTreeMap::new();
    if !dir.exists() {
        return map;
    }
    for ent in WalkDir::new(dir).min_depth(1).max_depth(1).into_iter().flatten() {
        if !ent.file_type().is_file() {
            continue;
        }
        let Some(name) = ent.file_name().to_str() else { continue };
        if let Some(caps) = post_file_re().captures(name) {
            let compressed = caps.get(2).is_some();
            let code = caps[1].to_string();
            if compressed && map.contains_key(&code) {
                continue;
            }
            map.insert(code, ent.path().to_path_buf());
        }
    }
    map
}
