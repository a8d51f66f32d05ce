use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// On-disk encoding for JSON snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Zst,
}

impl SnapshotFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::Zst => "json.zst",
        }
    }
}

/// Run parameters, read once and handed to the pipeline.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub account: String,                // normalized: trimmed, no leading '@'
    pub num_posts: usize,               // most recent posts to consider
    pub top_n: usize,                   // ambassadors to report
    pub snapshot_dir: Option<PathBuf>,  // None disables audit snapshots
    pub snapshot_format: SnapshotFormat,
    pub results_dir: PathBuf,
    pub progress: bool,                 // show progress bar while fetching comments
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            account: "lacoste".to_string(),
            num_posts: 10,
            top_n: 5,
            snapshot_dir: Some(PathBuf::from("./posts_folder")),
            snapshot_format: SnapshotFormat::Json,
            results_dir: PathBuf::from("./results_ambassadors"),
            progress: true,
        }
    }
}

/// Env file looked up (optionally) by `RunConfig::from_env`.
pub const ENV_FILE: &str = "variables.env";

impl RunConfig {
    /// Defaults overlaid with `variables.env` (if present) and the process environment.
    /// Variables: INSTAGRAM_USER, NUM_POSTS, NB_AMBASSADORS (or the older NB_AMBASSADEURS),
    /// SNAPSHOT_DIR, RESULTS_DIR.
    pub fn from_env() -> Result<Self> {
        match dotenvy::from_filename(ENV_FILE) {
            Ok(path) => tracing::info!(path = %path.display(), "loaded env file"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).with_context(|| format!("reading {ENV_FILE}")),
        }
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup (the environment, a map in tests, ...).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(user) = get("INSTAGRAM_USER").filter(|s| !s.trim().is_empty()) {
            cfg = cfg.with_account(user);
        }
        if let Some(n) = get("NUM_POSTS") {
            cfg.num_posts = parse_count("NUM_POSTS", &n)?;
        }
        if let Some((key, n)) = get("NB_AMBASSADORS")
            .map(|n| ("NB_AMBASSADORS", n))
            .or_else(|| get("NB_AMBASSADEURS").map(|n| ("NB_AMBASSADEURS", n)))
        {
            cfg.top_n = parse_count(key, &n)?;
        }
        if let Some(dir) = get("SNAPSHOT_DIR") {
            cfg.snapshot_dir = if dir.trim().is_empty() { None } else { Some(PathBuf::from(dir.trim())) };
        }
        if let Some(dir) = get("RESULTS_DIR").filter(|s| !s.trim().is_empty()) {
            cfg.results_dir = PathBuf::from(dir.trim());
        }
        Ok(cfg)
    }

    pub fn with_account(mut self, account: impl AsRef<str>) -> Self {
        self.account = normalize_account(account.as_ref());
        self
    }
    pub fn with_num_posts(mut self, n: usize) -> Self {
        self.num_posts = n;
        self
    }
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }
    pub fn with_snapshot_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.snapshot_dir = Some(dir.as_ref().to_path_buf());
        self
    }
    pub fn without_snapshots(mut self) -> Self {
        self.snapshot_dir = None;
        self
    }
    pub fn with_snapshot_format(mut self, format: SnapshotFormat) -> Self {
        self.snapshot_format = format;
        self
    }
    pub fn with_results_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.results_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
}

fn parse_count(key: &str, raw: &str) -> Result<usize> {
    raw.trim().parse::<usize>().with_context(|| format!("{key} must be a non-negative integer, got {raw:?}"))
}

#[inline]
pub fn normalize_account(s: &str) -> String {
    let s = s.trim();
    s.strip_prefix('@').unwrap_or(s).to_string()
}
