use crate::aggregate::aggregate_comments;
use crate::config::{RunConfig, SnapshotFormat};
use crate::flatten::flatten_comments;
use crate::model::{Diagnostics, FlatComment, RankedReport, RawCommentCollection, SkipReason};
use crate::progress::make_count_progress;
use crate::rank::rank_ambassadors;
use crate::report::{today_stamp, write_report, ReportOutcome};
use crate::shortcodes::extract_shortcodes;
use crate::snapshot::SnapshotStore;
use crate::source::PostSource;
use crate::util::init_tracing_once;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

#[derive(Clone, Debug, Default)]
pub struct AmbassadorPipeline {
    pub(crate) cfg: RunConfig,
    stamp: Option<String>,
}

/// Everything fetched for one run. `collections` may be a strict subset of `shortcodes`
/// when some fetches failed.
#[derive(Clone, Debug, Default)]
pub struct Collected {
    pub posts: Vec<Value>,
    pub shortcodes: Vec<String>,
    pub collections: Vec<RawCommentCollection>,
    pub diagnostics: Diagnostics,
}

/// Result of the in-memory stages: flat comments and the ranked tables.
#[derive(Clone, Debug, Default)]
pub struct Analysis {
    pub flat: Vec<FlatComment>,
    pub report: RankedReport,
    pub diagnostics: Diagnostics,
}

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub posts: usize,
    pub shortcodes: usize,
    pub analysis: Analysis,
    pub outcome: ReportOutcome,
}

/// Flatten, aggregate and rank already-fetched collections.
/// Works on any prefix or subset of a run's collections.
pub fn analyze_collections(collections: &[RawCommentCollection], top_n: usize) -> Analysis {
    let flat = flatten_comments(collections);
    let mut diagnostics = Diagnostics::default();
    diagnostics.record(SkipReason::MissingOwner, flat.skipped);
    tracing::info!(comments = flat.kept.len(), dropped = flat.skipped, "flattened comments");

    let aggregates = aggregate_comments(&flat.kept);
    let report = rank_ambassadors(aggregates, top_n);
    Analysis { flat: flat.kept, report, diagnostics }
}

impl AmbassadorPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: RunConfig) -> Self {
        Self { cfg, stamp: None }
    }

    // -------- Builder methods --------
    pub fn account(mut self, account: impl AsRef<str>) -> Self { self.cfg = self.cfg.with_account(account); self }
    pub fn num_posts(mut self, n: usize) -> Self { self.cfg = self.cfg.with_num_posts(n); self }
    pub fn top_n(mut self, n: usize) -> Self { self.cfg = self.cfg.with_top_n(n); self }
    pub fn snapshot_dir(mut self, dir: impl AsRef<Path>) -> Self { self.cfg = self.cfg.with_snapshot_dir(dir); self }
    pub fn without_snapshots(mut self) -> Self { self.cfg = self.cfg.without_snapshots(); self }
    pub fn snapshot_format(mut self, format: SnapshotFormat) -> Self { self.cfg = self.cfg.with_snapshot_format(format); self }
    pub fn results_dir(mut self, dir: impl AsRef<Path>) -> Self { self.cfg = self.cfg.with_results_dir(dir); self }
    pub fn progress(mut self, yes: bool) -> Self { self.cfg = self.cfg.with_progress(yes); self }
    /// Date suffix for report file names (default: today, `YYYYMMDD`).
    pub fn report_stamp(mut self, stamp: impl Into<String>) -> Self { self.stamp = Some(stamp.into()); self }

    fn snapshots(&self) -> Option<SnapshotStore> {
        self.cfg.snapshot_dir.as_ref().map(|d| SnapshotStore::new(d, self.cfg.snapshot_format))
    }

    /// Fetch posts, then comments one shortcode at a time.
    /// A failed comment fetch is logged and skipped; the run goes on with what it has.
    pub fn collect<S: PostSource + ?Sized>(&self, source: &mut S) -> Result<Collected> {
        init_tracing_once();
        let account = self.cfg.account.as_str();
        let snapshots = self.snapshots();
        let mut diagnostics = Diagnostics::default();

        tracing::info!(account, num_posts = self.cfg.num_posts, "fetching recent posts");
        let mut posts = source
            .fetch_recent_posts(account, self.cfg.num_posts)
            .with_context(|| format!("fetching recent posts of {account}"))?;
        posts.truncate(self.cfg.num_posts);
        tracing::info!(posts = posts.len(), "posts fetched");
        if posts.is_empty() {
            tracing::warn!(account, "no posts fetched");
        }
        if let Some(store) = &snapshots {
            snapshot_or_warn(store.write_posts(account, &posts));
        }

        let extracted = extract_shortcodes(&posts);
        diagnostics.record(SkipReason::MissingShortcode, extracted.skipped);
        let shortcodes = extracted.kept;
        tracing::info!(shortcodes = shortcodes.len(), "shortcodes extracted");

        let pb = make_count_progress(self.cfg.progress, shortcodes.len() as u64, "Fetching comments");
        let mut collections = Vec::with_capacity(shortcodes.len());
        for code in &shortcodes {
            match source.fetch_comments(code) {
                Ok(payload) => {
                    if let Some(store) = &snapshots {
                        snapshot_or_warn(store.write_post_comments(code, &payload));
                    }
                    tracing::debug!(shortcode = %code, "comments fetched");
                    collections.push(RawCommentCollection::new(code.clone(), payload));
                }
                Err(e) => {
                    tracing::warn!(shortcode = %code, error = %e, "skipping post: comment fetch failed");
                    diagnostics.record(SkipReason::FetchFailed, 1);
                }
            }
            if let Some(pb) = &pb { pb.inc(1); }
        }
        if let Some(pb) = pb { pb.finish_with_message("comments fetched"); }
        tracing::info!(fetched = collections.len(), failed = diagnostics.fetch_failures, "comment collections fetched");

        Ok(Collected { posts, shortcodes, collections, diagnostics })
    }

    /// In-memory stages over whatever `collect` produced.
    pub fn analyze(&self, collected: &Collected) -> Analysis {
        let mut analysis = analyze_collections(&collected.collections, self.cfg.top_n);
        analysis.diagnostics.posts_missing_shortcode += collected.diagnostics.posts_missing_shortcode;
        analysis.diagnostics.fetch_failures += collected.diagnostics.fetch_failures;
        analysis
    }

    /// Full run: collect, snapshot, analyze, export.
    pub fn run<S: PostSource + ?Sized>(&self, source: &mut S) -> Result<RunSummary> {
        let collected = self.collect(source)?;
        let account = self.cfg.account.as_str();
        let snapshots = self.snapshots();

        if let Some(store) = &snapshots {
            snapshot_or_warn(store.write_raw_batch(account, self.cfg.num_posts, &collected.collections));
        }

        let analysis = self.analyze(&collected);
        if let Some(store) = &snapshots {
            snapshot_or_warn(store.write_flat(account, self.cfg.num_posts, &analysis.flat));
        }
        if analysis.diagnostics.total() > 0 {
            tracing::warn!(
                posts_missing_shortcode = analysis.diagnostics.posts_missing_shortcode,
                comments_missing_owner = analysis.diagnostics.comments_missing_owner,
                fetch_failures = analysis.diagnostics.fetch_failures,
                "some records were skipped"
            );
        }

        let stamp = self.stamp.clone().unwrap_or_else(today_stamp);
        let outcome = write_report(&analysis.report, &self.cfg.results_dir, &stamp)?;

        Ok(RunSummary {
            posts: collected.posts.len(),
            shortcodes: collected.shortcodes.len(),
            analysis,
            outcome,
        })
    }
}

/// Snapshots are audit artifacts: a failed write is logged, not fatal.
fn snapshot_or_warn(res: Result<std::path::PathBuf>) {
    match res {
        Ok(path) => tracing::info!(path = %path.display(), "snapshot written"),
        Err(e) => tracing::warn!(error = %format!("{e:#}"), "snapshot not written"),
    }
}
