//! Records flowing through the pipeline: raw collections in, flat comments, per-account
//! aggregates and the ranked report out.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The retrieval layer's answer for one post, tagged with the shortcode it was fetched for.
/// `payload` may be arbitrarily nested (pagination wrappers, edges/nodes, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct RawCommentCollection {
    pub shortcode: String,
    pub payload: Value,
}

impl RawCommentCollection {
    pub fn new(shortcode: impl Into<String>, payload: Value) -> Self {
        Self { shortcode: shortcode.into(), payload }
    }
}

/// One comment, normalized and stamped with the post it belongs to.
/// Fields other than the three known ones are carried through in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatComment {
    pub shortcode: String,
    pub comment_owner: String,
    #[serde(default)]
    pub comment_likes: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Engagement of one commenting account.
/// Invariant: `nb_posts_commented <= nb_comments`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountAggregate {
    pub comment_owner: String,
    pub nb_posts_commented: u64,
    pub nb_comments: u64,
    pub total_likes: u64,
}

impl AccountAggregate {
    /// Column order of every exported table.
    pub const COLUMNS: [&'static str; 4] = ["comment_owner", "nb_posts_commented", "nb_comments", "total_likes"];

    pub fn tsv_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.comment_owner.replace(['\t', '\n', '\r'], " "),
            self.nb_posts_commented,
            self.nb_comments,
            self.total_likes
        )
    }
}

/// Both output tables. `top_n` is always a prefix of `summary`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedReport {
    pub summary: Vec<AccountAggregate>,
    pub top_n: Vec<AccountAggregate>,
    /// The requested N (may exceed `summary.len()`).
    pub requested: usize,
}

impl RankedReport {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }
}

impl fmt::Display for RankedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.top_n.is_empty() {
            return writeln!(f, "no data to rank");
        }
        let w = self.top_n.iter().map(|a| a.comment_owner.chars().count()).max().unwrap_or(0).max(13);
        writeln!(f, "{:<w$}  {:>18}  {:>11}  {:>11}", "comment_owner", "nb_posts_commented", "nb_comments", "total_likes")?;
        for a in &self.top_n {
            writeln!(f, "{:<w$}  {:>18}  {:>11}  {:>11}", a.comment_owner, a.nb_posts_commented, a.nb_comments, a.total_likes)?;
        }
        Ok(())
    }
}

/// Why a record was left out. Counted, never raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// A post without a usable shortcode.
    MissingShortcode,
    /// A comment entry that cannot be attributed to an account.
    MissingOwner,
    /// The retrieval layer failed for one shortcode.
    FetchFailed,
}

/// Output of a best-effort step: what was kept and how many inputs were skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct Extracted<T> {
    pub kept: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for Extracted<T> {
    fn default() -> Self {
        Self { kept: Vec::new(), skipped: 0 }
    }
}

/// Skip counters for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub posts_missing_shortcode: usize,
    pub comments_missing_owner: usize,
    pub fetch_failures: usize,
}

impl Diagnostics {
    pub fn record(&mut self, reason: SkipReason, n: usize) {
        match reason {
            SkipReason::MissingShortcode => self.posts_missing_shortcode += n,
            SkipReason::MissingOwner => self.comments_missing_owner += n,
            SkipReason::FetchFailed => self.fetch_failures += n,
        }
    }

    pub fn total(&self) -> usize {
        self.posts_missing_shortcode + self.comments_missing_owner + self.fetch_failures
    }
}
