//! Per-account aggregation over flat comments.
//! Implement `Aggregator` for other reductions; `AmbassadorAggregator` is the one the pipeline uses.

use crate::model::{AccountAggregate, FlatComment};
use ahash::{AHashMap, AHashSet};

pub trait Aggregator: Default {
    type Output;
    fn ingest(&mut self, record: &FlatComment);
    fn merge(&mut self, other: Self);
    fn finish(self) -> Self::Output;
}

#[derive(Default, Debug, Clone)]
struct OwnerTally {
    shortcodes: AHashSet<String>,
    comments: u64,
    likes: u64,
}

/// Running `(set of shortcodes, comment count, like sum)` per commenting account.
/// Output order of `finish` is unspecified; ranking imposes the order.
#[derive(Default, Debug, Clone)]
pub struct AmbassadorAggregator {
    by_owner: AHashMap<String, OwnerTally>,
    ingested: u64,
}

impl AmbassadorAggregator {
    pub fn accounts(&self) -> usize {
        self.by_owner.len()
    }

    pub fn ingested(&self) -> u64 {
        self.ingested
    }
}

impl Aggregator for AmbassadorAggregator {
    type Output = Vec<AccountAggregate>;

    fn ingest(&mut self, record: &FlatComment) {
        let tally = self.by_owner.entry(record.comment_owner.clone()).or_default();
        if !tally.shortcodes.contains(&record.shortcode) {
            tally.shortcodes.insert(record.shortcode.clone());
        }
        tally.comments += 1;
        tally.likes = tally.likes.saturating_add(record.comment_likes);
        self.ingested += 1;
    }

    fn merge(&mut self, other: Self) {
        for (owner, part) in other.by_owner {
            let tally = self.by_owner.entry(owner).or_default();
            tally.shortcodes.extend(part.shortcodes);
            tally.comments += part.comments;
            tally.likes = tally.likes.saturating_add(part.likes);
        }
        self.ingested += other.ingested;
    }

    fn finish(self) -> Vec<AccountAggregate> {
        self.by_owner
            .into_iter()
            .map(|(comment_owner, t)| AccountAggregate {
                comment_owner,
                nb_posts_commented: t.shortcodes.len() as u64,
                nb_comments: t.comments,
                total_likes: t.likes,
            })
            .collect()
    }
}

/// One pass over `comments`, grouped by `comment_owner`.
pub fn aggregate_comments(comments: &[FlatComment]) -> Vec<AccountAggregate> {
    let mut agg = AmbassadorAggregator::default();
    for c in comments {
        agg.ingest(c);
    }
    tracing::info!(comments = agg.ingested(), accounts = agg.accounts(), "aggregated comments per account");
    agg.finish()
}
