//! Ranking: order accounts by engagement breadth and cut the top N.

use crate::model::{AccountAggregate, RankedReport};
use std::cmp::Ordering;

/// Total order used for ranking: distinct posts desc, comments desc, likes desc, then
/// owner ascending so equal metrics always come out the same way.
pub fn ambassador_order(a: &AccountAggregate, b: &AccountAggregate) -> Ordering {
    b.nb_posts_commented
        .cmp(&a.nb_posts_commented)
        .then_with(|| b.nb_comments.cmp(&a.nb_comments))
        .then_with(|| b.total_likes.cmp(&a.total_likes))
        .then_with(|| a.comment_owner.cmp(&b.comment_owner))
}

/// Sort all aggregates into `summary` and take the first `top_n` of them.
/// `top_n` larger than the number of accounts simply yields the whole summary.
pub fn rank_ambassadors(mut aggregates: Vec<AccountAggregate>, top_n: usize) -> RankedReport {
    aggregates.sort_by(ambassador_order);
    let top = aggregates.iter().take(top_n).cloned().collect();
    if aggregates.is_empty() {
        tracing::warn!("no data to rank");
    }
    RankedReport { summary: aggregates, top_n: top, requested: top_n }
}
