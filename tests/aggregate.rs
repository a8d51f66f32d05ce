#[path = "common/mod.rs"]
mod common;

use ambassadors::{aggregate_comments, flatten_comments, AccountAggregate, Aggregator, AmbassadorAggregator, FlatComment};
use common::*;
use serde_json::{json, Map};
use std::collections::BTreeMap;

fn by_owner(v: Vec<AccountAggregate>) -> BTreeMap<String, AccountAggregate> {
    v.into_iter().map(|a| (a.comment_owner.clone(), a)).collect()
}

fn fc(shortcode: &str, owner: &str, likes: u64) -> FlatComment {
    FlatComment { shortcode: shortcode.into(), comment_owner: owner.into(), comment_likes: likes, extra: Map::new() }
}

/// The two-post scenario: `a` engaged with both posts, `b` with one.
#[test]
fn two_post_scenario() {
    let flat = flatten_comments(&scenario_collections()).kept;
    let aggs = by_owner(aggregate_comments(&flat));

    assert_eq!(aggs.len(), 2);
    assert_eq!(
        aggs["a"],
        AccountAggregate { comment_owner: "a".into(), nb_posts_commented: 2, nb_comments: 2, total_likes: 7 }
    );
    assert_eq!(
        aggs["b"],
        AccountAggregate { comment_owner: "b".into(), nb_posts_commented: 1, nb_comments: 1, total_likes: 1 }
    );
}

/// Several comments on one post count once for breadth, every time for volume.
#[test]
fn distinct_posts_vs_comment_count() {
    let flat = vec![fc("p1", "fan", 1), fc("p1", "fan", 2), fc("p1", "fan", 0), fc("p2", "fan", 4)];
    let aggs = by_owner(aggregate_comments(&flat));
    let fan = &aggs["fan"];
    assert_eq!((fan.nb_posts_commented, fan.nb_comments, fan.total_likes), (2, 4, 7));
}

/// Group sizes add back up to the input length, and breadth never exceeds volume.
#[test]
fn conservation_and_breadth_invariant() {
    let collections = vec![
        ambassadors::RawCommentCollection::new("p1", paginated_payload()),
        ambassadors::RawCommentCollection::new("p2", json!([
            {"comment_owner": "alice"}, {"comment_owner": "carol", "comment_likes": 2},
            {"comment_owner": "carol"}, {"comment_text": "orphan"}
        ])),
    ];
    let flat = flatten_comments(&collections);
    let aggs = aggregate_comments(&flat.kept);

    let total: u64 = aggs.iter().map(|a| a.nb_comments).sum();
    assert_eq!(total as usize, flat.kept.len());
    assert_eq!(flat.skipped, 2);
    assert_eq!(total as usize, 8 - flat.skipped);
    assert!(aggs.iter().all(|a| a.nb_posts_commented <= a.nb_comments));
}

/// Same input, same aggregates (order aside).
#[test]
fn aggregation_is_idempotent() {
    let flat = flatten_comments(&scenario_collections()).kept;
    assert_eq!(by_owner(aggregate_comments(&flat)), by_owner(aggregate_comments(&flat)));
}

/// Splitting the input, aggregating each half and merging equals one pass,
/// including a post seen by the same account in both halves.
#[test]
fn merge_matches_single_pass() {
    let flat = vec![fc("p1", "a", 1), fc("p2", "a", 1), fc("p2", "b", 3), fc("p2", "a", 2), fc("p3", "b", 0)];

    let mut left = AmbassadorAggregator::default();
    flat[..2].iter().for_each(|c| left.ingest(c));
    let mut right = AmbassadorAggregator::default();
    flat[2..].iter().for_each(|c| right.ingest(c));
    left.merge(right);

    assert_eq!(left.ingested(), 5);
    assert_eq!(left.accounts(), 2);
    let merged = by_owner(left.finish());
    assert_eq!(merged, by_owner(aggregate_comments(&flat)));
    assert_eq!(merged["a"].nb_posts_commented, 2);
    assert_eq!(merged["a"].nb_comments, 3);
}

#[test]
fn no_comments_no_aggregates() {
    assert!(aggregate_comments(&[]).is_empty());
}
