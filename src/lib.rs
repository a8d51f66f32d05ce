mod config;
mod json_utils;
mod model;

mod shortcodes;
mod flatten;
mod aggregate;
mod rank;

mod report;
mod snapshot;
mod source;
mod progress;
mod util;
mod pipeline;

pub use crate::config::{normalize_account, RunConfig, SnapshotFormat, ENV_FILE};
pub use crate::model::{AccountAggregate, Diagnostics, Extracted, FlatComment, RankedReport, RawCommentCollection, SkipReason};
pub use crate::pipeline::{analyze_collections, AmbassadorPipeline, Analysis, Collected, RunSummary};

// core stages, usable on their own
pub use crate::shortcodes::extract_shortcodes;
pub use crate::flatten::{count_comment_entries, flatten_comments};
pub use crate::aggregate::{aggregate_comments, Aggregator, AmbassadorAggregator};
pub use crate::rank::{ambassador_order, rank_ambassadors};

// export json field helpers to application code
pub use crate::json_utils::{comment_likes_of, comment_owner_of, is_comment_entry, shortcode_of, COMMENT_KEYS};

// retrieval seam + offline replay
pub use crate::source::{PostSource, SnapshotSource};
pub use crate::snapshot::{discover_post_snapshots, read_json_snapshot, SnapshotStore};

pub use crate::report::{summary_stem, today_stamp, top_stem, write_report, write_tsv, ReportOutcome, TableFiles};
pub use crate::util::{init_tracing_once, write_atomic};
