use anyhow::{Context, Result};
use ambassadors::{init_tracing_once, AmbassadorPipeline, ReportOutcome, RunConfig, SnapshotSource};
use std::path::PathBuf;

/// Where previously fetched posts/comments are replayed from.
const REPLAY_ROOT: &str = "./posts_folder";

fn main() -> Result<()> {
    init_tracing_once();

    let cfg = RunConfig::from_env()?;
    let replay_dir = cfg.snapshot_dir.clone().unwrap_or_else(|| PathBuf::from(REPLAY_ROOT));
    let mut source = SnapshotSource::open(&replay_dir)
        .with_context(|| format!("replay source {}", replay_dir.display()))?;

    tracing::info!(
        account = %cfg.account,
        num_posts = cfg.num_posts,
        top_n = cfg.top_n,
        results = %cfg.results_dir.display(),
        "ranking ambassadors"
    );

    // Replaying: do not rewrite the snapshots we are reading from.
    let summary = AmbassadorPipeline::from_config(cfg).without_snapshots().run(&mut source)?;

    print!("{}", summary.analysis.report);
    match &summary.outcome {
        ReportOutcome::Written { summary: files, top_n } => {
            println!("summary exported: {}", files.tsv.display());
            if let Some(t) = top_n {
                println!("top-N exported: {}", t.tsv.display());
            }
        }
        ReportOutcome::Empty => println!("no data to rank, nothing exported"),
    }
    Ok(())
}
