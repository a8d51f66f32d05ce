//! Report writing: the full summary and the top-N table, each as TSV and as a JSON array.

use crate::model::{AccountAggregate, RankedReport};
use crate::util::write_atomic;
use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;

/// Files produced for one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableFiles {
    pub tsv: PathBuf,
    pub json: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Nothing to rank; no file was written. This is the caller-visible "no data to rank"
    /// warning (also logged at `warn`).
    Empty,
    /// `top_n` is `None` when N was 0.
    Written { summary: TableFiles, top_n: Option<TableFiles> },
}

/// `YYYYMMDD` for today, local time when the offset is known, UTC otherwise.
pub fn today_stamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!("[year][month][day]")).unwrap_or_else(|_| "00000000".to_string())
}

pub fn summary_stem(stamp: &str) -> String {
    format!("ambassadors_summary_{stamp}")
}

pub fn top_stem(n: usize, stamp: &str) -> String {
    format!("top{n}_ambassadors_{stamp}")
}

/// Write both tables under `dir`, names suffixed with `stamp`.
/// Empty tables are never written: an empty report yields `ReportOutcome::Empty`.
pub fn write_report(report: &RankedReport, dir: &Path, stamp: &str) -> Result<ReportOutcome> {
    if report.is_empty() {
        tracing::warn!("no data to rank; summary and top-N tables not written");
        return Ok(ReportOutcome::Empty);
    }

    let summary = write_table(&report.summary, dir, &summary_stem(stamp))?;
    tracing::info!(path = %summary.tsv.display(), rows = report.summary.len(), "summary exported");

    let top_n = if report.top_n.is_empty() {
        tracing::warn!(n = report.requested, "top-N table is empty; not exported");
        None
    } else {
        let files = write_table(&report.top_n, dir, &top_stem(report.requested, stamp))?;
        tracing::info!(path = %files.tsv.display(), rows = report.top_n.len(), "top-N exported");
        Some(files)
    };

    Ok(ReportOutcome::Written { summary, top_n })
}

fn write_table(rows: &[AccountAggregate], dir: &Path, stem: &str) -> Result<TableFiles> {
    let tsv = dir.join(format!("{stem}.tsv"));
    write_atomic(&tsv, |w| write_tsv(rows, w))?;

    let json = dir.join(format!("{stem}.json"));
    write_atomic(&json, |w| {
        serde_json::to_writer_pretty(w, rows)?;
        Ok(())
    })?;
    Ok(TableFiles { tsv, json })
}

/// Header row, then one row per account, columns in `AccountAggregate::COLUMNS` order.
pub fn write_tsv(rows: &[AccountAggregate], w: &mut dyn Write) -> Result<()> {
    writeln!(w, "{}", AccountAggregate::COLUMNS.join("\t"))?;
    for r in rows {
        writeln!(w, "{}", r.tsv_row())?;
    }
    Ok(())
}
