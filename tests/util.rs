#[path = "common/mod.rs"]
mod common;

use ambassadors::write_atomic;
use anyhow::anyhow;
use common::*;
use std::io::Write;

/// A failing writer leaves neither the target nor its temp file behind,
/// and an existing target keeps its old content.
#[test]
fn failed_write_leaves_no_temp_file() {
    let dir = scratch_dir();
    let dest = dir.join("table.tsv");

    let res = write_atomic(&dest, |w| {
        writeln!(w, "partial")?;
        Err(anyhow!("disk full"))
    });
    assert!(res.is_err());
    assert!(file_names(&dir).is_empty());

    write_atomic(&dest, |w| {
        writeln!(w, "v1")?;
        Ok(())
    })
    .unwrap();
    assert!(write_atomic(&dest, |_| Err(anyhow!("boom"))).is_err());
    assert_eq!(file_names(&dir), vec!["table.tsv"]);
    assert_eq!(read_lines(&dest), vec!["v1"]);
}
