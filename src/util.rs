use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

// -------- robust file ops (sync folders / AV scanners hold files briefly) --------

const TRIES: usize = 16;
const DELAY_MS: u64 = 50;

/// Transient errors worth retrying: Windows sharing/lock violations and interrupted calls.
fn is_retriable_io_error(e: &io::Error) -> bool {
    cfg!(windows) && matches!(
        e.raw_os_error(),
        // 5 access denied, 32 sharing violation, 33 lock violation, 1224 user-mapped section open
        Some(5) | Some(32) | Some(33) | Some(1224)
    ) || e.kind() == io::ErrorKind::Interrupted
}

fn with_backoff<T>(mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let mut attempt = 0;
    loop {
        match op() {
            Err(e) if is_retriable_io_error(&e) && attempt + 1 < TRIES => {
                attempt += 1;
                sleep(Duration::from_millis(DELAY_MS.saturating_mul(attempt as u64)));
            }
            other => return other,
        }
    }
}

/// Create a file with retries/backoff for transient errors.
pub fn create_with_backoff(path: &Path) -> io::Result<File> {
    with_backoff(|| File::create(path))
}

/// Atomically replace `dest` with `tmp`. Falls back to copy+remove when rename is refused.
pub fn replace_file_atomic_backoff(tmp: &Path, dest: &Path) -> Result<()> {
    if with_backoff(|| fs::rename(tmp, dest)).is_ok() {
        return Ok(());
    }
    with_backoff(|| fs::copy(tmp, dest)).with_context(|| format!("copy {} -> {}", tmp.display(), dest.display()))?;
    with_backoff(|| match fs::remove_file(tmp) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    })
    .with_context(|| format!("remove {}", tmp.display()))
}

fn tmp_path_for(dest: &Path) -> PathBuf {
    let name = dest.file_name().and_then(|s| s.to_str()).unwrap_or("out");
    dest.with_file_name(format!(".{name}.part"))
}

/// Write `dest` through a buffered temp file, then move it into place.
/// On failure the temp file is removed and `dest` is left untouched.
pub fn write_atomic(dest: &Path, body: impl FnOnce(&mut dyn Write) -> Result<()>) -> Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    let tmp = tmp_path_for(dest);
    let file = create_with_backoff(&tmp).with_context(|| format!("create {}", tmp.display()))?;
    let mut w = BufWriter::new(file);
    let written = body(&mut w).and_then(|_| w.flush().with_context(|| format!("flush {}", tmp.display())));
    drop(w);
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    replace_file_atomic_backoff(&tmp, dest)
}
