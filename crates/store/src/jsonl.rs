//! JSONL stream store — persistent line-oriented storage for memory records.
//!
//! Each tier is one append-only file (`short_term.jsonl`, `long_term.jsonl`),
//! one JSON-encoded record per line, UTF-8, newline-terminated. Rotation
//! snapshots go to `<stream>_archive_<label>.jsonl` files that are written
//! once and never touched again.
//!
//! Concurrency contract: every operation serializes on its stream's mutex,
//! and `exclusive` hands that mutex to the caller for compound
//! read-filter-rewrite maintenance. Rewrites go through a temp file plus
//! rename, so a reader never observes a half-written stream file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;
use uuid::Uuid;

use skymem_core::error::MemoryError;
use skymem_core::record::{MemoryRecord, Tier};

/// A file-backed store holding one JSONL stream per tier.
pub struct JsonlStore {
    dir: PathBuf,
    short_lock: Mutex<()>,
    long_lock: Mutex<()>,
}

impl JsonlStore {
    /// Create a store over the given directory. The directory and stream
    /// files are created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            short_lock: Mutex::new(()),
            long_lock: Mutex::new(()),
        }
    }

    /// Path of the stream file backing a tier.
    pub fn stream_path(&self, tier: Tier) -> PathBuf {
        match tier {
            Tier::Short => self.dir.join("short_term.jsonl"),
            Tier::Long => self.dir.join("long_term.jsonl"),
        }
    }

    fn lock_for(&self, tier: Tier) -> &Mutex<()> {
        match tier {
            Tier::Short => &self.short_lock,
            Tier::Long => &self.long_lock,
        }
    }

    /// Acquire the stream's mutex for a compound read→filter→rewrite
    /// sequence. Appends and reads on the same stream block until the guard
    /// is dropped. Operations that touch both streams must acquire short
    /// before long so lock order stays total.
    pub async fn exclusive(&self, tier: Tier) -> StreamGuard<'_> {
        StreamGuard {
            store: self,
            tier,
            _guard: self.lock_for(tier).lock().await,
        }
    }

    /// Append a single record to the stream.
    pub async fn append(&self, tier: Tier, record: &MemoryRecord) -> Result<(), MemoryError> {
        self.append_all(tier, std::slice::from_ref(record)).await
    }

    /// Append a batch of records in one write, so concurrent readers see
    /// either all of them or none.
    pub async fn append_all(&self, tier: Tier, records: &[MemoryRecord]) -> Result<(), MemoryError> {
        let _guard = self.lock_for(tier).lock().await;
        append_lines(&self.stream_path(tier), tier, records)
    }

    /// Read every record in the stream, oldest first. A missing file is an
    /// empty stream, not an error.
    pub async fn read_all(&self, tier: Tier) -> Result<Vec<MemoryRecord>, MemoryError> {
        let _guard = self.lock_for(tier).lock().await;
        read_lines(&self.stream_path(tier), tier)
    }

    /// Atomically replace the stream contents with the given sequence.
    pub async fn rewrite(&self, tier: Tier, records: &[MemoryRecord]) -> Result<(), MemoryError> {
        let _guard = self.lock_for(tier).lock().await;
        rewrite_file(&self.stream_path(tier), tier, records)
    }

    /// Snapshot evicted records to a fresh archive file. Never overwrites an
    /// existing archive; returns the path actually written.
    pub async fn archive(
        &self,
        tier: Tier,
        records: &[MemoryRecord],
        label: &str,
    ) -> Result<PathBuf, MemoryError> {
        let _guard = self.lock_for(tier).lock().await;
        write_archive(&self.dir, tier, records, label)
    }
}

impl std::fmt::Debug for JsonlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlStore").field("dir", &self.dir).finish()
    }
}

/// Exclusive access to one stream for compound maintenance operations
/// (promotion, deletion, rotation). Holds the stream mutex until dropped.
pub struct StreamGuard<'a> {
    store: &'a JsonlStore,
    tier: Tier,
    _guard: MutexGuard<'a, ()>,
}

impl StreamGuard<'_> {
    /// The tier this guard holds exclusively.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Read every record in the locked stream, oldest first.
    pub fn read_all(&self) -> Result<Vec<MemoryRecord>, MemoryError> {
        read_lines(&self.store.stream_path(self.tier), self.tier)
    }

    /// Atomically replace the locked stream's contents.
    pub fn rewrite(&self, records: &[MemoryRecord]) -> Result<(), MemoryError> {
        rewrite_file(&self.store.stream_path(self.tier), self.tier, records)
    }

    /// Snapshot evicted records to a fresh archive file for this stream.
    pub fn archive(&self, records: &[MemoryRecord], label: &str) -> Result<PathBuf, MemoryError> {
        write_archive(&self.store.dir, self.tier, records, label)
    }
}

// --- blocking file helpers, called with the stream lock held ---

fn append_lines(path: &Path, tier: Tier, records: &[MemoryRecord]) -> Result<(), MemoryError> {
    if records.is_empty() {
        return Ok(());
    }

    ensure_parent(path, tier)?;

    let mut buf = String::new();
    for record in records {
        let line = serde_json::to_string(record)
            .map_err(|e| MemoryError::storage(tier, format!("serialize record: {e}")))?;
        buf.push_str(&line);
        buf.push('\n');
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| MemoryError::storage(tier, format!("open for append: {e}")))?;
    file.write_all(buf.as_bytes())
        .map_err(|e| MemoryError::storage(tier, format!("append: {e}")))?;

    Ok(())
}

fn read_lines(path: &Path, tier: Tier) -> Result<Vec<MemoryRecord>, MemoryError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(MemoryError::storage(tier, format!("read: {e}"))),
    };

    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<MemoryRecord>(line) {
            Ok(mut record) => {
                record.ensure_id();
                records.push(record);
            }
            Err(e) => {
                warn!(
                    stream = %tier,
                    line = line_no + 1,
                    error = %e,
                    "Skipping malformed memory line"
                );
            }
        }
    }
    Ok(records)
}

fn rewrite_file(path: &Path, tier: Tier, records: &[MemoryRecord]) -> Result<(), MemoryError> {
    ensure_parent(path, tier)?;

    let mut buf = String::new();
    for record in records {
        let line = serde_json::to_string(record)
            .map_err(|e| MemoryError::storage(tier, format!("serialize record: {e}")))?;
        buf.push_str(&line);
        buf.push('\n');
    }

    // Write the whole replacement next to the stream file, then rename over
    // it. Readers see the old or the new content, never a partial file.
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| tier.to_string());
    let tmp = path.with_file_name(format!(".{file_name}.tmp-{}", Uuid::new_v4()));

    fs::write(&tmp, buf.as_bytes())
        .map_err(|e| MemoryError::storage(tier, format!("write temp file: {e}")))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        MemoryError::storage(tier, format!("rename temp file: {e}"))
    })?;

    Ok(())
}

fn write_archive(
    dir: &Path,
    tier: Tier,
    records: &[MemoryRecord],
    label: &str,
) -> Result<PathBuf, MemoryError> {
    fs::create_dir_all(dir)
        .map_err(|e| MemoryError::storage(tier, format!("create memory directory: {e}")))?;

    let mut buf = String::new();
    for record in records {
        let line = serde_json::to_string(record)
            .map_err(|e| MemoryError::storage(tier, format!("serialize record: {e}")))?;
        buf.push_str(&line);
        buf.push('\n');
    }

    // Archives are written once. On a name collision, pick the next free
    // suffix instead of ever truncating an existing snapshot.
    let base = format!("{tier}_term_archive_{label}");
    for attempt in 0..100u32 {
        let name = if attempt == 0 {
            format!("{base}.jsonl")
        } else {
            format!("{base}-{attempt}.jsonl")
        };
        let path = dir.join(name);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(buf.as_bytes())
                    .map_err(|e| MemoryError::storage(tier, format!("write archive: {e}")))?;
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(MemoryError::storage(tier, format!("create archive: {e}"))),
        }
    }

    Err(MemoryError::storage(
        tier,
        format!("no free archive name for label '{label}'"),
    ))
}

fn ensure_parent(path: &Path, tier: Tier) -> Result<(), MemoryError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| MemoryError::storage(tier, format!("create memory directory: {e}")))?;
    }
    Ok(())
}
