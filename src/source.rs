//! Access to the external record store.
//!
//! The dashboard never talks to a concrete backend directly: it is handed a
//! `SheetSource`, optionally wrapped in a `CachedSource` that keeps fetched tables for
//! a fixed time-to-live.

use crate::error::{DashboardError, Result};
use crate::sheet::RawTable;
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Default freshness window for fetched sheets (one hour)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// A workbook-and-sheet addressed table store
pub trait SheetSource: Send + Sync {
    /// Human-readable name used in error messages
    fn name(&self) -> &str;

    fn fetch(&self, workbook: &str, sheet: &str) -> Result<RawTable>;
}

impl<S: SheetSource + ?Sized> SheetSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, workbook: &str, sheet: &str) -> Result<RawTable> {
        (**self).fetch(workbook, sheet)
    }
}

/// Reads sheets exported as CSV files laid out as `<root>/<workbook>/<sheet>.csv`
pub struct CsvDirectorySource {
    root: PathBuf,
    name: String,
}

impl CsvDirectorySource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let name = format!("csv:{}", root.display());
        CsvDirectorySource { root, name }
    }

    pub fn sheet_path(&self, workbook: &str, sheet: &str) -> PathBuf {
        self.root.join(workbook).join(format!("{}.csv", sheet))
    }
}

impl SheetSource for CsvDirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, workbook: &str, sheet: &str) -> Result<RawTable> {
        let path = self.sheet_path(workbook, sheet);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|e| {
                DashboardError::unavailable(&self.name, format!("{}: {}", path.display(), e))
            })?;

        let headers = reader
            .headers()
            .map_err(|e| DashboardError::unavailable(&self.name, e))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| DashboardError::unavailable(&self.name, e))?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        info!(
            "loaded sheet {}/{} from {} ({} rows)",
            workbook,
            sheet,
            path.display(),
            rows.len()
        );

        Ok(RawTable { headers, rows })
    }
}

/// Fixed tables held in memory, keyed by workbook and sheet
#[derive(Default)]
pub struct InMemorySource {
    tables: HashMap<(String, String), RawTable>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, workbook: &str, sheet: &str, table: RawTable) {
        self.tables.insert((workbook.to_string(), sheet.to_string()), table);
    }
}

impl SheetSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, workbook: &str, sheet: &str) -> Result<RawTable> {
        self.tables
            .get(&(workbook.to_string(), sheet.to_string()))
            .cloned()
            .ok_or_else(|| {
                DashboardError::unavailable("memory", format!("no sheet {}/{}", workbook, sheet))
            })
    }
}

struct CacheEntry<T> {
    value: T,
    /// `None` when `now + ttl` is past what `Instant` can represent; never expires
    expires_at: Option<Instant>,
}

impl<T: Clone> CacheEntry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| Instant::now() >= expires_at)
    }

    fn get(&self) -> Option<T> {
        if self.is_expired() {
            None
        } else {
            Some(self.value.clone())
        }
    }
}

/// Memoizes successful fetches of an inner source for `ttl`
///
/// Invalidation is purely time based, plus an explicit `invalidate` for a manual
/// refresh. Failed fetches are never stored.
pub struct CachedSource<S> {
    inner: S,
    entries: RwLock<HashMap<(String, String), CacheEntry<RawTable>>>,
    ttl: Duration,
}

impl<S: SheetSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops every cached table so the next fetch goes to the inner source
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.entries.write() {
            guard.clear();
        }
    }
}

impl<S: SheetSource> SheetSource for CachedSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch(&self, workbook: &str, sheet: &str) -> Result<RawTable> {
        let key = (workbook.to_string(), sheet.to_string());

        let cached = self
            .entries
            .read()
            .ok()
            .and_then(|guard| guard.get(&key).and_then(|e| e.get()));
        if let Some(table) = cached {
            debug!("cache hit for {}/{}", workbook, sheet);
            return Ok(table);
        }

        let table = self.inner.fetch(workbook, sheet)?;
        if let Ok(mut guard) = self.entries.write() {
            guard.retain(|_, entry| !entry.is_expired());
            guard.insert(key, CacheEntry::new(table.clone(), self.ttl));
        }
        Ok(table)
    }
}
