//! CSV loader for the channel's daily metrics export.

pub mod cleaner;

use crate::error::DashboardError;
use crate::models::{MetricTable, RawCsvRow};
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, info, warn};

use self::cleaner::csv_row_to_record;

const DATE: &str = "DATE";
const SUBSCRIBERS_GAINED: &str = "SUBSCRIBERS_GAINED";
const SUBSCRIBERS_LOST: &str = "SUBSCRIBERS_LOST";
const TOTAL_SUBSCRIBERS: &str = "TOTAL_SUBSCRIBERS";
const VIEWS: &str = "VIEWS";
const WATCH_HOURS: &str = "WATCH_HOURS";
const LIKES: &str = "LIKES";
const SOURCE_TYPE: &str = "type";

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    subscribers_gained: usize,
    subscribers_lost: usize,
    total_subscribers: usize,
    views: usize,
    watch_hours: usize,
    likes: usize,
    source_type: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DashboardError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            date: find(DATE)?,
            subscribers_gained: find(SUBSCRIBERS_GAINED)?,
            subscribers_lost: find(SUBSCRIBERS_LOST)?,
            total_subscribers: find(TOTAL_SUBSCRIBERS)?,
            views: find(VIEWS)?,
            watch_hours: find(WATCH_HOURS)?,
            likes: find(LIKES)?,
            source_type: find(SOURCE_TYPE)?,
        })
    }

    fn raw_row(&self, record: &csv::StringRecord) -> RawCsvRow {
        let cell = |i: usize| record.get(i).map(|s| s.to_string());
        RawCsvRow {
            date: cell(self.date),
            subscribers_gained: cell(self.subscribers_gained),
            subscribers_lost: cell(self.subscribers_lost),
            total_subscribers: cell(self.total_subscribers),
            views: cell(self.views),
            watch_hours: cell(self.watch_hours),
            likes: cell(self.likes),
            source_type: cell(self.source_type),
        }
    }
}

/// Parse every row of a channel CSV. The first bad row aborts the load.
pub fn read_records<R: Read>(reader: R) -> Result<MetricTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let columns = Columns::resolve(reader.headers()?)?;
    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", i + 1))?;
        let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 2);
        records.push(csv_row_to_record(&columns.raw_row(&record), line)?);
    }

    Ok(MetricTable::new(records))
}

/// Load and parse the CSV at `path`.
pub fn load_csv(path: &Path) -> Result<MetricTable> {
    debug!("Loading channel metrics from {:?}", path);

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {:?}", path))?;
    let table = read_records(file).with_context(|| format!("Failed to load {:?}", path))?;

    if table.is_empty() {
        warn!("{:?}: header only, no daily records", path);
    } else {
        info!("{:?}: {} daily records loaded", path, table.len());
    }
    Ok(table)
}

static TABLE_CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<MetricTable>>>> = OnceLock::new();

/// Memoized [`load_csv`]: each path is read at most once per process.
/// Failed loads are not cached.
pub fn load_data(path: &Path) -> Result<Arc<MetricTable>> {
    let mut cache = TABLE_CACHE
        .get_or_init(Default::default)
        .lock()
        .map_err(|_| anyhow!("table cache lock poisoned"))?;

    if let Some(table) = cache.get(path) {
        debug!("Cache hit for {:?}", path);
        return Ok(Arc::clone(table));
    }

    let table = Arc::new(load_csv(path)?);
    cache.insert(path.to_path_buf(), Arc::clone(&table));
    Ok(table)
}
