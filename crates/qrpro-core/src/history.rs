use std::sync::Arc;

use chrono::{Local, TimeZone, Utc};
use qrpro_types::{HistoryCategory, HistoryRecord, Preset};
use uuid::Uuid;

use crate::error::HistoryError;
use crate::store::KeyValueStore;

pub const HISTORY_LIMIT: usize = 50;

/// Two bounded newest-first lists, one per category
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_limit(store, HISTORY_LIMIT)
    }

    /// `limit` is clamped to `1..=HISTORY_LIMIT`
    pub fn with_limit(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        let clamped = limit.clamp(1, HISTORY_LIMIT);
        if clamped != limit {
            tracing::warn!("History limit {limit} out of range, using {clamped}");
        }
        Self {
            store,
            limit: clamped,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Snapshot of a category, newest first
    ///
    /// Records stored without an id are given one and written back, so ids
    /// stay stable across reads.
    pub fn list(&self, category: HistoryCategory) -> Result<Vec<HistoryRecord>, HistoryError> {
        let mut records: Vec<HistoryRecord> = match self.store.get(category.storage_key())? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
            _ => return Ok(Vec::new()),
        };

        let mut assigned = 0;
        for record in records.iter_mut().filter(|r| r.id.is_nil()) {
            record.id = Uuid::new_v4();
            assigned += 1;
        }
        if assigned > 0 {
            tracing::debug!("History {category}: assigned ids to {assigned} legacy record(s)");
            self.write(category, &records)?;
        }

        Ok(records)
    }

    pub fn get(&self, category: HistoryCategory, index: usize) -> Result<HistoryRecord, HistoryError> {
        let records = self.list(category)?;
        let len = records.len();
        records
            .into_iter()
            .nth(index)
            .ok_or(HistoryError::IndexOutOfRange { index, len })
    }

    /// Prepend and drop whatever falls past the limit
    pub fn append(&self, category: HistoryCategory, record: HistoryRecord) -> Result<(), HistoryError> {
        let mut records = self.list(category)?;
        records.insert(0, record);
        if records.len() > self.limit {
            let dropped = records.len() - self.limit;
            records.truncate(self.limit);
            tracing::debug!("History {category}: evicted {dropped} oldest record(s)");
        }
        self.write(category, &records)
    }

    pub fn record_generated(&self, preset: Preset, data: &str) -> Result<HistoryRecord, HistoryError> {
        let record = HistoryRecord::generated(preset, data, now_millis());
        self.append(HistoryCategory::Generated, record.clone())?;
        Ok(record)
    }

    pub fn record_scanned(&self, data: &str) -> Result<HistoryRecord, HistoryError> {
        let record = HistoryRecord::scanned(data, now_millis());
        self.append(HistoryCategory::Scanned, record.clone())?;
        Ok(record)
    }

    /// Positional delete against a freshly read snapshot
    pub fn delete_at(&self, category: HistoryCategory, index: usize) -> Result<HistoryRecord, HistoryError> {
        let mut records = self.list(category)?;
        if index >= records.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: records.len(),
            });
        }
        let removed = records.remove(index);
        self.write(category, &records)?;
        Ok(removed)
    }

    pub fn delete_by_id(&self, category: HistoryCategory, id: Uuid) -> Result<HistoryRecord, HistoryError> {
        let mut records = self.list(category)?;
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(HistoryError::NotFound(id))?;
        let removed = records.remove(index);
        self.write(category, &records)?;
        Ok(removed)
    }

    pub fn clear(&self, category: HistoryCategory) -> Result<(), HistoryError> {
        self.store.set(category.storage_key(), "[]")?;
        Ok(())
    }

    fn write(&self, category: HistoryCategory, records: &[HistoryRecord]) -> Result<(), HistoryError> {
        let raw = serde_json::to_string(records)?;
        self.store.set(category.storage_key(), &raw)?;
        Ok(())
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// One history row as shown in a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    pub label: Option<String>,
    pub text: String,
    pub date: String,
}

impl HistoryLine {
    pub fn from_record(record: &HistoryRecord, max_chars: usize) -> Self {
        Self {
            label: record.kind.map(|k| k.as_str().to_uppercase()),
            text: truncate(&record.data, max_chars),
            date: format_timestamp(record.timestamp),
        }
    }
}

pub fn truncate(data: &str, max_chars: usize) -> String {
    match data.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &data[..cut]),
        None => data.to_string(),
    }
}

pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => millis.to_string(),
    }
}
