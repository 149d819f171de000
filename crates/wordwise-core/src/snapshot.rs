//! Flat keyed record set used to persist a review queue.
//!
//! The JSON form is one object keyed by word. Entries are written in
//! queue insertion order and read back in document order, so restoring a
//! snapshot reproduces tie-breaking exactly.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SrsError;
use crate::queue::DEFAULT_RANK;
use crate::review::{ReviewState, INITIAL_EASE_FACTOR};

/// Persisted scheduling data for one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default)]
    pub interval: u32,
    #[serde(default = "default_efactor")]
    pub efactor: f64,
    #[serde(with = "timestamp")]
    pub next_review: DateTime<Utc>,
    #[serde(default = "default_rank")]
    pub goal_frequency_rank: u32,
}

fn default_efactor() -> f64 {
    INITIAL_EASE_FACTOR
}

fn default_rank() -> u32 {
    DEFAULT_RANK
}

impl WordRecord {
    pub fn new(state: &ReviewState, rank: u32) -> Self {
        Self {
            repetitions: state.repetitions,
            interval: state.interval,
            efactor: state.ease_factor,
            next_review: state.next_review,
            goal_frequency_rank: rank,
        }
    }

    pub fn to_state(&self) -> ReviewState {
        ReviewState {
            repetitions: self.repetitions,
            interval: self.interval,
            ease_factor: self.efactor,
            next_review: self.next_review,
        }
    }
}

/// Ordered word → record set.
#[derive(Debug, Clone, Default)]
pub struct QueueSnapshot {
    records: Vec<(String, WordRecord)>,
    index: HashMap<String, usize>,
}

impl PartialEq for QueueSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl QueueSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Append a record. A word already present keeps its position and takes
    /// the new record.
    pub fn insert(&mut self, word: impl Into<String>, record: WordRecord) {
        let word = word.into();
        match self.index.get(&word) {
            Some(&pos) => self.records[pos].1 = record,
            None => {
                self.index.insert(word.clone(), self.records.len());
                self.records.push((word, record));
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<&WordRecord> {
        self.index.get(word).map(|&pos| &self.records[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WordRecord)> {
        self.records.iter().map(|(w, r)| (w.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decode a snapshot from JSON. `origin` names the source in errors.
    pub fn from_json(json: &str, origin: &str) -> Result<Self, SrsError> {
        serde_json::from_str(json).map_err(|e| SrsError::MalformedState {
            origin: origin.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for QueueSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for (word, record) in &self.records {
            map.serialize_entry(word, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QueueSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SnapshotVisitor)
    }
}

struct SnapshotVisitor;

impl<'de> Visitor<'de> for SnapshotVisitor {
    type Value = QueueSnapshot;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping words to review records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut snapshot = QueueSnapshot::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((word, record)) = access.next_entry::<String, WordRecord>()? {
            if snapshot.index.contains_key(&word) {
                return Err(de::Error::custom(format!("duplicate word '{word}'")));
            }
            snapshot.insert(word, record);
        }
        Ok(snapshot)
    }
}

/// RFC 3339 timestamps; naive ISO-8601 input is read as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::review::latest_next_review;

    /// Instants past year 9999 are written as the latest one that fits.
    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        let ts = (*ts).min(latest_next_review());
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse an RFC 3339 timestamp, or a naive one taken as UTC.
    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Ok(ts.with_timezone(&Utc));
        }
        raw.parse::<NaiveDateTime>()
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timestamp '{raw}': {e}"))
    }
}
