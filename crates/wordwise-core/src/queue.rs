//! Review queue: goal-weighted selection of the most urgently due word.
//!
//! A [`ReviewQueue`] is one learner's tracked-word set. Each word carries a
//! goal-frequency rank (1 = closest to the learner's current goal) and an
//! [`ItemScheduler`]. Selection scores every due word by
//!
//! ```text
//! score = overdue_days / max(interval, 1) * 1 / rank
//! ```
//!
//! and returns the strict maximum, so ties go to the word tracked first.
//! Selection never consumes a word; callers remove words explicitly.
//!
//! The queue does no locking of its own. Callers sharing one learner's queue
//! across threads wrap it in a single lock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{Result, SrsError};
use crate::review::{ItemScheduler, ReviewState};
use crate::snapshot::{QueueSnapshot, WordRecord};
use crate::store::{StateStore, WordListProvider};

/// Rank given to words registered or restored without one.
pub const DEFAULT_RANK: u32 = 1;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One word in the tracked set.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedWord {
    word: String,
    rank: u32,
    scheduler: ItemScheduler,
}

impl TrackedWord {
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn state(&self) -> &ReviewState {
        self.scheduler.state()
    }
}

/// Ordered set of tracked words with their schedules and goal ranks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewQueue {
    entries: Vec<TrackedWord>,
    index: HashMap<String, usize>,
}

impl ReviewQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue of fresh states from `(word, rank)` pairs.
    pub fn from_ranks<I, S>(ranks: I, now: DateTime<Utc>) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut queue = Self::new();
        for (word, rank) in ranks {
            queue.track(word, rank, now)?;
        }
        Ok(queue)
    }

    /// Register `word` with a fresh state due at `now`. If the word is
    /// already tracked only its rank changes.
    pub fn track(&mut self, word: impl Into<String>, rank: u32, now: DateTime<Utc>) -> Result<()> {
        let word = word.into();
        validate_rank(&word, rank)?;
        match self.index.get(&word) {
            Some(&pos) => self.entries[pos].rank = rank,
            None => self.insert(word, rank, ItemScheduler::new(now)),
        }
        Ok(())
    }

    /// Change the goal rank of a tracked word.
    pub fn set_rank(&mut self, word: &str, rank: u32) -> Result<()> {
        validate_rank(word, rank)?;
        let entry = self.entry_mut(word)?;
        entry.rank = rank;
        Ok(())
    }

    /// Stop tracking `word`, returning its last state.
    pub fn remove(&mut self, word: &str) -> Option<ReviewState> {
        let pos = self.index.remove(word)?;
        let removed = self.entries.remove(pos);
        for entry in &self.entries[pos..] {
            if let Some(slot) = self.index.get_mut(&entry.word) {
                *slot -= 1;
            }
        }
        tracing::debug!(word, "word removed from queue");
        Some(removed.scheduler.into_state())
    }

    pub fn get(&self, word: &str) -> Option<&ReviewState> {
        self.entry(word).map(TrackedWord::state)
    }

    pub fn rank(&self, word: &str) -> Option<u32> {
        self.entry(word).map(TrackedWord::rank)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked words in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedWord> {
        self.entries.iter()
    }

    /// Apply a review to a tracked word. Untracked words are an error and
    /// are never created implicitly.
    pub fn review_word(
        &mut self,
        word: &str,
        quality: i32,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        let entry = self.entry_mut(word)?;
        let next = entry.scheduler.review(quality, now);
        tracing::debug!(word, quality, next_review = %next, "word reviewed");
        Ok(next)
    }

    /// Priority score of one word; 0 when not due, `None` when untracked.
    pub fn priority(&self, word: &str, now: DateTime<Utc>) -> Option<f64> {
        self.entry(word).map(|e| score(e, now))
    }

    /// The due word with the strictly highest score, if any.
    pub fn select_next_due(&self, now: DateTime<Utc>) -> Option<&str> {
        let mut best: Option<(&TrackedWord, f64)> = None;
        for entry in &self.entries {
            let s = score(entry, now);
            if s <= 0.0 {
                continue;
            }
            if best.map_or(true, |(_, top)| s > top) {
                best = Some((entry, s));
            }
        }
        best.map(|(entry, _)| entry.word.as_str())
    }

    /// Up to `limit` due words, best first. Gives the same order as
    /// repeatedly selecting and removing on a copy of the queue.
    pub fn due_ranked(&self, now: DateTime<Utc>, limit: usize) -> Vec<&str> {
        let mut due: Vec<(&TrackedWord, f64)> = self
            .entries
            .iter()
            .map(|e| (e, score(e, now)))
            .filter(|(_, s)| *s > 0.0)
            .collect();
        // Stable sort keeps insertion order among equal scores.
        due.sort_by(|a, b| b.1.total_cmp(&a.1));
        due.into_iter()
            .take(limit)
            .map(|(e, _)| e.word.as_str())
            .collect()
    }

    /// Capture every tracked word as a persistable record set.
    pub fn snapshot(&self) -> QueueSnapshot {
        let mut snapshot = QueueSnapshot::with_capacity(self.entries.len());
        for entry in &self.entries {
            snapshot.insert(entry.word.clone(), WordRecord::new(entry.state(), entry.rank));
        }
        snapshot
    }

    /// Rebuild a queue from a snapshot. Ease factors below the floor are
    /// clamped; rank 0 is rejected as malformed.
    pub fn from_snapshot(snapshot: &QueueSnapshot) -> Result<Self> {
        let mut queue = Self::new();
        for (word, record) in snapshot.iter() {
            if record.goal_frequency_rank == 0 {
                return Err(SrsError::MalformedState {
                    origin: "snapshot".into(),
                    reason: format!("word '{word}' has goal_frequency_rank 0"),
                });
            }
            queue.insert(
                word.to_string(),
                record.goal_frequency_rank,
                ItemScheduler::from_state(record.to_state()),
            );
        }
        Ok(queue)
    }

    /// Write the whole tracked set through `store`.
    pub fn persist(&self, store: &dyn StateStore) -> Result<()> {
        store.save(&self.snapshot())?;
        tracing::debug!(words = self.len(), store = %store.describe(), "queue persisted");
        Ok(())
    }

    /// Load a queue from `store`. When the store holds nothing yet the
    /// queue is populated from `defaults`, ranked 1..N by list position.
    pub fn restore(
        store: &dyn StateStore,
        defaults: &dyn WordListProvider,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        match store.load()? {
            Some(snapshot) => {
                let queue = Self::from_snapshot(&snapshot).map_err(|e| match e {
                    SrsError::MalformedState { reason, .. } => SrsError::MalformedState {
                        origin: store.describe(),
                        reason,
                    },
                    other => other,
                })?;
                tracing::debug!(words = queue.len(), store = %store.describe(), "queue restored");
                Ok(queue)
            }
            None => {
                let mut queue = Self::new();
                for word in defaults.default_words() {
                    if queue.contains(&word) {
                        continue;
                    }
                    let rank = u32::try_from(queue.len() + 1).unwrap_or(u32::MAX);
                    queue.insert(word, rank, ItemScheduler::new(now));
                }
                tracing::info!(
                    words = queue.len(),
                    store = %store.describe(),
                    "no saved state, starting from default word list"
                );
                Ok(queue)
            }
        }
    }

    fn insert(&mut self, word: String, rank: u32, scheduler: ItemScheduler) {
        self.index.insert(word.clone(), self.entries.len());
        self.entries.push(TrackedWord {
            word,
            rank,
            scheduler,
        });
    }

    fn entry(&self, word: &str) -> Option<&TrackedWord> {
        self.index.get(word).map(|&pos| &self.entries[pos])
    }

    fn entry_mut(&mut self, word: &str) -> Result<&mut TrackedWord> {
        match self.index.get(word) {
            Some(&pos) => Ok(&mut self.entries[pos]),
            None => Err(SrsError::UnknownWord(word.to_string())),
        }
    }
}

fn validate_rank(word: &str, rank: u32) -> Result<()> {
    if rank == 0 {
        return Err(SrsError::InvalidRank {
            word: word.to_string(),
            rank,
        });
    }
    Ok(())
}

/// How many interval-lengths overdue a state is; 0 when not yet due.
pub fn forgetting_probability(state: &ReviewState, now: DateTime<Utc>) -> f64 {
    let overdue = now.signed_duration_since(state.next_review);
    if overdue <= chrono::Duration::zero() {
        return 0.0;
    }
    // Microseconds overflow past ~292k years; whole seconds suffice there.
    let overdue_secs = match overdue.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => overdue.num_seconds() as f64,
    };
    let overdue_days = overdue_secs / SECONDS_PER_DAY;
    overdue_days / f64::from(state.interval.max(1))
}

/// Goal weight of a rank: 1 / rank.
pub fn goal_frequency(rank: u32) -> f64 {
    1.0 / f64::from(rank.max(1))
}

fn score(entry: &TrackedWord, now: DateTime<Utc>) -> f64 {
    forgetting_probability(entry.state(), now) * goal_frequency(entry.rank)
}
