//! Learner goals and the bundled default word list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::queue::ReviewQueue;
use crate::store::WordListProvider;

/// Number of default goals seeded for a new learner.
pub const DEFAULT_GOAL_LIMIT: usize = 5;

/// `word,frequency` rows from a general English frequency corpus, most
/// frequent first.
const BUNDLED_FREQUENCY_CSV: &str = include_str!("../data/coca_top.csv");

/// A word the learner wants to learn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalItem {
    pub word: String,
    /// Relative importance; higher ranks earlier.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Whether the goal came from the bundled list.
    #[serde(default)]
    pub is_default: bool,
}

fn default_weight() -> f64 {
    1.0
}

impl GoalItem {
    pub fn new(word: impl Into<String>, weight: f64) -> Self {
        Self {
            word: word.into(),
            weight,
            is_default: false,
        }
    }
}

/// Insertion-ordered goal store.
#[derive(Debug, Clone, Default)]
pub struct GoalManager {
    goals: Vec<GoalItem>,
}

impl GoalManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a goal, replacing any goal for the same word in place.
    pub fn create_goal(&mut self, item: GoalItem) {
        match self.goals.iter_mut().find(|g| g.word == item.word) {
            Some(existing) => *existing = item,
            None => self.goals.push(item),
        }
    }

    pub fn read_goal(&self, word: &str) -> Option<&GoalItem> {
        self.goals.iter().find(|g| g.word == word)
    }

    /// Change a goal's weight. Unknown words are ignored.
    pub fn update_goal(&mut self, word: &str, weight: f64) {
        if let Some(goal) = self.goals.iter_mut().find(|g| g.word == word) {
            goal.weight = weight;
        }
    }

    pub fn delete_goal(&mut self, word: &str) -> Option<GoalItem> {
        let pos = self.goals.iter().position(|g| g.word == word)?;
        Some(self.goals.remove(pos))
    }

    pub fn list_goals(&self) -> &[GoalItem] {
        &self.goals
    }

    /// Goal words by descending weight; equal weights keep insertion order.
    pub fn ranked_words(&self) -> Vec<String> {
        let mut ordered: Vec<&GoalItem> = self.goals.iter().collect();
        ordered.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        ordered.into_iter().map(|g| g.word.clone()).collect()
    }

    /// `(word, rank)` pairs with ranks 1..N following [`Self::ranked_words`].
    pub fn goal_ranks(&self) -> Vec<(String, u32)> {
        self.ranked_words()
            .into_iter()
            .zip(1u32..)
            .collect()
    }

    /// Track every goal word in `queue` at its goal rank. Words already
    /// tracked keep their schedule and only take the new rank.
    pub fn sync_queue(&self, queue: &mut ReviewQueue, now: DateTime<Utc>) -> Result<()> {
        for (word, rank) in self.goal_ranks() {
            queue.track(word, rank, now)?;
        }
        Ok(())
    }
}

impl FromIterator<GoalItem> for GoalManager {
    fn from_iter<I: IntoIterator<Item = GoalItem>>(iter: I) -> Self {
        let mut manager = Self::new();
        for item in iter {
            manager.create_goal(item);
        }
        manager
    }
}

/// Parse `word,frequency` rows into default goals, reading at most `limit`
/// rows. Blank rows are skipped; a missing or unparsable frequency becomes
/// weight 1.0.
pub fn parse_frequency_csv(csv: &str, limit: usize) -> Vec<GoalItem> {
    csv.lines()
        .take(limit)
        .filter_map(|line| {
            let mut fields = line.split(',');
            let word = fields.next()?.trim();
            if word.is_empty() {
                return None;
            }
            let weight = fields
                .next()
                .map(str::trim)
                .filter(|raw| !raw.is_empty())
                .and_then(|raw| raw.parse::<f64>().ok())
                .unwrap_or(1.0);
            Some(GoalItem {
                word: word.to_string(),
                weight,
                is_default: true,
            })
        })
        .collect()
}

/// The top `limit` goals of the bundled frequency list.
pub fn load_default_goals(limit: usize) -> Vec<GoalItem> {
    parse_frequency_csv(BUNDLED_FREQUENCY_CSV, limit)
}

/// Default word list backed by the bundled frequency corpus.
#[derive(Debug, Clone, Copy)]
pub struct BundledWordList {
    limit: usize,
}

impl BundledWordList {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for BundledWordList {
    fn default() -> Self {
        Self::new(DEFAULT_GOAL_LIMIT)
    }
}

impl WordListProvider for BundledWordList {
    fn default_words(&self) -> Vec<String> {
        load_default_goals(self.limit)
            .into_iter()
            .map(|g| g.word)
            .collect()
    }
}
