pub mod add;
pub mod blurb;
pub mod default_words;
pub mod goal;
pub mod init;
pub mod lesson;
pub mod next;
pub mod recover;
pub mod remove;
pub mod review;
pub mod status;
pub mod vocab;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use wordwise_core::goals::{BundledWordList, GoalManager};
use wordwise_core::{JsonFileStore, JsonGoalFile, ReviewQueue};
use wordwise_providers::config::load_config_from;
use wordwise_providers::WordwiseConfig;

/// One learner's config, state file and goals file for the duration of a
/// command.
pub struct Session {
    pub config: WordwiseConfig,
    pub store: JsonFileStore,
    pub goals: JsonGoalFile,
}

impl Session {
    pub fn open(state: Option<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let config = load_config_from(config_path)?;
        let state_path = state.unwrap_or_else(|| config.state_path.clone());
        Ok(Self {
            goals: JsonGoalFile::new(config.goals_path_for(&state_path)),
            store: JsonFileStore::new(state_path),
            config,
        })
    }

    /// Load the queue; a missing state file starts from the default word
    /// list and is written immediately.
    pub fn load_queue(&self) -> Result<ReviewQueue> {
        let fresh = !self.store.path().exists();
        let defaults = BundledWordList::new(self.config.default_word_limit);
        let queue = ReviewQueue::restore(&self.store, &defaults, Utc::now())
            .with_context(|| format!("failed to load state: {}", self.store.path().display()))?;
        if fresh {
            self.save_queue(&queue)?;
        }
        Ok(queue)
    }

    pub fn save_queue(&self, queue: &ReviewQueue) -> Result<()> {
        queue
            .persist(&self.store)
            .with_context(|| format!("failed to save state: {}", self.store.path().display()))
    }

    pub fn load_goals(&self) -> Result<GoalManager> {
        self.goals
            .load()
            .with_context(|| format!("failed to load goals: {}", self.goals.path().display()))
    }

    pub fn save_goals(&self, goals: &GoalManager) -> Result<()> {
        self.goals
            .save(goals)
            .with_context(|| format!("failed to save goals: {}", self.goals.path().display()))
    }
}

/// Tracked words ordered by goal rank, ties in tracking order.
pub fn goal_ranked_words(queue: &ReviewQueue) -> Vec<String> {
    let mut tracked: Vec<_> = queue.iter().collect();
    tracked.sort_by_key(|entry| entry.rank());
    tracked.into_iter().map(|e| e.word().to_string()).collect()
}
