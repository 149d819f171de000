//! wordwise-core — Spaced-repetition scheduling, goals, and lesson building.
//!
//! The centre of the crate is [`queue::ReviewQueue`]: a learner's tracked
//! words, each with an SM-2 [`review::ItemScheduler`] and a goal-frequency
//! rank. Everything else (persistence, goals, lessons, blurbs) builds on it.

pub mod blurb;
pub mod error;
pub mod goals;
pub mod lesson;
pub mod queue;
pub mod review;
pub mod snapshot;
pub mod store;
pub mod traits;
pub mod vocabulary;

pub use error::{Result, SrsError};
pub use queue::ReviewQueue;
pub use review::{ItemScheduler, Phase, ReviewState};
pub use store::{
    JsonFileStore, JsonGoalFile, MemoryStore, StateStore, StaticWordList, WordListProvider,
};
