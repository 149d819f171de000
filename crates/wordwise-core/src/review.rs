//! Per-word review state and the SM-2 style update rule.
//!
//! Quality grades (conventionally 0-5):
//! - 0-2: failed recall, progress resets
//! - 3: correct with serious difficulty
//! - 4: correct after hesitation
//! - 5: perfect recall
//!
//! Grades outside 0-5 are applied as given.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lowest ease factor a state can reach.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor of a freshly registered word.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Grades below this count as a failed recall.
pub const PASSING_QUALITY: i32 = 3;

/// Interval in days after the first successful review.
const FIRST_INTERVAL: u32 = 1;

/// Interval in days after the second consecutive successful review.
const SECOND_INTERVAL: u32 = 6;

/// 9999-12-31T23:59:59Z in Unix seconds, the last instant a four-digit
/// RFC 3339 year can express.
const LATEST_REVIEW_SECS: i64 = 253_402_300_799;

/// Latest `next_review` a state can hold. Later dates are clamped to it so
/// persisted state always reads back.
pub fn latest_next_review() -> DateTime<Utc> {
    DateTime::from_timestamp(LATEST_REVIEW_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Scheduling record for one tracked word.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewState {
    /// Consecutive successful reviews.
    pub repetitions: u32,
    /// Days until the next review.
    pub interval: u32,
    /// Interval growth multiplier, never below [`MIN_EASE_FACTOR`].
    pub ease_factor: f64,
    /// The item is due from this instant on.
    pub next_review: DateTime<Utc>,
}

impl ReviewState {
    /// A never-reviewed state, due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            repetitions: 0,
            interval: 0,
            ease_factor: INITIAL_EASE_FACTOR,
            next_review: now,
        }
    }

    /// Whether the item is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_review
    }

    /// Learning phase derived from the counters.
    pub fn phase(&self) -> Phase {
        match (self.repetitions, self.interval) {
            (0, 0) => Phase::New,
            (0, _) => Phase::Lapsed,
            (1, _) => Phase::Learning,
            _ => Phase::Reviewing,
        }
    }
}

/// Coarse learning phase of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    New,
    Learning,
    Reviewing,
    Lapsed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::New => write!(f, "new"),
            Phase::Learning => write!(f, "learning"),
            Phase::Reviewing => write!(f, "reviewing"),
            Phase::Lapsed => write!(f, "lapsed"),
        }
    }
}

/// Applies review outcomes to a single [`ReviewState`].
#[derive(Debug, Clone, PartialEq)]
pub struct ItemScheduler {
    state: ReviewState,
}

impl ItemScheduler {
    /// Scheduler for a newly registered word.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            state: ReviewState::new(now),
        }
    }

    /// Wrap an existing state. The ease factor is clamped to the floor and
    /// `next_review` to [`latest_next_review`].
    pub fn from_state(mut state: ReviewState) -> Self {
        state.ease_factor = clamp_ease(state.ease_factor);
        state.next_review = state.next_review.min(latest_next_review());
        Self { state }
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn into_state(self) -> ReviewState {
        self.state
    }

    /// Apply one review graded `quality` at `now` and return the new
    /// `next_review`.
    pub fn review(&mut self, quality: i32, now: DateTime<Utc>) -> DateTime<Utc> {
        let state = &mut self.state;

        if quality < PASSING_QUALITY {
            state.repetitions = 0;
            state.interval = FIRST_INTERVAL;
        } else {
            state.interval = match state.repetitions {
                0 => FIRST_INTERVAL,
                1 => SECOND_INTERVAL,
                _ => (f64::from(state.interval) * state.ease_factor).round_ties_even() as u32,
            };
            state.repetitions = state.repetitions.saturating_add(1);
        }

        // Applied on both branches, using the grade just given.
        let distance = 5.0 - f64::from(quality);
        state.ease_factor =
            clamp_ease(state.ease_factor + (0.1 - distance * (0.08 + distance * 0.02)));

        let latest = latest_next_review();
        state.next_review = now
            .checked_add_signed(Duration::days(i64::from(state.interval)))
            .map_or(latest, |next| next.min(latest));

        tracing::debug!(
            quality,
            repetitions = state.repetitions,
            interval = state.interval,
            ease_factor = state.ease_factor,
            "review applied"
        );

        state.next_review
    }
}

fn clamp_ease(ease_factor: f64) -> f64 {
    if ease_factor.is_nan() {
        return MIN_EASE_FACTOR;
    }
    ease_factor.max(MIN_EASE_FACTOR)
}
