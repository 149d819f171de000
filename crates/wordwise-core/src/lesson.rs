//! Lesson building on top of the review queue.
//!
//! A lesson interleaves multiple-choice questions for new goal words with
//! questions for words the queue reports as due, plus an occasional grammar
//! tip. Distractors are fixed placeholders. [`generate_lesson`] builds a
//! plain outline instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::queue::ReviewQueue;
use crate::review::Phase;

/// Knobs for [`generate_tutor_lesson`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonOptions {
    /// Maximum new words per lesson.
    #[serde(default = "default_new_word_limit")]
    pub new_word_limit: usize,
    /// Maximum review words per lesson.
    #[serde(default = "default_review_limit")]
    pub review_limit: usize,
    /// Insert a grammar tip after this many new words (0 = never).
    #[serde(default = "default_grammar_every")]
    pub grammar_every: usize,
}

fn default_new_word_limit() -> usize {
    3
}
fn default_review_limit() -> usize {
    5
}
fn default_grammar_every() -> usize {
    10
}

impl Default for LessonOptions {
    fn default() -> Self {
        Self {
            new_word_limit: default_new_word_limit(),
            review_limit: default_review_limit(),
            grammar_every: default_grammar_every(),
        }
    }
}

/// Words chosen for one lesson.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordBatch {
    pub new_words: Vec<String>,
    pub review_words: Vec<String>,
}

impl WordBatch {
    /// New then review words, without duplicates.
    pub fn all_words(&self) -> Vec<String> {
        let mut words: Vec<String> = Vec::new();
        for word in self.new_words.iter().chain(&self.review_words) {
            if !words.contains(word) {
                words.push(word.clone());
            }
        }
        words
    }
}

/// One step of a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LessonItem {
    Mcq {
        word: String,
        question: String,
        choices: Vec<String>,
        answer: String,
        answer_index: usize,
    },
    GrammarTip {
        word: String,
        tip: String,
    },
}

impl LessonItem {
    pub fn word(&self) -> &str {
        match self {
            LessonItem::Mcq { word, .. } | LessonItem::GrammarTip { word, .. } => word,
        }
    }
}

/// A generated lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub topic: String,
    pub items: Vec<LessonItem>,
}

/// Pick the review and new words for the next lesson.
///
/// Review words are previously studied words that are due, best first.
/// New words are `goal_ranked_words` entries, in order, that the queue does
/// not track or that have no successful repetitions yet.
pub fn select_word_batch(
    goal_ranked_words: &[String],
    queue: &ReviewQueue,
    new_word_limit: usize,
    review_limit: usize,
    now: DateTime<Utc>,
) -> WordBatch {
    let review_words: Vec<String> = queue
        .due_ranked(now, usize::MAX)
        .into_iter()
        .filter(|word| queue.get(word).is_some_and(|s| s.phase() != Phase::New))
        .take(review_limit)
        .map(str::to_string)
        .collect();

    let new_words: Vec<String> = goal_ranked_words
        .iter()
        .filter(|word| !review_words.contains(word))
        .filter(|word| queue.get(word).map_or(true, |s| s.repetitions == 0))
        .take(new_word_limit)
        .cloned()
        .collect();

    tracing::debug!(
        new = new_words.len(),
        review = review_words.len(),
        "word batch selected"
    );

    WordBatch {
        new_words,
        review_words,
    }
}

/// Build an interleaved lesson: at each step a new word's question, then a
/// review word's question.
pub fn generate_tutor_lesson(
    topic: &str,
    goal_ranked_words: &[String],
    queue: &ReviewQueue,
    options: &LessonOptions,
    now: DateTime<Utc>,
) -> Lesson {
    let batch = select_word_batch(
        goal_ranked_words,
        queue,
        options.new_word_limit,
        options.review_limit,
        now,
    );
    Lesson {
        id: Uuid::new_v4(),
        created_at: now,
        topic: topic.to_string(),
        items: interleave(&batch, options.grammar_every),
    }
}

/// Outline of a lesson on a topic: an introduction, the words to highlight
/// and sentence-writing exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    pub topic: String,
    pub introduction: String,
    pub vocabulary: Vec<String>,
    pub exercises: Vec<String>,
}

/// Outline a lesson on `topic` highlighting `vocabulary`. Repeated words are
/// listed once; the topic exercise always comes first.
pub fn generate_lesson(topic: &str, vocabulary: &[String]) -> LessonPlan {
    let mut words: Vec<String> = Vec::with_capacity(vocabulary.len());
    for word in vocabulary {
        if !words.contains(word) {
            words.push(word.clone());
        }
    }

    let exercises = std::iter::once(format!("Use {topic} in a sentence."))
        .chain(
            words
                .iter()
                .map(|word| format!("Write a sentence about {topic} using '{word}'.")),
        )
        .collect();

    LessonPlan {
        topic: topic.to_string(),
        introduction: format!("Today's lesson covers {topic}."),
        vocabulary: words,
        exercises,
    }
}

fn interleave(batch: &WordBatch, grammar_every: usize) -> Vec<LessonItem> {
    let mut items = Vec::new();
    let mut new_count = 0usize;
    let steps = batch.new_words.len().max(batch.review_words.len());

    for i in 0..steps {
        if let Some(word) = batch.new_words.get(i) {
            items.push(mcq_item(word));
            new_count += 1;
            if grammar_every > 0 && new_count % grammar_every == 0 {
                items.push(grammar_tip(word));
            }
        }
        if let Some(word) = batch.review_words.get(i) {
            items.push(mcq_item(word));
        }
    }
    items
}

/// Multiple-choice question for `word` with placeholder distractors.
pub fn mcq_item(word: &str) -> LessonItem {
    let answer = format!("meaning of {word}");
    let mut choices = placeholder_distractors(word);
    let answer_index = answer_slot(word, choices.len() + 1);
    choices.insert(answer_index, answer.clone());
    LessonItem::Mcq {
        word: word.to_string(),
        question: format!("What is the meaning of '{word}'?"),
        choices,
        answer,
        answer_index,
    }
}

pub fn grammar_tip(word: &str) -> LessonItem {
    LessonItem::GrammarTip {
        word: word.to_string(),
        tip: format!("Remember the grammar rule associated with '{word}'."),
    }
}

/// Fixed stand-in distractors.
pub fn placeholder_distractors(word: &str) -> Vec<String> {
    ["a", "b", "c"]
        .iter()
        .map(|suffix| format!("{word}_{suffix}"))
        .collect()
}

// Deterministic so the same word always lands in the same slot.
fn answer_slot(word: &str, slots: usize) -> usize {
    let sum: usize = word.bytes().map(usize::from).sum();
    sum % slots
}
