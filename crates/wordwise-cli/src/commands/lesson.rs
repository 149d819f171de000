//! The `wordwise lesson` command.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use wordwise_core::lesson::{generate_lesson, generate_tutor_lesson, Lesson};

use super::{goal_ranked_words, Session};

#[derive(Serialize)]
struct LessonOutput {
    lesson: Lesson,
    words: Vec<String>,
}

pub fn execute(
    session: &Session,
    topic: String,
    new_limit: Option<usize>,
    review_limit: Option<usize>,
    plan: bool,
) -> Result<()> {
    let queue = session.load_queue()?;
    let mut options = session.config.lesson_options();
    if let Some(limit) = new_limit {
        options.new_word_limit = limit;
    }
    if let Some(limit) = review_limit {
        options.review_limit = limit;
    }

    // Saved goals lead; without any, the tracked words in rank order do.
    let saved = session.load_goals()?;
    let goals = if saved.list_goals().is_empty() {
        goal_ranked_words(&queue)
    } else {
        saved.ranked_words()
    };
    let lesson = generate_tutor_lesson(&topic, &goals, &queue, &options, Utc::now());

    let mut words: Vec<String> = Vec::new();
    for item in &lesson.items {
        if !words.iter().any(|w| w == item.word()) {
            words.push(item.word().to_string());
        }
    }

    if plan {
        let outline = generate_lesson(&topic, &words);
        println!("{}", serde_json::to_string_pretty(&outline)?);
        return Ok(());
    }

    let output = LessonOutput { lesson, words };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
