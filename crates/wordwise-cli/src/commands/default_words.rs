//! The `wordwise default-words` command.

use anyhow::Result;

use wordwise_core::goals::{load_default_goals, DEFAULT_GOAL_LIMIT};

pub fn execute(limit: Option<usize>) -> Result<()> {
    let words: Vec<String> = load_default_goals(limit.unwrap_or(DEFAULT_GOAL_LIMIT))
        .into_iter()
        .map(|g| g.word)
        .collect();
    println!("{}", serde_json::to_string(&words)?);
    Ok(())
}
