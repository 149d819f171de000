//! The `wordwise next` command.

use anyhow::Result;
use chrono::Utc;

use super::Session;

pub fn execute(session: &Session, limit: usize, visible: Vec<String>) -> Result<()> {
    let queue = session.load_queue()?;
    let due: Vec<&str> = queue
        .due_ranked(Utc::now(), usize::MAX)
        .into_iter()
        .filter(|word| visible.is_empty() || visible.iter().any(|v| v == word))
        .take(limit)
        .collect();

    if due.is_empty() {
        println!("Nothing due.");
    }
    for word in due {
        println!("{word}");
    }
    Ok(())
}
