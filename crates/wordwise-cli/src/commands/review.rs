//! The `wordwise review` command.

use anyhow::Result;
use chrono::{SecondsFormat, Utc};

use super::Session;

pub fn execute(session: &Session, word: &str, quality: i32) -> Result<()> {
    let mut queue = session.load_queue()?;
    let next = queue.review_word(word, quality, Utc::now())?;
    session.save_queue(&queue)?;

    let interval = queue.get(word).map_or(0, |s| s.interval);
    println!(
        "Next review of '{word}': {} (in {interval} days)",
        next.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    Ok(())
}
