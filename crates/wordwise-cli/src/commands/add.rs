//! The `wordwise add` command.

use anyhow::Result;
use chrono::Utc;

use super::Session;

pub fn execute(session: &Session, word: String, rank: u32) -> Result<()> {
    let mut queue = session.load_queue()?;
    let existed = queue.contains(&word);
    queue.track(word.clone(), rank, Utc::now())?;
    session.save_queue(&queue)?;

    if existed {
        println!("Updated '{word}' to rank {rank}");
    } else {
        println!("Tracking '{word}' (rank {rank})");
    }
    Ok(())
}
