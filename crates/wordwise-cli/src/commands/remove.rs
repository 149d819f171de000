//! The `wordwise remove` command.

use anyhow::Result;

use wordwise_core::SrsError;

use super::Session;

pub fn execute(session: &Session, word: &str) -> Result<()> {
    let mut queue = session.load_queue()?;
    if queue.remove(word).is_none() {
        return Err(SrsError::UnknownWord(word.to_string()).into());
    }
    session.save_queue(&queue)?;
    println!("Removed '{word}'");
    Ok(())
}
