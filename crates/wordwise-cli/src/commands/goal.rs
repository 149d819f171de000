//! The `wordwise goal` commands.
//!
//! Goals are saved in their own file. Every change re-ranks the tracked
//! words so the goal with the highest weight gets rank 1.

use anyhow::Result;
use chrono::Utc;
use comfy_table::{Cell, Table};

use wordwise_core::goals::{GoalItem, GoalManager};

use super::Session;

pub fn add(session: &Session, word: String, weight: f64) -> Result<()> {
    if !weight.is_finite() {
        anyhow::bail!("goal weight must be a finite number, got {weight}");
    }
    let mut goals = session.load_goals()?;
    goals.create_goal(GoalItem::new(word.clone(), weight));
    sync(session, &goals)?;

    let rank = goals
        .goal_ranks()
        .into_iter()
        .find_map(|(w, rank)| (w == word).then_some(rank))
        .unwrap_or(1);
    println!("Goal '{word}' (weight {weight}) is rank {rank}");
    Ok(())
}

pub fn remove(session: &Session, word: &str) -> Result<()> {
    let mut goals = session.load_goals()?;
    if goals.delete_goal(word).is_none() {
        anyhow::bail!("no goal for '{word}'");
    }
    sync(session, &goals)?;
    println!("Removed goal '{word}'");
    Ok(())
}

pub fn list(session: &Session) -> Result<()> {
    let goals = session.load_goals()?;
    if goals.list_goals().is_empty() {
        println!("No goals set. Run `wordwise goal add --word <word>` to add one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Rank", "Word", "Weight"]);
    for (word, rank) in goals.goal_ranks() {
        let weight = goals.read_goal(&word).map_or(1.0, |g| g.weight);
        table.add_row(vec![Cell::new(rank), Cell::new(&word), Cell::new(weight)]);
    }
    println!("{table}");
    Ok(())
}

/// Save the goals, then bring the tracked words' ranks in line with them.
fn sync(session: &Session, goals: &GoalManager) -> Result<()> {
    session.save_goals(goals)?;
    let mut queue = session.load_queue()?;
    goals.sync_queue(&mut queue, Utc::now())?;
    session.save_queue(&queue)?;
    tracing::debug!(goals = goals.list_goals().len(), "goals applied to queue");
    Ok(())
}
