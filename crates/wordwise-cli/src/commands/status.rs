//! The `wordwise status` command.

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use comfy_table::{Cell, Table};

use super::Session;

pub fn execute(session: &Session) -> Result<()> {
    let queue = session.load_queue()?;
    if queue.is_empty() {
        println!("No words tracked. Run `wordwise add --word <word>` to start.");
        return Ok(());
    }

    let now = Utc::now();
    let mut table = Table::new();
    table.set_header(vec![
        "Word", "Rank", "Phase", "Reps", "Interval", "Ease", "Next review", "Priority",
    ]);

    for entry in queue.iter() {
        let state = entry.state();
        let priority = queue.priority(entry.word(), now).unwrap_or(0.0);
        table.add_row(vec![
            Cell::new(entry.word()),
            Cell::new(entry.rank()),
            Cell::new(state.phase()),
            Cell::new(state.repetitions),
            Cell::new(format!("{}d", state.interval)),
            Cell::new(format!("{:.2}", state.ease_factor)),
            Cell::new(state.next_review.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Cell::new(format!("{priority:.3}")),
        ]);
    }

    println!("{table}");
    println!(
        "{} words tracked, {} due",
        queue.len(),
        queue.due_ranked(now, usize::MAX).len()
    );
    Ok(())
}
