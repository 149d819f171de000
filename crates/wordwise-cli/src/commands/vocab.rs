//! The `wordwise vocab` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use wordwise_core::vocabulary::extract_vocabulary;

pub fn execute(file: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let vocab = extract_vocabulary(&text);
    println!("{}", serde_json::json!({ "vocab": vocab }));
    Ok(())
}
