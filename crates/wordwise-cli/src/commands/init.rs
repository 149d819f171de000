//! The `wordwise init` command.

use std::path::Path;

use anyhow::{Context, Result};

use wordwise_providers::config::{starter_config, CONFIG_FILE_NAME};

pub fn execute() -> Result<()> {
    if Path::new(CONFIG_FILE_NAME).exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE_NAME, starter_config())
            .with_context(|| format!("failed to write {CONFIG_FILE_NAME}"))?;
        println!("Created {CONFIG_FILE_NAME}");
    }

    println!("\nNext steps:");
    println!("  1. Run: wordwise status");
    println!("  2. Run: wordwise add --word <word> --rank <n>");
    println!("  3. Run: wordwise next");

    Ok(())
}
