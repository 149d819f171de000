//! The `wordwise recover` command.

use anyhow::Result;

use super::Session;

pub fn execute(session: &Session) -> Result<()> {
    if !session.store.recover_from_backup()? {
        anyhow::bail!(
            "no backup found at {}",
            session.store.backup_path().display()
        );
    }
    println!(
        "Restored {} from {}",
        session.store.path().display(),
        session.store.backup_path().display()
    );
    Ok(())
}
