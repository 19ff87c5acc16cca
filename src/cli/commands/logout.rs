use anyhow::Result;

use crate::cli::commands::Command;
use crate::session::SessionStore;

pub struct LogoutCommand;

impl Command for LogoutCommand {
    async fn execute(&self) -> Result<()> {
        let store = SessionStore::from_config()?;
        match store.load() {
            Some(session) => {
                store.clear()?;
                println!("👋 Signed out {}", session.email);
            }
            None => {
                // Teardown is idempotent; nothing stored is still a clean exit.
                store.clear()?;
                println!("📭 No session was stored");
            }
        }
        Ok(())
    }
}
