use anyhow::{anyhow, Result};

use crate::session::{Session, SessionStore};

pub mod login;
pub mod logout;
pub mod progress;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Load the stored session and check the caller may open the given page.
/// Mirrors the route gating of the admin console: full admins pass, sub-admins
/// need the page in their grant list.
pub fn require_page_access(page: &str) -> Result<Session> {
    let store = SessionStore::from_config()?;
    let session = store
        .load()
        .ok_or_else(|| anyhow!("Not signed in. Run 'drivedesk login' first."))?;

    if !session.allows(page) {
        return Err(anyhow!(
            "Your sub-admin account has no access to the '{}' page.",
            page
        ));
    }
    Ok(session)
}

pub async fn show_how_to_get_started() -> Result<()> {
    println!("🚗 Drivedesk - Driving-School Back Office");
    println!();
    println!("To get started:");
    println!("  🔑 drivedesk login --email you@school.test   # Sign in");
    println!("  📋 drivedesk progress fetch --license-type learning --user-id U1");
    println!("  ➡️  drivedesk progress advance --license-type learning --user-id U1 <action>");
    println!();
    println!("💡 'progress fetch' always shows the one action the workflow offers next.");
    Ok(())
}
