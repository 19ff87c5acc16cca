use anyhow::{anyhow, Result};

use crate::cli::commands::Command;
use crate::session::{AuthClient, SessionStore};

pub struct LoginCommand {
    pub email: String,
    pub password: Option<String>,
}

impl LoginCommand {
    pub fn new(email: String, password: Option<String>) -> Self {
        Self { email, password }
    }
}

impl Command for LoginCommand {
    async fn execute(&self) -> Result<()> {
        let password = match &self.password {
            Some(password) => password.clone(),
            None => std::env::var("DRIVEDESK_PASSWORD").map_err(|_| {
                anyhow!("No password given. Pass --password or set DRIVEDESK_PASSWORD.")
            })?,
        };

        let client = AuthClient::from_config()?;
        match client.login(&self.email, &password).await {
            Ok(session) => {
                let store = SessionStore::from_config()?;
                store.save(&session)?;
                println!("✅ Login successful!");
                println!("   Signed in as {} ({:?})", session.email, session.role);
                if !session.page_access.is_empty() {
                    println!("   Page access: {}", session.page_access.join(", "));
                }
                Ok(())
            }
            Err(e) => {
                let detail = e
                    .service_message()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.to_string());
                println!("❌ Login failed: {}", detail);
                Err(e.into())
            }
        }
    }
}
