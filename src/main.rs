use anyhow::Result;
use clap::Parser;

use drivedesk::cli::commands::login::LoginCommand;
use drivedesk::cli::commands::logout::LogoutCommand;
use drivedesk::cli::commands::progress::{AdvanceCommand, FetchCommand};
use drivedesk::cli::commands::{show_how_to_get_started, Command};
use drivedesk::cli::{Cli, Commands, ProgressCommands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = drivedesk::config::config()?;
    drivedesk::telemetry::init_telemetry(
        &config.observability.log_level,
        config.observability.json_logs,
    )?;

    tokio::runtime::Runtime::new()?.block_on(async {
        match cli.command {
            // Default behavior: no subcommand - explain how to get started
            None => show_how_to_get_started().await,
            Some(Commands::Login { email, password }) => {
                LoginCommand::new(email, password).execute().await
            }
            Some(Commands::Logout) => LogoutCommand.execute().await,
            Some(Commands::Progress { command }) => match command {
                ProgressCommands::Fetch {
                    license_type,
                    user_id,
                } => FetchCommand::new(license_type, user_id).execute().await,
                ProgressCommands::Advance {
                    license_type,
                    user_id,
                    action,
                } => {
                    AdvanceCommand::new(license_type, user_id, action)
                        .execute()
                        .await
                }
            },
        }
    })
}
