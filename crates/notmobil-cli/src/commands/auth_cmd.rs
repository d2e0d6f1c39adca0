use notmobil_core::auth::SessionPersistence;

use crate::cli::AuthCommands;
use crate::commands::common::AppContext;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, ctx: &AppContext) -> Result<(), CliError> {
    let client = ctx.auth_client()?;
    match command {
        AuthCommands::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            println!("Logged in as {}", session.user.email);
        }
        AuthCommands::Logout => {
            client.logout()?;
            println!("Logged out");
        }
        AuthCommands::Status => match client.store().load_session()? {
            Some(session) if !session.is_expired() => {
                println!("Logged in as {}", session.user.email);
            }
            Some(session) => println!(
                "Session for {} has expired; it is refreshed on the next sync",
                session.user.email
            ),
            None => println!("Not logged in"),
        },
    }
    Ok(())
}
