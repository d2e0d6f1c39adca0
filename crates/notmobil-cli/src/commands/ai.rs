use notmobil_core::auth::CredentialProvider;

use crate::cli::AiCommands;
use crate::commands::common::{note_text, resolve_note, AppContext};
use crate::error::CliError;

pub async fn run_ai(command: AiCommands, ctx: &AppContext) -> Result<(), CliError> {
    let service = ctx.open_service().await?;
    let client = ctx.ai_client()?;
    let credential = ctx.credentials()?.resolve().await?;

    match command {
        AiCommands::Summarize { id } => {
            let note = resolve_note(&service, &id).await?;
            let settings = service.load_settings().await?;
            let summary = client
                .summarize(&credential, &note_text(&note), settings.ai_api_key.as_deref())
                .await?;
            println!("{summary}");
        }
        AiCommands::Tags { id, apply } => {
            let note = resolve_note(&service, &id).await?;
            let suggested = client.generate_tags(&credential, &note_text(&note)).await?;
            println!(
                "{}",
                suggested
                    .iter()
                    .map(|tag| format!("#{tag}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            );
            if apply {
                let mut tags = note.tags.clone();
                tags.extend(suggested);
                let updated = service.edit_note(&note.id, None, None, Some(tags)).await?;
                println!("Tagged {}", updated.id);
            }
        }
        AiCommands::Classify { id } => {
            let note = resolve_note(&service, &id).await?;
            let category = client.classify(&credential, &note_text(&note)).await?;
            println!("{category}");
        }
    }
    Ok(())
}
