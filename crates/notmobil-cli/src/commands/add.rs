use notmobil_core::Note;

use crate::commands::common::{resolve_note_content, AppContext};
use crate::error::CliError;

pub async fn run_add(
    title: &str,
    content_parts: &[String],
    tags: &[String],
    ctx: &AppContext,
) -> Result<(), CliError> {
    let content = match resolve_note_content(content_parts) {
        Ok(content) => content,
        Err(CliError::EmptyContent) if !title.trim().is_empty() => String::new(),
        Err(error) => return Err(error),
    };

    let service = ctx.open_service().await?;
    let note = service
        .create_note(Note::new(title.trim(), content).with_tags(tags.iter().cloned()))
        .await?;

    println!("{}", note.id);
    Ok(())
}
