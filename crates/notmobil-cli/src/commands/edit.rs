use crate::commands::common::{resolve_note, AppContext};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    title: Option<String>,
    content: Option<String>,
    tags: Option<Vec<String>>,
    ctx: &AppContext,
) -> Result<(), CliError> {
    if title.is_none() && content.is_none() && tags.is_none() {
        return Err(CliError::NothingToChange);
    }

    let service = ctx.open_service().await?;
    let note = resolve_note(&service, id).await?;
    let updated = service.edit_note(&note.id, title, content, tags).await?;

    println!("{}", updated.id);
    Ok(())
}
