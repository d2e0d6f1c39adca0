use notmobil_core::NoteStore;

use crate::commands::common::{resolve_note, AppContext};
use crate::error::CliError;

/// Removes the note locally only; a copy already on the server stays there
/// and returns with the next pull.
pub async fn run_delete(id: &str, ctx: &AppContext) -> Result<(), CliError> {
    let service = ctx.open_service().await?;
    let note = resolve_note(&service, id).await?;

    service.delete_note(&note.id).await?;
    println!("{}", note.id);
    Ok(())
}
