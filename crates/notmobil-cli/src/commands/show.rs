use crate::commands::common::{format_note_detail, resolve_note, AppContext};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, ctx: &AppContext) -> Result<(), CliError> {
    let service = ctx.open_service().await?;
    let note = resolve_note(&service, id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("{}", format_note_detail(&note));
    }
    Ok(())
}
