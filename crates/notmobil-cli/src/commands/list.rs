use crate::commands::common::{print_notes, AppContext};
use crate::error::CliError;

pub async fn run_list(
    limit: usize,
    tag: Option<&str>,
    as_json: bool,
    ctx: &AppContext,
) -> Result<(), CliError> {
    let service = ctx.open_service().await?;
    let notes = match tag.map(str::trim).filter(|tag| !tag.is_empty()) {
        Some(tag) => service.list_notes_by_tag(tag, limit, 0).await?,
        None => service.list_notes(limit, 0).await?,
    };
    print_notes(&notes, as_json)
}

/// Every tag with its note count, most used first.
pub async fn run_tags(ctx: &AppContext) -> Result<(), CliError> {
    let service = ctx.open_service().await?;
    let tags = service.list_tags().await?;
    if tags.is_empty() {
        println!("No tags");
    }
    for (tag, count) in tags {
        println!("#{tag:<20} {count}");
    }
    Ok(())
}
