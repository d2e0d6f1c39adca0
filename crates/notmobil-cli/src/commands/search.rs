use crate::commands::common::{normalize_search_query, print_notes, AppContext};
use crate::error::CliError;

/// Substring match over title and content, newest first.
pub async fn run_search(
    query: &str,
    limit: usize,
    as_json: bool,
    ctx: &AppContext,
) -> Result<(), CliError> {
    let query = normalize_search_query(query)?;
    let service = ctx.open_service().await?;
    let notes = service.search_notes(&query, limit).await?;
    print_notes(&notes, as_json)
}
