//! scout suggest - query completions for a partial input

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Partial query text
    pub partial: String,

    /// Maximum number of suggestions
    #[arg(long, short = 'n', default_value = "8")]
    pub limit: usize,
}

pub async fn run(ctx: &AppContext, args: &SuggestArgs) -> Result<()> {
    let service = ctx.search_service()?;
    let suggestions = service.suggestions(&args.partial, args.limit, None).await;

    if ctx.machine {
        emit_json(&suggestions);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No suggestions for \"{}\"", args.partial);
    } else {
        for suggestion in &suggestions {
            println!("{suggestion}");
        }
    }
    Ok(())
}
