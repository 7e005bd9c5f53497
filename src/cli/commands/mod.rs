//! Command handlers.

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod import;
pub mod index;
pub mod recommend;
pub mod search;
pub mod similar;
pub mod suggest;
pub mod taxonomy;

pub async fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => search::run(ctx, args).await,
        Commands::Recommend(args) => recommend::run(ctx, args).await,
        Commands::Similar(args) => similar::run(ctx, args).await,
        Commands::Suggest(args) => suggest::run(ctx, args).await,
        Commands::Import(args) => import::run(ctx, args).await,
        Commands::Index => index::run(ctx).await,
        Commands::Taxonomy => taxonomy::run(ctx),
    }
}
