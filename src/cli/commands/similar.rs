//! scout similar - similarity search anchored on an existing creator

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{emit_json, format_count};
use crate::error::{Result, ScoutError};
use crate::search::VectorSearchService;
use crate::search::vector::SimilarParams;
use crate::storage::CreatorStore;

#[derive(Args, Debug)]
pub struct SimilarArgs {
    /// Creator name or id to anchor on
    pub creator: String,

    /// Maximum number of results
    #[arg(long, short = 'n', default_value = "10")]
    pub limit: usize,

    /// Keep the reference creator in its own results
    #[arg(long)]
    pub include_original: bool,
}

pub async fn run(ctx: &AppContext, args: &SimilarArgs) -> Result<()> {
    ctx.ensure_indexed().await?;

    // Accept either an id or a display name.
    let record = match ctx.store.get(&args.creator).await? {
        Some(record) => record,
        None => ctx
            .store
            .find_by_name(&args.creator)
            .await?
            .ok_or_else(|| ScoutError::NotFound(format!("no creator named {}", args.creator)))?,
    };

    let vector = VectorSearchService::new(ctx.embedder.clone(), ctx.index.clone());
    let params = SimilarParams {
        top_k: args.limit,
        include_original: args.include_original,
        ..Default::default()
    };
    let outcome = vector.find_similar_creators(&record.id, &params).await?;

    if ctx.machine {
        emit_json(&serde_json::json!({
            "reference": record.id,
            "matches": outcome
                .results
                .iter()
                .map(|m| serde_json::json!({ "creator_id": m.creator_id, "score": m.score }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    println!("Creators similar to {}", record.name.bold());
    for (i, m) in outcome.results.iter().enumerate() {
        match ctx.store.get(&m.creator_id).await? {
            Some(creator) => println!(
                "{:>2}. {:<20} {} · {} · {} followers   {:.2}",
                i + 1,
                creator.name.bold(),
                creator.niche.blue(),
                creator.platform,
                format_count(creator.followers),
                m.score,
            ),
            None => println!("{:>2}. {} (unresolved)   {:.2}", i + 1, m.creator_id, m.score),
        }
    }
    Ok(())
}
