//! scout search - free-text creator search

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{emit_json, result_line};
use crate::error::Result;
use crate::filters::FilterSet;
use crate::search::{SearchOptions, SearchResponse};
use crate::taxonomy::Tier;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text search query
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Disable the hybrid keyword branch (vector-only)
    #[arg(long)]
    pub no_hybrid: bool,

    /// Similarity cutoff override (0..1)
    #[arg(long)]
    pub min_score: Option<f32>,

    /// Restrict to a niche (e.g. tech_gaming)
    #[arg(long)]
    pub niche: Option<String>,

    /// Restrict to a platform (e.g. youtube)
    #[arg(long)]
    pub platform: Option<String>,

    /// Restrict to a tier (micro, macro, mega)
    #[arg(long)]
    pub tier: Option<String>,

    /// Minimum follower count
    #[arg(long)]
    pub min_followers: Option<u64>,

    /// Maximum follower count
    #[arg(long)]
    pub max_followers: Option<u64>,

    /// Minimum engagement rate in percent
    #[arg(long)]
    pub min_engagement: Option<f32>,

    /// Maximum price per post in USD
    #[arg(long)]
    pub max_price: Option<f64>,
}

impl SearchArgs {
    pub fn to_options(&self) -> SearchOptions {
        let filters = FilterSet {
            niche: self.niche.clone(),
            platform: self.platform.clone(),
            tier: self.tier.as_deref().and_then(Tier::parse),
            min_followers: self.min_followers,
            max_followers: self.max_followers,
            min_engagement: self.min_engagement,
            max_price: self.max_price,
            ..Default::default()
        };

        SearchOptions {
            filters: (!filters.is_empty()).then_some(filters),
            max_results: self.limit,
            use_hybrid: self.no_hybrid.then_some(false),
            min_score: self.min_score,
        }
    }
}

pub async fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    ctx.ensure_indexed().await?;
    let service = ctx.search_service()?;
    let response = service.search(&args.query, &args.to_options()).await;

    if ctx.machine {
        emit_json(&response);
        return Ok(());
    }

    display(&args.query, &response);
    Ok(())
}

pub fn display(query: &str, response: &SearchResponse) {
    if !response.success {
        for error in &response.errors {
            println!("{} {error}", "error:".red().bold());
        }
        for suggestion in &response.suggestions {
            println!("{} {suggestion}", "hint:".yellow());
        }
        return;
    }

    match &response.metadata {
        Some(meta) => println!(
            "Found {} creators for \"{}\" ({} strategy, {} ms)",
            response.results.len(),
            query.bold(),
            meta.strategy.as_str(),
            meta.elapsed_ms,
        ),
        None => println!("Found {} creators", response.results.len()),
    }

    for (i, result) in response.results.iter().enumerate() {
        println!("{}", result_line(i + 1, result));
    }

    if let Some(meta) = &response.metadata {
        for warning in &meta.warnings {
            println!("{} {warning}", "note:".yellow());
        }
        if !meta.unresolved_ids.is_empty() {
            println!(
                "{} {} matched ids could not be resolved",
                "note:".yellow(),
                meta.unresolved_ids.len()
            );
        }
    }
}
