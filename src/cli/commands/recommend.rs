//! scout recommend - ranked recommendations for a brand brief

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{emit_json, format_count};
use crate::error::Result;
use crate::search::SearchOptions;

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Brand brief or search phrase
    pub query: String,

    /// Maximum number of recommendations
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

pub async fn run(ctx: &AppContext, args: &RecommendArgs) -> Result<()> {
    ctx.ensure_indexed().await?;
    let service = ctx.search_service()?;

    let options = SearchOptions {
        max_results: args.limit,
        ..Default::default()
    };
    let (response, ranked) = service.recommend(&args.query, &options).await;

    if ctx.machine {
        emit_json(&serde_json::json!({
            "success": response.success,
            "errors": response.errors,
            "recommendations": ranked,
        }));
        return Ok(());
    }

    if !response.success {
        for error in &response.errors {
            println!("{} {error}", "error:".red().bold());
        }
        return Ok(());
    }

    println!("Top recommendations for \"{}\"", args.query.bold());
    for (i, rec) in ranked.iter().enumerate() {
        let creator = &rec.result.creator;
        println!(
            "{:>2}. {:<20} {:>5.1} pts  ({} followers, {:.1}% eng, {:.1}/5 satisfaction, {} collabs)",
            i + 1,
            creator.name.bold(),
            rec.total_score,
            format_count(creator.followers),
            creator.engagement_rate,
            creator.satisfaction,
            creator.collaborations,
        );
        println!(
            "    {} sim {:.1} · eng {:.1} · reach {:.1} · sat {:.1} · exp {:.1}",
            "breakdown:".dimmed(),
            rec.breakdown.similarity,
            rec.breakdown.engagement,
            rec.breakdown.followers,
            rec.breakdown.satisfaction,
            rec.breakdown.experience,
        );
    }
    Ok(())
}
