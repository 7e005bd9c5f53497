//! scout taxonomy - print the recognized vocabulary

use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::error::Result;
use crate::taxonomy::{AUDIENCE_AGE_BANDS, AUDIENCE_GENDERS, COUNTRIES, NICHES, PLATFORMS, Tier};

pub fn run(ctx: &AppContext) -> Result<()> {
    if ctx.machine {
        emit_json(&serde_json::json!({
            "niches": NICHES.iter().map(|n| n.id).collect::<Vec<_>>(),
            "platforms": PLATFORMS.iter().map(|p| p.id).collect::<Vec<_>>(),
            "tiers": ["micro", "macro", "mega"],
            "countries": COUNTRIES,
            "audience_age": AUDIENCE_AGE_BANDS,
            "audience_gender": AUDIENCE_GENDERS,
        }));
        return Ok(());
    }

    println!("{}", "Niches".bold());
    for niche in NICHES {
        println!("  {:<18} {}", niche.id, niche.label.dimmed());
    }

    println!("{}", "Platforms".bold());
    for platform in PLATFORMS {
        println!("  {:<18} {}", platform.id, platform.label.dimmed());
    }

    println!("{}", "Tiers".bold());
    for tier in [Tier::Micro, Tier::Macro, Tier::Mega] {
        let (min, max) = tier.follower_range();
        match max {
            Some(max) => println!("  {:<18} {min} – {max} followers", tier.as_str()),
            None => println!("  {:<18} {min}+ followers", tier.as_str()),
        }
    }

    Ok(())
}
