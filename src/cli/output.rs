//! Output helpers shared by the CLI commands.

use colored::Colorize;
use serde::Serialize;

use crate::search::{EnrichedResult, MatchSource};

/// Print a value as pretty JSON to stdout (machine mode).
pub fn emit_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Compact follower-count formatting: 1234 -> "1.2k", 2500000 -> "2.5m".
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}m", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

pub fn source_tag(source: MatchSource) -> &'static str {
    match source {
        MatchSource::Vector => "vector",
        MatchSource::Keyword => "keyword",
        MatchSource::Hybrid => "hybrid",
    }
}

/// One human-readable result line.
pub fn result_line(rank: usize, result: &EnrichedResult) -> String {
    let creator = &result.creator;
    format!(
        "{:>2}. {:<20} {} · {} · {} followers · {:.1}% eng   {} {:.2} [{}]",
        rank,
        creator.name.bold(),
        creator.niche.blue(),
        creator.platform,
        format_count(creator.followers),
        creator.engagement_rate,
        "score".dimmed(),
        result.combined_score,
        source_tag(result.source),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(950), "950");
        assert_eq!(format_count(1_234), "1.2k");
        assert_eq!(format_count(250_000), "250.0k");
        assert_eq!(format_count(2_500_000), "2.5m");
    }
}
