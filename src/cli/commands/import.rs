//! scout import - load creator records from a JSON file

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::error::Result;
use crate::storage::{CreatorRecord, CreatorStore};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to a JSON array of creator records
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

pub async fn run(ctx: &AppContext, args: &ImportArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file)?;
    let records: Vec<CreatorRecord> = serde_json::from_str(&raw)?;

    for record in &records {
        ctx.store.upsert(record).await?;
    }
    tracing::info!(count = records.len(), "imported creator records");

    if ctx.machine {
        emit_json(&serde_json::json!({ "imported": records.len() }));
    } else {
        println!("Imported {} creators", records.len());
    }
    Ok(())
}
