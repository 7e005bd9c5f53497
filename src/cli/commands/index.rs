//! scout index - rebuild the vector index from the creator store

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::error::Result;
use crate::index::reindex_store;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let indexed =
        reindex_store(ctx.store.as_ref(), ctx.embedder.as_ref(), ctx.index.as_ref()).await?;

    if ctx.config.index.backend.trim().to_lowercase() == "memory" {
        tracing::warn!("the in-process index is rebuilt on every run; use the http backend to persist vectors");
    }

    if ctx.machine {
        emit_json(&serde_json::json!({ "indexed": indexed }));
    } else {
        println!("Indexed {indexed} creators");
    }
    Ok(())
}
