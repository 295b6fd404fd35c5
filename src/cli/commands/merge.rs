//! Merge command implementation.

use crate::models::catalog::Catalog;
use crate::storage;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Merge several catalog snapshots into one document.
///
/// Earlier inputs take precedence on collisions. Loose pseudo-playlists are
/// re-keyed by their sanitized title first so the loose buckets of
/// different runs do not collide on the empty key.
pub fn merge(output: &Path, inputs: &[PathBuf]) -> Result<()> {
    let mut merged = Catalog::default();
    for input in inputs {
        let mut part: Catalog = storage::load_json(input)
            .with_context(|| format!("Failed to read catalog: {}", input.display()))?;
        part.rekey_loose_playlists(storage::restrict_filename);
        merged.merge(part);
    }
    storage::save_json(output, &merged)?;

    println!("{}", "[MERGE] Catalogs merged".bold().green());
    println!("  Inputs:    {}", inputs.len());
    println!("  Channels:  {}", merged.channels.len());
    println!("  Playlists: {}", merged.playlist_count());
    println!("  Videos:    {}", merged.video_count());
    println!("  Output:    {}", output.display());
    Ok(())
}
