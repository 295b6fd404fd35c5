//! Resolve command implementation.

use crate::core::builder::{self, CatalogBuilder};
use crate::models::options::BuildOptions;
use crate::services::ytdlp::YtDlpClient;
use crate::storage;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Resolve references into a catalog and persist the snapshot.
#[allow(clippy::too_many_arguments)]
pub async fn resolve(
    urls: Vec<String>,
    batch_file: Option<PathBuf>,
    output_dir: &Path,
    no_archives: bool,
    json_file_prefix: Option<String>,
    no_channels: bool,
    album: Option<String>,
    album_artist: Option<String>,
) -> Result<()> {
    let urls = match batch_file {
        Some(path) => storage::read_urls_from_file(&path)
            .with_context(|| format!("Failed to read batch file: {}", path.display()))?,
        None => urls,
    };
    if urls.is_empty() {
        bail!("no URLs given; pass them as arguments or via --batch-file");
    }

    let client = YtDlpClient::new();

    let snapshot_path = if no_archives {
        None
    } else {
        let filename = match json_file_prefix {
            Some(prefix) => storage::restrict_filename(&format!("{}.json", prefix)),
            None if urls.len() == 1 => {
                let title = builder::derive_title(&client, &urls[0]).await?;
                storage::restrict_filename(&format!("{}.json", title))
            }
            None => storage::generate_snapshot_filename(None),
        };
        Some(output_dir.join("_json").join(filename))
    };

    println!(
        "{}",
        format!("[RESOLVE] Building catalog from {} URL(s)...", urls.len())
            .bold()
            .cyan()
    );
    if let Some(ref path) = snapshot_path {
        println!("  Snapshot: {}", path.display());
    }
    println!();

    let options = BuildOptions {
        no_channels,
        albumartist_override: album_artist,
        album_override: album,
        snapshot_path: snapshot_path.clone(),
    };
    let catalog = CatalogBuilder::new(&client, options).build(&urls).await?;

    println!();
    println!("{}", "[RESOLVE] Catalog complete".bold().green());
    println!("  Channels:  {}", catalog.channels.len());
    println!("  Playlists: {}", catalog.playlist_count());
    println!("  Videos:    {}", catalog.video_count());
    if let Some(path) = snapshot_path {
        println!();
        println!(
            "Snapshot written to {}; re-running with the same inputs resumes from it.",
            path.display()
        );
    }
    Ok(())
}
