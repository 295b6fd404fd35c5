//! Playlist-group resolution: turn group pages (playlist tabs, shelf
//! subgroups) into concrete playlist references.

use crate::core::classifier::classify;
use crate::models::url::{CategoryBuckets, UrlCategory};
use crate::services::ytdlp::InfoProvider;
use crate::{storage, Error, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

/// Id prefix of the platform's auto-generated Favorites collection.
/// Not meaningfully archivable content; always skipped.
const FAVOURITES_ID_PREFIX: &str = "FL";

/// Rewrite the `playlist` bucket so every entry is a concrete playlist URL.
///
/// Each URL is fetched flat and classified by the composition of its
/// children:
/// - all children are playlists: the URL was a group; its children replace
///   it (one level of grouping, the common case);
/// - all children are videos (or the listing is empty): the URL is itself a
///   de-facto playlist and is kept, except the auto-generated Favourites
///   collection which is skipped with a log line;
/// - mixed composition: fatal. The platform's grouping depth observed in
///   practice never mixes types, and guessing would corrupt the catalog.
pub async fn resolve_playlist_groups(
    provider: &dyn InfoProvider,
    buckets: &mut CategoryBuckets,
) -> Result<()> {
    let group_urls = std::mem::take(&mut buckets.playlist);
    let mut resolved: Vec<String> = Vec::new();
    let mut push_resolved = |url: String| {
        if !resolved.iter().any(|existing| *existing == url) {
            resolved.push(url);
        }
    };

    for (i, group_url) in group_urls.iter().enumerate() {
        tracing::info!(
            "RETRIEVING INFO: playlist group {}/{} {:?}",
            i + 1,
            group_urls.len(),
            group_url
        );
        let info = provider.extract_flat(group_url).await?;

        let mut all_playlists = !info.entries.is_empty();
        let mut all_videos = true;
        for entry in &info.entries {
            let category = entry
                .resolved_url()
                .map(|url| classify(&url).category)
                .unwrap_or(None);
            all_playlists &= category == Some(UrlCategory::Playlist);
            all_videos &= category == Some(UrlCategory::Video);
        }

        if all_playlists {
            for entry in &info.entries {
                if let Some(url) = entry.resolved_url() {
                    push_resolved(classify(&url).canonical_url);
                }
            }
        } else if all_videos {
            // an empty listing is still a playlist, just one with nothing
            // visible in it
            let group_id = info.id.as_deref().unwrap_or_default();
            if group_id.starts_with(FAVOURITES_ID_PREFIX) {
                tracing::info!(
                    "SKIPPING Favourites playlist {:?} ({:?})",
                    group_url,
                    info.title
                );
            } else {
                push_resolved(group_url.clone());
            }
        } else {
            return Err(Error::MixedGroupComposition {
                url: group_url.clone(),
            });
        }
    }

    buckets.playlist = resolved;
    Ok(())
}

/// Callback supplying a corrected URL for a group page the platform serves
/// with a broken self-referential redirect. Production wires a terminal
/// prompt; tests wire a canned map.
pub type BrokenUrlResolver = Box<dyn Fn(&str, &str) -> Option<String> + Send + Sync>;

/// Persisted map of broken group URL -> manually corrected URL.
///
/// The platform occasionally serves a playlist subgroup page that lists
/// itself as its own child. The correction cannot be derived, so it is asked
/// for once (see [`BrokenUrlResolver`]) and reused on every later run.
#[derive(Debug)]
pub struct FixedUrlMap {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl FixedUrlMap {
    /// Load from the default location under the user's config directory.
    pub fn load_default() -> Result<Self> {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("yt_archiver");
        Self::load(dir.join("fixed_urls.json"))
    }

    /// Load from a path; a missing file is an empty map.
    pub fn load(path: PathBuf) -> Result<Self> {
        let map = storage::load_json_or_default(&path)?;
        Ok(Self { path, map })
    }

    /// Number of recorded corrections.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Resolve a broken group URL to its corrected form.
    ///
    /// Known corrections are answered from the persisted map; otherwise the
    /// injected resolver is consulted and its answer is persisted for all
    /// future runs.
    pub fn resolve(
        &mut self,
        broken_url: &str,
        title: &str,
        resolver: &BrokenUrlResolver,
    ) -> Result<String> {
        if let Some(fixed) = self.map.get(broken_url) {
            tracing::info!("URL resolved using {}", self.path.display());
            return Ok(fixed.clone());
        }
        let corrected = resolver(broken_url, title)
            .ok_or_else(|| Error::BrokenUrlUnresolved(broken_url.to_string()))?;
        self.map.insert(broken_url.to_string(), corrected.clone());
        storage::save_json(&self.path, &self.map)?;
        Ok(corrected)
    }
}

/// Production resolver: explain the breakage and read the corrected URL
/// from the terminal.
pub fn prompt_broken_url_resolver() -> BrokenUrlResolver {
    Box::new(|broken_url, title| {
        println!("The platform served a broken URL.");
        println!("  Go to {:?}, navigate in the dropdown to {:?}", broken_url, title);
        print!("  Paste the resulting URL here: ");
        std::io::stdout().flush().ok()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).ok()?;
        let corrected = line.trim().to_string();
        if corrected.is_empty() {
            None
        } else {
            Some(corrected)
        }
    })
}
