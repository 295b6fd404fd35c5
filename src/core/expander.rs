//! Channel expansion: turn channel home references into their tab
//! references, then resolve release/playlist tabs into concrete entries.

use crate::models::url::{CategoryBuckets, UrlCategory};
use crate::services::ytdlp::InfoProvider;
use crate::Result;
use std::collections::HashMap;

/// Channel attribution learned while resolving tab pages, scoped to one
/// build so runs stay isolated from each other.
#[derive(Debug, Clone, Default)]
pub struct ChannelHints {
    /// Entry URL -> owning channel id.
    pub url_to_channel_id: HashMap<String, String>,
    /// Channel id -> display title.
    pub channel_id_to_title: HashMap<String, String>,
}

impl ChannelHints {
    pub fn channel_id_for(&self, url: &str) -> Option<&String> {
        self.url_to_channel_id.get(url)
    }

    pub fn title_for(&self, channel_id: &str) -> Option<&String> {
        self.channel_id_to_title.get(channel_id)
    }
}

fn push_unique(bucket: &mut Vec<String>, url: String) {
    if !bucket.iter().any(|existing| *existing == url) {
        bucket.push(url);
    }
}

/// Expand every channel home reference into its `/playlists` and `/videos`
/// tabs, plus `/releases` when the channel has one.
///
/// The releases tab is probed with a single flat lookup; a per-item lookup
/// failure means the tab does not exist and is not an error.
pub async fn expand_channels(
    provider: &dyn InfoProvider,
    buckets: &mut CategoryBuckets,
) -> Result<()> {
    let channel_urls = std::mem::take(&mut buckets.channel);
    for channel_url in channel_urls {
        let releases_url = format!("{}/releases", channel_url);
        match provider.extract_flat(&releases_url).await {
            Ok(_) => push_unique(&mut buckets.channel_releases, releases_url),
            Err(err) if err.is_per_item() => {
                tracing::debug!("no releases tab for {:?}: {}", channel_url, err);
            }
            Err(err) => return Err(err.into()),
        }
        push_unique(
            &mut buckets.channel_playlists,
            format!("{}/playlists", channel_url),
        );
        push_unique(
            &mut buckets.channel_videos,
            format!("{}/videos", channel_url),
        );
    }
    Ok(())
}

/// Resolve release and playlist tab pages into their child entries.
///
/// Each tab is fetched flat; child entry URLs are fed into the `release` /
/// `playlist` buckets (ahead of directly supplied URLs, preserving pass
/// order), and the tab's uploader identity is recorded in `hints` for later
/// channel attribution. Tab-level lookup failures propagate: a half-read
/// channel is too unreliable to catalog silently.
pub async fn resolve_channel_tabs(
    provider: &dyn InfoProvider,
    buckets: &mut CategoryBuckets,
    hints: &mut ChannelHints,
) -> Result<()> {
    let tab_pairs = [
        (UrlCategory::ChannelReleases, UrlCategory::Release),
        (UrlCategory::ChannelPlaylists, UrlCategory::Playlist),
    ];
    for (tab_category, entry_category) in tab_pairs {
        let tab_urls = std::mem::take(buckets.bucket_mut(tab_category));
        let mut resolved_entries: Vec<String> = Vec::new();
        for (i, tab_url) in tab_urls.iter().enumerate() {
            tracing::info!(
                "RETRIEVING INFO: {} {}/{} {:?}",
                tab_category,
                i + 1,
                tab_urls.len(),
                tab_url
            );
            let info = provider.extract_flat(tab_url).await?;
            let channel_id = info.uploader_id.clone().or(info.channel_id.clone());
            let channel_title = info.uploader.clone().or(info.channel.clone());
            for entry in &info.entries {
                let Some(entry_url) = entry.resolved_url() else {
                    continue;
                };
                if let Some(channel_id) = &channel_id {
                    hints
                        .url_to_channel_id
                        .insert(entry_url.clone(), channel_id.clone());
                    if let Some(title) = &channel_title {
                        hints
                            .channel_id_to_title
                            .insert(channel_id.clone(), title.clone());
                    }
                }
                push_unique(&mut resolved_entries, entry_url);
            }
        }
        // tab-derived entries go ahead of directly supplied ones
        let directly_supplied = std::mem::take(buckets.bucket_mut(entry_category));
        let bucket = buckets.bucket_mut(entry_category);
        *bucket = resolved_entries;
        for url in directly_supplied {
            push_unique(bucket, url);
        }
    }
    Ok(())
}
