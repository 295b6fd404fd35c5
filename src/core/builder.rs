//! Catalog assembly: drives the resolution pipeline and builds the
//! persisted channel -> playlist -> video tree.
//!
//! Pass order is load-bearing: playlists are cataloged before channel
//! videos tabs, which are cataloged before standalone videos. Later passes
//! consult the cumulative seen-id set, so the first pass to encounter a
//! video owns it.

use crate::core::classifier::{self, classify};
use crate::core::expander::{self, ChannelHints};
use crate::core::metadata::{self, hyphenate_date};
use crate::core::resolver;
use crate::models::catalog::{Catalog, Channel, Playlist, PlaylistKind, Video};
use crate::models::options::{
    BuildOptions, ALBUM_OVERRIDE_CHANNEL_ID, ALBUM_OVERRIDE_CHANNEL_TITLE,
};
use crate::models::url::{CategoryBuckets, UrlCategory, PLAYLIST_CATEGORIES};
use crate::services::ytdlp::{InfoProvider, InfoRecord};
use crate::{storage, Error, Result};
use std::collections::{BTreeMap, HashSet};

/// Identity triple for a channel or playlist node.
#[derive(Debug, Clone, Default)]
struct NodeIdentity {
    id: String,
    title: String,
    url: String,
}

/// Builds the catalog from resolved category buckets.
///
/// All learned state (seen video ids, channel attribution hints) lives on
/// the builder, never in process globals, so concurrent tests and repeated
/// runs stay isolated.
pub struct CatalogBuilder<'a> {
    provider: &'a dyn InfoProvider,
    options: BuildOptions,
    catalog: Catalog,
    seen_video_ids: HashSet<String>,
    hints: ChannelHints,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(provider: &'a dyn InfoProvider, options: BuildOptions) -> Self {
        Self {
            provider,
            options,
            catalog: Catalog::default(),
            seen_video_ids: HashSet::new(),
            hints: ChannelHints::default(),
        }
    }

    /// Resolve the input references and build the full catalog.
    ///
    /// When a snapshot path is configured, the catalog is rewritten to disk
    /// after every node insertion, and an existing snapshot is loaded first
    /// so interrupted runs resume without re-fetching recorded videos.
    pub async fn build(mut self, urls: &[String]) -> Result<Catalog> {
        let mut buckets = classifier::partition(urls);
        expander::expand_channels(self.provider, &mut buckets).await?;
        expander::resolve_channel_tabs(self.provider, &mut buckets, &mut self.hints).await?;
        resolver::resolve_playlist_groups(self.provider, &mut buckets).await?;

        self.load_snapshot()?;
        self.add_playlists(&buckets).await?;
        self.add_channel_videos(&buckets).await?;
        self.add_standalone_videos(&buckets).await?;

        metadata::fill_metadata(&mut self.catalog);
        self.persist()?;
        Ok(self.catalog)
    }

    /// Pass 1: playlist buckets in fixed category order (releases first).
    async fn add_playlists(&mut self, buckets: &CategoryBuckets) -> Result<()> {
        for category in PLAYLIST_CATEGORIES {
            let kind = match category {
                UrlCategory::Release => PlaylistKind::Release,
                _ => PlaylistKind::Playlist,
            };
            let playlist_urls = buckets.bucket(category);
            for (i, playlist_url) in playlist_urls.iter().enumerate() {
                tracing::info!(
                    "RETRIEVING INFO: {} {}/{} {:?}",
                    category,
                    i + 1,
                    playlist_urls.len(),
                    playlist_url
                );
                let info = self.provider.extract_flat(playlist_url).await?;

                let channel = self.playlist_channel_identity(playlist_url, &info);
                let playlist = match &self.options.album_override {
                    Some(album) => NodeIdentity {
                        id: album.clone(),
                        title: album.clone(),
                        url: String::new(),
                    },
                    None => NodeIdentity {
                        id: info.id.clone().unwrap_or_default(),
                        title: info.title.clone().unwrap_or_default(),
                        url: info
                            .webpage_url
                            .clone()
                            .unwrap_or_else(|| playlist_url.clone()),
                    },
                };

                self.ensure_channel(&channel, None)?;
                self.ensure_playlist(&channel.id, &playlist, kind, info.description.clone())?;

                let entry_count = info.entries.len();
                for (idx, entry) in info.entries.iter().enumerate() {
                    let Some(video_id) = entry.id.clone() else {
                        continue;
                    };
                    let Some(entry_url) = entry.resolved_url() else {
                        continue;
                    };
                    if self.seen_video_ids.contains(&video_id)
                        || self.playlist_contains(&channel.id, &playlist.id, &video_id)
                    {
                        tracing::info!(
                            " SKIPPING SEEN INFO: {} video {}/{} {:?}",
                            category,
                            idx + 1,
                            entry_count,
                            entry_url
                        );
                        continue;
                    }

                    tracing::info!(
                        " RETRIEVING INFO: {} video {}/{} {:?}",
                        category,
                        idx + 1,
                        entry_count,
                        entry_url
                    );
                    let full = match self.provider.extract_full(&entry_url).await {
                        Ok(full) => full,
                        Err(err) if err.is_per_item() => {
                            tracing::warn!("skipping video {:?}: {}", entry_url, err);
                            continue;
                        }
                        Err(err) => return Err(err.into()),
                    };

                    let video = Video {
                        id: video_id.clone(),
                        title: entry.title.clone().unwrap_or_default(),
                        url: entry_url,
                        upload_date: full.upload_date.as_deref().map(hyphenate_date),
                        uploader: entry.channel_url.clone(),
                        index: Some(idx + 1),
                        music_info: full
                            .description
                            .as_deref()
                            .and_then(metadata::music_info_from_description),
                        description: full.description.clone(),
                        duration: full.duration,
                    };
                    self.insert_video(&channel.id, &playlist.id, video)?;
                }
            }
        }
        Ok(())
    }

    /// Pass 2: channel videos tabs into the loose-videos pseudo-playlist.
    async fn add_channel_videos(&mut self, buckets: &CategoryBuckets) -> Result<()> {
        let tab_urls = &buckets.channel_videos;
        for (i, tab_url) in tab_urls.iter().enumerate() {
            tracing::info!(
                "RETRIEVING INFO: channel {}/{} {:?}",
                i + 1,
                tab_urls.len(),
                tab_url
            );
            let info = self.provider.extract_flat(tab_url).await?;

            let channel = self.override_channel_identity().unwrap_or_else(|| NodeIdentity {
                id: info.channel_id.clone().unwrap_or_default(),
                title: info.channel.clone().unwrap_or_default(),
                url: info.channel_url.clone().unwrap_or_default(),
            });
            let playlist = self.loose_playlist_identity();

            self.ensure_channel(&channel, info.description.clone())?;
            self.ensure_playlist(&channel.id, &playlist, PlaylistKind::VideosLoose, None)?;

            let entry_count = info.entries.len();
            for (idx, entry) in info.entries.iter().enumerate() {
                let Some(video_id) = entry.id.clone() else {
                    continue;
                };
                let Some(entry_url) = entry.resolved_url() else {
                    continue;
                };
                if self.seen_video_ids.contains(&video_id)
                    || self.playlist_contains(&channel.id, &playlist.id, &video_id)
                {
                    tracing::info!(
                        " SKIPPING SEEN INFO: channel video {}/{} {:?}",
                        idx + 1,
                        entry_count,
                        entry_url
                    );
                    continue;
                }

                tracing::info!(
                    " RETRIEVING INFO: channel video {}/{} {:?}",
                    idx + 1,
                    entry_count,
                    entry_url
                );
                let full = match self.provider.extract_full(&entry_url).await {
                    Ok(full) => full,
                    Err(err) if err.is_per_item() => {
                        tracing::warn!("skipping video {:?}: {}", entry_url, err);
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                };

                let video = Video {
                    id: video_id.clone(),
                    title: entry.title.clone().unwrap_or_default(),
                    url: entry_url,
                    upload_date: full.upload_date.as_deref().map(hyphenate_date),
                    uploader: (!channel.url.is_empty()).then(|| channel.url.clone()),
                    index: None,
                    music_info: None,
                    description: full.description.clone(),
                    duration: full.duration,
                };
                self.insert_video(&channel.id, &playlist.id, video)?;
            }
        }
        Ok(())
    }

    /// Pass 3: standalone video references not seen in earlier passes.
    async fn add_standalone_videos(&mut self, buckets: &CategoryBuckets) -> Result<()> {
        let video_urls = &buckets.video;
        for (i, video_url) in video_urls.iter().enumerate() {
            let video_id = classify(video_url).id.unwrap_or_default();
            if self.seen_video_ids.contains(&video_id) {
                tracing::info!(
                    "SKIPPING SEEN INFO: video {}/{} {:?}",
                    i + 1,
                    video_urls.len(),
                    video_url
                );
                continue;
            }

            tracing::info!(
                "RETRIEVING INFO: video {}/{} {:?}",
                i + 1,
                video_urls.len(),
                video_url
            );
            let info = match self.provider.extract_full(video_url).await {
                Ok(info) => info,
                Err(err) if err.is_per_item() => {
                    tracing::warn!("skipping video {:?}: {}", video_url, err);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let channel = self.override_channel_identity().unwrap_or_else(|| NodeIdentity {
                id: info.channel_id.clone().unwrap_or_default(),
                title: info.channel.clone().unwrap_or_default(),
                url: info.channel_url.clone().unwrap_or_default(),
            });
            let playlist = self.loose_playlist_identity();

            self.ensure_channel(&channel, None)?;
            self.ensure_playlist(&channel.id, &playlist, PlaylistKind::VideosLoose, None)?;

            let video = Video {
                id: video_id.clone(),
                title: info.title.clone().unwrap_or_default(),
                url: info
                    .webpage_url
                    .clone()
                    .unwrap_or_else(|| video_url.clone()),
                upload_date: info.upload_date.as_deref().map(hyphenate_date),
                uploader: info.uploader_url.clone(),
                index: None,
                music_info: None,
                description: info.description.clone(),
                duration: info.duration,
            };
            self.insert_video(&channel.id, &playlist.id, video)?;
        }
        Ok(())
    }

    /// Channel identity for a playlist, in override precedence order, then
    /// hints learned from tab resolution, then the playlist's own metadata
    /// (falling back to its first entry).
    fn playlist_channel_identity(&self, playlist_url: &str, info: &InfoRecord) -> NodeIdentity {
        if let Some(identity) = self.override_channel_identity() {
            return identity;
        }
        if let Some(channel_id) = self.hints.channel_id_for(playlist_url) {
            return NodeIdentity {
                id: channel_id.clone(),
                title: self.hints.title_for(channel_id).cloned().unwrap_or_default(),
                url: format!("https://www.youtube.com/channel/{}", channel_id),
            };
        }
        let first = info.entries.first();
        let id = info
            .channel_id
            .clone()
            .or_else(|| first.and_then(|entry| entry.channel_id.clone()))
            .unwrap_or_default();
        let title = info
            .channel
            .clone()
            .or_else(|| first.and_then(|entry| entry.channel.clone()))
            .unwrap_or_default();
        let url = info
            .channel_url
            .clone()
            .unwrap_or_else(|| format!("https://www.youtube.com/channel/{}", id));
        NodeIdentity { id, title, url }
    }

    /// The identity forced by build options, if any.
    fn override_channel_identity(&self) -> Option<NodeIdentity> {
        if self.options.no_channels {
            return Some(NodeIdentity::default());
        }
        if let Some(albumartist) = &self.options.albumartist_override {
            return Some(NodeIdentity {
                id: albumartist.clone(),
                title: albumartist.clone(),
                url: String::new(),
            });
        }
        if self.options.album_override.is_some() {
            return Some(NodeIdentity {
                id: ALBUM_OVERRIDE_CHANNEL_ID.to_string(),
                title: ALBUM_OVERRIDE_CHANNEL_TITLE.to_string(),
                url: String::new(),
            });
        }
        None
    }

    /// Identity of the loose-videos pseudo-playlist (or the forced album).
    fn loose_playlist_identity(&self) -> NodeIdentity {
        match &self.options.album_override {
            Some(album) => NodeIdentity {
                id: album.clone(),
                title: album.clone(),
                url: String::new(),
            },
            None => NodeIdentity::default(),
        }
    }

    fn playlist_contains(&self, channel_id: &str, playlist_id: &str, video_id: &str) -> bool {
        self.catalog
            .channels
            .get(channel_id)
            .and_then(|channel| channel.entries.get(playlist_id))
            .map(|playlist| playlist.entries.contains_key(video_id))
            .unwrap_or(false)
    }

    fn ensure_channel(&mut self, identity: &NodeIdentity, description: Option<String>) -> Result<()> {
        if !self.catalog.channels.contains_key(&identity.id) {
            self.catalog.channels.insert(
                identity.id.clone(),
                Channel {
                    id: identity.id.clone(),
                    title: identity.title.clone(),
                    url: identity.url.clone(),
                    description,
                    entries: BTreeMap::new(),
                },
            );
            self.persist()?;
        }
        Ok(())
    }

    fn ensure_playlist(
        &mut self,
        channel_id: &str,
        identity: &NodeIdentity,
        kind: PlaylistKind,
        description: Option<String>,
    ) -> Result<()> {
        let Some(channel) = self.catalog.channels.get_mut(channel_id) else {
            return Err(Error::other(format!(
                "channel {:?} missing from catalog",
                channel_id
            )));
        };
        if !channel.entries.contains_key(&identity.id) {
            channel.entries.insert(
                identity.id.clone(),
                Playlist {
                    id: identity.id.clone(),
                    kind,
                    title: identity.title.clone(),
                    url: identity.url.clone(),
                    music_info: None,
                    description,
                    entries: BTreeMap::new(),
                },
            );
            self.persist()?;
        }
        Ok(())
    }

    fn insert_video(&mut self, channel_id: &str, playlist_id: &str, video: Video) -> Result<()> {
        let Some(playlist) = self
            .catalog
            .channels
            .get_mut(channel_id)
            .and_then(|channel| channel.entries.get_mut(playlist_id))
        else {
            return Err(Error::other(format!(
                "playlist {:?} missing from channel {:?}",
                playlist_id, channel_id
            )));
        };
        let video_id = video.id.clone();
        playlist.entries.insert(video_id.clone(), video);
        self.persist()?;
        self.seen_video_ids.insert(video_id);
        Ok(())
    }

    /// Adopt an existing snapshot and rebuild the seen-id set from it.
    fn load_snapshot(&mut self) -> Result<()> {
        let Some(path) = &self.options.snapshot_path else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        let loaded: Catalog = storage::load_json(path)
            .map_err(|err| Error::InvalidCatalogFile(format!("{}: {}", path.display(), err)))?;
        if loaded.channels.is_empty() {
            return Ok(());
        }
        self.seen_video_ids = loaded.video_ids();
        tracing::info!(
            "resuming from snapshot {} ({} videos already recorded)",
            path.display(),
            self.seen_video_ids.len()
        );
        self.catalog = loaded;
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        if let Some(path) = &self.options.snapshot_path {
            storage::save_json(path, &self.catalog)?;
        }
        Ok(())
    }
}

/// Derive a human-readable title for a reference, used to name the default
/// snapshot file when a run has a single input URL.
pub async fn derive_title(provider: &dyn InfoProvider, url: &str) -> Result<String> {
    let parsed = classify(url);
    let info = provider.extract_flat(url).await?;
    let channel_name = match &info.id {
        Some(id) if id.starts_with('@') => id.clone(),
        _ => info.channel.clone().unwrap_or_default(),
    };
    let item_title = info.title.clone().unwrap_or_default();
    let channel_name = storage::restrict_filename(&channel_name);
    let item_title = storage::restrict_filename(&item_title);

    let title = match parsed.category {
        Some(UrlCategory::Channel) => channel_name,
        Some(UrlCategory::Playlist) | Some(UrlCategory::Video) => {
            format!("{} {}", channel_name, item_title)
        }
        _ => item_title,
    };
    Ok(title.trim().to_string())
}
