//! URL classification models.

use serde::{Deserialize, Serialize};

/// Semantic category of a recognized YouTube URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlCategory {
    /// Album-like curated collection, distinguished from an ordinary playlist.
    /// Never matched directly; produced by resolving a channel's releases tab.
    Release,
    /// Channel home page.
    Channel,
    /// A channel's releases tab.
    ChannelReleases,
    /// A channel's playlists tab.
    ChannelPlaylists,
    /// A channel's videos tab.
    ChannelVideos,
    /// Single playlist page.
    Playlist,
    /// Single video (watch page or short link).
    Video,
}

impl std::fmt::Display for UrlCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UrlCategory::Release => "release",
            UrlCategory::Channel => "channel",
            UrlCategory::ChannelReleases => "channel_releases",
            UrlCategory::ChannelPlaylists => "channel_playlists",
            UrlCategory::ChannelVideos => "channel_videos",
            UrlCategory::Playlist => "playlist",
            UrlCategory::Video => "video",
        };
        write!(f, "{}", name)
    }
}

/// Playlist-like categories in catalog pass order: releases are added to the
/// catalog before ordinary playlists.
pub const PLAYLIST_CATEGORIES: [UrlCategory; 2] = [UrlCategory::Release, UrlCategory::Playlist];

/// Result of classifying a raw URL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Matched category, or `None` when the URL shape is not recognized.
    pub category: Option<UrlCategory>,
    /// Normalized form used as the deduplication key. Equal to the input
    /// when the URL was not recognized.
    pub canonical_url: String,
    /// Extracted platform identifier (video id, playlist id, channel handle).
    pub id: Option<String>,
}

/// Per-category URL buckets produced by partitioning.
///
/// Every bucket is always present; each keeps input order and is free of
/// duplicates (including surface variants that canonicalize identically).
#[derive(Debug, Clone, Default)]
pub struct CategoryBuckets {
    pub release: Vec<String>,
    pub channel: Vec<String>,
    pub channel_releases: Vec<String>,
    pub channel_playlists: Vec<String>,
    pub channel_videos: Vec<String>,
    pub playlist: Vec<String>,
    pub video: Vec<String>,
}

impl CategoryBuckets {
    /// Borrow the bucket for a category.
    pub fn bucket(&self, category: UrlCategory) -> &Vec<String> {
        match category {
            UrlCategory::Release => &self.release,
            UrlCategory::Channel => &self.channel,
            UrlCategory::ChannelReleases => &self.channel_releases,
            UrlCategory::ChannelPlaylists => &self.channel_playlists,
            UrlCategory::ChannelVideos => &self.channel_videos,
            UrlCategory::Playlist => &self.playlist,
            UrlCategory::Video => &self.video,
        }
    }

    /// Mutably borrow the bucket for a category.
    pub fn bucket_mut(&mut self, category: UrlCategory) -> &mut Vec<String> {
        match category {
            UrlCategory::Release => &mut self.release,
            UrlCategory::Channel => &mut self.channel,
            UrlCategory::ChannelReleases => &mut self.channel_releases,
            UrlCategory::ChannelPlaylists => &mut self.channel_playlists,
            UrlCategory::ChannelVideos => &mut self.channel_videos,
            UrlCategory::Playlist => &mut self.playlist,
            UrlCategory::Video => &mut self.video,
        }
    }

    /// Total number of URLs across all buckets.
    pub fn len(&self) -> usize {
        self.release.len()
            + self.channel.len()
            + self.channel_releases.len()
            + self.channel_playlists.len()
            + self.channel_videos.len()
            + self.playlist.len()
            + self.video.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
