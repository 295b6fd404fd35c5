//! Catalog data structures: the channel -> playlist -> video ownership tree.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// The whole catalog, keyed by channel id.
///
/// Serialized transparently: the snapshot document root is the channel map
/// itself, so snapshots stay human-inspectable and diffable. The empty-string
/// channel id is a legal node representing the "no channel" bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub channels: BTreeMap<String, Channel>,
}

/// A channel node. Exclusively owns its playlists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// Platform channel id, or empty string for the "no channel" bucket.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Canonical channel URL.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Playlists keyed by playlist id.
    #[serde(default)]
    pub entries: BTreeMap<String, Playlist>,
}

/// Variant tag for a playlist node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistKind {
    /// Ordinary user-curated playlist.
    Playlist,
    /// Album-like release collection.
    Release,
    /// Synthetic bucket for videos not in any real playlist.
    VideosLoose,
}

impl std::fmt::Display for PlaylistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlaylistKind::Playlist => "playlist",
            PlaylistKind::Release => "release",
            PlaylistKind::VideosLoose => "videos_loose",
        };
        write!(f, "{}", name)
    }
}

/// A playlist node. Exclusively owns its videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    /// Platform playlist id, or empty string for the loose-videos
    /// pseudo-playlist.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PlaylistKind,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_info: Option<MusicInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Videos keyed by video id.
    #[serde(default)]
    pub entries: BTreeMap<String, Video>,
}

/// A video node.
///
/// The same video id may appear in several playlists across the catalog;
/// each appearance is a distinct node owned by exactly one playlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    /// Canonical watch URL.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    /// Uploader channel reference URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
    /// 1-based ordinal within the owning playlist, where meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_info: Option<MusicInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Music metadata parsed from auto-generated descriptions or release pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artists: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
}

impl MusicInfo {
    pub fn is_empty(&self) -> bool {
        self.album.is_none()
            && self.artists.is_none()
            && self.track.is_none()
            && self.release_date.is_none()
            && self.release_year.is_none()
    }
}

impl Catalog {
    /// Collect every video id present anywhere in the catalog.
    ///
    /// Used to rebuild the seen-id set when resuming from a snapshot.
    pub fn video_ids(&self) -> HashSet<String> {
        let mut ids = HashSet::new();
        for channel in self.channels.values() {
            for playlist in channel.entries.values() {
                for video in playlist.entries.values() {
                    ids.insert(video.id.clone());
                }
            }
        }
        ids
    }

    /// Total number of video nodes (counting cross-playlist duplicates).
    pub fn video_count(&self) -> usize {
        self.channels
            .values()
            .flat_map(|c| c.entries.values())
            .map(|p| p.entries.len())
            .sum()
    }

    /// Total number of playlist nodes.
    pub fn playlist_count(&self) -> usize {
        self.channels.values().map(|c| c.entries.len()).sum()
    }

    /// Re-key loose pseudo-playlists (empty id, non-empty title) by their
    /// sanitized title, so snapshots from different runs can be merged
    /// without their loose buckets colliding on the empty key.
    pub fn rekey_loose_playlists<F>(&mut self, sanitize: F)
    where
        F: Fn(&str) -> String,
    {
        for channel in self.channels.values_mut() {
            let needs_rekey = channel
                .entries
                .get("")
                .is_some_and(|playlist| !playlist.title.is_empty());
            if !needs_rekey {
                continue;
            }
            if let Some(mut playlist) = channel.entries.remove("") {
                let new_id = sanitize(&playlist.title);
                playlist.id = new_id.clone();
                channel.entries.insert(new_id, playlist);
            }
        }
    }

    /// Merge another catalog into this one.
    ///
    /// Channels, playlists and videos already present keep their existing
    /// values; maps are merged recursively.
    pub fn merge(&mut self, other: Catalog) {
        for (channel_id, other_channel) in other.channels {
            let channel = self
                .channels
                .entry(channel_id)
                .or_insert_with(|| Channel {
                    id: other_channel.id.clone(),
                    title: other_channel.title.clone(),
                    url: other_channel.url.clone(),
                    description: other_channel.description.clone(),
                    entries: BTreeMap::new(),
                });
            for (playlist_id, other_playlist) in other_channel.entries {
                let playlist = channel
                    .entries
                    .entry(playlist_id)
                    .or_insert_with(|| Playlist {
                        id: other_playlist.id.clone(),
                        kind: other_playlist.kind,
                        title: other_playlist.title.clone(),
                        url: other_playlist.url.clone(),
                        music_info: other_playlist.music_info.clone(),
                        description: other_playlist.description.clone(),
                        entries: BTreeMap::new(),
                    });
                for (video_id, other_video) in other_playlist.entries {
                    playlist.entries.entry(video_id).or_insert(other_video);
                }
            }
        }
    }
}
