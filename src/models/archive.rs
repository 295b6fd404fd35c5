//! Download-state archive records.

use crate::models::catalog::PlaylistKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome classification for one (video, playlist, format) key.
///
/// This is a closed set; the state store and its consumers match on it
/// exhaustively, so states must not be added ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadState {
    /// No record exists for this (video, format) pair.
    NeverDownloaded,
    /// This (video, playlist) pair's prior attempt succeeded and was not a
    /// cross-playlist duplicate.
    OriginalDownloaded,
    /// Succeeded, recorded as a duplicate of a download under another
    /// playlist.
    DuplicateDownloaded,
    /// The video has a record under a different playlist but none under
    /// this one.
    DuplicateNotDownloaded,
    /// A placeholder marker was created in lieu of duplicating the media
    /// file.
    Placeholder,
    /// The most recent attempt failed.
    DownloadFailed,
}

impl std::fmt::Display for DownloadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DownloadState::NeverDownloaded => "never_downloaded",
            DownloadState::OriginalDownloaded => "original_downloaded",
            DownloadState::DuplicateDownloaded => "duplicate_downloaded",
            DownloadState::DuplicateNotDownloaded => "duplicate_not_downloaded",
            DownloadState::Placeholder => "placeholder",
            DownloadState::DownloadFailed => "download_failed",
        };
        write!(f, "{}", name)
    }
}

/// Channel/playlist context under which a video was encountered.
///
/// Passed into the state store on every query and update; persisted (with
/// the state) per playlist the video appears in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistContext {
    pub channel_id: String,
    pub channel_title: String,
    pub playlist_id: String,
    pub playlist_title: String,
    pub playlist_type: PlaylistKind,
}

impl PlaylistContext {
    pub fn with_state(&self, download_state: DownloadState) -> PlaylistRecord {
        PlaylistRecord {
            channel_id: self.channel_id.clone(),
            channel_title: self.channel_title.clone(),
            playlist_id: self.playlist_id.clone(),
            playlist_title: self.playlist_title.clone(),
            playlist_type: self.playlist_type,
            download_state,
        }
    }
}

/// Per-playlist slice of a video's archive record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub channel_id: String,
    pub channel_title: String,
    pub playlist_id: String,
    pub playlist_title: String,
    pub playlist_type: PlaylistKind,
    pub download_state: DownloadState,
}

/// Archive record for one video under one output format.
///
/// Created on the first download attempt, updated in place as the video is
/// encountered in further playlists, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    pub in_playlists: BTreeMap<String, PlaylistRecord>,
    /// Identifier compatible with the downloader's own archive file format.
    pub legacy_archive_id: String,
}

/// The archive document: output format -> video id -> record.
pub type ArchiveDocument = BTreeMap<String, BTreeMap<String, VideoRecord>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_state_serializes_to_snake_case() {
        let json = serde_json::to_string(&DownloadState::DuplicateNotDownloaded).unwrap();
        assert_eq!(json, "\"duplicate_not_downloaded\"");
        let json = serde_json::to_string(&DownloadState::Placeholder).unwrap();
        assert_eq!(json, "\"placeholder\"");
    }

    #[test]
    fn test_download_state_round_trips() {
        for state in [
            DownloadState::NeverDownloaded,
            DownloadState::OriginalDownloaded,
            DownloadState::DuplicateDownloaded,
            DownloadState::DuplicateNotDownloaded,
            DownloadState::Placeholder,
            DownloadState::DownloadFailed,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            let back: DownloadState = serde_json::from_str(&json).unwrap();
            assert_eq!(back, state);
        }
    }
}
