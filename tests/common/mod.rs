//! Shared test fixtures: a scripted info provider and record builders.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use yt_archiver::services::ytdlp::{FlatEntry, InfoProvider, InfoRecord, ProviderError};

/// Info provider answering from canned records instead of the network.
///
/// Unscripted URLs fail with a per-item download error, which doubles as the
/// "tab absent" answer for channel releases probes. Every lookup is recorded
/// so tests can assert what was (not) fetched.
#[derive(Default)]
pub struct ScriptedProvider {
    flat: HashMap<String, InfoRecord>,
    full: HashMap<String, InfoRecord>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flat(mut self, url: &str, record: InfoRecord) -> Self {
        self.flat.insert(url.to_string(), record);
        self
    }

    pub fn with_full(mut self, url: &str, record: InfoRecord) -> Self {
        self.full.insert(url.to_string(), record);
        self
    }

    /// Every `extract_full` URL looked up so far.
    pub fn full_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| call.strip_prefix("full ").map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl InfoProvider for ScriptedProvider {
    async fn extract_flat(&self, url: &str) -> Result<InfoRecord, ProviderError> {
        self.calls.lock().unwrap().push(format!("flat {}", url));
        self.flat
            .get(url)
            .cloned()
            .ok_or_else(|| ProviderError::Download {
                url: url.to_string(),
                message: "not scripted".to_string(),
            })
    }

    async fn extract_full(&self, url: &str) -> Result<InfoRecord, ProviderError> {
        self.calls.lock().unwrap().push(format!("full {}", url));
        self.full
            .get(url)
            .cloned()
            .ok_or_else(|| ProviderError::Download {
                url: url.to_string(),
                message: "not scripted".to_string(),
            })
    }
}

/// Canonical watch URL for a video id.
pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

/// Canonical playlist URL for a playlist id.
pub fn playlist_url(id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={}", id)
}

/// Flat child entry referring to a video.
pub fn video_entry(id: &str) -> FlatEntry {
    FlatEntry {
        id: Some(id.to_string()),
        url: Some(watch_url(id)),
        title: Some(format!("Video {}", id)),
        ..Default::default()
    }
}

/// Flat child entry referring to a playlist.
pub fn playlist_entry(id: &str) -> FlatEntry {
    FlatEntry {
        id: Some(id.to_string()),
        url: Some(playlist_url(id)),
        title: Some(format!("Playlist {}", id)),
        ..Default::default()
    }
}

/// Flat record for a collection page (playlist, tab, group).
pub fn collection_record(id: &str, title: &str, entries: Vec<FlatEntry>) -> InfoRecord {
    InfoRecord {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        entries,
        ..Default::default()
    }
}

/// Full record for a single video.
pub fn full_video_record(id: &str) -> InfoRecord {
    InfoRecord {
        id: Some(id.to_string()),
        title: Some(format!("Video {}", id)),
        webpage_url: Some(watch_url(id)),
        channel_id: Some("chan-id".to_string()),
        channel: Some("Chan".to_string()),
        channel_url: Some("https://www.youtube.com/channel/chan-id".to_string()),
        uploader_url: Some("https://www.youtube.com/channel/chan-id".to_string()),
        description: Some(format!("description of {}", id)),
        duration: Some(180.0),
        upload_date: Some("20240102".to_string()),
        ..Default::default()
    }
}
