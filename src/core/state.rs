//! Download-state archive: per-(format, video, playlist) outcome records
//! consumed by the download driver to decide skip/retry/placeholder
//! behavior.

use crate::models::archive::{ArchiveDocument, DownloadState, PlaylistContext, VideoRecord};
use crate::models::catalog::Video;
use crate::storage;
use crate::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Identifier compatible with the downloader's own archive file lines.
pub fn legacy_archive_id(id: &str, tab: bool) -> String {
    if tab {
        format!("youtubetab {}", id)
    } else {
        format!("youtube {}", id)
    }
}

/// Handle to one on-disk archive document.
///
/// The document is re-read on every query and rewritten on every update:
/// states are classifications computed fresh, not cached. Access is
/// single-process and sequential; concurrent writers are unsupported.
#[derive(Debug, Clone)]
pub struct DownloadArchive {
    path: PathBuf,
}

impl DownloadArchive {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// A missing archive file is an empty store; it is created lazily so
    /// later writes and external inspection find a well-formed document.
    fn load_or_create(&self) -> Result<ArchiveDocument> {
        if !self.path.exists() {
            storage::save_json(&self.path, &ArchiveDocument::default())?;
            return Ok(ArchiveDocument::default());
        }
        storage::load_json(&self.path)
    }

    /// Classify the download state of a video under one playlist and output
    /// format.
    pub fn get_state(
        &self,
        output_format: &str,
        video_id: &str,
        playlist_id: &str,
    ) -> Result<DownloadState> {
        let document = self.load_or_create()?;
        let Some(record) = document
            .get(output_format)
            .and_then(|videos| videos.get(video_id))
        else {
            return Ok(DownloadState::NeverDownloaded);
        };
        match record.in_playlists.get(playlist_id) {
            Some(playlist_record) => Ok(playlist_record.download_state),
            // recorded under some other playlist only
            None => Ok(DownloadState::DuplicateNotDownloaded),
        }
    }

    /// Record the outcome of a download attempt.
    ///
    /// The first attempt for a (format, video) pair creates the record;
    /// later attempts under other playlists extend it in place. Records are
    /// never deleted.
    pub fn set_state(
        &self,
        output_format: &str,
        video: &Video,
        context: &PlaylistContext,
        state: DownloadState,
    ) -> Result<()> {
        let mut document = self.load_or_create()?;
        let videos = document.entry(output_format.to_string()).or_default();
        match videos.get_mut(&video.id) {
            Some(record) => {
                record
                    .in_playlists
                    .insert(context.playlist_id.clone(), context.with_state(state));
            }
            None => {
                let mut in_playlists = BTreeMap::new();
                in_playlists.insert(context.playlist_id.clone(), context.with_state(state));
                videos.insert(
                    video.id.clone(),
                    VideoRecord {
                        id: video.id.clone(),
                        title: video.title.clone(),
                        url: video.url.clone(),
                        in_playlists,
                        legacy_archive_id: legacy_archive_id(&video.id, false),
                    },
                );
            }
        }
        storage::save_json(&self.path, &document)?;
        tracing::debug!(
            "recorded {} for video {:?} in playlist {:?} ({})",
            state,
            video.id,
            context.playlist_id,
            output_format
        );
        Ok(())
    }
}
