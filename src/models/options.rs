//! Catalog build options.

use std::path::PathBuf;

/// Channel id used for the synthetic "channel" that collects albums created
/// with an album override.
pub const ALBUM_OVERRIDE_CHANNEL_ID: &str = "_playlists";
/// Display title for that synthetic channel.
pub const ALBUM_OVERRIDE_CHANNEL_TITLE: &str = "Various Artists";

/// Options controlling how the catalog is assembled.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Collapse all channels into the single empty-id "no channel" bucket.
    pub no_channels: bool,
    /// Use this string as channel id and title for every item.
    pub albumartist_override: Option<String>,
    /// Force every playlist into a single album with this id/title, owned
    /// by the synthetic Various Artists channel.
    pub album_override: Option<String>,
    /// Where the catalog snapshot is persisted after every insertion.
    /// `None` disables incremental persistence (and resume).
    pub snapshot_path: Option<PathBuf>,
}
