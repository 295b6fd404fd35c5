//! Integration tests for catalog assembly.
//!
//! Tests cover:
//! - Pass-order deduplication (playlists win over channel videos tabs)
//! - Resume from a persisted snapshot without re-fetching
//! - Channel expansion end to end (tabs, releases priority, learned hints)
//! - Per-video failure tolerance
//! - Metadata back-fill resolution

mod common;

use common::{
    collection_record, full_video_record, playlist_entry, playlist_url, video_entry, watch_url,
    ScriptedProvider,
};
use std::collections::BTreeMap;
use yt_archiver::core::builder::CatalogBuilder;
use yt_archiver::core::metadata::fill_metadata;
use yt_archiver::models::catalog::{
    Catalog, Channel, MusicInfo, Playlist, PlaylistKind, Video,
};
use yt_archiver::models::options::BuildOptions;
use yt_archiver::services::ytdlp::InfoRecord;
use yt_archiver::storage;

const CHANNEL_URL: &str = "https://www.youtube.com/channel/chan-id";

fn channel_record(id: &str, title: &str, entries: Vec<yt_archiver::services::ytdlp::FlatEntry>) -> InfoRecord {
    InfoRecord {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        channel_id: Some("chan-id".to_string()),
        channel: Some("Chan".to_string()),
        channel_url: Some(CHANNEL_URL.to_string()),
        entries,
        ..Default::default()
    }
}

fn playlist_record(id: &str, title: &str, entries: Vec<yt_archiver::services::ytdlp::FlatEntry>) -> InfoRecord {
    let mut record = channel_record(id, title, entries);
    record.webpage_url = Some(playlist_url(id));
    record
}

// ========== PASS-ORDER DEDUPLICATION ==========

#[tokio::test]
async fn test_playlist_pass_wins_over_channel_videos_pass() {
    let provider = ScriptedProvider::new()
        .with_flat(
            &playlist_url("PL1"),
            playlist_record("PL1", "Album One", vec![video_entry("v1"), video_entry("v2")]),
        )
        .with_flat(
            "https://www.youtube.com/@chan/videos",
            channel_record("chan-videos", "Chan - Videos", vec![video_entry("v2"), video_entry("v3")]),
        )
        .with_full(&watch_url("v1"), full_video_record("v1"))
        .with_full(&watch_url("v2"), full_video_record("v2"))
        .with_full(&watch_url("v3"), full_video_record("v3"));

    let urls = vec![
        playlist_url("PL1"),
        "https://www.youtube.com/@chan/videos".to_string(),
    ];
    let catalog = CatalogBuilder::new(&provider, BuildOptions::default())
        .build(&urls)
        .await
        .unwrap();

    let channel = &catalog.channels["chan-id"];
    let playlist = &channel.entries["PL1"];
    assert_eq!(playlist.kind, PlaylistKind::Playlist);
    assert!(playlist.entries.contains_key("v1"));
    assert!(playlist.entries.contains_key("v2"));

    // the shared video stays in the playlist, not the loose bucket
    let loose = &channel.entries[""];
    assert_eq!(loose.kind, PlaylistKind::VideosLoose);
    assert!(!loose.entries.contains_key("v2"));
    assert!(loose.entries.contains_key("v3"));

    let v2_nodes = catalog
        .channels
        .values()
        .flat_map(|c| c.entries.values())
        .filter(|p| p.entries.contains_key("v2"))
        .count();
    assert_eq!(v2_nodes, 1);
}

#[tokio::test]
async fn test_playlist_skips_videos_recorded_in_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot_path = dir.path().join("catalog.json");

    // a previous run's channel-videos pass already recorded v1
    let mut loose_entries = BTreeMap::new();
    loose_entries.insert(
        "v1".to_string(),
        Video {
            id: "v1".to_string(),
            title: "Video v1".to_string(),
            url: watch_url("v1"),
            upload_date: None,
            uploader: None,
            index: None,
            music_info: None,
            description: None,
            duration: None,
        },
    );
    let mut playlists = BTreeMap::new();
    playlists.insert(
        "".to_string(),
        Playlist {
            id: String::new(),
            kind: PlaylistKind::VideosLoose,
            title: String::new(),
            url: String::new(),
            music_info: None,
            description: None,
            entries: loose_entries,
        },
    );
    let mut channels = BTreeMap::new();
    channels.insert(
        "chan-id".to_string(),
        Channel {
            id: "chan-id".to_string(),
            title: "Chan".to_string(),
            url: CHANNEL_URL.to_string(),
            description: None,
            entries: playlists,
        },
    );
    storage::save_json(&snapshot_path, &Catalog { channels }).unwrap();

    let provider = ScriptedProvider::new()
        .with_flat(
            &playlist_url("PL1"),
            playlist_record(
                "PL1",
                "Album One",
                vec![video_entry("v1"), video_entry("v2"), video_entry("v3")],
            ),
        )
        .with_full(&watch_url("v2"), full_video_record("v2"))
        .with_full(&watch_url("v3"), full_video_record("v3"));

    let options = BuildOptions {
        snapshot_path: Some(snapshot_path),
        ..Default::default()
    };
    let catalog = CatalogBuilder::new(&provider, options)
        .build(&[playlist_url("PL1")])
        .await
        .unwrap();

    // the collaborator reported 3 entries, one previously seen: 2 new nodes
    let playlist = &catalog.channels["chan-id"].entries["PL1"];
    assert_eq!(playlist.entries.len(), 2);
    assert!(playlist.entries.contains_key("v2"));
    assert!(playlist.entries.contains_key("v3"));
    assert!(!provider.full_calls().contains(&watch_url("v1")));
}

// ========== RESUME ==========

#[tokio::test]
async fn test_resume_refetches_nothing_and_matches_uninterrupted_run() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot_path = dir.path().join("catalog.json");

    let script = || {
        ScriptedProvider::new()
            .with_flat(
                &playlist_url("PL1"),
                playlist_record("PL1", "Album One", vec![video_entry("v1"), video_entry("v2")]),
            )
            .with_full(&watch_url("v1"), full_video_record("v1"))
            .with_full(&watch_url("v2"), full_video_record("v2"))
    };
    let options = || BuildOptions {
        snapshot_path: Some(snapshot_path.clone()),
        ..Default::default()
    };
    let urls = vec![playlist_url("PL1")];

    let first_provider = script();
    let first = CatalogBuilder::new(&first_provider, options())
        .build(&urls)
        .await
        .unwrap();
    assert_eq!(first_provider.full_calls().len(), 2);

    let second_provider = script();
    let second = CatalogBuilder::new(&second_provider, options())
        .build(&urls)
        .await
        .unwrap();

    assert!(second_provider.full_calls().is_empty());
    assert_eq!(
        serde_json::to_value(&second).unwrap(),
        serde_json::to_value(&first).unwrap()
    );
}

// ========== CHANNEL EXPANSION ==========

#[tokio::test]
async fn test_channel_home_expands_to_tabs_with_learned_attribution() {
    let provider = ScriptedProvider::new()
        // no scripted releases tab: the probe failure means "tab absent"
        .with_flat(
            "https://www.youtube.com/@chan/playlists",
            InfoRecord {
                uploader_id: Some("chan-id".to_string()),
                uploader: Some("Chan".to_string()),
                entries: vec![playlist_entry("PL1")],
                ..Default::default()
            },
        )
        .with_flat(
            "https://www.youtube.com/@chan/videos",
            channel_record("chan-videos", "Chan - Videos", vec![video_entry("v2")]),
        )
        .with_flat(
            &playlist_url("PL1"),
            collection_record("PL1", "Album One", vec![video_entry("v1")]),
        )
        .with_full(&watch_url("v1"), full_video_record("v1"))
        .with_full(&watch_url("v2"), full_video_record("v2"));

    let catalog = CatalogBuilder::new(&provider, BuildOptions::default())
        .build(&["https://www.youtube.com/@chan".to_string()])
        .await
        .unwrap();

    // attribution comes from the tab page, not the (channel-less) playlist
    let channel = &catalog.channels["chan-id"];
    assert_eq!(channel.title, "Chan");
    assert_eq!(channel.url, CHANNEL_URL);
    assert!(channel.entries["PL1"].entries.contains_key("v1"));
    assert!(channel.entries[""].entries.contains_key("v2"));
}

#[tokio::test]
async fn test_releases_are_cataloged_before_playlists() {
    let provider = ScriptedProvider::new()
        .with_flat(
            "https://www.youtube.com/@chan/releases",
            InfoRecord {
                uploader_id: Some("chan-id".to_string()),
                uploader: Some("Chan".to_string()),
                entries: vec![playlist_entry("RL1")],
                ..Default::default()
            },
        )
        .with_flat(
            "https://www.youtube.com/@chan/playlists",
            InfoRecord {
                uploader_id: Some("chan-id".to_string()),
                uploader: Some("Chan".to_string()),
                entries: vec![playlist_entry("PL1")],
                ..Default::default()
            },
        )
        .with_flat(
            "https://www.youtube.com/@chan/videos",
            channel_record("chan-videos", "Chan - Videos", vec![]),
        )
        .with_flat(
            &playlist_url("RL1"),
            playlist_record("RL1", "Release One", vec![video_entry("shared")]),
        )
        .with_flat(
            &playlist_url("PL1"),
            playlist_record("PL1", "Album One", vec![video_entry("v1"), video_entry("shared")]),
        )
        .with_full(&watch_url("v1"), full_video_record("v1"))
        .with_full(&watch_url("shared"), full_video_record("shared"));

    let catalog = CatalogBuilder::new(&provider, BuildOptions::default())
        .build(&["https://www.youtube.com/@chan".to_string()])
        .await
        .unwrap();

    let channel = &catalog.channels["chan-id"];
    let release = &channel.entries["RL1"];
    assert_eq!(release.kind, PlaylistKind::Release);
    assert!(release.entries.contains_key("shared"));

    // the release pass ran first, so the ordinary playlist skips the shared id
    let playlist = &channel.entries["PL1"];
    assert_eq!(playlist.kind, PlaylistKind::Playlist);
    assert!(playlist.entries.contains_key("v1"));
    assert!(!playlist.entries.contains_key("shared"));
}

// ========== FAILURE TOLERANCE ==========

#[tokio::test]
async fn test_single_video_failure_skips_and_continues() {
    // v1 has no scripted full record, so its lookup fails per-item
    let provider = ScriptedProvider::new()
        .with_flat(
            &playlist_url("PL1"),
            playlist_record("PL1", "Album One", vec![video_entry("v1"), video_entry("v2")]),
        )
        .with_full(&watch_url("v2"), full_video_record("v2"));

    let catalog = CatalogBuilder::new(&provider, BuildOptions::default())
        .build(&[playlist_url("PL1")])
        .await
        .unwrap();

    let playlist = &catalog.channels["chan-id"].entries["PL1"];
    assert_eq!(playlist.entries.len(), 1);
    assert!(playlist.entries.contains_key("v2"));
}

// ========== BUILD MODES ==========

#[tokio::test]
async fn test_no_channels_mode_uses_empty_channel_bucket() {
    let provider = ScriptedProvider::new()
        .with_flat(
            &playlist_url("PL1"),
            playlist_record("PL1", "Album One", vec![video_entry("v1")]),
        )
        .with_full(&watch_url("v1"), full_video_record("v1"));

    let options = BuildOptions {
        no_channels: true,
        ..Default::default()
    };
    let catalog = CatalogBuilder::new(&provider, options)
        .build(&[playlist_url("PL1")])
        .await
        .unwrap();

    assert_eq!(catalog.channels.len(), 1);
    let channel = &catalog.channels[""];
    assert_eq!(channel.title, "");
    assert!(channel.entries["PL1"].entries.contains_key("v1"));
}

#[tokio::test]
async fn test_album_override_collects_under_various_artists() {
    let provider = ScriptedProvider::new()
        .with_flat(
            &playlist_url("PL1"),
            playlist_record("PL1", "Album One", vec![video_entry("v1")]),
        )
        .with_full(&watch_url("v1"), full_video_record("v1"));

    let options = BuildOptions {
        album_override: Some("Greatest Hits".to_string()),
        ..Default::default()
    };
    let catalog = CatalogBuilder::new(&provider, options)
        .build(&[playlist_url("PL1")])
        .await
        .unwrap();

    let channel = &catalog.channels["_playlists"];
    assert_eq!(channel.title, "Various Artists");
    let playlist = &channel.entries["Greatest Hits"];
    assert_eq!(playlist.title, "Greatest Hits");
    assert!(playlist.entries.contains_key("v1"));
}

// ========== METADATA BACK-FILL ==========

fn music_video(id: &str, index: usize, album: Option<&str>, year: Option<i32>) -> Video {
    Video {
        id: id.to_string(),
        title: format!("Video {}", id),
        url: watch_url(id),
        upload_date: None,
        uploader: None,
        index: Some(index),
        music_info: album.map(|album| MusicInfo {
            album: Some(album.to_string()),
            release_year: year,
            ..Default::default()
        }),
        description: None,
        duration: None,
    }
}

fn catalog_with_playlist(videos: Vec<Video>) -> Catalog {
    let mut entries = BTreeMap::new();
    for video in videos {
        entries.insert(video.id.clone(), video);
    }
    let playlist = Playlist {
        id: "PL1".to_string(),
        kind: PlaylistKind::Playlist,
        title: "Fallback Title".to_string(),
        url: playlist_url("PL1"),
        music_info: None,
        description: None,
        entries,
    };
    let mut playlists = BTreeMap::new();
    playlists.insert("PL1".to_string(), playlist);
    let mut channels = BTreeMap::new();
    channels.insert(
        "chan-id".to_string(),
        Channel {
            id: "chan-id".to_string(),
            title: "Chan".to_string(),
            url: CHANNEL_URL.to_string(),
            description: None,
            entries: playlists,
        },
    );
    Catalog { channels }
}

#[test]
fn test_backfill_majority_album_wins() {
    let mut catalog = catalog_with_playlist(vec![
        music_video("v1", 1, Some("A"), Some(2001)),
        music_video("v2", 2, Some("A"), Some(2001)),
        music_video("v3", 3, Some("B"), Some(2002)),
    ]);

    fill_metadata(&mut catalog);

    let playlist = &catalog.channels["chan-id"].entries["PL1"];
    let playlist_music = playlist.music_info.as_ref().unwrap();
    assert_eq!(playlist_music.album.as_deref(), Some("A"));
    assert_eq!(playlist_music.release_year, Some(2001));
    for video in playlist.entries.values() {
        let music = video.music_info.as_ref().unwrap();
        assert_eq!(music.album.as_deref(), Some("A"));
        assert_eq!(music.release_year, Some(2001));
    }
}

#[test]
fn test_backfill_album_falls_back_to_playlist_title() {
    let mut catalog = catalog_with_playlist(vec![
        music_video("v1", 1, None, None),
        music_video("v2", 2, None, None),
    ]);

    fill_metadata(&mut catalog);

    let playlist = &catalog.channels["chan-id"].entries["PL1"];
    assert_eq!(
        playlist.music_info.as_ref().unwrap().album.as_deref(),
        Some("Fallback Title")
    );
    for video in playlist.entries.values() {
        assert_eq!(
            video.music_info.as_ref().unwrap().album.as_deref(),
            Some("Fallback Title")
        );
    }
}

#[test]
fn test_backfill_tie_breaks_to_first_encountered() {
    let mut catalog = catalog_with_playlist(vec![
        music_video("v1", 1, Some("B"), None),
        music_video("v2", 2, Some("A"), None),
    ]);

    fill_metadata(&mut catalog);

    let playlist = &catalog.channels["chan-id"].entries["PL1"];
    assert_eq!(
        playlist.music_info.as_ref().unwrap().album.as_deref(),
        Some("B")
    );
}
