//! Integration tests for URL classification and partitioning.
//!
//! Tests cover:
//! - Surface-form equivalence of video URLs
//! - Round-trip stability of canonical forms
//! - Partition bucket completeness and exclusivity

use yt_archiver::core::classifier::{classify, partition};
use yt_archiver::models::url::UrlCategory;

#[test]
fn test_video_surface_forms_classify_identically() {
    let surface_forms = [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ?si=AbC-123",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ/",
    ];
    let reference = classify(surface_forms[0]);
    assert_eq!(reference.category, Some(UrlCategory::Video));

    for url in surface_forms {
        let parsed = classify(url);
        assert_eq!(parsed.category, reference.category, "{url}");
        assert_eq!(parsed.canonical_url, reference.canonical_url, "{url}");
        assert_eq!(parsed.id, reference.id, "{url}");
    }
}

#[test]
fn test_classify_canonical_forms_are_stable() {
    let inputs = [
        "https://www.youtube.com/watch?v=abc_123",
        "https://www.youtube.com/playlist?list=PLxyz",
        "https://www.youtube.com/@someone",
        "https://www.youtube.com/c/someone/playlists?view=71&sort=dd",
        "https://www.youtube.com/channel/UCabc/videos",
        "https://www.youtube.com/@someone/releases?view=2",
    ];
    for url in inputs {
        let once = classify(url);
        assert!(once.category.is_some(), "{url} should be recognized");
        let twice = classify(&once.canonical_url);
        assert_eq!(twice.category, once.category, "{url}");
        assert_eq!(twice.canonical_url, once.canonical_url, "{url}");
        assert_eq!(twice.id, once.id, "{url}");
    }
}

#[test]
fn test_partition_never_drops_or_double_buckets() {
    let urls = vec![
        "https://www.youtube.com/@someone".to_string(),
        "https://www.youtube.com/@someone/videos".to_string(),
        "https://www.youtube.com/playlist?list=PL1".to_string(),
        "https://www.youtube.com/watch?v=vid01".to_string(),
        "https://example.com/not-youtube".to_string(),
    ];
    let buckets = partition(&urls);

    // four recognized URLs, each in exactly one bucket
    assert_eq!(buckets.len(), 4);
    assert_eq!(buckets.channel, vec!["https://www.youtube.com/@someone"]);
    assert_eq!(
        buckets.channel_videos,
        vec!["https://www.youtube.com/@someone/videos"]
    );
    assert_eq!(
        buckets.playlist,
        vec!["https://www.youtube.com/playlist?list=PL1"]
    );
    assert_eq!(buckets.video, vec!["https://www.youtube.com/watch?v=vid01"]);

    // the unknown URL is in no bucket
    assert!(buckets.release.is_empty());
    assert!(buckets.channel_releases.is_empty());
    assert!(buckets.channel_playlists.is_empty());
}

#[test]
fn test_partition_collapses_surface_variants() {
    let urls = vec![
        "https://youtu.be/vid01".to_string(),
        "https://www.youtube.com/watch?v=vid01".to_string(),
        "https://www.youtube.com/watch?v=vid01&feature=share".to_string(),
    ];
    let buckets = partition(&urls);
    assert_eq!(buckets.video, vec!["https://www.youtube.com/watch?v=vid01"]);
}
