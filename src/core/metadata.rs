//! Music metadata extraction and playlist-level back-fill.

use crate::models::catalog::{Catalog, MusicInfo, Playlist, Video};
use regex::Regex;
use std::sync::OnceLock;

/// Normalize a platform `YYYYMMDD` date to `YYYY-MM-DD`. Anything else is
/// passed through unchanged.
pub fn hyphenate_date(date: &str) -> String {
    if date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &date[..4], &date[4..6], &date[6..8])
    } else {
        date.to_string()
    }
}

fn music_description_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // YouTube Music auto-generated description layout:
        // "<track> · <artist> [· <artist>...]", blank line, "<album>", then
        // optional ℗ year, "Released on:" date and "Artist:" lines, ending
        // with "Auto-generated by YouTube."
        Regex::new(
            r"(?xs)
                (?P<track>[^·\n]+)·(?P<artist>[^\n]+)\n+
                (?P<album>[^\n]+)
                (?:.+?℗\s*(?P<release_year>\d{4})\b)?
                (?:.+?Released\ on\s*:\s*(?P<release_date>\d{4}-\d{2}-\d{2}))?
                (?:.+?\nArtist\s*:\s*(?P<clean_artist>[^\n]+))?
                .+\nAuto-generated\ by\ YouTube\.\s*$
            ",
        )
        .expect("music description pattern is valid")
    })
}

/// Parse music metadata out of an auto-generated video description.
///
/// Returns `None` for descriptions that do not follow the auto-generated
/// layout (hand-written descriptions, non-music videos).
pub fn music_info_from_description(description: &str) -> Option<MusicInfo> {
    let caps = music_description_regex().captures(description)?;

    let release_date = caps.name("release_date").map(|m| m.as_str().to_string());
    let release_year = caps
        .name("release_year")
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .or_else(|| {
            release_date
                .as_deref()
                .and_then(|date| date[..4].parse::<i32>().ok())
        });

    let artists = if let Some(clean) = caps.name("clean_artist") {
        vec![clean.as_str().trim().to_string()]
    } else {
        caps["artist"]
            .split('·')
            .map(|artist| artist.trim().to_string())
            .filter(|artist| !artist.is_empty())
            .collect()
    };

    Some(MusicInfo {
        album: Some(caps["album"].trim().to_string()),
        artists: Some(artists),
        track: Some(caps["track"].trim().to_string()),
        release_date,
        release_year,
    })
}

/// Back-fill `album` and `release_year` across every playlist so all videos
/// in one playlist agree; per-video values are intentionally overwritten.
pub fn fill_metadata(catalog: &mut Catalog) {
    for channel in catalog.channels.values_mut() {
        for playlist in channel.entries.values_mut() {
            backfill_album(playlist);
            backfill_release_year(playlist);
        }
    }
}

/// Most frequent value wins; among equally frequent values the first
/// encountered wins. Returns the winner plus the distinct candidates in
/// encounter order.
fn most_common<T: PartialEq + Clone>(values: &[T]) -> Option<(T, Vec<T>)> {
    let mut distinct: Vec<(T, usize)> = Vec::new();
    for value in values {
        match distinct.iter_mut().find(|(seen, _)| seen == value) {
            Some((_, count)) => *count += 1,
            None => distinct.push((value.clone(), 1)),
        }
    }
    // strictly-greater comparison keeps the first-encountered value on ties
    let mut winner: Option<(T, usize)> = None;
    for (value, count) in &distinct {
        if winner.as_ref().map_or(true, |(_, best)| *count > *best) {
            winner = Some((value.clone(), *count));
        }
    }
    let winner = winner.map(|(value, _)| value)?;
    Some((winner, distinct.into_iter().map(|(value, _)| value).collect()))
}

/// Per-video field values in playlist encounter order (ordinal index first,
/// unindexed videos after, then id for stability).
fn values_in_order<T, F>(playlist: &Playlist, get: F) -> Vec<T>
where
    F: Fn(&MusicInfo) -> Option<T>,
{
    let mut videos: Vec<&Video> = playlist.entries.values().collect();
    videos.sort_by(|a, b| {
        (a.index.unwrap_or(usize::MAX), &a.id).cmp(&(b.index.unwrap_or(usize::MAX), &b.id))
    });
    videos
        .into_iter()
        .filter_map(|video| video.music_info.as_ref().and_then(&get))
        .collect()
}

fn backfill_album(playlist: &mut Playlist) {
    let values = values_in_order(playlist, |music| music.album.clone());
    let resolved = match most_common(&values) {
        Some((value, candidates)) => {
            if candidates.len() > 1 {
                tracing::warn!(
                    "conflicting album values {:?} in playlist {:?}; choosing most common: {:?}",
                    candidates,
                    playlist.title,
                    value
                );
            }
            value
        }
        None if !playlist.title.is_empty() => playlist.title.clone(),
        None => return,
    };
    for video in playlist.entries.values_mut() {
        video.music_info.get_or_insert_with(MusicInfo::default).album = Some(resolved.clone());
    }
    playlist
        .music_info
        .get_or_insert_with(MusicInfo::default)
        .album = Some(resolved);
}

fn backfill_release_year(playlist: &mut Playlist) {
    let values = values_in_order(playlist, |music| music.release_year);
    let resolved = match most_common(&values) {
        Some((value, candidates)) => {
            if candidates.len() > 1 {
                tracing::warn!(
                    "conflicting release_year values {:?} in playlist {:?}; choosing most common: {}",
                    candidates,
                    playlist.title,
                    value
                );
            }
            value
        }
        None => return,
    };
    for video in playlist.entries.values_mut() {
        video
            .music_info
            .get_or_insert_with(MusicInfo::default)
            .release_year = Some(resolved);
    }
    playlist
        .music_info
        .get_or_insert_with(MusicInfo::default)
        .release_year = Some(resolved);
}
