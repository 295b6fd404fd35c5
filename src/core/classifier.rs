//! URL classification and partitioning.
//!
//! The supported URL shapes are a fixed, enumerated set for one platform;
//! anything else is reported as unrecognized and excluded, never guessed at.

use crate::models::url::{CategoryBuckets, ParsedUrl, UrlCategory};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const ID: &str = r"[@\w\-]+";
const QUERY: &str = r"(?:[?&][\w=&.%\-]+)?";
const CHANNEL_BASE: &str = r"https://(?:www\.)?youtube\.com(?:/(?:c|channel|user))?";

/// Patterns in priority order; first full match wins. Each pattern is
/// anchored on both ends so partial matches are rejected. The `canon` group
/// is the canonical form (query noise and trailing slash stripped), `id` the
/// extracted platform identifier.
fn patterns() -> &'static [(UrlCategory, Regex)] {
    static PATTERNS: OnceLock<Vec<(UrlCategory, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let table = [
            (
                UrlCategory::Channel,
                format!(r"^(?P<canon>{CHANNEL_BASE}/(?P<id>{ID}))(?:/featured)?/?$"),
            ),
            (
                UrlCategory::ChannelReleases,
                format!(r"^(?P<canon>{CHANNEL_BASE}/(?P<id>{ID})/releases){QUERY}/?$"),
            ),
            (
                UrlCategory::ChannelPlaylists,
                format!(r"^(?P<canon>{CHANNEL_BASE}/(?P<id>{ID})/playlists){QUERY}/?$"),
            ),
            (
                UrlCategory::Playlist,
                format!(
                    r"^(?P<canon>https://(?:www\.)?youtube\.com/playlist\?list=(?P<id>{ID})){QUERY}/?$"
                ),
            ),
            (
                UrlCategory::ChannelVideos,
                format!(r"^(?P<canon>{CHANNEL_BASE}/(?P<id>{ID})/videos){QUERY}/?$"),
            ),
            (
                UrlCategory::Video,
                format!(
                    r"^(?P<canon>https://(?:youtu\.be/|(?:www\.)?youtube\.com/watch\?v=)(?P<id>{ID})){QUERY}/?$"
                ),
            ),
        ];
        table
            .into_iter()
            .map(|(category, pattern)| {
                let regex = Regex::new(&pattern)
                    .unwrap_or_else(|err| panic!("invalid URL pattern for {category}: {err}"));
                (category, regex)
            })
            .collect()
    })
}

/// Classify a raw URL string into a category, canonical form and id.
///
/// Video URLs canonicalize to `https://www.youtube.com/watch?v=<id>`
/// regardless of surface form, so the canonical form is a stable
/// deduplication key. Unrecognized URLs come back with `category: None` and
/// the input unchanged; surfacing that as a warning is the caller's job.
pub fn classify(url: &str) -> ParsedUrl {
    for (category, regex) in patterns() {
        if let Some(caps) = regex.captures(url) {
            let id = caps.name("id").map(|m| m.as_str().to_string());
            let canonical_url = if *category == UrlCategory::Video {
                format!(
                    "https://www.youtube.com/watch?v={}",
                    id.as_deref().unwrap_or_default()
                )
            } else {
                caps.name("canon")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| url.to_string())
            };
            return ParsedUrl {
                category: Some(*category),
                canonical_url,
                id,
            };
        }
    }
    ParsedUrl {
        category: None,
        canonical_url: url.to_string(),
        id: None,
    }
}

/// Partition raw URLs into per-category buckets of canonical forms.
///
/// Each input URL is processed once: repeats are skipped against a
/// cumulative seen-set covering both raw and canonical forms, so two surface
/// variants of the same video land in the bucket once. Unrecognized URLs are
/// warned about and excluded from every bucket.
pub fn partition(urls: &[String]) -> CategoryBuckets {
    let mut buckets = CategoryBuckets::default();
    let mut known: HashSet<String> = HashSet::new();
    let mut unknown: HashSet<String> = HashSet::new();

    for url in urls {
        if known.contains(url) || unknown.contains(url) {
            continue;
        }
        let parsed = classify(url);
        match parsed.category {
            Some(category) => {
                if known.contains(&parsed.canonical_url) {
                    known.insert(url.clone());
                    continue;
                }
                known.insert(url.clone());
                known.insert(parsed.canonical_url.clone());
                buckets.bucket_mut(category).push(parsed.canonical_url);
            }
            None => {
                tracing::warn!("URL format not recognised: {:?}", url);
                unknown.insert(url.clone());
            }
        }
    }
    buckets
}
