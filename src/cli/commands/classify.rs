//! Classify command implementation.

use crate::core::classifier;
use anyhow::Result;
use colored::Colorize;

/// Print the classification of each URL.
pub fn classify(urls: &[String]) -> Result<()> {
    for url in urls {
        let parsed = classifier::classify(url);
        match parsed.category {
            Some(category) => {
                println!(
                    "{} {}",
                    format!("[{}]", category).green().bold(),
                    parsed.canonical_url
                );
                if let Some(id) = parsed.id {
                    println!("  id: {}", id);
                }
                if parsed.canonical_url != *url {
                    println!("  from: {}", url);
                }
            }
            None => {
                println!("{} {}", "[unknown]".yellow().bold(), url);
            }
        }
    }
    Ok(())
}
