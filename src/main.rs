//! YT Archiver CLI
//!
//! A command-line tool for resolving YouTube references into a persisted,
//! resumable download catalog.

use clap::Parser;
use yt_archiver::cli::{
    args::{Cli, Commands},
    commands::{classify, merge, resolve},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run the appropriate command
    match cli.command {
        Commands::Resolve {
            urls,
            batch_file,
            output_dir,
            no_archives,
            json_file_prefix,
            no_channels,
            album,
            album_artist,
        } => {
            resolve::resolve(
                urls,
                batch_file,
                &output_dir,
                no_archives,
                json_file_prefix,
                no_channels,
                album,
                album_artist,
            )
            .await?;
        }

        Commands::Classify { urls } => {
            classify::classify(&urls)?;
        }

        Commands::Merge { output, inputs } => {
            merge::merge(&output, &inputs)?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("yt_archiver=debug")
    } else {
        EnvFilter::new("yt_archiver=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
