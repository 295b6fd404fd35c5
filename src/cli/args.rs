//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// YT Archiver - Resolve channels and playlists into a download catalog
#[derive(Parser, Debug)]
#[command(name = "yt-archiver")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve references and build the catalog
    Resolve {
        /// Video, playlist, playlist-group or channel URLs
        #[arg(value_name = "URL")]
        urls: Vec<String>,

        /// Read URLs from a file (one per line, `#` comments allowed)
        #[arg(short = 'a', long, value_name = "FILE")]
        batch_file: Option<PathBuf>,

        /// Output directory; the snapshot is written under `<DIR>/_json/`
        #[arg(short, long, value_name = "DIR", default_value = "out")]
        output_dir: PathBuf,

        /// Do not persist a catalog snapshot (disables resume)
        #[arg(long)]
        no_archives: bool,

        /// Snapshot filename prefix (default: derived from a single input
        /// URL's title)
        #[arg(short = 'j', long, value_name = "PREFIX")]
        json_file_prefix: Option<String>,

        /// Collapse all channels into a single "no channel" bucket
        #[arg(long)]
        no_channels: bool,

        /// Force every item into one album with this title
        #[arg(long, value_name = "ALBUM")]
        album: Option<String>,

        /// Use this as channel id and title for every item
        #[arg(long, value_name = "ARTIST")]
        album_artist: Option<String>,
    },

    /// Print the classification of each URL
    Classify {
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,
    },

    /// Merge catalog snapshot files into one
    Merge {
        /// Output path for the merged catalog
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Snapshot files to merge, in precedence order
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,
    },
}
