use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytscript",
    about = "Fetch YouTube transcripts with multi-strategy extraction and cursor pagination",
    version,
    long_about = "Fetches a video's transcript through an ordered chain of extraction strategies (structured transcript API first, yt-dlp subtitle dump as fallback), deduplicates rolling captions, and renders a markdown document. Long transcripts are served in pages via an opaque continuation cursor."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a transcript page for a video URL or ID
    Fetch {
        /// Video URL or bare 11-character video ID
        #[arg(value_name = "URL_OR_ID")]
        url: String,

        /// Continuation cursor from a previous page
        #[arg(long, value_name = "CURSOR")]
        cursor: Option<String>,

        /// Maximum characters per page (default from config)
        #[arg(short, long, value_name = "CHARS")]
        limit: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },

    /// Check availability of external tools and the token side-service
    Doctor,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Rendered markdown page
    Markdown,
    /// Full page response as JSON (markdown, cursor, has_more, source)
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
