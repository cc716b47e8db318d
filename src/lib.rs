//! ytscript - Fetch YouTube transcripts with multi-strategy extraction
//!
//! This library resolves a video reference, pulls captions through an ordered
//! chain of extraction strategies (structured transcript API first, yt-dlp
//! subtitle dump as fallback), deduplicates rolling captions, and renders a
//! markdown transcript document served through cursor-based pagination.

pub mod cli;
pub mod config;
pub mod document;
pub mod metadata;
pub mod pagination;
pub mod pipeline;
pub mod providers;
pub mod resolver;
pub mod subtitle;
pub mod utils;

pub use config::Config;
pub use document::{TranscriptDocument, TranscriptSource};
pub use metadata::VideoMetadata;
pub use pagination::Page;
pub use pipeline::{FetchPage, TranscriptPipeline};
pub use resolver::VideoId;
pub use subtitle::{SubtitleFormat, TranscriptSegment};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types surfaced to callers of the fetch pipeline
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// Input is not a recognized video URL or ID. Caller must fix the input.
    #[error("Not a video reference: {0}")]
    NotAVideoReference(String),

    /// Every strategy confirmed the video has no captions. Not retryable.
    #[error("No transcript available for video {0}")]
    NoTranscriptAvailable(String),

    /// All strategies failed due to access or rate-limiting issues.
    /// Captions may still exist; retryable later.
    #[error("All transcript providers failed for video {video_id}: {detail}")]
    ProviderAccessError { video_id: String, detail: String },

    /// Malformed or stale pagination cursor. Caller error.
    #[error("Invalid pagination cursor: {0}")]
    InvalidCursor(String),

    /// End-to-end request budget exceeded. Retryable.
    #[error("Transcript fetch timed out after {0} seconds")]
    Timeout(u64),
}
