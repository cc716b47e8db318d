use async_trait::async_trait;
use std::time::Duration;

use crate::config::Config;
use crate::document::TranscriptSource;
use crate::resolver::VideoId;
use crate::subtitle::{self, SubtitleFormat, TranscriptSegment};
use crate::FetchError;

pub mod api;
pub mod pot;
pub mod ytdlp;

/// Raw caption payload produced by a strategy, tagged with its shape
#[derive(Debug, Clone)]
pub enum RawCaptions {
    /// Already-structured cues (structured-API strategy)
    Segments(Vec<TranscriptSegment>),

    /// A subtitle file body that still needs parsing (tooling fallback)
    Subtitle { format: SubtitleFormat, body: String },
}

/// Successful strategy output
#[derive(Debug, Clone)]
pub struct CaptionPayload {
    pub captions: RawCaptions,

    /// Best-effort title, used when metadata extraction comes up empty
    pub title: Option<String>,

    pub source: TranscriptSource,
}

/// Outcome of a single provider attempt
#[derive(Debug)]
pub enum Attempt {
    /// Captions retrieved
    Captions(CaptionPayload),

    /// Provider responded cleanly: this video has no captions
    NoCaptions,

    /// Access error, rate limiting, timeout, or tooling failure.
    /// Captions may still exist.
    Failed(String),
}

/// Trait for transcript extraction strategies
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// Attempt to fetch captions for a video
    async fn fetch_captions(&self, video_id: &VideoId) -> Attempt;

    /// Per-attempt timeout for this strategy
    fn timeout(&self) -> Duration;

    /// Get the name of this strategy
    fn name(&self) -> &'static str;
}

/// Parsed captions plus provenance, handed to the assembler
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    pub segments: Vec<TranscriptSegment>,

    /// Count of cues dropped by the parser (diagnostic, non-fatal)
    pub skipped: usize,

    pub title: Option<String>,

    pub source: TranscriptSource,
}

/// Ordered fallback chain over caption providers.
///
/// Strategies run sequentially, first success wins. A soft failure falls
/// through to the next strategy; there are no in-strategy retry loops.
pub struct ProviderChain {
    providers: Vec<Box<dyn CaptionProvider>>,
}

impl ProviderChain {
    /// Build the default chain: structured API first, yt-dlp fallback.
    ///
    /// The token-bypass side-service is probed exactly once here, not per
    /// attempt; its absence only disables token support.
    pub async fn build(config: &Config, client: reqwest::Client) -> Self {
        let probe_timeout = Duration::from_millis(config.providers.pot_probe_timeout_ms);
        let pot_url = pot::resolve_provider_url(
            &client,
            config.providers.pot_provider_url.as_deref(),
            probe_timeout,
        )
        .await;

        let providers: Vec<Box<dyn CaptionProvider>> = vec![
            Box::new(api::ApiProvider::new(
                client,
                config.providers.languages.clone(),
                Duration::from_secs(config.providers.api_timeout_secs),
            )),
            Box::new(ytdlp::YtdlpProvider::new(
                config.app.ytdlp_path.clone(),
                config.providers.languages.clone(),
                Duration::from_secs(config.providers.ytdlp_timeout_secs),
                pot_url,
            )),
        ];

        Self { providers }
    }

    /// Build a chain from explicit providers (tests, custom orderings)
    pub fn from_providers(providers: Vec<Box<dyn CaptionProvider>>) -> Self {
        Self { providers }
    }

    /// Run the chain: try strategies in order, stop at first success.
    ///
    /// On exhaustion the error distinguishes "no captions exist" from
    /// "all attempts failed due to access errors", since callers treat
    /// these differently (permanent vs. retryable).
    pub async fn run(&self, video_id: &VideoId) -> Result<ChainOutcome, FetchError> {
        let mut failures: Vec<String> = Vec::new();

        for provider in &self.providers {
            tracing::debug!("Trying caption provider: {}", provider.name());

            let attempt = match tokio::time::timeout(
                provider.timeout(),
                provider.fetch_captions(video_id),
            )
            .await
            {
                Ok(attempt) => attempt,
                Err(_) => Attempt::Failed(format!(
                    "{} timed out after {:?}",
                    provider.name(),
                    provider.timeout()
                )),
            };

            match attempt {
                Attempt::Captions(payload) => {
                    let (segments, skipped) = match payload.captions {
                        RawCaptions::Segments(segments) => (segments, 0),
                        RawCaptions::Subtitle { format, body } => {
                            let parsed = subtitle::parse(&body, format);
                            (parsed.segments, parsed.skipped)
                        }
                    };

                    // A payload that parses to nothing counts as this
                    // strategy's failure and triggers fallthrough
                    if segments.is_empty() {
                        tracing::warn!(
                            "{} returned a payload with no parsable cues ({} skipped)",
                            provider.name(),
                            skipped
                        );
                        failures.push(format!("{}: payload had no parsable cues", provider.name()));
                        continue;
                    }

                    tracing::info!(
                        "Provider {} produced {} segments ({} cues skipped)",
                        provider.name(),
                        segments.len(),
                        skipped
                    );
                    return Ok(ChainOutcome {
                        segments,
                        skipped,
                        title: payload.title,
                        source: payload.source,
                    });
                }
                Attempt::NoCaptions => {
                    tracing::info!("{} reports no captions for {}", provider.name(), video_id);
                }
                Attempt::Failed(reason) => {
                    tracing::warn!("{} failed: {}", provider.name(), reason);
                    failures.push(format!("{}: {}", provider.name(), reason));
                }
            }
        }

        if failures.is_empty() {
            Err(FetchError::NoTranscriptAvailable(video_id.to_string()))
        } else {
            Err(FetchError::ProviderAccessError {
                video_id: video_id.to_string(),
                detail: failures.join("; "),
            })
        }
    }
}
