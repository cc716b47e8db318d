//! End-to-end fetch pipeline.
//!
//! One request runs to completion on a single logical task:
//! resolve → provider chain → parse → dedup → metadata → assemble → paginate.
//! Nothing is shared across requests except the read-only [`Config`].

use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::document::{TranscriptDocument, TranscriptSource};
use crate::metadata::MetadataExtractor;
use crate::pagination;
use crate::providers::ProviderChain;
use crate::resolver;
use crate::subtitle::dedup_lines;
use crate::{FetchError, Result};

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// One page of a fetched transcript, the tool contract's response shape
#[derive(Debug, Clone, Serialize)]
pub struct FetchPage {
    /// Rendered markdown for this page
    pub markdown: String,

    /// Continuation cursor; absent on the final page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,

    pub has_more: bool,

    /// Which strategy produced the transcript
    pub source: TranscriptSource,

    /// Cues the parser had to skip (diagnostic; non-zero means the
    /// transcript is complete except for unparsable cues)
    pub skipped_cues: usize,
}

/// Main transcript fetch pipeline
pub struct TranscriptPipeline {
    config: Config,
    chain: ProviderChain,
    metadata: MetadataExtractor,
}

impl TranscriptPipeline {
    /// Create a new pipeline. The token-bypass side-service is probed once
    /// here; per-request calls never re-probe.
    pub async fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        let chain = ProviderChain::build(&config, client).await;
        let metadata = MetadataExtractor::new(
            config.app.ytdlp_path.clone(),
            Duration::from_secs(config.providers.ytdlp_timeout_secs),
        );

        Ok(Self {
            config,
            chain,
            metadata,
        })
    }

    /// Fetch one page of the transcript for a video reference.
    ///
    /// `response_limit` falls back to the configured default when absent or
    /// non-positive. The whole request runs under the configured end-to-end
    /// budget; exceeding it surfaces [`FetchError::Timeout`] instead of
    /// hanging, and in-flight strategies are dropped with it.
    pub async fn fetch(
        &self,
        url: &str,
        next_cursor: Option<&str>,
        response_limit: Option<usize>,
    ) -> Result<FetchPage> {
        let budget_secs = self.config.app.request_timeout_secs;
        let budget = Duration::from_secs(budget_secs);

        match tokio::time::timeout(budget, self.fetch_inner(url, next_cursor, response_limit))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(budget_secs).into()),
        }
    }

    async fn fetch_inner(
        &self,
        url: &str,
        next_cursor: Option<&str>,
        response_limit: Option<usize>,
    ) -> Result<FetchPage> {
        let video_id = resolver::resolve(url)?;
        tracing::info!("Fetching transcript for video {}", video_id);

        let outcome = self.chain.run(&video_id).await?;
        let lines = dedup_lines(&outcome.segments);

        let mut metadata = self.metadata.extract(&video_id).await;
        if metadata.title.is_none() {
            // Best-effort title from the winning strategy
            metadata.title = outcome.title.clone();
        }

        let document = TranscriptDocument::new(video_id, metadata, lines, outcome.source);
        let rendered = document.render();

        let limit = match response_limit {
            Some(l) if l > 0 => l,
            _ => self.config.app.default_response_limit,
        };
        let page = pagination::paginate(&rendered, Some(limit), next_cursor)?;

        if outcome.skipped > 0 {
            tracing::warn!(
                "Transcript for {} returned with {} unparsable cues skipped",
                document.video_id,
                outcome.skipped
            );
        }

        Ok(FetchPage {
            markdown: page.text,
            next_cursor: page.next_cursor,
            has_more: page.has_more,
            source: outcome.source,
            skipped_cues: outcome.skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::VideoMetadata;
    use crate::subtitle::TranscriptSegment;

    // The network-touching path is covered by the provider tests; here we
    // exercise the assembly half of the pipeline on its own.

    fn assembled_doc() -> String {
        let segments = vec![
            TranscriptSegment {
                start: 0.0,
                duration: 2.0,
                text: "the quick brown".to_string(),
            },
            TranscriptSegment {
                start: 2.0,
                duration: 2.0,
                text: "quick brown fox".to_string(),
            },
        ];
        let lines = dedup_lines(&segments);
        let video_id = resolver::resolve("dQw4w9WgXcQ").unwrap();
        let metadata = VideoMetadata {
            title: Some("Fox Facts".to_string()),
            ..Default::default()
        };
        TranscriptDocument::new(video_id, metadata, lines, TranscriptSource::Api).render()
    }

    #[test]
    fn test_assembled_document_paginates_completely() {
        let doc = assembled_doc();
        let mut cursor: Option<String> = None;
        let mut collected = String::new();
        loop {
            let page = pagination::paginate(&doc, Some(12), cursor.as_deref()).unwrap();
            collected.push_str(&page.text);
            if !page.has_more {
                break;
            }
            cursor = page.next_cursor;
        }
        assert_eq!(collected, doc);
        assert!(doc.contains("# Fox Facts"));
        assert!(doc.contains("the quick brown\nfox\n"));
    }

    #[tokio::test]
    async fn test_invalid_reference_surfaces_before_any_network_call() {
        let pipeline = TranscriptPipeline::new(Config::default()).await;
        // Pipeline construction may probe for the token provider, which is
        // fine in tests (it just comes up absent)
        let pipeline = pipeline.unwrap();
        let err = pipeline
            .fetch("https://example.com/not-a-video", None, None)
            .await
            .unwrap_err();
        let fetch_err = err.downcast_ref::<FetchError>().expect("FetchError");
        assert!(matches!(fetch_err, FetchError::NotAVideoReference(_)));
    }
}
