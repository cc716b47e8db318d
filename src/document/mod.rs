//! Transcript document assembly.
//!
//! Combines video metadata with the deduplicated caption lines into one
//! markdown document. Rendering is deterministic: identical inputs always
//! produce identical text, which the pagination cursor contract depends on.

use serde::{Deserialize, Serialize};

use crate::metadata::VideoMetadata;
use crate::resolver::VideoId;
use crate::utils::format_duration;

/// Which extraction strategy produced the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptSource {
    /// Structured transcript API
    Api,
    /// yt-dlp subtitle dump
    Ytdlp,
}

impl std::fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptSource::Api => write!(f, "api"),
            TranscriptSource::Ytdlp => write!(f, "yt-dlp"),
        }
    }
}

/// One fully assembled transcript, immutable for the rest of the request
#[derive(Debug, Clone)]
pub struct TranscriptDocument {
    pub video_id: VideoId,
    pub metadata: VideoMetadata,

    /// Deduplicated transcript lines, in time order
    pub lines: Vec<String>,

    pub source: TranscriptSource,
}

impl TranscriptDocument {
    pub fn new(
        video_id: VideoId,
        metadata: VideoMetadata,
        lines: Vec<String>,
        source: TranscriptSource,
    ) -> Self {
        Self {
            video_id,
            metadata,
            lines,
            source,
        }
    }

    /// Render the document as markdown: title heading, a metadata block
    /// listing only the fields that are present, then the transcript.
    pub fn render(&self) -> String {
        let mut out = String::new();

        let title = self
            .metadata
            .title
            .as_deref()
            .unwrap_or_else(|| self.video_id.as_str());
        out.push_str(&format!("# {}\n", title));

        let mut meta_lines: Vec<String> = Vec::new();
        if let Some(uploader) = &self.metadata.uploader {
            meta_lines.push(format!("**Uploader:** {}", uploader));
        }
        if let Some(secs) = self.metadata.duration_secs {
            meta_lines.push(format!("**Duration:** {}", format_duration(secs)));
        }
        if let Some(date) = self.metadata.upload_date {
            meta_lines.push(format!("**Uploaded:** {}", date.format("%Y-%m-%d")));
        }
        if !meta_lines.is_empty() {
            out.push('\n');
            for line in &meta_lines {
                out.push_str(line);
                out.push('\n');
            }
        }

        if let Some(description) = &self.metadata.description {
            out.push('\n');
            out.push_str(description);
            out.push('\n');
        }

        out.push_str("\n## Transcript\n\n");
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn video_id() -> VideoId {
        crate::resolver::resolve("dQw4w9WgXcQ").unwrap()
    }

    fn full_metadata() -> VideoMetadata {
        VideoMetadata {
            title: Some("Test Video".to_string()),
            uploader: Some("Channel".to_string()),
            duration_secs: Some(900.0),
            upload_date: NaiveDate::from_ymd_opt(2024, 3, 2),
            description: Some("A description.".to_string()),
        }
    }

    #[test]
    fn test_render_full_metadata() {
        let doc = TranscriptDocument::new(
            video_id(),
            full_metadata(),
            vec!["first line".to_string(), "second line".to_string()],
            TranscriptSource::Api,
        );
        let text = doc.render();
        assert!(text.starts_with("# Test Video\n"));
        assert!(text.contains("**Uploader:** Channel\n"));
        assert!(text.contains("**Duration:** 15 minutes\n"));
        assert!(text.contains("**Uploaded:** 2024-03-02\n"));
        assert!(text.contains("A description.\n"));
        assert!(text.contains("## Transcript\n\nfirst line\nsecond line\n"));
    }

    #[test]
    fn test_render_absent_fields_omitted() {
        let doc = TranscriptDocument::new(
            video_id(),
            VideoMetadata::default(),
            vec!["only line".to_string()],
            TranscriptSource::Ytdlp,
        );
        let text = doc.render();
        // Title falls back to the video id
        assert!(text.starts_with("# dQw4w9WgXcQ\n"));
        assert!(!text.contains("**Uploader:**"));
        assert!(!text.contains("**Duration:**"));
        assert!(!text.contains("**Uploaded:**"));
        assert!(text.contains("## Transcript\n\nonly line\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let doc = TranscriptDocument::new(
            video_id(),
            full_metadata(),
            vec!["a".to_string(), "b".to_string()],
            TranscriptSource::Api,
        );
        assert_eq!(doc.render(), doc.render());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(TranscriptSource::Api.to_string(), "api");
        assert_eq!(TranscriptSource::Ytdlp.to_string(), "yt-dlp");
    }
}
