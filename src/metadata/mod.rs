//! Video metadata extraction via `yt-dlp --dump-json`.
//!
//! Every field is independently optional: one field failing to parse never
//! poisons the others, and a whole-extractor failure degrades to an empty
//! metadata block instead of failing the request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::resolver::VideoId;

/// Best-effort video metadata. Absence of any field never fails the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub uploader: Option<String>,

    /// Raw duration in seconds; humanized only at assembly time
    pub duration_secs: Option<f64>,

    pub upload_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Metadata extractor backed by the yt-dlp binary
pub struct MetadataExtractor {
    yt_dlp_path: String,
    timeout: Duration,
}

impl MetadataExtractor {
    pub fn new(yt_dlp_path: String, timeout: Duration) -> Self {
        Self {
            yt_dlp_path,
            timeout,
        }
    }

    /// Extract metadata for a video. Never fails: any error degrades to
    /// an empty [`VideoMetadata`] with a warning logged.
    pub async fn extract(&self, video_id: &VideoId) -> VideoMetadata {
        match tokio::time::timeout(self.timeout, self.dump_json(video_id)).await {
            Ok(Ok(info)) => parse_metadata(&info),
            Ok(Err(e)) => {
                tracing::warn!("Metadata extraction failed for {}: {}", video_id, e);
                VideoMetadata::default()
            }
            Err(_) => {
                tracing::warn!("Metadata extraction timed out for {}", video_id);
                VideoMetadata::default()
            }
        }
    }

    async fn dump_json(&self, video_id: &VideoId) -> crate::Result<serde_json::Value> {
        let output = Command::new(&self.yt_dlp_path)
            .args(["--dump-json", "--no-playlist", "--skip-download"])
            .arg(video_id.watch_url())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp metadata dump failed: {}", stderr.trim());
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

/// Pull fields out of the yt-dlp info JSON one by one, so a malformed
/// field degrades to absence instead of discarding the rest
fn parse_metadata(info: &serde_json::Value) -> VideoMetadata {
    let title = info
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let uploader = info
        .get("uploader")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let duration_secs = info.get("duration").and_then(|v| v.as_f64());
    let upload_date = info
        .get("upload_date")
        .and_then(|v| v.as_str())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y%m%d").ok());
    let description = info
        .get("description")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    VideoMetadata {
        title,
        uploader,
        duration_secs,
        upload_date,
        description,
    }
}
