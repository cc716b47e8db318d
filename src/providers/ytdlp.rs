//! Tooling-fallback strategy: yt-dlp subtitle dump.
//!
//! Slower than the structured API but far more resilient against anti-bot
//! measures, especially when a token provider is available. Subtitle files
//! land in a per-request temp directory that is removed on every exit path.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;

use super::{Attempt, CaptionPayload, CaptionProvider, RawCaptions};
use crate::document::TranscriptSource;
use crate::resolver::VideoId;
use crate::subtitle::SubtitleFormat;
use crate::Result;

/// yt-dlp caption provider
pub struct YtdlpProvider {
    yt_dlp_path: String,
    languages: Vec<String>,
    timeout: Duration,

    /// Base URL of the token-bypass side-service, resolved once at chain
    /// construction. `None` means run without bypass tokens.
    pot_provider_url: Option<String>,
}

impl YtdlpProvider {
    pub fn new(
        yt_dlp_path: String,
        languages: Vec<String>,
        timeout: Duration,
        pot_provider_url: Option<String>,
    ) -> Self {
        Self {
            yt_dlp_path,
            languages,
            timeout,
            pot_provider_url,
        }
    }

    async fn try_fetch(&self, video_id: &VideoId) -> Result<Attempt> {
        // TempDir removal on drop covers success, error, and cancellation
        let temp_dir = TempDir::new()?;
        let out_template = temp_dir
            .path()
            .join(format!("captions-{}.%(ext)s", uuid::Uuid::new_v4().simple()));

        let langs = if self.languages.is_empty() {
            "en".to_string()
        } else {
            self.languages.join(",")
        };

        tracing::debug!("Running yt-dlp subtitle dump for {}", video_id);

        let mut cmd = Command::new(&self.yt_dlp_path);
        cmd.args([
            "--skip-download",
            "--write-subs",
            "--write-auto-subs",
            "--sub-langs",
            &langs,
            "--sub-format",
            "vtt/srt",
            "--no-playlist",
            "--no-warnings",
            "-o",
        ])
        .arg(&out_template)
        .arg(video_id.watch_url())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

        if let Some(pot_url) = &self.pot_provider_url {
            tracing::debug!("Using token provider at {}", pot_url);
            cmd.arg("--extractor-args")
                .arg("youtube:pot_provider=bgutil:http")
                .arg("--extractor-args")
                .arg(format!("youtubepot-bgutilhttp:base_url={}", pot_url));
        }

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Attempt::Failed(format!(
                    "{} not found; install yt-dlp to enable the tooling fallback",
                    self.yt_dlp_path
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Ok(Attempt::Failed(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let Some((path, format)) = find_subtitle_file(temp_dir.path()).await? else {
            // Clean exit but nothing written: the video has no captions
            return Ok(Attempt::NoCaptions);
        };

        let body = tokio::fs::read_to_string(&path).await?;
        Ok(Attempt::Captions(CaptionPayload {
            captions: RawCaptions::Subtitle { format, body },
            title: None,
            source: TranscriptSource::Ytdlp,
        }))
    }
}

/// Pick the first subtitle file yt-dlp produced, tagged with its format
async fn find_subtitle_file(dir: &std::path::Path) -> Result<Option<(PathBuf, SubtitleFormat)>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(SubtitleFormat::from_extension);
        if let Some(format) = format {
            return Ok(Some((path, format)));
        }
    }
    Ok(None)
}

#[async_trait]
impl CaptionProvider for YtdlpProvider {
    async fn fetch_captions(&self, video_id: &VideoId) -> Attempt {
        match self.try_fetch(video_id).await {
            Ok(attempt) => attempt,
            Err(e) => Attempt::Failed(e.to_string()),
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_subtitle_file_prefers_known_extensions() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), "ignore me")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("captions.en.vtt"), "WEBVTT\n")
            .await
            .unwrap();

        let found = find_subtitle_file(dir.path()).await.unwrap();
        let (path, format) = found.expect("expected a subtitle file");
        assert_eq!(format, SubtitleFormat::Vtt);
        assert!(path.to_string_lossy().ends_with(".vtt"));
    }

    #[tokio::test]
    async fn test_find_subtitle_file_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(find_subtitle_file(dir.path()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_binary_is_soft_failure() {
        let provider = YtdlpProvider::new(
            "yt-dlp-definitely-not-installed".to_string(),
            vec!["en".to_string()],
            Duration::from_secs(5),
            None,
        );
        let video_id = crate::resolver::resolve("dQw4w9WgXcQ").unwrap();
        let attempt = provider.fetch_captions(&video_id).await;
        assert!(matches!(attempt, Attempt::Failed(_)));
    }
}
