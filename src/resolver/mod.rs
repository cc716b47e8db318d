use std::fmt;

use url::Url;

use crate::FetchError;

/// Canonical YouTube video identifier (11 characters)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch-page URL for this video
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_youtube_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    h == "youtube.com" || h == "youtu.be" || h.ends_with(".youtube.com")
}

fn is_valid_id(candidate: &str) -> bool {
    candidate.len() == 11
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Resolve an arbitrary URL or bare ID into a canonical [`VideoId`].
///
/// Recognized forms: watch pages (`youtube.com/watch?v=ID` on any youtube
/// host), short links (`youtu.be/ID`), embed/`/v/` URLs, shorts, live pages,
/// and a bare 11-character video ID. Anything else is rejected as
/// [`FetchError::NotAVideoReference`] rather than guessed at.
pub fn resolve(input: &str) -> Result<VideoId, FetchError> {
    let input = input.trim();

    if is_valid_id(input) {
        return Ok(VideoId(input.to_string()));
    }

    let candidate = extract_from_url(input);
    match candidate {
        Some(id) if is_valid_id(&id) => Ok(VideoId(id)),
        _ => Err(FetchError::NotAVideoReference(input.to_string())),
    }
}

fn extract_from_url(input: &str) -> Option<String> {
    // Accept scheme-less URLs like "youtube.com/watch?v=..."
    let parsed = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{}", input)))
        .ok()?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let host = parsed.host_str()?;
    if !is_youtube_host(host) {
        return None;
    }

    // youtu.be/<id>
    if host.eq_ignore_ascii_case("youtu.be") {
        let seg = parsed.path_segments()?.next()?.trim();
        if !seg.is_empty() {
            return Some(seg.to_string());
        }
        return None;
    }

    // youtube.com/watch?v=<id>
    if parsed.path().starts_with("/watch") {
        return parsed
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.trim().to_string());
    }

    // youtube.com/{embed,v,shorts,live}/<id>
    let mut segs = parsed.path_segments()?;
    let first = segs.next().unwrap_or("");
    let second = segs.next().unwrap_or("");
    if matches!(first, "embed" | "v" | "shorts" | "live") && !second.trim().is_empty() {
        return Some(second.trim().to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_watch_url_variants_resolve_identically() {
        let variants = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ",
        ];
        for url in variants {
            assert_eq!(resolve(url).unwrap().as_str(), ID, "failed for {url}");
        }
    }

    #[test]
    fn test_bare_id() {
        assert_eq!(resolve("dQw4w9WgXcQ").unwrap().as_str(), ID);
        assert_eq!(resolve("  dQw4w9WgXcQ  ").unwrap().as_str(), ID);
    }

    #[test]
    fn test_non_video_urls_rejected() {
        let bad = [
            "https://example.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/channel/UC123",
            "https://vimeo.com/12345",
            "not a url at all",
            "ftp://youtube.com/watch?v=dQw4w9WgXcQ",
            "",
        ];
        for url in bad {
            assert!(
                matches!(resolve(url), Err(FetchError::NotAVideoReference(_))),
                "expected rejection for {url:?}"
            );
        }
    }

    #[test]
    fn test_malformed_id_rejected() {
        // Right shape of URL but wrong ID length
        assert!(resolve("https://youtu.be/short").is_err());
        assert!(resolve("https://www.youtube.com/watch?v=toolongvideoid123").is_err());
    }

    #[test]
    fn test_watch_url_rendering() {
        let id = resolve(ID).unwrap();
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
