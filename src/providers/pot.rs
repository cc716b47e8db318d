//! Optional token-bypass side-service (bgutil POT provider) discovery.
//!
//! The upstream video platform protects some content behind proof-of-origin
//! tokens. A locally running bgutil provider can issue them to yt-dlp. We
//! probe for it once when the chain is built; absence only disables token
//! support, it never fails the chain.

use std::time::Duration;

/// Well-known addresses for compose and local runs
const DEFAULT_CANDIDATES: &[&str] = &[
    "http://bgutil-provider:4416",
    "http://127.0.0.1:4416",
    "http://localhost:4416",
];

/// Determine a usable token-provider base URL, if any.
///
/// The configured URL (if set) is tried first, then the well-known
/// defaults. The first candidate answering the liveness probe wins.
pub async fn resolve_provider_url(
    client: &reqwest::Client,
    configured: Option<&str>,
    probe_timeout: Duration,
) -> Option<String> {
    let mut candidates: Vec<String> = Vec::new();
    if let Some(url) = configured {
        candidates.push(url.trim_end_matches('/').to_string());
    }
    for url in DEFAULT_CANDIDATES {
        let url = url.to_string();
        if !candidates.contains(&url) {
            candidates.push(url);
        }
    }

    for candidate in candidates {
        if probe(client, &candidate, probe_timeout).await {
            tracing::info!("Token provider enabled at {}", candidate);
            return Some(candidate);
        }
    }

    tracing::info!("No token provider detected; proceeding without bypass tokens");
    None
}

/// Liveness probe: `GET {base}/ping` answering 200 within the timeout
async fn probe(client: &reqwest::Client, base_url: &str, timeout: Duration) -> bool {
    let ping_url = format!("{}/ping", base_url.trim_end_matches('/'));
    match client.get(&ping_url).timeout(timeout).send().await {
        Ok(resp) => resp.status().is_success(),
        Err(e) => {
            tracing::debug!("Token provider probe failed for {}: {}", ping_url, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_candidates_yield_none() {
        let client = reqwest::Client::new();
        // Port 9 (discard) is never serving the ping endpoint
        let url = resolve_provider_url(
            &client,
            Some("http://127.0.0.1:9"),
            Duration::from_millis(100),
        )
        .await;
        // The well-known defaults are not running in the test environment
        // either, so discovery must come up empty rather than erroring
        assert!(url.is_none());
    }
}
