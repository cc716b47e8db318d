//! Timed-caption parsing for the two subtitle formats yt-dlp emits.
//!
//! Cue boundaries are `start --> end` timestamp lines (WebVTT) or a numeric
//! index followed by a timestamp line (SRT). Malformed cues are skipped, not
//! fatal: the parser returns whatever it could parse plus a skipped count.

use serde::{Deserialize, Serialize};

pub mod dedup;

pub use dedup::dedup_lines;

/// A single timestamped caption segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start offset in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,

    /// Caption text with markup stripped
    pub text: String,
}

/// Supported plain-text timed-caption formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubtitleFormat {
    /// WebVTT cue format
    Vtt,
    /// Legacy numbered-cue SubRip format
    Srt,
}

impl SubtitleFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "vtt" => Some(SubtitleFormat::Vtt),
            "srt" => Some(SubtitleFormat::Srt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubtitleFormat::Vtt => "vtt",
            SubtitleFormat::Srt => "srt",
        }
    }
}

/// Result of parsing a subtitle payload
#[derive(Debug, Clone, Default)]
pub struct ParsedCaptions {
    /// Successfully parsed cues, in file order
    pub segments: Vec<TranscriptSegment>,

    /// Count of cues dropped due to unparsable timestamps
    pub skipped: usize,
}

/// Parse a raw subtitle payload into ordered segments.
///
/// Empty input yields an empty segment list, not an error.
pub fn parse(raw: &str, format: SubtitleFormat) -> ParsedCaptions {
    let mut parsed = ParsedCaptions::default();
    let mut cue_timing: Option<(f64, f64)> = None;
    let mut cue_text: Vec<String> = Vec::new();
    let mut cue_broken = false;
    let mut pending_index = false;

    for line in raw.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush_cue(&mut parsed, &mut cue_timing, &mut cue_text);
            cue_broken = false;
            pending_index = false;
            continue;
        }

        if is_header_line(trimmed, format) {
            continue;
        }

        // SRT cue index, or a stray bare number between VTT cues
        if trimmed.chars().all(|c| c.is_ascii_digit()) && cue_timing.is_none() && !cue_broken {
            pending_index = true;
            continue;
        }

        if trimmed.contains("-->") {
            // A new timing line implicitly closes any open cue
            flush_cue(&mut parsed, &mut cue_timing, &mut cue_text);
            pending_index = false;
            match parse_timing_line(trimmed) {
                Some((start, duration)) => {
                    cue_timing = Some((start, duration));
                    cue_broken = false;
                }
                None => {
                    tracing::debug!("Skipping cue with unparsable timing line: {}", trimmed);
                    parsed.skipped += 1;
                    cue_broken = true;
                }
            }
            continue;
        }

        if cue_broken {
            // Text belonging to a cue whose timing we could not parse
            continue;
        }

        // A cue index must be followed by a timing line; anything else means
        // the cue is corrupt and gets counted, not silently dropped
        if pending_index {
            tracing::debug!("Skipping cue with missing timing line after index");
            parsed.skipped += 1;
            cue_broken = true;
            pending_index = false;
            continue;
        }

        if cue_timing.is_some() {
            let text = strip_markup(trimmed);
            if !text.is_empty() {
                cue_text.push(text);
            }
        }
    }

    flush_cue(&mut parsed, &mut cue_timing, &mut cue_text);
    parsed
}

fn flush_cue(
    parsed: &mut ParsedCaptions,
    timing: &mut Option<(f64, f64)>,
    text: &mut Vec<String>,
) {
    if let Some((start, duration)) = timing.take() {
        let joined = text.join(" ");
        if !joined.is_empty() {
            parsed.segments.push(TranscriptSegment {
                start,
                duration,
                text: joined,
            });
        }
    }
    text.clear();
}

fn is_header_line(line: &str, format: SubtitleFormat) -> bool {
    format == SubtitleFormat::Vtt
        && (line.eq_ignore_ascii_case("WEBVTT")
            || line.starts_with("WEBVTT ")
            || line.starts_with("Kind:")
            || line.starts_with("Language:")
            || line.starts_with("NOTE")
            || line.starts_with("STYLE")
            || line.starts_with("REGION"))
}

/// Parse `start --> end` into (start, duration). VTT appends cue settings
/// after the end timestamp (`align:start position:0%`); only the first token
/// of the end part is the timestamp.
fn parse_timing_line(line: &str) -> Option<(f64, f64)> {
    let (start_part, end_part) = line.split_once("-->")?;
    let start = parse_timestamp(start_part.trim())?;
    let end = parse_timestamp(end_part.trim().split_whitespace().next()?)?;
    if end < start {
        return None;
    }
    Some((start, end - start))
}

/// Parse `HH:MM:SS.mmm` / `MM:SS.mmm`, accepting the SRT comma separator
fn parse_timestamp(ts: &str) -> Option<f64> {
    let ts = ts.replace(',', ".");
    let parts: Vec<&str> = ts.split(':').collect();

    let (h, m, s) = match parts.as_slice() {
        [h, m, s] => (h.parse::<f64>().ok()?, m.parse::<f64>().ok()?, s.parse::<f64>().ok()?),
        [m, s] => (0.0, m.parse::<f64>().ok()?, s.parse::<f64>().ok()?),
        _ => return None,
    };

    if h < 0.0 || m < 0.0 || s < 0.0 {
        return None;
    }

    Some(h * 3600.0 + m * 60.0 + s)
}

/// Strip inline styling markup from a caption line: `<c>`/`</c>` class tags,
/// inline `<00:00:01.000>` word timings, ASS positioning like `{\an8}`, and
/// decode HTML entities. Whitespace runs collapse to single spaces.
fn strip_markup(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                for inner in chars.by_ref() {
                    if inner == '>' {
                        break;
                    }
                }
            }
            '{' => {
                for inner in chars.by_ref() {
                    if inner == '}' {
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }

    let decoded = html_escape::decode_html_entities(&out);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
