//! Rolling-caption deduplication.
//!
//! Auto-generated captions repeat trailing text from the prior cue to
//! simulate scrolling. For each line we strip the longest suffix of the
//! previous cue's text that is a prefix of the current line, so the rendered
//! transcript reads as continuous prose with no repeated phrase.

use super::TranscriptSegment;

/// Collapse rolling-caption overlap into a clean ordered line sequence.
///
/// Segments are processed in time order. Exact duplicates of the previous
/// cue are dropped entirely; empty-text segments are skipped without
/// breaking the overlap chain. No non-overlapping content is dropped or
/// reordered, and no output line equals its immediate predecessor.
pub fn dedup_lines(segments: &[TranscriptSegment]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::with_capacity(segments.len());
    let mut prev_cue: Option<String> = None;

    for segment in segments {
        let text = segment.text.trim();
        if text.is_empty() {
            continue;
        }

        let Some(prev) = &prev_cue else {
            lines.push(text.to_string());
            prev_cue = Some(text.to_string());
            continue;
        };

        if text == prev.as_str() {
            continue;
        }

        let overlap = overlap_len(prev, text);
        let remainder = text[overlap..].trim_start();
        prev_cue = Some(text.to_string());

        if remainder.is_empty() {
            continue;
        }
        if lines.last().map(|l| l == remainder).unwrap_or(false) {
            continue;
        }
        lines.push(remainder.to_string());
    }

    lines
}

/// Length in bytes of the longest suffix of `prev` that is a prefix of
/// `cur`, constrained to end on a word boundary of `cur` so a stray
/// single-character match cannot eat into the middle of a word.
fn overlap_len(prev: &str, cur: &str) -> usize {
    let mut i = prev.len().min(cur.len());
    while i > 0 {
        if cur.is_char_boundary(i) {
            let boundary_ok = i == cur.len() || cur[i..].starts_with(' ');
            if boundary_ok && prev.ends_with(&cur[..i]) {
                return i;
            }
        }
        i -= 1;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(texts: &[&str]) -> Vec<TranscriptSegment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| TranscriptSegment {
                start: i as f64,
                duration: 1.0,
                text: t.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_rolling_overlap_stripped() {
        let input = segs(&["the quick brown", "quick brown fox", "brown fox jumps"]);
        assert_eq!(dedup_lines(&input), vec!["the quick brown", "fox", "jumps"]);
    }

    #[test]
    fn test_exact_duplicates_dropped() {
        let input = segs(&["hello there", "hello there", "hello there", "and more"]);
        assert_eq!(dedup_lines(&input), vec!["hello there", "and more"]);
    }

    #[test]
    fn test_non_overlapping_preserved_in_order() {
        let input = segs(&["first line", "second line", "third line"]);
        assert_eq!(dedup_lines(&input), vec!["first line", "second line", "third line"]);
    }

    #[test]
    fn test_empty_segments_skip_without_breaking_chain() {
        let input = segs(&["the quick brown", "", "  ", "quick brown fox"]);
        assert_eq!(dedup_lines(&input), vec!["the quick brown", "fox"]);
    }

    #[test]
    fn test_idempotent() {
        let input = segs(&[
            "the quick brown",
            "quick brown fox",
            "brown fox jumps",
            "fox jumps over",
            "jumps over the lazy dog",
        ]);
        let once = dedup_lines(&input);
        let twice = dedup_lines(&segs(&once.iter().map(|s| s.as_str()).collect::<Vec<_>>()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_partial_word_not_treated_as_overlap() {
        // "n" is a suffix of the previous line and a prefix of "nice", but
        // stripping it would corrupt the word
        let input = segs(&["the quick brown", "nice weather today"]);
        assert_eq!(dedup_lines(&input), vec!["the quick brown", "nice weather today"]);
    }

    #[test]
    fn test_fully_contained_line_dropped() {
        // Current cue is entirely a suffix of the previous cue's text
        let input = segs(&["we are going home", "going home", "home again"]);
        assert_eq!(dedup_lines(&input), vec!["we are going home", "again"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_lines(&[]).is_empty());
    }

    #[test]
    fn test_no_consecutive_duplicate_outputs() {
        let input = segs(&["a b c", "b c d", "c d e", "d e f"]);
        let out = dedup_lines(&input);
        for pair in out.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }
}
