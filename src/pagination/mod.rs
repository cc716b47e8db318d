//! Cursor-based pagination over the rendered transcript document.
//!
//! The cursor is a pure function of (document text, offset), so no server-side
//! session state exists between paginated calls. It encodes the byte offset
//! of the next page together with the document length, so a cursor replayed
//! against a different document is rejected instead of silently misreading.

use serde::{Deserialize, Serialize};

use crate::FetchError;

/// Default maximum characters per page
pub const DEFAULT_RESPONSE_LIMIT: usize = 20_000;

const CURSOR_PREFIX: &str = "v1";

/// One page of the rendered document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub text: String,

    /// Cursor for the next page; `None` when the document is exhausted
    pub next_cursor: Option<String>,

    pub has_more: bool,
}

fn encode_cursor(offset: usize, doc_len: usize) -> String {
    format!("{}.{:x}.{:x}", CURSOR_PREFIX, offset, doc_len)
}

/// Decode and validate a cursor against the current document.
///
/// Any violation (wrong shape, stale document length, offset at or past
/// the end, offset off a character boundary) is a hard [`FetchError::InvalidCursor`],
/// never a silent clamp to a valid but wrong position.
fn decode_cursor(cursor: &str, doc: &str) -> Result<usize, FetchError> {
    let invalid = || FetchError::InvalidCursor(cursor.to_string());

    let mut parts = cursor.split('.');
    if parts.next() != Some(CURSOR_PREFIX) {
        return Err(invalid());
    }
    let offset = parts
        .next()
        .and_then(|s| usize::from_str_radix(s, 16).ok())
        .ok_or_else(invalid)?;
    let doc_len = parts
        .next()
        .and_then(|s| usize::from_str_radix(s, 16).ok())
        .ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }

    if doc_len != doc.len() || offset >= doc.len() || !doc.is_char_boundary(offset) {
        return Err(invalid());
    }

    Ok(offset)
}

/// Slice one page out of the document.
///
/// The page never splits a line: the boundary truncates back to the last
/// line break within the limit. The only exception is a single line longer
/// than the limit, which is emitted whole so pagination always progresses.
/// Concatenating every page from a null cursor reproduces the document
/// exactly once.
pub fn paginate(doc: &str, limit: Option<usize>, cursor: Option<&str>) -> Result<Page, FetchError> {
    // Non-positive or absent limits fall back to the default, never pass
    // through raw
    let limit = match limit {
        Some(l) if l > 0 => l,
        _ => DEFAULT_RESPONSE_LIMIT,
    };

    let offset = match cursor {
        Some(c) => decode_cursor(c, doc)?,
        None => 0,
    };

    let window = &doc[offset..];
    if window.len() <= limit {
        return Ok(Page {
            text: window.to_string(),
            next_cursor: None,
            has_more: false,
        });
    }

    // Last line break at or before the limit; clamp the probe to a char
    // boundary so multi-byte text cannot land mid-codepoint
    let mut probe = limit;
    while probe > 0 && !window.is_char_boundary(probe) {
        probe -= 1;
    }
    let end = match window[..probe].rfind('\n') {
        Some(idx) => idx + 1,
        // Oversized first line: take it whole
        None => window.find('\n').map(|idx| idx + 1).unwrap_or(window.len()),
    };

    let next_offset = offset + end;
    let has_more = next_offset < doc.len();

    Ok(Page {
        text: window[..end].to_string(),
        next_cursor: has_more.then(|| encode_cursor(next_offset, doc.len())),
        has_more,
    })
}
