//! Candidate extension
//!
//! Given a position the scanner flagged, fix the real start of the
//! string (ASCII-prefix back-scan, fusion stem recovery), walk the body
//! to its terminator, and decode. A candidate that fails to decode or
//! fails CJK validation is discarded but still reports how far the
//! cursor must advance.

use tracing::trace;

use crate::encoding::{contains_cjk, decode_strict, encode_strict};

use super::constants::{
    is_printable_ascii, is_sjis_lead, is_terminator, CR, HALFWIDTH_KANA, LF, MIN_CANDIDATE_BYTES,
    NUL, PREFIX_BACKSCAN_LIMIT,
};
use super::pattern::PatternKind;

/// Outcome of extending one candidate. `end` is where the scanner
/// resumes (the terminator itself); `text` is `None` when the candidate
/// was discarded.
#[derive(Debug)]
pub struct Candidate {
    pub start: usize,
    pub end: usize,
    pub byte_len: usize,
    pub text: Option<String>,
}

impl Candidate {
    fn rejected(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            byte_len: 0,
            text: None,
        }
    }
}

/// Extend an SJIS-mode candidate (scanner saw a lead byte at `pos`).
pub fn extract_sjis(data: &[u8], pos: usize) -> Candidate {
    let start = backscan_ascii_prefix(data, pos);
    let end = walk_sjis_body(data, start);

    if end.saturating_sub(start) < MIN_CANDIDATE_BYTES {
        return Candidate::rejected(start, end);
    }

    let Some(text) = decode_strict(&data[start..end]) else {
        trace!("candidate at {:#x} failed Shift-JIS decode", start);
        return Candidate::rejected(start, end);
    };

    // Pure-ASCII artifacts that slipped into SJIS mode die here
    if text.chars().count() < 2 || !contains_cjk(&text) {
        return Candidate::rejected(start, end);
    }

    Candidate {
        start,
        end,
        byte_len: end - start,
        text: Some(text),
    }
}

/// Extend an ASCII-mode candidate (recognizer matched at `pos`).
///
/// Asset paths may embed SJIS characters (the sprite-position fusion),
/// so the body walk still honours SJIS pairs; only the terminator set
/// shrinks to the four delimiter bytes.
pub fn extract_ascii(data: &[u8], pos: usize, kind: PatternKind) -> Candidate {
    let start = if kind == PatternKind::SpriteFusion {
        backscan_fusion_stem(data, pos)
    } else {
        // Candidates start exactly at the recognized prefix
        pos
    };

    let mut end = start;
    while end < data.len() && !is_terminator(data[end]) {
        if is_sjis_lead(data[end]) && end + 1 < data.len() {
            end += 2;
        } else {
            end += 1;
        }
    }

    if end.saturating_sub(start) < MIN_CANDIDATE_BYTES {
        return Candidate::rejected(start, end);
    }

    let Some(mut text) = decode_strict(&data[start..end]) else {
        trace!("ascii candidate at {:#x} failed Shift-JIS decode", start);
        return Candidate::rejected(start, end);
    };

    let mut byte_len = end - start;
    if kind == PatternKind::Hashtag {
        let trimmed_len = text.trim_end_matches(['!', '?', '.', ',', '。', '、', '・']).len();
        if trimmed_len != text.len() {
            text.truncate(trimmed_len);
            // keep offset+byte_len aligned with the emitted text
            byte_len = encode_strict(&text).map(|b| b.len()).unwrap_or(byte_len);
        }
    }

    if text.is_empty() {
        return Candidate::rejected(start, end);
    }

    Candidate {
        start,
        end,
        byte_len,
        text: Some(text),
    }
}

/// Back-scan up to [`PREFIX_BACKSCAN_LIMIT`] bytes of printable ASCII in
/// front of an SJIS lead, stopping at delimiters and non-printable
/// bytes. Recovers prefixes like a leading quote.
fn backscan_ascii_prefix(data: &[u8], pos: usize) -> usize {
    let mut start = pos;
    let floor = pos.saturating_sub(PREFIX_BACKSCAN_LIMIT);

    for back in (floor..pos).rev() {
        if is_terminator(data[back]) || !is_printable_ascii(data[back]) {
            break;
        }
        start = back;
    }

    start
}

/// Back-scan from the fusion `_` over printable ASCII to the start of
/// the sprite-name stem, so `kanade_D_2_・079` is emitted whole.
fn backscan_fusion_stem(data: &[u8], pos: usize) -> usize {
    let mut back = pos;
    while back > 0 {
        let b = data[back - 1];
        if matches!(b, NUL | LF | CR) || !is_printable_ascii(b) {
            break;
        }
        back -= 1;
    }
    back
}

/// Walk an SJIS-mode body: SJIS pairs, printable ASCII and half-width
/// kana are consumed; the four delimiters and anything else end it.
fn walk_sjis_body(data: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < data.len() {
        let b = data[end];
        if is_terminator(b) {
            break;
        }
        if is_sjis_lead(b) {
            if end + 1 < data.len() {
                end += 2;
            } else {
                // lead byte with no successor
                break;
            }
        } else if is_printable_ascii(b) || HALFWIDTH_KANA.contains(&b) {
            end += 1;
        } else {
            break;
        }
    }
    end
}
