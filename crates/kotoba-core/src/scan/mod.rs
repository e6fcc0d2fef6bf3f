//! Byte scanner for compiled scenario scripts
//!
//! The scanner walks the file with a cursor and a 1-based line counter
//! (the only state) and classifies candidacy without decoding. Known
//! ASCII patterns and SJIS lead bytes hand off to the extractor; newline
//! runs advance the line counter and trigger the control-sequence skip.
//!
//! The control-sequence skip is essential: `0x01 0x01 … 0x1A` runs carry
//! parameter bytes that routinely land in the SJIS lead range and would
//! otherwise surface as garbage entries.

pub mod constants;
mod extract;
mod pattern;

use tracing::debug;

pub use extract::Candidate;
pub use pattern::PatternKind;

use constants::{is_sjis_lead, CONTROL_CLOSE, CONTROL_OPEN, CR, LF, NUL};

/// One undecoded-then-decoded string as the scanner found it, before
/// classification and per-line refinement.
#[derive(Debug, Clone)]
pub struct RawString {
    /// 1-based engine line the string was found on
    pub line: u32,
    /// Byte index of the first emitted byte
    pub offset: usize,
    /// Emitted byte count, terminator excluded
    pub byte_len: usize,
    /// Decoded text (UTF-8 view of the Shift-JIS bytes)
    pub text: String,
    /// ASCII pattern that triggered extraction, if any
    pub pattern: Option<PatternKind>,
}

/// Result of scanning one file.
#[derive(Debug)]
pub struct ScanOutcome {
    pub strings: Vec<RawString>,
    pub total_lines: u32,
}

/// Scan a whole script image.
pub fn scan(data: &[u8]) -> ScanOutcome {
    let mut strings = Vec::new();
    let mut pos = 0usize;
    let mut line = 1u32;

    while pos < data.len() {
        let b = data[pos];

        if b == LF || b == CR {
            line += 1;
            // a run of newline bytes advances the counter exactly once
            while pos < data.len() && matches!(data[pos], LF | CR) {
                pos += 1;
            }
            pos = skip_control_sequence(data, pos);
            continue;
        }

        if let Some(kind) = pattern::recognize(data, pos) {
            let cand = extract::extract_ascii(data, pos, kind);
            pos = push_candidate(&mut strings, data, cand, line, Some(kind), pos);
            continue;
        }

        if is_sjis_lead(b) {
            let cand = extract::extract_sjis(data, pos);
            pos = push_candidate(&mut strings, data, cand, line, None, pos);
            continue;
        }

        pos += 1;
    }

    debug!(
        "scan finished: {} strings across {} lines",
        strings.len(),
        line
    );

    ScanOutcome {
        strings,
        total_lines: line,
    }
}

/// Record an accepted candidate and advance the cursor past its
/// terminator. The `0x00` is consumed here; tab/newline bytes are left
/// for the main loop so the line counter still sees them.
fn push_candidate(
    strings: &mut Vec<RawString>,
    data: &[u8],
    cand: Candidate,
    line: u32,
    pattern: Option<PatternKind>,
    pos: usize,
) -> usize {
    if let Some(text) = cand.text {
        strings.push(RawString {
            line,
            offset: cand.start,
            byte_len: cand.byte_len,
            text,
            pattern,
        });
    }

    let mut next = cand.end.max(pos + 1);
    if next < data.len() && data[next] == NUL {
        next += 1;
    }
    next
}

/// After a newline run, skip a `0x01 0x01 … 0x1A` control sequence.
/// The run ends at the closer (consumed) or at a null/newline (left in
/// place); an unterminated sequence swallows the rest of the file.
fn skip_control_sequence(data: &[u8], mut pos: usize) -> usize {
    if pos + 1 >= data.len() || data[pos..pos + 2] != CONTROL_OPEN {
        return pos;
    }

    while pos < data.len() && !matches!(data[pos], CONTROL_CLOSE | NUL | LF | CR) {
        pos += 1;
    }
    if pos < data.len() && data[pos] == CONTROL_CLOSE {
        pos += 1;
    }
    pos
}
