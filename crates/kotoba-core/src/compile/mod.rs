//! Recompiler: write translations back into the original binary
//!
//! The translated JSON carries no byte positions, so the offset map is
//! recomputed by re-running the extraction pipeline over the original
//! bytes; extraction is deterministic, so the translatable entries of
//! both sides pair positionally. Replacement is byte-positional.
//!
//! Two length policies exist. Strict mode refuses a file when any
//! translation overflows its original byte range. Expand mode splices
//! the longer bytes in and shifts everything after them. The engine
//! sometimes tolerates this, but any offset tables it keeps will
//! desynchronize; correctness is not guaranteed.

use tracing::{debug, warn};

use crate::encoding::encode_strict;
use crate::error::{Error, Result};
use crate::pipeline::extract_record;
use crate::script::{Entry, FileRecord};

/// Length policy for translations longer than their original spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompileMode {
    /// Refuse the file on any overflow
    #[default]
    Strict,
    /// Splice longer translations in, shifting subsequent bytes
    Expand,
}

/// Per-entry anomaly surfaced to the translator.
#[derive(Debug, Clone)]
pub enum CompileIssue {
    /// Translation is longer than the original byte range
    Overflow {
        line: u32,
        offset: usize,
        original_len: usize,
        new_len: usize,
        text: String,
    },
    /// Translation contains a code point with no Shift-JIS encoding;
    /// the entry was left untranslated
    Unrepresentable { line: u32, offset: usize, text: String },
}

impl std::fmt::Display for CompileIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overflow {
                line,
                offset,
                original_len,
                new_len,
                text,
            } => write!(
                f,
                "line {line}, offset {offset:#x}: translation is {new_len} bytes, original {original_len} ({text})"
            ),
            Self::Unrepresentable { line, offset, text } => write!(
                f,
                "line {line}, offset {offset:#x}: not representable in Shift-JIS ({text})"
            ),
        }
    }
}

/// Result of recompiling one file.
#[derive(Debug)]
pub struct CompileOutput {
    pub bytes: Vec<u8>,
    pub replaced: usize,
    /// Translatable entries without a supplied translation
    pub untranslated: usize,
    pub issues: Vec<CompileIssue>,
}

struct Replacement {
    offset: usize,
    original_len: usize,
    bytes: Vec<u8>,
}

/// Recompile one script from its original bytes and translated record.
pub fn compile_script(
    original: &[u8],
    record: &FileRecord,
    mode: CompileMode,
) -> Result<CompileOutput> {
    let file = record.metadata.file.as_str();
    let extracted = extract_record(original, file);

    let spans: Vec<(u32, &Entry)> = extracted
        .entries()
        .filter(|(_, e)| e.kind.is_translatable())
        .collect();
    let supplied: Vec<&Entry> = record.translatable_entries().collect();

    if spans.len() != supplied.len() {
        return Err(Error::record_mismatch(
            file,
            format!(
                "original yields {} translatable entries, record has {}",
                spans.len(),
                supplied.len()
            ),
        ));
    }

    let mut issues = Vec::new();
    let mut replacements = Vec::new();
    let mut untranslated = 0usize;

    for ((line, span), entry) in spans.into_iter().zip(supplied) {
        if span.original != entry.original {
            return Err(Error::record_mismatch(
                file,
                format!(
                    "entry mismatch at line {line}: extracted {:?}, record has {:?}",
                    span.original, entry.original
                ),
            ));
        }

        let Some(translation) = entry.supplied_translation() else {
            untranslated += 1;
            continue;
        };

        let Some(bytes) = encode_strict(translation) else {
            issues.push(CompileIssue::Unrepresentable {
                line,
                offset: span.offset,
                text: translation.to_string(),
            });
            untranslated += 1;
            continue;
        };

        if bytes.len() > span.byte_len {
            issues.push(CompileIssue::Overflow {
                line,
                offset: span.offset,
                original_len: span.byte_len,
                new_len: bytes.len(),
                text: translation.to_string(),
            });
            if mode == CompileMode::Strict {
                continue;
            }
        }

        replacements.push(Replacement {
            offset: span.offset,
            original_len: span.byte_len,
            bytes,
        });
    }

    let overflow_count = issues
        .iter()
        .filter(|i| matches!(i, CompileIssue::Overflow { .. }))
        .count();

    if mode == CompileMode::Strict && overflow_count > 0 {
        for issue in &issues {
            warn!("{file}: {issue}");
        }
        return Err(Error::FileRejected {
            file: file.to_string(),
            count: overflow_count,
        });
    }

    if mode == CompileMode::Expand && overflow_count > 0 {
        warn!(
            "{file}: {overflow_count} translation(s) spliced in with growth; \
             engine-side offset tables may desynchronize"
        );
    }

    let replaced = replacements.len();
    let bytes = splice(original, &replacements);

    debug!(
        "{file}: {replaced} replaced, {untranslated} left untranslated, {} issue(s)",
        issues.len()
    );

    Ok(CompileOutput {
        bytes,
        replaced,
        untranslated,
        issues,
    })
}

/// Rebuild the file around the replacements. Shorter translations are
/// padded with nulls up to the original span; longer ones (expand mode)
/// grow the output and shift everything after them.
fn splice(original: &[u8], replacements: &[Replacement]) -> Vec<u8> {
    let mut out = Vec::with_capacity(original.len());
    let mut cursor = 0usize;

    for r in replacements {
        debug_assert!(r.offset >= cursor, "replacements out of order");
        out.extend_from_slice(&original[cursor..r.offset]);
        out.extend_from_slice(&r.bytes);
        if r.bytes.len() < r.original_len {
            out.resize(out.len() + (r.original_len - r.bytes.len()), 0x00);
        }
        cursor = r.offset + r.original_len;
    }

    out.extend_from_slice(&original[cursor..]);
    out
}
