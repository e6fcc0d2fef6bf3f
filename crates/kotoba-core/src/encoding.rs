//! Shift-JIS decode/encode helpers
//!
//! Decoding is strict: a byte range that does not round-trip as valid
//! Shift-JIS is rejected rather than replaced, so the extractor can
//! silently drop false candidates instead of emitting U+FFFD garbage.

use encoding_rs::SHIFT_JIS;

/// Decode a byte range as Shift-JIS, failing on any invalid sequence.
pub fn decode_strict(bytes: &[u8]) -> Option<String> {
    SHIFT_JIS
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|cow| cow.into_owned())
}

/// Encode a string as Shift-JIS.
///
/// Returns `None` when the text contains a code point with no Shift-JIS
/// encoding (the encoder would otherwise substitute a numeric character
/// reference, which the engine cannot display).
pub fn encode_strict(text: &str) -> Option<Vec<u8>> {
    let (bytes, _, had_unmappable) = SHIFT_JIS.encode(text);
    if had_unmappable {
        None
    } else {
        Some(bytes.into_owned())
    }
}

/// True when `c` lies in the CJK block used for candidate validation
/// (CJK symbols, kana, and unified ideographs).
#[inline]
pub fn is_cjk(c: char) -> bool {
    ('\u{3000}'..='\u{9FFF}').contains(&c)
}

/// True when the string contains at least one CJK code point.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}
