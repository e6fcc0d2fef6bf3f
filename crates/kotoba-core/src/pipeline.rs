//! Per-file extraction pipeline
//!
//! `bytes → FileRecord` is a pure function; everything stateful
//! (directories, parallelism, atomic writes) lives in [`crate::batch`].

use std::collections::BTreeMap;

use crate::classify::classify;
use crate::refine::refine;
use crate::scan::scan;
use crate::script::{Entry, FileRecord, Metadata};

/// Extract, classify and refine one script image.
pub fn extract_record(data: &[u8], file_name: &str) -> FileRecord {
    let outcome = scan(data);

    let mut lines: BTreeMap<u32, Vec<Entry>> = BTreeMap::new();
    for raw in outcome.strings {
        let kind = classify(&raw.text, raw.pattern);
        lines
            .entry(raw.line)
            .or_default()
            .push(Entry::new(kind, raw.text, raw.offset, raw.byte_len));
    }

    refine(&mut lines);

    let translatable = lines
        .values()
        .flatten()
        .filter(|e| e.kind.is_translatable())
        .count();

    FileRecord {
        lines,
        metadata: Metadata {
            file: file_name.to_string(),
            total_lines: outcome.total_lines,
            translatable,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{decode_strict, encode_strict};
    use crate::script::TextType;

    fn sjis(text: &str) -> Vec<u8> {
        encode_strict(text).unwrap()
    }

    /// Assemble a script image: strings null-terminated, lines joined
    /// with a newline byte.
    fn image(lines: &[&[&str]]) -> Vec<u8> {
        let mut data = Vec::new();
        for (i, strings) in lines.iter().enumerate() {
            if i > 0 {
                data.push(0x0A);
            }
            for s in *strings {
                data.extend_from_slice(&sjis(s));
                data.push(0x00);
            }
        }
        data
    }

    #[test]
    fn test_plain_narration_record() {
        let data = image(&[&["そう、ですよね……"]]);
        let record = extract_record(&data, "__c_001");
        assert_eq!(record.metadata.file, "__c_001");
        assert_eq!(record.metadata.total_lines, 1);
        assert_eq!(record.metadata.translatable, 1);
        let entry = &record.lines[&1][0];
        assert_eq!(entry.kind, TextType::Narration);
        assert_eq!(entry.original, "そう、ですよね……");
        assert_eq!(entry.translation, Some(None));
    }

    #[test]
    fn test_speaker_and_dialogue_line() {
        let data = image(&[&["ヒーローお兄さん", "「…そうかな」"]]);
        let record = extract_record(&data, "__c_002");
        let entries = &record.lines[&1];
        assert_eq!(entries[0].kind, TextType::CharacterName);
        assert_eq!(entries[1].kind, TextType::Dialogue);
        assert_eq!(record.metadata.translatable, 1);
    }

    #[test]
    fn test_placeholder_speaker_line() {
        let data = image(&[&["％名％", "「おはよう」"]]);
        let record = extract_record(&data, "__c_003");
        let entries = &record.lines[&1];
        assert_eq!(entries[0].kind, TextType::CharacterName);
        assert_eq!(entries[0].original, "％名％");
        assert_eq!(entries[1].kind, TextType::Dialogue);
    }

    #[test]
    fn test_full_sentence_placeholder_is_narration() {
        let data = image(&[&["％名％のことも、二人の関係も。"]]);
        let record = extract_record(&data, "__t_001");
        let entry = &record.lines[&1][0];
        assert_eq!(entry.kind, TextType::Narration);
        assert_eq!(entry.translation, Some(None));
    }

    #[test]
    fn test_decoding_soundness_property() {
        let data = image(&[
            &["深月", "「それで、どうしたの？」"],
            &["BG\\school_gate", "静かな朝だった。"],
        ]);
        let record = extract_record(&data, "__y_010");
        for (_, entry) in record.entries() {
            // merged entries aside, every span decodes back to the text
            if entry.byte_len > 0 {
                let bytes = &data[entry.offset..entry.offset + entry.byte_len];
                assert_eq!(decode_strict(bytes).as_deref(), Some(entry.original.as_str()));
            }
        }
    }

    #[test]
    fn test_offset_monotonicity_property() {
        let data = image(&[
            &["千歳", "「やっと来た」"],
            &["ST_N\\chitose_A_1", "彼女は笑った。"],
            &["・079"],
        ]);
        let record = extract_record(&data, "__a_001");
        let offsets: Vec<usize> = record.entries().map(|(_, e)| e.offset).collect();
        for pair in offsets.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_mixed_asset_line_not_translatable() {
        let data = image(&[&["ST_N\\kanade_A_1", "EFF\\flash", "#CHAPTER_02"]]);
        let record = extract_record(&data, "RegTbl");
        assert_eq!(record.metadata.translatable, 0);
        let kinds: Vec<TextType> = record.lines[&1].iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TextType::SpriteReference,
                TextType::EffectReference,
                TextType::HashtagLabel
            ]
        );
    }

    #[test]
    fn test_empty_file() {
        let record = extract_record(&[], "NewGame");
        assert!(record.is_empty());
        assert_eq!(record.metadata.total_lines, 1);
        assert_eq!(record.metadata.translatable, 0);
    }
}
