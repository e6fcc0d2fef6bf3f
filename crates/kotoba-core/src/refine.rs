//! Per-line refinement passes
//!
//! The classifier sees one string at a time; these passes see the whole
//! line and repair cross-entry artifacts such as speaker labels stuck in
//! narration and placeholder tokens split out of the speech they belong
//! to.
//!
//! Pass order is a contract. Merging placeholders before promoting
//! speakers, for example, turns speaker labels into dialogue prefixes;
//! do not reorder.

use std::collections::BTreeMap;

use tracing::debug;

use crate::classify::{BRACKETS, TERMINAL_PUNCTUATION};
use crate::script::{Entry, TextType};

/// Run every refinement pass over the grouped entries, in order.
pub fn refine(lines: &mut BTreeMap<u32, Vec<Entry>>) {
    for entries in lines.values_mut() {
        drop_short_narration(entries);
        promote_speakers(entries);
        rejoin_split_dialogue(entries);
        promote_placeholder_speakers(entries);
        merge_placeholders(entries);
        attach_translation_slots(entries);
    }
    lines.retain(|_, entries| !entries.is_empty());
}

/// A ≤2-char `Narration` on a line that has real dialogue is a scanner
/// artifact from a parameter region.
fn drop_short_narration(entries: &mut Vec<Entry>) {
    if !entries.iter().any(|e| e.kind == TextType::Dialogue) {
        return;
    }
    entries.retain(|e| {
        let garbage = e.kind == TextType::Narration && e.char_len() <= 2;
        if garbage {
            debug!("dropping short narration fragment {:?}", e.original);
        }
        !garbage
    });
}

/// A `Narration` immediately before a `Dialogue`, free of terminal
/// punctuation and brackets, is the speaker label. No length bound;
/// names with honorifics and titles must pass.
fn promote_speakers(entries: &mut [Entry]) {
    for i in 0..entries.len().saturating_sub(1) {
        if entries[i].kind != TextType::Narration || entries[i + 1].kind != TextType::Dialogue {
            continue;
        }
        let text = &entries[i].original;
        if text.contains(&TERMINAL_PUNCTUATION[..]) || text.contains(&BRACKETS[..]) {
            continue;
        }
        entries[i].kind = TextType::CharacterName;
    }
}

/// A `Narration` strictly between two `Dialogue` entries is the middle
/// of a speech the engine stored in pieces.
fn rejoin_split_dialogue(entries: &mut [Entry]) {
    for i in 1..entries.len().saturating_sub(1) {
        if entries[i].kind == TextType::Narration
            && entries[i - 1].kind == TextType::Dialogue
            && entries[i + 1].kind == TextType::Dialogue
        {
            entries[i].kind = TextType::Dialogue;
        }
    }
}

/// A placeholder standing before any dialogue on a dialogue line is the
/// speaker (the player's name); later placeholders are merge candidates.
fn promote_placeholder_speakers(entries: &mut [Entry]) {
    let Some(first_dialogue) = entries.iter().position(|e| e.kind == TextType::Dialogue) else {
        return;
    };
    for entry in &mut entries[..first_dialogue] {
        if entry.kind == TextType::NamePlaceholder {
            entry.kind = TextType::CharacterName;
        }
    }
}

/// Remaining placeholders sit inside speech; merge into the
/// preceding dialogue when there is one, otherwise the following.
/// A placeholder with no dialogue neighbour stays as it is.
fn merge_placeholders(entries: &mut Vec<Entry>) {
    let mut i = 0;
    while i < entries.len() {
        if entries[i].kind != TextType::NamePlaceholder {
            i += 1;
            continue;
        }

        if i > 0 && entries[i - 1].kind == TextType::Dialogue {
            let token = entries.remove(i);
            entries[i - 1].original.push_str(&token.original);
        } else if i + 1 < entries.len() && entries[i + 1].kind == TextType::Dialogue {
            let token = entries.remove(i);
            entries[i].original.insert_str(0, &token.original);
        } else {
            i += 1;
        }
    }
}

/// Translatable entries carry a present-and-null translation slot;
/// everything else carries none.
fn attach_translation_slots(entries: &mut [Entry]) {
    for entry in entries {
        if entry.kind.is_translatable() {
            if entry.translation.is_none() {
                entry.translation = Some(None);
            }
        } else {
            entry.translation = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: TextType, text: &str) -> Entry {
        Entry::new(kind, text.to_string(), 0, text.len())
    }

    fn one_line(entries: Vec<Entry>) -> BTreeMap<u32, Vec<Entry>> {
        let mut lines = BTreeMap::new();
        lines.insert(1, entries);
        lines
    }

    fn kinds(lines: &BTreeMap<u32, Vec<Entry>>) -> Vec<TextType> {
        lines[&1].iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_short_narration_dropped_next_to_dialogue() {
        let mut lines = one_line(vec![
            entry(TextType::Narration, "うに"),
            entry(TextType::Dialogue, "「そうですか」"),
        ]);
        refine(&mut lines);
        assert_eq!(kinds(&lines), vec![TextType::Dialogue]);
    }

    #[test]
    fn test_short_narration_kept_without_dialogue() {
        let mut lines = one_line(vec![entry(TextType::Narration, "ふう")]);
        refine(&mut lines);
        assert_eq!(kinds(&lines), vec![TextType::Narration]);
    }

    #[test]
    fn test_speaker_promotion() {
        let mut lines = one_line(vec![
            entry(TextType::Narration, "ヒーローお兄さん"),
            entry(TextType::Dialogue, "「…」"),
        ]);
        refine(&mut lines);
        assert_eq!(kinds(&lines), vec![TextType::CharacterName, TextType::Dialogue]);
    }

    #[test]
    fn test_punctuated_narration_not_promoted() {
        let mut lines = one_line(vec![
            entry(TextType::Narration, "彼は言った。"),
            entry(TextType::Dialogue, "「…」"),
        ]);
        refine(&mut lines);
        assert_eq!(kinds(&lines), vec![TextType::Narration, TextType::Dialogue]);
    }

    #[test]
    fn test_split_dialogue_rejoined() {
        let mut lines = one_line(vec![
            entry(TextType::Dialogue, "「それでも"),
            entry(TextType::Narration, "やっぱり、さ"),
            entry(TextType::Dialogue, "そう思うんだ」"),
        ]);
        refine(&mut lines);
        assert_eq!(
            kinds(&lines),
            vec![TextType::Dialogue, TextType::Dialogue, TextType::Dialogue]
        );
    }

    #[test]
    fn test_placeholder_promoted_before_dialogue() {
        let mut lines = one_line(vec![
            entry(TextType::NamePlaceholder, "％名％"),
            entry(TextType::Dialogue, "「おはよう」"),
        ]);
        refine(&mut lines);
        assert_eq!(kinds(&lines), vec![TextType::CharacterName, TextType::Dialogue]);
    }

    #[test]
    fn test_placeholder_merged_into_preceding_dialogue() {
        let mut lines = one_line(vec![
            entry(TextType::Dialogue, "「ねえ、"),
            entry(TextType::NamePlaceholder, "％名％"),
            entry(TextType::Dialogue, "ちゃん」"),
        ]);
        refine(&mut lines);
        let entries = &lines[&1];
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].original, "「ねえ、％名％");
        assert_eq!(entries[1].original, "ちゃん」");
    }

    #[test]
    fn test_placeholder_merged_into_following_dialogue() {
        // placeholder sits after the first dialogue, so no promotion;
        // its left neighbour is narration, so the merge goes rightward
        let mut lines = one_line(vec![
            entry(TextType::Dialogue, "「おい」"),
            entry(TextType::Narration, "と呼ばれて。"),
            entry(TextType::NamePlaceholder, "％名％"),
            entry(TextType::Dialogue, "は振り向いた」"),
        ]);
        refine(&mut lines);
        let entries = &lines[&1];
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].original, "％名％は振り向いた」");
    }

    #[test]
    fn test_placeholder_without_dialogue_neighbour_left() {
        let mut lines = one_line(vec![
            entry(TextType::Narration, "静かな朝だった。"),
            entry(TextType::NamePlaceholder, "％名％"),
        ]);
        refine(&mut lines);
        assert_eq!(
            kinds(&lines),
            vec![TextType::Narration, TextType::NamePlaceholder]
        );
    }

    #[test]
    fn test_translation_slots() {
        let mut lines = one_line(vec![
            entry(TextType::Narration, "そうだろうか。"),
            entry(TextType::SpriteReference, "ST_N\\kanade"),
        ]);
        refine(&mut lines);
        let entries = &lines[&1];
        assert_eq!(entries[0].translation, Some(None));
        assert_eq!(entries[1].translation, None);
    }

    #[test]
    fn test_dialogue_line_cleanliness_invariant() {
        // after refinement no line with dialogue keeps a ≤2-char narration
        let mut lines = one_line(vec![
            entry(TextType::Narration, "あ"),
            entry(TextType::Dialogue, "「ずっと待ってた」"),
            entry(TextType::Narration, "にゃ"),
        ]);
        refine(&mut lines);
        for e in &lines[&1] {
            assert!(!(e.kind == TextType::Narration && e.char_len() <= 2));
        }
    }
}
