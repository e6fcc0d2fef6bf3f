//! Content-based type classification
//!
//! Applied to every extracted string; first match wins, so rule order is
//! part of the contract. Rules that need cross-entry context (speaker
//! labels, placeholder splitting) are deliberately not here; they live
//! in the per-line refinement passes.

use crate::config;
use crate::scan::PatternKind;
use crate::script::TextType;

/// Terminal punctuation and bracket characters used by the refinement
/// passes as well; kept here next to the bracket rules they mirror.
pub const TERMINAL_PUNCTUATION: [char; 7] = ['。', '．', '…', '！', '？', '、', '，'];
pub const BRACKETS: [char; 6] = ['「', '」', '『', '』', '＜', '＞'];

/// Classify a decoded string. A recognizer-declared pattern always wins.
pub fn classify(text: &str, pattern: Option<PatternKind>) -> TextType {
    if let Some(kind) = pattern {
        return kind.implied_type();
    }

    if text.contains("_・") {
        return TextType::SpriteReference;
    }
    if text.starts_with('・') && !text.contains('_') {
        return TextType::PositionCode;
    }
    if text == config::NAME_PLACEHOLDER {
        return TextType::NamePlaceholder;
    }
    if text.contains('「') || text.ends_with('」') {
        return TextType::Dialogue;
    }
    if text.contains('『') || text.ends_with('』') {
        return TextType::EmailMessage;
    }
    if text.contains('＜') || text.contains('＞') {
        return TextType::InnerThought;
    }
    if is_season_date_marker(text) {
        return TextType::SeasonDateMarker;
    }
    if config::is_ui_marker(text) {
        return TextType::UIMarker;
    }
    if is_system_code(text) {
        return TextType::SystemCode;
    }

    TextType::Narration
}

/// `<known name>：<ascii token>`, e.g. `郁人：A`.
fn is_season_date_marker(text: &str) -> bool {
    let Some((name, rest)) = text.split_once('：') else {
        return false;
    };
    config::is_known_character(name) && !rest.is_empty() && rest.chars().all(|c| c.is_ascii_graphic())
}

/// `常：` followed by ASCII digits.
fn is_system_code(text: &str) -> bool {
    match text.strip_prefix(config::SYSTEM_CODE_PREFIX) {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizer_mode_wins() {
        // content would say Narration, recognizer says sprite
        assert_eq!(
            classify("kanade_D_2_・079", Some(PatternKind::SpriteFusion)),
            TextType::SpriteReference
        );
        assert_eq!(
            classify("#LABEL", Some(PatternKind::Hashtag)),
            TextType::HashtagLabel
        );
    }

    #[test]
    fn test_fusion_text_without_pattern() {
        assert_eq!(classify("kanade_D_2_・079", None), TextType::SpriteReference);
    }

    #[test]
    fn test_position_code() {
        assert_eq!(classify("・079", None), TextType::PositionCode);
        // underscore anywhere means sprite territory, not a bare position
        assert_eq!(classify("・07_9", None), TextType::Narration);
    }

    #[test]
    fn test_placeholder_exact_only() {
        assert_eq!(classify("％名％", None), TextType::NamePlaceholder);
        // longer placeholder-bearing text falls through to narration
        assert_eq!(
            classify("％名％のことも、二人の関係も。", None),
            TextType::Narration
        );
    }

    #[test]
    fn test_bracket_rules() {
        assert_eq!(classify("「そうですか」", None), TextType::Dialogue);
        assert_eq!(classify("ですよね」", None), TextType::Dialogue);
        assert_eq!(classify("『明日、会える？』", None), TextType::EmailMessage);
        assert_eq!(classify("＜どうしてだろう＞", None), TextType::InnerThought);
    }

    #[test]
    fn test_dialogue_beats_email() {
        // first match wins: 「 before 『
        assert_eq!(classify("「『引用』です」", None), TextType::Dialogue);
    }

    #[test]
    fn test_season_date_marker() {
        assert_eq!(classify("郁人：A", None), TextType::SeasonDateMarker);
        assert_eq!(classify("郁人：2b", None), TextType::SeasonDateMarker);
        // unknown name or non-ascii token stays narration
        assert_eq!(classify("別人：A", None), TextType::Narration);
        assert_eq!(classify("郁人：春", None), TextType::Narration);
    }

    #[test]
    fn test_ui_marker_exact() {
        assert_eq!(classify("選択パネル", None), TextType::UIMarker);
        assert_eq!(classify("選択パネルを開く", None), TextType::Narration);
    }

    #[test]
    fn test_system_code() {
        assert_eq!(classify("常：123", None), TextType::SystemCode);
        assert_eq!(classify("常：abc", None), TextType::Narration);
    }

    #[test]
    fn test_default_narration() {
        assert_eq!(classify("そう、ですよね……", None), TextType::Narration);
    }
}
