//! ASCII pattern recognizer
//!
//! Detects the known ASCII shapes (asset references, labels) that the
//! SJIS-lead heuristic would miss. Recognition only classifies the
//! position; extension to a full byte range is the extractor's job.

use crate::script::TextType;

use super::constants::{
    BACKGROUND_PREFIX, EFFECT_PREFIX, FUSION_MARKER, HASHTAG, SOUND_SUFFIX, SPRITE_PREFIXES,
};

/// Which ASCII pattern matched at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// `ST_N\` / `ST_L\` sprite path
    Sprite,
    /// `.wav` sound reference
    Sound,
    /// `#LABEL`
    Hashtag,
    /// `EFF\` effect path
    Effect,
    /// `BG\` background path
    Background,
    /// `<stem>_・<id>` sprite-with-position fusion; the extractor
    /// back-scans to recover the stem
    SpriteFusion,
}

impl PatternKind {
    /// Type declared by the recognizer; content rules never override it
    pub fn implied_type(&self) -> TextType {
        match self {
            Self::Sprite | Self::SpriteFusion => TextType::SpriteReference,
            Self::Sound => TextType::SoundEffect,
            Self::Hashtag => TextType::HashtagLabel,
            Self::Effect => TextType::EffectReference,
            Self::Background => TextType::BackgroundReference,
        }
    }
}

/// Check whether a known ASCII pattern starts at `pos`.
pub fn recognize(data: &[u8], pos: usize) -> Option<PatternKind> {
    let rest = &data[pos..];

    if SPRITE_PREFIXES.iter().any(|p| rest.starts_with(p)) {
        return Some(PatternKind::Sprite);
    }
    if rest.len() >= SOUND_SUFFIX.len() && rest[..SOUND_SUFFIX.len()].eq_ignore_ascii_case(SOUND_SUFFIX)
    {
        return Some(PatternKind::Sound);
    }
    if rest.first() == Some(&HASHTAG) {
        return Some(PatternKind::Hashtag);
    }
    if rest.starts_with(EFFECT_PREFIX) {
        return Some(PatternKind::Effect);
    }
    if rest.starts_with(BACKGROUND_PREFIX) {
        return Some(PatternKind::Background);
    }
    if rest.starts_with(&FUSION_MARKER) {
        return Some(PatternKind::SpriteFusion);
    }

    None
}
