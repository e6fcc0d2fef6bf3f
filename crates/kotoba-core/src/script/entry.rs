use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Closed taxonomy of extracted strings.
///
/// `Dialogue`, `Narration`, `InnerThought` and `EmailMessage` are
/// translator-facing; everything else is engine plumbing and is never
/// rewritten.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
pub enum TextType {
    Dialogue,
    Narration,
    InnerThought,
    EmailMessage,
    CharacterName,
    NamePlaceholder,
    SpriteReference,
    SoundEffect,
    HashtagLabel,
    EffectReference,
    BackgroundReference,
    PositionCode,
    UIMarker,
    SeasonDateMarker,
    SystemCode,
}

impl TextType {
    /// Whether entries of this type carry a translation slot
    pub fn is_translatable(&self) -> bool {
        matches!(
            self,
            Self::Dialogue | Self::Narration | Self::InnerThought | Self::EmailMessage
        )
    }

    pub fn tag(&self) -> &'static str {
        self.into()
    }
}

/// One extracted, classified string.
///
/// `offset`/`byte_len` key the entry back into the source binary for the
/// recompiler; they are deliberately absent from the JSON so translator
/// files stay position-independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "type")]
    pub kind: TextType,
    pub original: String,
    /// Byte index of the first emitted byte in the source file
    #[serde(skip)]
    pub offset: usize,
    /// Emitted byte count, terminator excluded
    #[serde(skip)]
    pub byte_len: usize,
    /// Present-and-null on translatable types, absent otherwise.
    /// A populated value is a translator-supplied translation.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub translation: Option<Option<String>>,
}

/// Distinguish a `translation: null` field from an absent one: the
/// deserializer only runs when the field is present, so `null` becomes
/// `Some(None)` while a missing field stays `None` via `default`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl Entry {
    pub fn new(kind: TextType, original: String, offset: usize, byte_len: usize) -> Self {
        Self {
            kind,
            original,
            offset,
            byte_len,
            translation: None,
        }
    }

    /// Character count of the decoded text
    pub fn char_len(&self) -> usize {
        self.original.chars().count()
    }

    /// The supplied translation, if the translator filled one in
    pub fn supplied_translation(&self) -> Option<&str> {
        match &self.translation {
            Some(Some(t)) if !t.is_empty() => Some(t),
            _ => None,
        }
    }
}
