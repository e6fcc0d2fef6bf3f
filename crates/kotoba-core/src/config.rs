//! Compiled-in classification tables
//!
//! The classifier needs two pieces of game-specific knowledge: which
//! Japanese names can open a season/date marker, and which strings are
//! UI furniture. Both are read-only and ship compiled in; nothing else
//! in the pipeline is configurable per game.

/// Character names that may appear as `<name>：<ascii>` season/date
/// markers (e.g. `郁人：A`).
pub const KNOWN_CHARACTER_NAMES: [&str; 6] = ["郁人", "奏", "環", "深月", "千歳", "紗良"];

/// Exact strings the engine uses as UI markers.
pub const UI_MARKERS: [&str; 3] = ["選択パネル", "選択肢", "システムメニュー"];

/// The engine's player-name placeholder token.
pub const NAME_PLACEHOLDER: &str = "％名％";

/// Prefix of system codes (`常：` followed by ASCII digits).
pub const SYSTEM_CODE_PREFIX: &str = "常：";

/// True when `name` may open a season/date marker.
pub fn is_known_character(name: &str) -> bool {
    KNOWN_CHARACTER_NAMES.contains(&name)
}

/// True when `text` is a known UI marker.
pub fn is_ui_marker(text: &str) -> bool {
    UI_MARKERS.contains(&text)
}
