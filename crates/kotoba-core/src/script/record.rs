use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Entry;

/// Per-file extraction result: entries grouped by engine line, plus
/// summary metadata. Line keys serialize as strings in ascending numeric
/// order; entry order within a line is discovery order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(serialize_with = "ser_lines", deserialize_with = "de_lines")]
    pub lines: BTreeMap<u32, Vec<Entry>>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub file: String,
    pub total_lines: u32,
    pub translatable: usize,
}

impl FileRecord {
    /// Iterate entries in emission order (lines ascending, entries in
    /// discovery order).
    pub fn entries(&self) -> impl Iterator<Item = (u32, &Entry)> {
        self.lines
            .iter()
            .flat_map(|(line, entries)| entries.iter().map(move |e| (*line, e)))
    }

    /// Translatable entries in emission order.
    pub fn translatable_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries()
            .map(|(_, e)| e)
            .filter(|e| e.kind.is_translatable())
    }

    pub fn entry_count(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// JSON keys are strings; the BTreeMap keeps them in ascending numeric
/// order, which a lexicographic string map would not ("10" < "2").
fn ser_lines<S>(lines: &BTreeMap<u32, Vec<Entry>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(lines.len()))?;
    for (line, entries) in lines {
        map.serialize_entry(&line.to_string(), entries)?;
    }
    map.end()
}

fn de_lines<'de, D>(deserializer: D) -> Result<BTreeMap<u32, Vec<Entry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Vec<Entry>>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(k, v)| {
            k.parse::<u32>()
                .map(|line| (line, v))
                .map_err(|_| serde::de::Error::custom(format!("invalid line key: {k:?}")))
        })
        .collect()
}
