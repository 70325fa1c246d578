use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Glyph shown for each visibility state reported by the feed.
///
/// Lookups ignore ASCII case on both the configured key and the state.
/// Unknown states map to an empty glyph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct VisibilityIcons {
    table: BTreeMap<String, String>,
}

impl Default for VisibilityIcons {
    fn default() -> Self {
        Self::from_pairs([
            ("eclipsed", "\u{1F311}"),
            ("daylight", "\u{1F315}"),
            ("visible", "\u{1F313}"),
        ])
    }
}

impl VisibilityIcons {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn icon(&self, state: &str) -> &str {
        let state = state.trim();
        self.table
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(state))
            .map(|(_, glyph)| glyph.as_str())
            .unwrap_or("")
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}
