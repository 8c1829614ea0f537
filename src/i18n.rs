//! User-facing strings. Every label is looked up by its English text.

use std::collections::HashMap;

use anyhow::{Context, Result};

pub const LANGUAGES: [&str; 2] = ["en", "de"];

const DE_TABLE: &str = include_str!("i18n/de.json");

pub trait Translate {
    fn t(&self, key: &str) -> String;
}

/// Built-in string table; unknown keys come back unchanged
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    language: String,
    entries: HashMap<String, String>,
}

impl StringTable {
    pub fn for_language(language: &str) -> Result<Self> {
        let entries = match language {
            "de" => serde_json::from_str(DE_TABLE).context("Failed to parse German string table")?,
            _ => HashMap::new(),
        };
        Ok(Self {
            language: language.to_string(),
            entries,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Translate for StringTable {
    fn t(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_is_identity() {
        let table = StringTable::for_language("en").expect("en");
        assert_eq!(table.t("Add folder"), "Add folder");
    }

    #[test]
    fn german_table_translates_and_falls_back() {
        let table = StringTable::for_language("de").expect("embedded table parses");
        assert_eq!(table.t("copy"), "Kopie");
        assert_eq!(table.t("Mo"), "Mo");
        assert_eq!(table.t("not a key"), "not a key");
        assert_eq!(table.language(), "de");
    }
}
