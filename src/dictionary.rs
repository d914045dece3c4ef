use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{DexError, Result};

static DEX_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/dex");

pub const BUILTIN: &str = "pokemon";

/// On-disk shape of a name list
#[derive(Deserialize, Clone, Debug)]
pub struct NameList {
    pub name: String,
    pub names: Vec<String>,
}

/// Lowercases and strips everything outside `[a-z0-9]`.
///
/// Non-ascii letters are dropped rather than folded, so "Flabébé" keys as
/// "flabb" and "Nidoran♀" as "nidoran".
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Read-only mapping of normalized key to canonical display name
#[derive(Clone, Debug)]
pub struct Dictionary {
    pub name: String,
    entries: HashMap<String, String>,
}

impl Dictionary {
    /// Builds the mapping from an ordered list of canonical names.
    /// Later names win when two normalize to the same key.
    pub fn from_names<I, S>(name: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let mut entries = HashMap::new();

        for canonical in names {
            let canonical = canonical.into();
            let key = normalize(&canonical);
            if key.is_empty() {
                tracing::warn!(dictionary = %name, %canonical, "skipping name with empty key");
                continue;
            }
            if let Some(previous) = entries.insert(key.clone(), canonical.clone()) {
                tracing::warn!(
                    dictionary = %name,
                    %key,
                    %previous,
                    replaced_by = %canonical,
                    "names collide after normalization"
                );
            }
        }

        Self { name, entries }
    }

    /// The list compiled into the binary
    pub fn builtin() -> Result<Self> {
        let file_name = format!("{BUILTIN}.json");
        let file = DEX_DIR
            .get_file(&file_name)
            .ok_or_else(|| DexError::MissingBuiltin(file_name.clone()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| DexError::InvalidBuiltin(file_name.clone()))?;

        Self::from_json(contents)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DexError::DictionaryFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let list: NameList = from_str(contents)?;
        let dictionary = Self::from_names(list.name, list.names);
        if dictionary.is_empty() {
            return Err(DexError::EmptyDictionary(dictionary.name));
        }

        tracing::info!(dictionary = %dictionary.name, size = dictionary.len(), "dictionary loaded");
        Ok(dictionary)
    }

    /// Canonical name for already-normalized `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Normalizes raw player input and returns `(key, canonical)` on a hit
    pub fn lookup(&self, input: &str) -> Option<(String, &str)> {
        let key = normalize(input);
        self.get(&key).map(|canonical| (key, canonical))
    }

    /// Number of distinct keys, used as the score denominator
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
