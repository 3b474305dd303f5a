//! The closed set of landmarks the service can recognize.
//!
//! The catalog is parsed once from `LANDMARKS_JSON` and then shared read-only
//! behind an `Arc`. Lookups are case-insensitive.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::CatalogError;
use crate::types::Lang;

// Shorter ids are only matched exactly.
const MIN_CONTAINED_ID_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LandmarkEntry {
    pub id: String,
    #[serde(default)]
    pub name_ru: String,
    #[serde(default)]
    pub name_kk: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub hint_en: String,
}

impl LandmarkEntry {
    /// Display name for `lang`, falling back to Russian, English and finally the id.
    pub fn name(&self, lang: Lang) -> &str {
        let localized = match lang {
            Lang::Ru => &self.name_ru,
            Lang::Kk => &self.name_kk,
            Lang::En => &self.name_en,
        };
        [localized, &self.name_ru, &self.name_en]
            .into_iter()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
            .unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<LandmarkEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Parse the single-line JSON array supplied at deployment time.
    #[instrument(level = "debug", skip(raw))]
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let entries: Vec<LandmarkEntry> = serde_json::from_str(raw)?;
        let catalog = Self::new(entries)?;
        debug!(landmarks = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Build a catalog from entries, keeping their declaration order.
    pub fn new(entries: Vec<LandmarkEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut entries = entries;
        let mut index = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter_mut().enumerate() {
            entry.id = entry.id.trim().to_string();
            if entry.id.is_empty() {
                return Err(CatalogError::MissingId(pos));
            }
            if index.insert(normalize_token(&entry.id), pos).is_some() {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LandmarkEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&LandmarkEntry> {
        self.position(id).map(|pos| &self.entries[pos])
    }

    /// Declaration order of `id`, used as the confidence tie-break.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(&normalize_token(id)).copied()
    }

    /// Resolve a token taken from model output to a catalog entry.
    ///
    /// Exact (case-insensitive) ids win; otherwise the longest catalog id
    /// contained in the token is used, so `bayterek_tower` resolves to `bayterek`.
    pub fn resolve(&self, token: &str) -> Option<&LandmarkEntry> {
        let normalized = normalize_token(token);
        if normalized.is_empty() || normalized == "none" {
            return None;
        }
        if let Some(&pos) = self.index.get(&normalized) {
            return Some(&self.entries[pos]);
        }
        self.index
            .iter()
            .filter(|(id, _)| id.len() >= MIN_CONTAINED_ID_LEN && normalized.contains(id.as_str()))
            .max_by(|(a, pa), (b, pb)| a.len().cmp(&b.len()).then(pb.cmp(pa)))
            .map(|(_, &pos)| &self.entries[pos])
    }
}

fn normalize_token(token: &str) -> String {
    token
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '*'))
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}
