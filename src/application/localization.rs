// Localization bridge - brand-scoped string lookup with graceful fallback
use serde_json::Value;
use std::collections::HashMap;

/// Language chosen by the host user, passed in at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub language: String,
}

impl Locale {
    /// `nb-NO` and `nb_NO` both select the `nb` table.
    pub fn new(language: &str) -> Self {
        let primary = language
            .split(['-', '_'])
            .next()
            .unwrap_or(language)
            .to_lowercase();
        Self { language: primary }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

pub const DEFAULT_LANGUAGE: &str = "en";

/// Per-language string tables. Keys are dot-delimited paths into nested
/// objects, optionally prefixed with a brand.
#[derive(Debug, Clone, Default)]
pub struct Localizer {
    tables: HashMap<String, Value>,
    fallback_language: String,
}

impl Localizer {
    pub fn new(tables: HashMap<String, Value>, fallback_language: &str) -> Self {
        Self {
            tables,
            fallback_language: fallback_language.to_string(),
        }
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Look up `key` under `brand.group`. Numeric strings pass through so
    /// that numeric states are never translated. Lookup order is the active
    /// language, then the fallback language, each tried as written and
    /// lowercased, brand-scoped before unscoped. When nothing matches the
    /// last segment of `key` is returned.
    pub fn localize(&self, locale: &Locale, key: &str, group: Option<&str>, brand: Option<&str>) -> String {
        if is_numeric(key) {
            return key.to_string();
        }

        let mut candidates = Vec::with_capacity(2);
        if brand.is_some() {
            candidates.push(scoped_key(brand, group, key));
        }
        candidates.push(scoped_key(None, group, key));

        let mut languages = vec![locale.language.as_str()];
        if locale.language != self.fallback_language {
            languages.push(self.fallback_language.as_str());
        }

        for candidate in &candidates {
            for language in &languages {
                let Some(table) = self.tables.get(*language) else {
                    continue;
                };
                if let Some(text) = lookup(table, candidate) {
                    return text.to_string();
                }
                if let Some(text) = lookup(table, &candidate.to_lowercase()) {
                    return text.to_string();
                }
            }
        }

        match key.rsplit('.').next() {
            Some(segment) if !segment.is_empty() => segment.to_string(),
            _ => key.to_string(),
        }
    }
}

fn is_numeric(key: &str) -> bool {
    key.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

fn scoped_key(brand: Option<&str>, group: Option<&str>, key: &str) -> String {
    [brand, group, Some(key)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(".")
}

fn lookup<'t>(table: &'t Value, path: &str) -> Option<&'t str> {
    path.split('.')
        .try_fold(table, |node, segment| node.get(segment))?
        .as_str()
}
