// Static data catalogues - brand templates and locale tables
use crate::application::localization::{Localizer, DEFAULT_LANGUAGE};
use crate::domain::brand::BrandTemplate;
use crate::error::CatalogueError;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN_BRANDS: [(&str, &str); 7] = [
    ("easee.json", include_str!("../../brands/easee.json")),
    ("wallbox.json", include_str!("../../brands/wallbox.json")),
    ("ocpp.json", include_str!("../../brands/ocpp.json")),
    ("vwegolf.json", include_str!("../../brands/vwegolf.json")),
    ("zaptec.json", include_str!("../../brands/zaptec.json")),
    ("openevse.json", include_str!("../../brands/openevse.json")),
    ("template.json", include_str!("../../brands/template.json")),
];

const BUILTIN_LOCALES: [(&str, &str); 3] = [
    ("en", include_str!("../../locales/en.json")),
    ("nb", include_str!("../../locales/nb.json")),
    ("de", include_str!("../../locales/de.json")),
];

/// Ordered list of brand templates, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct BrandCatalogue {
    templates: Vec<BrandTemplate>,
}

impl BrandCatalogue {
    pub fn new(templates: Vec<BrandTemplate>) -> Result<Self, CatalogueError> {
        for (i, template) in templates.iter().enumerate() {
            let domain = &template.config.domain;
            if templates[..i].iter().any(|t| &t.config.domain == domain) {
                return Err(CatalogueError::DuplicateBrand(domain.clone()));
            }
        }
        Ok(Self { templates })
    }

    /// Templates shipped with the card
    pub fn builtin() -> Result<Self, CatalogueError> {
        let templates = BUILTIN_BRANDS
            .iter()
            .map(|(name, text)| parse_json(name, text))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(templates)
    }

    /// Load every `.json` and `.toml` template in `dir`, ordered by file name.
    pub fn from_dir(dir: &Path) -> Result<Self, CatalogueError> {
        let entries = fs::read_dir(dir).map_err(|source| CatalogueError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CatalogueError::Io {
                path: dir.display().to_string(),
                source,
            })?;
            paths.push(entry.path());
        }
        paths.sort();

        let mut templates = Vec::new();
        for path in paths {
            let name = path.display().to_string();
            let template: BrandTemplate = match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => parse_json(&name, &read(&path)?)?,
                Some("toml") => toml::from_str(&read(&path)?)
                    .map_err(|source| CatalogueError::Toml { name, source })?,
                _ => {
                    tracing::debug!("Skipping {}", path.display());
                    continue;
                }
            };
            templates.push(template);
        }

        tracing::debug!("Loaded {} brand templates from {}", templates.len(), dir.display());
        Self::new(templates)
    }

    pub fn get(&self, domain: &str) -> Option<&BrandTemplate> {
        self.templates.iter().find(|t| t.config.domain == domain)
    }

    /// `(domain, display name)` pairs in catalogue order, for the editor's brand picker.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.templates
            .iter()
            .map(|t| (t.config.domain.as_str(), t.config.name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Localizer over the locale tables shipped with the card, falling back to English.
pub fn builtin_localizer() -> Result<Localizer, CatalogueError> {
    let mut tables = HashMap::new();
    for (language, text) in BUILTIN_LOCALES {
        let table: Value = parse_json(language, text)?;
        tables.insert(language.to_string(), table);
    }
    Ok(Localizer::new(tables, DEFAULT_LANGUAGE))
}

fn parse_json<T: serde::de::DeserializeOwned>(name: &str, text: &str) -> Result<T, CatalogueError> {
    serde_json::from_str(text).map_err(|source| CatalogueError::Json {
        name: name.to_string(),
        source,
    })
}

fn read(path: &Path) -> Result<String, CatalogueError> {
    fs::read_to_string(path).map_err(|source| CatalogueError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::localization::Locale;
    use crate::domain::card::CardLayout;

    #[test]
    fn test_builtin_brands() {
        let catalogue = BrandCatalogue::builtin().unwrap();
        let domains: Vec<_> = catalogue.options().map(|(domain, _)| domain).collect();

        assert_eq!(
            domains,
            vec!["easee", "wallbox", "ocpp", "vwegolf", "zaptec", "openevse", "template"]
        );
        assert_eq!(catalogue.get("easee").unwrap().config.name, "Easee charger");
    }

    #[test]
    fn test_builtin_details_decode() {
        let catalogue = BrandCatalogue::builtin().unwrap();
        for (domain, _) in catalogue.options() {
            let details = catalogue.get(domain).unwrap().details.as_object().unwrap();
            assert!(CardLayout::decode(details).is_ok(), "details of {} do not decode", domain);
        }
    }

    #[test]
    fn test_duplicate_brands_rejected() {
        let catalogue = BrandCatalogue::builtin().unwrap();
        let easee = catalogue.get("easee").unwrap().clone();
        assert!(matches!(
            BrandCatalogue::new(vec![easee.clone(), easee]),
            Err(CatalogueError::DuplicateBrand(_))
        ));
    }

    #[test]
    fn test_from_dir_reads_json_and_toml() {
        let dir = std::env::temp_dir().join(format!("charger-card-brands-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("a.json"),
            r#"{"config": {"domain": "a", "name": "A", "domainbase": "_status", "serviceid": "entity"}, "details": {}}"#,
        )
        .unwrap();
        fs::write(
            dir.join("b.toml"),
            r#"
[config]
domain = "b"
name = "B"
domainbase = "_state"
serviceid = "attr"
serviceid_data = { attr = "serial" }

[defaults]
show_leds = false

[details.status]
entity_id = "sensor.#ENTITYPREFIX#_state"
"#,
        )
        .unwrap();
        fs::write(dir.join("README.txt"), "ignored").unwrap();

        let catalogue = BrandCatalogue::from_dir(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(catalogue.len(), 2);
        let b = catalogue.get("b").unwrap();
        assert_eq!(b.config.serviceid_data.attr.as_deref(), Some("serial"));
        assert_eq!(b.details["status"]["entity_id"], "sensor.#ENTITYPREFIX#_state");
    }

    #[test]
    fn test_builtin_localizer() {
        let localizer = builtin_localizer().unwrap();
        let mut languages: Vec<_> = localizer.languages().collect();
        languages.sort();
        assert_eq!(languages, vec!["de", "en", "nb"]);

        assert_eq!(
            localizer.localize(&Locale::new("nb"), "charging", Some("status"), Some("easee")),
            "Lader"
        );
    }
}
