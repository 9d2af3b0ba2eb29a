// Preview entry point - stands in for the dashboard host and prints the view-model
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use charger_card::application::card_service::CardService;
use charger_card::application::template_service::BrandSelection;
use charger_card::infrastructure::catalogue::{builtin_localizer, BrandCatalogue};
use charger_card::infrastructure::config::{load_preview_config, read_json, read_text};
use charger_card::infrastructure::memory_store::{InMemoryDeviceRegistry, InMemoryStateStore};
use charger_card::{CardEditor, CardRender, ChargerCard, DeviceRegistry, HostEvents, Locale};

/// Logs the events a real host would act on.
struct LoggingHost;

impl HostEvents for LoggingHost {
    fn more_info(&self, entity_id: &str) {
        tracing::info!("more-info requested for {}", entity_id);
    }

    fn config_changed(&self, config: &Value) {
        tracing::info!("config-changed: {}", config);
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load configuration
    let settings = load_preview_config()?.preview;

    // Static catalogues, loaded once
    let catalogue = Arc::new(match &settings.brand_dir {
        Some(dir) => BrandCatalogue::from_dir(Path::new(dir))?,
        None => BrandCatalogue::builtin()?,
    });
    if catalogue.is_empty() {
        anyhow::bail!("No brand templates found");
    }
    let localizer = Arc::new(builtin_localizer()?);
    let mut languages: Vec<_> = localizer.languages().collect();
    languages.sort_unstable();
    tracing::info!(
        "Loaded {} brand templates and locales {:?}",
        catalogue.len(),
        languages
    );

    // Host state
    let states = InMemoryStateStore::from_json(&read_text(&settings.states)?)?;
    if states.is_empty() {
        tracing::warn!("State snapshot {} holds no entities", settings.states);
    }
    let devices = match &settings.devices {
        Some(path) => Some(InMemoryDeviceRegistry::from_json(&read_text(path)?)?),
        None => None,
    };
    let mut card_config = read_json(&settings.card)?;

    // Optionally run the editor's brand selection first
    if let Some(brand) = &settings.brand {
        let mut editor = CardEditor::new(catalogue.clone(), card_config.clone())?;
        let registry = devices.as_ref().map(|d| d as &dyn DeviceRegistry);
        match editor.select_brand(brand, &states, registry, &LoggingHost)? {
            BrandSelection::Applied(applied) => card_config = applied.to_value()?,
            BrandSelection::EntityRequired => anyhow::bail!("Card has no entity; cannot apply brand '{}'", brand),
            BrandSelection::Unchanged => {}
        }
    }

    let mut card = ChargerCard::new(CardService::new(localizer), Locale::new(&settings.language));
    // Configuration errors are rendered, not returned
    let _ = card.set_config(card_config);

    let rendered = card.render(&states);
    if let CardRender::Error { message } = &rendered {
        tracing::warn!("Card renders an error state: {}", message);
    }
    println!("{}", serde_json::to_string_pretty(&rendered)?);

    Ok(())
}
