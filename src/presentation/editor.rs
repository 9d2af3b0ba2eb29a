// Card editor - brand selection and option edits that rewrite the configuration
use crate::application::host::{DeviceRegistry, HostEvents, StateStore};
use crate::application::template_service::{BrandSelection, TemplateService};
use crate::domain::card::CardConfig;
use crate::error::{CardError, TemplateError};
use crate::infrastructure::catalogue::BrandCatalogue;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayToggle {
    ShowName,
    ShowLeds,
    ShowStatus,
    ShowToolbar,
    ShowStats,
    ShowCollapsibles,
    CompactView,
}

/// Holds the configuration being edited. Every successful change is
/// announced to the host with the full new document.
pub struct CardEditor {
    catalogue: Arc<BrandCatalogue>,
    config: CardConfig,
}

impl CardEditor {
    /// Unlike the card, the editor accepts a configuration without an entity.
    pub fn new(catalogue: Arc<BrandCatalogue>, raw: Value) -> Result<Self, CardError> {
        let config = match raw {
            Value::Null => CardConfig::default(),
            raw => CardConfig::from_value(raw)?,
        };
        Ok(Self { catalogue, config })
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn brand_options(&self) -> Vec<BrandOption> {
        self.catalogue
            .options()
            .map(|(domain, name)| BrandOption {
                value: domain.to_string(),
                label: name.to_string(),
            })
            .collect()
    }

    pub fn set_entity(&mut self, entity_id: &str, events: &dyn HostEvents) {
        if self.config.entity.as_deref() == Some(entity_id) {
            return;
        }
        self.config.entity = Some(entity_id.to_string());
        self.emit(events);
    }

    pub fn set_toggle(&mut self, toggle: DisplayToggle, value: bool, events: &dyn HostEvents) {
        let slot = match toggle {
            DisplayToggle::ShowName => &mut self.config.show_name,
            DisplayToggle::ShowLeds => &mut self.config.show_leds,
            DisplayToggle::ShowStatus => &mut self.config.show_status,
            DisplayToggle::ShowToolbar => &mut self.config.show_toolbar,
            DisplayToggle::ShowStats => &mut self.config.show_stats,
            DisplayToggle::ShowCollapsibles => &mut self.config.show_collapsibles,
            DisplayToggle::CompactView => &mut self.config.compact_view,
        };
        if *slot == Some(value) {
            return;
        }
        *slot = Some(value);
        self.emit(events);
    }

    /// Apply the template of `brand`. On failure the error is logged and the
    /// configuration stays as it was before the attempt.
    pub fn select_brand(
        &mut self,
        brand: &str,
        states: &dyn StateStore,
        devices: Option<&dyn DeviceRegistry>,
        events: &dyn HostEvents,
    ) -> Result<BrandSelection, TemplateError> {
        let service = TemplateService::new(&self.catalogue);
        match service.select_brand(&self.config, brand, states, devices) {
            Ok(BrandSelection::Applied(applied)) => {
                self.config = applied.clone();
                self.emit(events);
                Ok(BrandSelection::Applied(applied))
            }
            Ok(BrandSelection::EntityRequired) => {
                tracing::warn!("Select an entity before choosing brand '{}'", brand);
                Ok(BrandSelection::EntityRequired)
            }
            Ok(BrandSelection::Unchanged) => Ok(BrandSelection::Unchanged),
            Err(e) => {
                tracing::error!("Failed to apply brand template '{}': {}", brand, e);
                Err(e)
            }
        }
    }

    fn emit(&self, events: &dyn HostEvents) {
        match self.config.to_value() {
            Ok(document) => events.config_changed(&document),
            Err(e) => tracing::error!("Failed to serialize configuration: {}", e),
        }
    }
}
