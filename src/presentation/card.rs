// Card facade - the entry points the host calls on config and state changes
use crate::application::actions::ItemAction;
use crate::application::card_service::CardService;
use crate::application::host::{HostEvents, ServiceCaller, StateStore};
use crate::application::localization::Locale;
use crate::domain::card::{CardConfig, CardLayout, CardView};
use crate::domain::item::NormalizedItem;
use crate::error::{ActionError, CardError};
use serde::Serialize;
use serde_json::Value;

/// What the rendering layer receives for one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardRender {
    Error { message: String },
    View(Box<CardView>),
}

enum Setup {
    Unconfigured,
    Ready { config: CardConfig, layout: CardLayout },
    Failed(String),
}

pub struct ChargerCard {
    service: CardService,
    locale: Locale,
    setup: Setup,
}

impl ChargerCard {
    pub fn new(service: CardService, locale: Locale) -> Self {
        Self {
            service,
            locale,
            setup: Setup::Unconfigured,
        }
    }

    /// Accept a new configuration document. Regions are decoded here, once,
    /// so rendering works on typed shapes. On error the card renders an
    /// error state until a valid configuration arrives.
    pub fn set_config(&mut self, raw: Value) -> Result<(), CardError> {
        match Self::prepare(raw) {
            Ok((config, layout)) => {
                self.setup = Setup::Ready { config, layout };
                Ok(())
            }
            Err(e) => {
                tracing::error!("Rejected card configuration: {}", e);
                self.setup = Setup::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn prepare(raw: Value) -> Result<(CardConfig, CardLayout), CardError> {
        let config = CardConfig::from_value(raw)?;
        if config.entity.as_deref().is_none_or(str::is_empty) {
            return Err(CardError::MissingEntity);
        }
        let layout = CardLayout::decode(&config.details)?;
        Ok((config, layout))
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn config(&self) -> Option<&CardConfig> {
        match &self.setup {
            Setup::Ready { config, .. } => Some(config),
            _ => None,
        }
    }

    pub fn render(&self, states: &dyn StateStore) -> CardRender {
        match &self.setup {
            Setup::Ready { config, layout } => CardRender::View(Box::new(
                self.service.build_view(config, layout, states, &self.locale),
            )),
            Setup::Failed(message) => CardRender::Error {
                message: message.clone(),
            },
            Setup::Unconfigured => CardRender::Error {
                message: "Card has not been configured".to_string(),
            },
        }
    }

    /// Handle a click on `item`, or a value picked from its dropdown.
    pub fn activate(
        &self,
        item: &NormalizedItem,
        selected: Option<&Value>,
        caller: &dyn ServiceCaller,
        events: &dyn HostEvents,
    ) -> Result<(), ActionError> {
        ItemAction::for_item(item, selected)?.dispatch(caller, events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::localization::Localizer;
    use crate::domain::entity::EntityState;
    use crate::infrastructure::memory_store::InMemoryStateStore;
    use serde_json::json;
    use std::sync::Arc;

    fn card() -> ChargerCard {
        ChargerCard::new(CardService::new(Arc::new(Localizer::default())), Locale::default())
    }

    #[test]
    fn test_unconfigured_card_renders_error() {
        let card = card();
        let store = InMemoryStateStore::default();
        assert!(matches!(card.render(&store), CardRender::Error { .. }));
    }

    #[test]
    fn test_missing_entity_is_an_error_state() {
        let mut card = card();
        let result = card.set_config(json!({"details": {}}));
        assert!(matches!(result, Err(CardError::MissingEntity)));

        let store = InMemoryStateStore::default();
        match card.render(&store) {
            CardRender::Error { message } => assert!(message.contains("entity is required")),
            other => panic!("expected error state, got {:?}", other),
        }
        assert!(card.config().is_none());
    }

    #[test]
    fn test_invalid_region_is_an_error_state() {
        let mut card = card();
        let result = card.set_config(json!({
            "entity": "sensor.acme_status",
            "details": {"status": {"entity_id": "sensor.acme_status", "round": "two"}}
        }));
        assert!(matches!(result, Err(CardError::InvalidRegion { .. })));
    }

    #[test]
    fn test_render_after_valid_config() {
        let mut card = card();
        card.set_config(json!({
            "entity": "sensor.acme_status",
            "details": {"status": {"entity_id": "sensor.acme_status"}}
        }))
        .unwrap();

        let store = InMemoryStateStore::from_states(vec![EntityState::new("sensor.acme_status", "charging")]);
        match card.render(&store) {
            CardRender::View(view) => assert_eq!(view.state.as_deref(), Some("charging")),
            other => panic!("expected view, got {:?}", other),
        }
    }

    #[test]
    fn test_render_serializes_with_kind_tag() {
        let card = card();
        let store = InMemoryStateStore::default();
        let rendered = serde_json::to_value(card.render(&store)).unwrap();
        assert_eq!(rendered["kind"], "error");
    }
}
