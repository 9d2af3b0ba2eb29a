// Card service - builds the view-model for one render pass
use crate::application::entity_resolver::EntityResolver;
use crate::application::host::StateStore;
use crate::application::item_normalizer::ItemNormalizer;
use crate::application::localization::{Locale, Localizer};
use crate::application::shape_resolver::ShapeResolver;
use crate::domain::card::{CardConfig, CardLayout, CardView, CollapsibleGroup, Region};
use crate::domain::item::NormalizedItem;
use crate::domain::shape::ResolvedShape;
use std::sync::Arc;

#[derive(Clone)]
pub struct CardService {
    localizer: Arc<Localizer>,
}

impl CardService {
    pub fn new(localizer: Arc<Localizer>) -> Self {
        Self { localizer }
    }

    /// Resolve every region against the current state snapshot. A pure
    /// function of its inputs; each call supersedes the previous one.
    pub fn build_view(
        &self,
        config: &CardConfig,
        layout: &CardLayout,
        states: &dyn StateStore,
        locale: &Locale,
    ) -> CardView {
        let entity_id = config.entity.clone().unwrap_or_default();
        let resolver = EntityResolver::new(states);
        let shapes = ShapeResolver::new(ItemNormalizer::new(resolver));
        let brand = config.brand.as_deref();

        let state = resolver.state(&entity_id).map(|entity| entity.state.clone());
        let status_text = state
            .as_deref()
            .map(|state| self.status_text(layout, state, brand, locale));

        let resolve = |region: Region| -> Option<ResolvedShape> {
            let mut resolved = shapes.resolve(layout.region(region)?);
            resolved.for_each_item_mut(|item| self.localize_item(item, brand, locale));
            Some(resolved)
        };
        let current = |region: Region| -> Vec<NormalizedItem> {
            resolve(region)
                .map(|resolved| resolved.for_state(state.as_deref()).to_vec())
                .unwrap_or_default()
        };

        let groups = Region::GROUPS
            .into_iter()
            .filter(|region| layout.region(*region).is_some())
            .map(|region| {
                let button = layout
                    .collapsiblebuttons
                    .get(region.key())
                    .cloned()
                    .unwrap_or_default();
                CollapsibleGroup {
                    key: region.key().to_string(),
                    text: button
                        .text
                        .map(|text| self.localizer.localize(locale, &text, Some("common"), brand)),
                    icon: button.icon,
                    items: current(region),
                }
            })
            .collect();

        tracing::debug!("Built view for {} in state {:?}", entity_id, state);

        CardView {
            display: config.display(),
            name: resolve(Region::Name),
            location: resolve(Region::Location),
            status: resolve(Region::Status),
            substatus: resolve(Region::Substatus),
            smartcharging: resolve(Region::Smartcharging),
            info_left: resolve(Region::InfoLeft),
            info_right: resolve(Region::InfoRight),
            groups,
            stats: current(Region::Stats),
            toolbar_left: current(Region::ToolbarLeft),
            toolbar_right: current(Region::ToolbarRight),
            currentlimits: layout.currentlimits.clone(),
            entity_id,
            state,
            status_text,
        }
    }

    /// `statetext` maps a raw state to a label key before localization.
    fn status_text(&self, layout: &CardLayout, state: &str, brand: Option<&str>, locale: &Locale) -> String {
        let key = layout
            .statetext
            .get(state)
            .map(String::as_str)
            .unwrap_or(state);
        self.localizer.localize(locale, key, Some("status"), brand)
    }

    fn localize_item(&self, item: &mut NormalizedItem, brand: Option<&str>, locale: &Locale) {
        if !item.text_configured {
            return;
        }
        if let Some(text) = item.text.take() {
            item.text = Some(self.localizer.localize(locale, &text, Some("common"), brand));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::EntityState;
    use crate::infrastructure::memory_store::InMemoryStateStore;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn service() -> CardService {
        let mut tables = HashMap::new();
        tables.insert(
            "en".to_string(),
            json!({
                "acme": {
                    "status": {"charging": "Charging", "ready": "Ready to charge"},
                    "common": {"power": "Power", "limits": "Limits"}
                }
            }),
        );
        CardService::new(Arc::new(Localizer::new(tables, "en")))
    }

    fn config() -> CardConfig {
        CardConfig::from_value(json!({
            "entity": "sensor.acme_status",
            "brand": "acme",
            "details": {
                "status": {"entity_id": "sensor.acme_status"},
                "statetext": {"awaiting_start": "ready"},
                "info_right": [{"entity_id": "sensor.acme_power", "text": "power", "unit_show": true}],
                "group1": [{"entity_id": "sensor.acme_power"}],
                "collapsiblebuttons": {"group1": {"text": "limits", "icon": "mdi:speedometer"}},
                "stats": {
                    "charging": [{"entity_id": "sensor.acme_power"}],
                    "default": [{"entity_id": "sensor.acme_energy"}]
                },
                "toolbar_left": [{"entity_id": "switch.acme_enabled", "service": "acme.stop"}]
            }
        }))
        .unwrap()
    }

    fn store(state: &str) -> InMemoryStateStore {
        InMemoryStateStore::from_states(vec![
            EntityState::new("sensor.acme_status", state),
            EntityState::new("sensor.acme_power", "7.4").with_attribute("unit_of_measurement", json!("kW")),
            EntityState::new("sensor.acme_energy", "12.1"),
            EntityState::new("switch.acme_enabled", "on"),
        ])
    }

    #[test]
    fn test_build_view_while_charging() {
        let config = config();
        let layout = CardLayout::decode(&config.details).unwrap();
        let view = service().build_view(&config, &layout, &store("charging"), &Locale::default());

        assert_eq!(view.state.as_deref(), Some("charging"));
        assert_eq!(view.status_text.as_deref(), Some("Charging"));
        assert_eq!(view.stats.len(), 1);
        assert_eq!(view.stats[0].useval, json!("7.4"));
        assert_eq!(view.toolbar_left.len(), 1);
        assert!(view.name.is_none());

        let info = view.info_right.unwrap();
        let items = info.for_state(None);
        assert_eq!(items[0].text.as_deref(), Some("Power"));
        assert_eq!(items[0].formatted_value(), "7.4 kW");

        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].text.as_deref(), Some("Limits"));
        assert_eq!(view.groups[0].items.len(), 1);
    }

    #[test]
    fn test_build_view_uses_default_stats_and_statetext() {
        let config = config();
        let layout = CardLayout::decode(&config.details).unwrap();
        let view = service().build_view(&config, &layout, &store("awaiting_start"), &Locale::default());

        assert_eq!(view.status_text.as_deref(), Some("Ready to charge"));
        assert_eq!(view.stats[0].useval, json!("12.1"));
    }

    #[test]
    fn test_friendly_name_labels_are_not_translated() {
        let config = CardConfig::from_value(json!({
            "entity": "sensor.acme_status",
            "brand": "acme",
            "details": {"info_left": [{"entity_id": "sensor.acme_power"}]}
        }))
        .unwrap();
        let layout = CardLayout::decode(&config.details).unwrap();
        let store = InMemoryStateStore::from_states(vec![
            EntityState::new("sensor.acme_status", "charging"),
            EntityState::new("sensor.acme_power", "7.4")
                .with_attribute("friendly_name", json!("Wallbox Pulsar 2.0 Power")),
        ]);
        let view = service().build_view(&config, &layout, &store, &Locale::default());

        let info = view.info_left.unwrap();
        assert_eq!(info.for_state(None)[0].text.as_deref(), Some("Wallbox Pulsar 2.0 Power"));
    }

    #[test]
    fn test_build_view_without_entities() {
        let config = config();
        let layout = CardLayout::decode(&config.details).unwrap();
        let empty = InMemoryStateStore::default();
        let view = service().build_view(&config, &layout, &empty, &Locale::default());

        assert_eq!(view.state, None);
        assert_eq!(view.status_text, None);
        assert_eq!(view.stats[0].useval, Value::Null);
        match view.status.unwrap() {
            ResolvedShape::Item(item) => {
                assert!(item.entity.is_none());
                assert_eq!(item.useval, Value::Null);
            }
            other => panic!("expected single item, got {:?}", other),
        }
    }
}
