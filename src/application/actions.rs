// Item actions - service calls and more-info requests raised from the card
use crate::application::host::{HostEvents, ServiceCaller};
use crate::domain::item::NormalizedItem;
use crate::error::ActionError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Placeholder in `service_data` replaced by the value picked in a dropdown.
pub const SERVICE_VALUE: &str = "#SERVICEVAL#";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub data: Value,
}

impl ServiceCall {
    /// Build the call bound to `item`. `selected` is the dropdown value, if any.
    pub fn from_item(item: &NormalizedItem, selected: Option<&Value>) -> Result<Option<Self>, ActionError> {
        let Some(service) = item.service.as_deref() else {
            return Ok(None);
        };

        let (domain, name) = service
            .split_once('.')
            .filter(|(domain, name)| !domain.is_empty() && !name.is_empty())
            .ok_or_else(|| ActionError::MalformedService(service.to_string()))?;

        let data = match (&item.service_data, selected) {
            (Some(data), Some(selected)) => fill_service_value(data, selected),
            (Some(data), None) => data.clone(),
            (None, _) => Value::Object(Map::new()),
        };

        Ok(Some(Self {
            domain: domain.to_string(),
            service: name.to_string(),
            data,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemAction {
    CallService(ServiceCall),
    MoreInfo(String),
}

impl ItemAction {
    /// Items bound to a service invoke it; anything else opens more-info
    /// for its entity.
    pub fn for_item(item: &NormalizedItem, selected: Option<&Value>) -> Result<Self, ActionError> {
        if let Some(call) = ServiceCall::from_item(item, selected)? {
            return Ok(ItemAction::CallService(call));
        }
        match item.entity_id.as_deref() {
            Some(entity_id) if !entity_id.is_empty() => Ok(ItemAction::MoreInfo(entity_id.to_string())),
            _ => Err(ActionError::NothingToDo),
        }
    }

    pub fn dispatch(&self, caller: &dyn ServiceCaller, events: &dyn HostEvents) {
        match self {
            ItemAction::CallService(call) => {
                tracing::debug!("Calling service {}.{}", call.domain, call.service);
                caller.call_service(call);
            }
            ItemAction::MoreInfo(entity_id) => events.more_info(entity_id),
        }
    }
}

fn fill_service_value(data: &Value, selected: &Value) -> Value {
    match data {
        Value::String(text) if text == SERVICE_VALUE => selected.clone(),
        Value::String(text) if text.contains(SERVICE_VALUE) => {
            let rendered = match selected {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Value::String(text.replace(SERVICE_VALUE, &rendered))
        }
        Value::Array(elements) => Value::Array(
            elements
                .iter()
                .map(|element| fill_service_value(element, selected))
                .collect(),
        ),
        Value::Object(object) => Value::Object(
            object
                .iter()
                .map(|(key, element)| (key.clone(), fill_service_value(element, selected)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::entity_resolver::EntityResolver;
    use crate::application::item_normalizer::ItemNormalizer;
    use crate::infrastructure::memory_store::InMemoryStateStore;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingHost {
        calls: RefCell<Vec<ServiceCall>>,
        more_info: RefCell<Vec<String>>,
    }

    impl ServiceCaller for RecordingHost {
        fn call_service(&self, call: &ServiceCall) {
            self.calls.borrow_mut().push(call.clone());
        }
    }

    impl HostEvents for RecordingHost {
        fn more_info(&self, entity_id: &str) {
            self.more_info.borrow_mut().push(entity_id.to_string());
        }

        fn config_changed(&self, _config: &Value) {}
    }

    fn normalize(raw: Value) -> NormalizedItem {
        let store = InMemoryStateStore::default();
        let normalizer = ItemNormalizer::new(EntityResolver::new(&store));
        normalizer.normalize(&serde_json::from_value(raw).unwrap())
    }

    #[test]
    fn test_dropdown_fills_service_value() {
        let item = normalize(json!({
            "entity_id": "number.acme_limit",
            "type": "dropdown",
            "service": "acme.set_charger_dynamic_limit",
            "service_data": {"charger_id": "EH123", "current": "#SERVICEVAL#", "note": "set to #SERVICEVAL# A"}
        }));

        let action = ItemAction::for_item(&item, Some(&json!(16))).unwrap();
        assert_eq!(
            action,
            ItemAction::CallService(ServiceCall {
                domain: "acme".into(),
                service: "set_charger_dynamic_limit".into(),
                data: json!({"charger_id": "EH123", "current": 16, "note": "set to 16 A"}),
            })
        );
    }

    #[test]
    fn test_dispatch() {
        let host = RecordingHost::default();

        let service_item = normalize(json!({"service": "acme.stop", "text": "Stop"}));
        ItemAction::for_item(&service_item, None).unwrap().dispatch(&host, &host);

        let info_item = normalize(json!({"entity_id": "sensor.acme_power"}));
        ItemAction::for_item(&info_item, None).unwrap().dispatch(&host, &host);

        let calls = host.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].data, json!({}));
        assert_eq!(*host.more_info.borrow(), vec!["sensor.acme_power".to_string()]);
    }

    #[test]
    fn test_errors() {
        let item = normalize(json!({"service": "stop"}));
        assert_eq!(
            ItemAction::for_item(&item, None),
            Err(ActionError::MalformedService("stop".into()))
        );

        let item = normalize(json!({"text": "Just text"}));
        assert_eq!(ItemAction::for_item(&item, None), Err(ActionError::NothingToDo));
    }
}
