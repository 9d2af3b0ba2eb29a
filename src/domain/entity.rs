// Entity domain model - a host-managed object with a state and attributes
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    #[serde(default)]
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_changed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl EntityState {
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes: Map::new(),
            last_changed: None,
            last_updated: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn friendly_name(&self) -> Option<&str> {
        self.attribute_str("friendly_name")
    }

    pub fn icon(&self) -> Option<&str> {
        self.attribute_str("icon")
    }

    pub fn unit_of_measurement(&self) -> Option<&str> {
        self.attribute_str("unit_of_measurement")
    }

    /// Object id part of the entity id: `sensor.acme_status` -> `acme_status`
    pub fn object_id(entity_id: &str) -> &str {
        entity_id
            .split_once('.')
            .map(|(_, object_id)| object_id)
            .unwrap_or(entity_id)
    }

    fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }
}
