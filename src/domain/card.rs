// Card domain models - configuration document, decoded layout and view-model
use super::item::NormalizedItem;
use super::shape::{DataShape, ResolvedShape};
use crate::error::CardError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The user-authored card configuration. Unknown top-level keys are kept so
/// the document round-trips through the editor unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_name: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_leds: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_status: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_toolbar: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_stats: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_collapsibles: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compact_view: Option<bool>,
    #[serde(default)]
    pub details: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CardConfig {
    pub fn from_value(raw: Value) -> Result<Self, CardError> {
        Ok(serde_json::from_value(raw)?)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn display(&self) -> DisplayOptions {
        DisplayOptions {
            show_name: self.show_name.unwrap_or(true),
            show_leds: self.show_leds.unwrap_or(true),
            show_status: self.show_status.unwrap_or(true),
            show_toolbar: self.show_toolbar.unwrap_or(true),
            show_stats: self.show_stats.unwrap_or(true),
            show_collapsibles: self.show_collapsibles.unwrap_or(true),
            compact_view: self.compact_view.unwrap_or(false),
        }
    }

    /// Shallow-merge `overrides` over the top-level keys, returning a new config.
    pub fn with_overrides(&self, overrides: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut document = match self.to_value()? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in overrides {
            document.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(document))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayOptions {
    pub show_name: bool,
    pub show_leds: bool,
    pub show_status: bool,
    pub show_toolbar: bool,
    pub show_stats: bool,
    pub show_collapsibles: bool,
    pub compact_view: bool,
}

/// Display regions configured under `details`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    Name,
    Location,
    Status,
    Substatus,
    Smartcharging,
    InfoLeft,
    InfoRight,
    Group1,
    Group2,
    Group3,
    Stats,
    ToolbarLeft,
    ToolbarRight,
}

impl Region {
    pub const ALL: [Region; 13] = [
        Region::Name,
        Region::Location,
        Region::Status,
        Region::Substatus,
        Region::Smartcharging,
        Region::InfoLeft,
        Region::InfoRight,
        Region::Group1,
        Region::Group2,
        Region::Group3,
        Region::Stats,
        Region::ToolbarLeft,
        Region::ToolbarRight,
    ];

    pub const GROUPS: [Region; 3] = [Region::Group1, Region::Group2, Region::Group3];

    pub fn key(self) -> &'static str {
        match self {
            Region::Name => "name",
            Region::Location => "location",
            Region::Status => "status",
            Region::Substatus => "substatus",
            Region::Smartcharging => "smartcharging",
            Region::InfoLeft => "info_left",
            Region::InfoRight => "info_right",
            Region::Group1 => "group1",
            Region::Group2 => "group2",
            Region::Group3 => "group3",
            Region::Stats => "stats",
            Region::ToolbarLeft => "toolbar_left",
            Region::ToolbarRight => "toolbar_right",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollapsibleButton {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// `details` decoded into typed regions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardLayout {
    pub regions: BTreeMap<Region, DataShape>,
    pub currentlimits: Vec<f64>,
    pub statetext: IndexMap<String, String>,
    pub collapsiblebuttons: IndexMap<String, CollapsibleButton>,
}

impl CardLayout {
    pub fn decode(details: &Map<String, Value>) -> Result<Self, CardError> {
        let mut regions = BTreeMap::new();
        for region in Region::ALL {
            let Some(raw) = details.get(region.key()) else {
                continue;
            };
            let shape = DataShape::decode(raw).map_err(|source| CardError::InvalidRegion {
                region: region.key().to_string(),
                source,
            })?;
            if let Some(shape) = shape {
                regions.insert(region, shape);
            }
        }

        let currentlimits = details
            .get("currentlimits")
            .and_then(Value::as_array)
            .map(|limits| limits.iter().filter_map(as_number).collect())
            .unwrap_or_default();

        let statetext = details
            .get("statetext")
            .and_then(Value::as_object)
            .map(|texts| {
                texts
                    .iter()
                    .map(|(state, text)| {
                        let text = match text {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (state.clone(), text)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let collapsiblebuttons = match details.get("collapsiblebuttons") {
            Some(raw) if !raw.is_null() => serde_json::from_value(raw.clone()).map_err(|source| {
                CardError::InvalidRegion {
                    region: "collapsiblebuttons".to_string(),
                    source,
                }
            })?,
            _ => IndexMap::new(),
        };

        Ok(Self {
            regions,
            currentlimits,
            statetext,
            collapsiblebuttons,
        })
    }

    pub fn region(&self, region: Region) -> Option<&DataShape> {
        self.regions.get(&region)
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollapsibleGroup {
    pub key: String,
    pub text: Option<String>,
    pub icon: Option<String>,
    pub items: Vec<NormalizedItem>,
}

/// Flat view-model handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub entity_id: String,
    pub state: Option<String>,
    pub status_text: Option<String>,
    pub display: DisplayOptions,
    pub name: Option<ResolvedShape>,
    pub location: Option<ResolvedShape>,
    pub status: Option<ResolvedShape>,
    pub substatus: Option<ResolvedShape>,
    pub smartcharging: Option<ResolvedShape>,
    pub info_left: Option<ResolvedShape>,
    pub info_right: Option<ResolvedShape>,
    pub groups: Vec<CollapsibleGroup>,
    pub stats: Vec<NormalizedItem>,
    pub toolbar_left: Vec<NormalizedItem>,
    pub toolbar_right: Vec<NormalizedItem>,
    pub currentlimits: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_round_trips_unknown_keys() {
        let raw = json!({
            "type": "custom:charger-card",
            "entity": "sensor.acme_status",
            "show_leds": false,
            "details": {"status": {"entity_id": "sensor.acme_status"}}
        });
        let config = CardConfig::from_value(raw.clone()).unwrap();

        assert_eq!(config.extra.get("type"), Some(&json!("custom:charger-card")));
        assert_eq!(config.to_value().unwrap(), raw);
    }

    #[test]
    fn test_display_defaults() {
        let config = CardConfig::from_value(json!({"entity": "sensor.x", "show_leds": false})).unwrap();
        let display = config.display();
        assert!(display.show_name);
        assert!(!display.show_leds);
        assert!(!display.compact_view);
    }

    #[test]
    fn test_with_overrides_is_shallow() {
        let config = CardConfig::from_value(json!({
            "entity": "sensor.x",
            "show_leds": true,
            "details": {"name": {"text": "Mine"}}
        }))
        .unwrap();
        let overrides = json!({"show_leds": false, "custom": 1});

        let merged = config.with_overrides(overrides.as_object().unwrap()).unwrap();
        assert_eq!(merged.show_leds, Some(false));
        assert_eq!(merged.extra.get("custom"), Some(&json!(1)));
        assert_eq!(merged.details, config.details);
    }

    #[test]
    fn test_layout_decode() {
        let details = json!({
            "status": {"entity_id": "sensor.acme_status"},
            "stats": {"default": [{"entity_id": "sensor.acme_energy"}]},
            "currentlimits": [6, "10", 16, "n/a"],
            "statetext": {"charging": "Charging", "error": 1},
            "collapsiblebuttons": {"group1": {"text": "Limits", "icon": "mdi:speedometer"}}
        });
        let layout = CardLayout::decode(details.as_object().unwrap()).unwrap();

        assert!(matches!(layout.region(Region::Status), Some(DataShape::Item(_))));
        assert!(matches!(layout.region(Region::Stats), Some(DataShape::StateKeyed(_))));
        assert!(layout.region(Region::Name).is_none());
        assert_eq!(layout.currentlimits, vec![6.0, 10.0, 16.0]);
        assert_eq!(layout.statetext["error"], "1");
        assert_eq!(layout.collapsiblebuttons["group1"].icon.as_deref(), Some("mdi:speedometer"));
    }

    #[test]
    fn test_layout_decode_reports_region() {
        let details = json!({"info_left": [{"entity_id": "sensor.x", "unit_show": "yes"}]});
        let err = CardLayout::decode(details.as_object().unwrap()).unwrap_err();
        assert!(err.to_string().contains("info_left"));
    }
}
