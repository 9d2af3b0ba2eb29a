// Item domain models - raw descriptors from configuration and their resolved form
use super::entity::EntityState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entity id marking an item whose value is computed from `calc_entities`.
pub const CALCULATED: &str = "calculated";

/// One visual data point as authored in the card configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDescriptor {
    pub entity_id: Option<String>,
    pub attribute: Option<String>,
    pub unit: Option<String>,
    pub unit_show: bool,
    pub unit_showontext: bool,
    pub text: Option<String>,
    pub icon: Option<String>,
    pub round: Option<Rounding>,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub service: Option<String>,
    pub service_data: Option<Value>,
    pub calc_function: Option<CalcFunction>,
    pub calc_entities: Vec<CalcEntity>,
    pub conditional_entity: Option<String>,
    pub conditional_attribute: Option<String>,
    pub conditional_invert: bool,
}

impl ItemDescriptor {
    pub fn is_calculated(&self) -> bool {
        self.entity_id.as_deref() == Some(CALCULATED)
    }
}

/// `round: 2` rounds to two decimals, `round: true` to integer precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rounding {
    Decimals(i64),
    Flag(bool),
}

impl Rounding {
    /// Number of decimals to keep, or `None` when rounding is disabled.
    /// Zero and `false` disable rounding; any other non-positive value
    /// rounds to an integer.
    pub fn decimals(self) -> Option<u32> {
        match self {
            Rounding::Decimals(0) | Rounding::Flag(false) => None,
            Rounding::Decimals(n) if n > 0 => Some(u32::try_from(n).unwrap_or(u32::MAX)),
            Rounding::Decimals(_) | Rounding::Flag(true) => Some(0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Service,
    Dropdown,
    #[default]
    #[serde(other)]
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalcFunction {
    Max,
    Min,
    Mean,
    Sum,
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcEntity {
    pub entity_id: String,
    #[serde(default)]
    pub attribute: Option<String>,
}

/// Render-ready form of an [`ItemDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedItem {
    pub entity_id: Option<String>,
    pub attribute: Option<String>,
    pub entity: Option<EntityState>,
    pub useval: Value,
    pub unit: Option<String>,
    pub unit_show: bool,
    pub unit_showontext: bool,
    pub text: Option<String>,
    /// `text` was authored in the configuration rather than taken from the
    /// entity's friendly name. Only authored labels are translation keys.
    #[serde(skip)]
    pub text_configured: bool,
    pub icon: Option<String>,
    pub round: Option<Rounding>,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub service: Option<String>,
    pub service_data: Option<Value>,
    pub calc_function: Option<CalcFunction>,
    pub calc_entities: Vec<CalcEntity>,
    pub conditional_entity: Option<String>,
    pub conditional_attribute: Option<String>,
    pub conditional_invert: bool,
    pub hide: bool,
}

impl NormalizedItem {
    /// Value as shown next to the item, with the unit appended when `unit_show` is set.
    pub fn formatted_value(&self) -> String {
        let value = match &self.useval {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        match (&self.unit, self.unit_show) {
            (Some(unit), true) if !value.is_empty() => format!("{} {}", value, unit),
            _ => value,
        }
    }

    /// Label text, with the unit appended when `unit_showontext` is set.
    pub fn label(&self) -> String {
        let text = self.text.clone().unwrap_or_default();
        match (&self.unit, self.unit_showontext) {
            (Some(unit), true) => format!("{} ({})", text, unit),
            _ => text,
        }
    }
}
