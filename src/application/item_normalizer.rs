// Item normalizer - resolves one item descriptor into its render-ready form
use crate::application::calculation::{calculate, number_value, to_number};
use crate::application::entity_resolver::EntityResolver;
use crate::domain::item::{ItemDescriptor, NormalizedItem};
use serde_json::Value;

#[derive(Clone, Copy)]
pub struct ItemNormalizer<'a> {
    resolver: EntityResolver<'a>,
}

impl<'a> ItemNormalizer<'a> {
    pub fn new(resolver: EntityResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Never fails: missing entities and failed calculations degrade to
    /// `null` values and default labels.
    pub fn normalize(&self, item: &ItemDescriptor) -> NormalizedItem {
        let entity = if item.is_calculated() {
            None
        } else {
            item.entity_id
                .as_deref()
                .and_then(|id| self.resolver.state(id))
        };

        let mut useval = match entity {
            Some(entity) => item
                .attribute
                .as_deref()
                .and_then(|attribute| entity.attribute(attribute))
                .cloned()
                .unwrap_or_else(|| Value::String(entity.state.clone())),
            None => Value::Null,
        };

        if item.is_calculated() {
            useval = self.calculated_value(item).unwrap_or(Value::Null);
        }

        if let Some(decimals) = item.round.and_then(|round| round.decimals()) {
            if let Some(rounded) = round_value(&useval, decimals) {
                useval = rounded;
            }
        }

        let text = item
            .text
            .clone()
            .or_else(|| entity.and_then(|e| e.friendly_name()).map(str::to_string));
        let icon = item
            .icon
            .clone()
            .or_else(|| entity.and_then(|e| e.icon()).map(str::to_string));
        let unit = match (&item.unit, &item.attribute) {
            (Some(unit), _) => Some(unit.clone()),
            (None, None) => entity
                .and_then(|e| e.unit_of_measurement())
                .map(str::to_string),
            (None, Some(_)) => None,
        };

        NormalizedItem {
            entity_id: item.entity_id.clone(),
            attribute: item.attribute.clone(),
            entity: entity.cloned(),
            useval,
            unit,
            unit_show: item.unit_show,
            unit_showontext: item.unit_showontext,
            text,
            text_configured: item.text.is_some(),
            icon,
            round: item.round,
            kind: item.kind,
            service: item.service.clone(),
            service_data: item.service_data.clone(),
            calc_function: item.calc_function,
            calc_entities: item.calc_entities.clone(),
            conditional_entity: item.conditional_entity.clone(),
            conditional_attribute: item.conditional_attribute.clone(),
            conditional_invert: item.conditional_invert,
            hide: self.is_hidden(item),
        }
    }

    fn calculated_value(&self, item: &ItemDescriptor) -> Option<Value> {
        let Some(function) = item.calc_function else {
            tracing::warn!("Calculated item has no calc_function");
            return None;
        };

        match calculate(function, &item.calc_entities, &self.resolver) {
            Ok(Some(result)) => Some(number_value(result)),
            Ok(None) => {
                tracing::warn!("Unsupported calc_function {:?}, value left unset", function);
                None
            }
            Err(e) => {
                tracing::warn!("Calculation {:?} failed: {}", function, e);
                None
            }
        }
    }

    fn is_hidden(&self, item: &ItemDescriptor) -> bool {
        let Some(entity_id) = item.conditional_entity.as_deref() else {
            return false;
        };

        let mut hide = self
            .resolver
            .state(entity_id)
            .is_some_and(|entity| is_off(&Value::String(entity.state.clone())));

        if let Some(attribute) = item.conditional_attribute.as_deref() {
            hide |= self
                .resolver
                .attribute(entity_id, attribute)
                .is_some_and(is_off);
        }

        if item.conditional_invert { !hide } else { hide }
    }
}

fn is_off(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::String(s) => s == "off" || s == "false",
        _ => false,
    }
}

/// Round half to even at `decimals` places. `None` when the value is not
/// numeric or cannot be scaled to that precision.
pub fn round_value(value: &Value, decimals: u32) -> Option<Value> {
    let number = to_number(value)?;
    let factor = 10f64.powi(i32::try_from(decimals).ok()?);
    let scaled = number * factor;
    if !scaled.is_finite() {
        return None;
    }
    Some(number_value(scaled.round_ties_even() / factor))
}
