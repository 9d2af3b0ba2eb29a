// Data shapes - the typed form of a configuration region
use super::item::{ItemDescriptor, NormalizedItem};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Key used when no list matches the charger's current state.
pub const DEFAULT_STATE: &str = "default";

/// A configuration region decoded once at configuration load.
#[derive(Debug, Clone, PartialEq)]
pub enum DataShape {
    Item(ItemDescriptor),
    List(Vec<ItemDescriptor>),
    StateKeyed(IndexMap<String, Vec<ItemDescriptor>>),
    Scalar(Value),
}

impl DataShape {
    /// Infer the shape of a raw region. Inspection order is
    /// null, array, single item, state-keyed object, primitive.
    pub fn decode(raw: &Value) -> Result<Option<Self>, serde_json::Error> {
        match raw {
            Value::Null => Ok(None),
            Value::Array(elements) => Ok(Some(DataShape::List(decode_list(elements)?))),
            Value::Object(object) if is_item(object) => {
                Ok(Some(DataShape::Item(serde_json::from_value(raw.clone())?)))
            }
            Value::Object(object) => {
                let mut lists = IndexMap::with_capacity(object.len());
                for (state, value) in object {
                    let items = match value {
                        Value::Array(elements) => decode_list(elements)?,
                        _ => Vec::new(),
                    };
                    lists.insert(state.clone(), items);
                }
                Ok(Some(DataShape::StateKeyed(lists)))
            }
            primitive => Ok(Some(DataShape::Scalar(primitive.clone()))),
        }
    }
}

fn decode_list(elements: &[Value]) -> Result<Vec<ItemDescriptor>, serde_json::Error> {
    elements
        .iter()
        .filter(|element| {
            element
                .as_object()
                .is_some_and(|object| has_field(object, "entity_id"))
        })
        .map(|element| serde_json::from_value(element.clone()))
        .collect()
}

fn is_item(object: &Map<String, Value>) -> bool {
    has_field(object, "entity_id") || has_field(object, "text")
}

// Present and not null/empty.
fn has_field(object: &Map<String, Value>, key: &str) -> bool {
    match object.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// A region after every item in it has been normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedShape {
    Item(NormalizedItem),
    List(Vec<NormalizedItem>),
    StateKeyed(IndexMap<String, Vec<NormalizedItem>>),
    Scalar(Value),
}

impl ResolvedShape {
    /// Items to show while the charger is in `state`. State-keyed regions
    /// fall back to the `default` list.
    pub fn for_state(&self, state: Option<&str>) -> &[NormalizedItem] {
        match self {
            ResolvedShape::Item(item) => std::slice::from_ref(item),
            ResolvedShape::List(items) => items,
            ResolvedShape::StateKeyed(lists) => state
                .and_then(|s| lists.get(s))
                .or_else(|| lists.get(DEFAULT_STATE))
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            ResolvedShape::Scalar(_) => &[],
        }
    }

    pub fn for_each_item_mut(&mut self, mut f: impl FnMut(&mut NormalizedItem)) {
        match self {
            ResolvedShape::Item(item) => f(item),
            ResolvedShape::List(items) => items.iter_mut().for_each(f),
            ResolvedShape::StateKeyed(lists) => lists.values_mut().flatten().for_each(f),
            ResolvedShape::Scalar(_) => {}
        }
    }
}
