// Entity resolver - tolerant lookups against the host state store
use crate::application::host::StateStore;
use crate::domain::entity::EntityState;
use serde_json::Value;

/// Reads the live store at call time. Every lookup failure, including the
/// absence of a store, yields `None`.
#[derive(Clone, Copy)]
pub struct EntityResolver<'a> {
    store: Option<&'a dyn StateStore>,
}

impl<'a> EntityResolver<'a> {
    pub fn new(store: &'a dyn StateStore) -> Self {
        Self { store: Some(store) }
    }

    /// Resolver used before the host has pushed its first state snapshot
    pub fn detached() -> Self {
        Self { store: None }
    }

    pub fn state(&self, entity_id: &str) -> Option<&'a EntityState> {
        self.store?.entity(entity_id)
    }

    pub fn attribute(&self, entity_id: &str, attribute: &str) -> Option<&'a Value> {
        self.state(entity_id)?.attribute(attribute)
    }

    /// Raw state, or the named attribute when one is given.
    pub fn value(&self, entity_id: &str, attribute: Option<&str>) -> Option<Value> {
        match attribute {
            Some(attribute) => self.attribute(entity_id, attribute).cloned(),
            None => self
                .state(entity_id)
                .map(|entity| Value::String(entity.state.clone())),
        }
    }
}
