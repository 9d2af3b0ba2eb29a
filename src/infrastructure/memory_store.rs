// In-memory host adapters - state store and device registry snapshots
use crate::application::host::{DeviceRegistry, StateStore};
use crate::domain::entity::EntityState;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    states: HashMap<String, EntityState>,
}

/// Snapshots come either as the host's state list or keyed by entity id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Snapshot {
    List(Vec<EntityState>),
    Keyed(HashMap<String, EntityState>),
}

impl InMemoryStateStore {
    pub fn from_states(states: Vec<EntityState>) -> Self {
        let mut store = Self::default();
        for state in states {
            store.update(state);
        }
        store
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let states = match serde_json::from_str::<Snapshot>(raw)? {
            Snapshot::List(states) => states,
            Snapshot::Keyed(states) => states
                .into_iter()
                .map(|(entity_id, mut state)| {
                    if state.entity_id.is_empty() {
                        state.entity_id = entity_id;
                    }
                    state
                })
                .collect(),
        };

        let store = Self::from_states(states);
        tracing::debug!("Loaded {} entity states", store.len());
        Ok(store)
    }

    /// Replace the state of one entity, as the host does on a state change.
    pub fn update(&mut self, state: EntityState) {
        self.states.insert(state.entity_id.clone(), state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl StateStore for InMemoryStateStore {
    fn entity(&self, entity_id: &str) -> Option<&EntityState> {
        self.states.get(entity_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDeviceRegistry {
    devices: HashMap<String, String>,
}

impl InMemoryDeviceRegistry {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            devices: pairs
                .into_iter()
                .map(|(entity_id, device_id)| (entity_id.into(), device_id.into()))
                .collect(),
        }
    }

    /// Map of entity id to device id
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let devices: HashMap<String, String> = serde_json::from_str(raw)?;
        Ok(Self { devices })
    }
}

impl DeviceRegistry for InMemoryDeviceRegistry {
    fn device_id(&self, entity_id: &str) -> Option<&str> {
        self.devices.get(entity_id).map(String::as_str)
    }
}
