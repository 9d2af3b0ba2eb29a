// Host collaborator traits - what the card reads from and dispatches to
use crate::application::actions::ServiceCall;
use crate::domain::entity::EntityState;
use serde_json::Value;

/// Live entity states owned by the host. Lookups of unknown ids return `None`.
pub trait StateStore {
    fn entity(&self, entity_id: &str) -> Option<&EntityState>;
}

/// Maps entity ids to the id of the device that owns them.
pub trait DeviceRegistry {
    fn device_id(&self, entity_id: &str) -> Option<&str>;
}

/// Fire-and-forget service invocation. The outcome arrives later as an
/// ordinary state update.
pub trait ServiceCaller {
    fn call_service(&self, call: &ServiceCall);
}

/// Events the card raises on the host's event bus.
pub trait HostEvents {
    /// Ask the host to open its more-info dialog for an entity
    fn more_info(&self, entity_id: &str);

    /// The editor changed the configuration; `config` is the full new document
    fn config_changed(&self, config: &Value);
}
