// Brand template domain model
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A brand-specific configuration skeleton. `details` carries token
/// placeholders in place of concrete entity ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandTemplate {
    pub config: BrandConfig,
    #[serde(default)]
    pub defaults: Map<String, Value>,
    pub details: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandConfig {
    pub domain: String,
    pub name: String,
    /// Suffix stripped from the selected entity's object id to get the entity prefix.
    pub domainbase: String,
    pub serviceid: ServiceIdStrategy,
    #[serde(default)]
    pub serviceid_data: ServiceIdData,
}

/// How the service identifier used in service calls is derived from the
/// selected entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceIdStrategy {
    Entity,
    State,
    Attr,
    Device,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceIdData {
    #[serde(default)]
    pub attr: Option<String>,
}
