// Template service - applies a brand template to the active card configuration
use crate::application::entity_resolver::EntityResolver;
use crate::application::host::{DeviceRegistry, StateStore};
use crate::application::tokens::{substitute, Token, TokenValues};
use crate::domain::brand::{BrandTemplate, ServiceIdStrategy};
use crate::domain::card::CardConfig;
use crate::domain::entity::EntityState;
use crate::error::TemplateError;
use crate::infrastructure::catalogue::BrandCatalogue;
use serde_json::Value;

/// Outcome of selecting a brand in the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum BrandSelection {
    /// The brand is already applied; nothing to do
    Unchanged,
    /// Tokens are derived from the charger entity, so it must be chosen first
    EntityRequired,
    Applied(CardConfig),
}

pub struct TemplateService<'a> {
    catalogue: &'a BrandCatalogue,
}

impl<'a> TemplateService<'a> {
    pub fn new(catalogue: &'a BrandCatalogue) -> Self {
        Self { catalogue }
    }

    /// Produce the configuration that results from applying `brand` to
    /// `config`. The input configuration is never modified, so a failure
    /// leaves the caller with its last good configuration.
    pub fn select_brand(
        &self,
        config: &CardConfig,
        brand: &str,
        states: &dyn StateStore,
        devices: Option<&dyn DeviceRegistry>,
    ) -> Result<BrandSelection, TemplateError> {
        if config.brand.as_deref() == Some(brand) {
            return Ok(BrandSelection::Unchanged);
        }
        let Some(entity_id) = config.entity.as_deref().filter(|id| !id.is_empty()) else {
            return Ok(BrandSelection::EntityRequired);
        };
        let template = self
            .catalogue
            .get(brand)
            .ok_or_else(|| TemplateError::UnknownBrand(brand.to_string()))?;

        let strategy = template.config.serviceid;
        let tokens = token_values(template, entity_id, &EntityResolver::new(states), devices);
        let details = match substitute(&template.details, &tokens) {
            Ok(Value::Object(details)) => details,
            Ok(_) => return Err(TemplateError::DetailsNotAnObject),
            Err(token) if token == Token::ServiceId || token == strategy_token(strategy) => {
                return Err(TemplateError::ServiceIdUnavailable(strategy));
            }
            Err(token) => return Err(TemplateError::UnresolvedToken(token)),
        };

        let mut applied = config.with_overrides(&template.defaults)?;
        applied.details.extend(details);
        applied.brand = Some(template.config.domain.clone());

        tracing::info!(
            "Applied brand template '{}' to {} (prefix '{}')",
            template.config.domain,
            entity_id,
            tokens.get(Token::EntityPrefix).unwrap_or_default()
        );
        Ok(BrandSelection::Applied(applied))
    }
}

/// `sensor.mycharger_status` with base `_status` gives `mycharger`.
pub fn entity_prefix(entity_id: &str, domainbase: &str) -> String {
    let object_id = EntityState::object_id(entity_id);
    object_id
        .strip_suffix(domainbase)
        .unwrap_or(object_id)
        .to_string()
}

fn token_values(
    template: &BrandTemplate,
    entity_id: &str,
    resolver: &EntityResolver<'_>,
    devices: Option<&dyn DeviceRegistry>,
) -> TokenValues {
    let mut tokens = TokenValues::default();
    tokens.set(Token::EntityPrefix, entity_prefix(entity_id, &template.config.domainbase));
    tokens.set(Token::Entity, entity_id);

    if let Some(entity) = resolver.state(entity_id) {
        tokens.set(Token::State, entity.state.clone());
    }

    if let Some(attribute) = template.config.serviceid_data.attr.as_deref() {
        match resolver.attribute(entity_id, attribute) {
            Some(Value::String(s)) => tokens.set(Token::Attribute, s.clone()),
            Some(Value::Null) | None => {}
            Some(other) => tokens.set(Token::Attribute, other.to_string()),
        }
    }

    if let Some(device_id) = devices.and_then(|registry| registry.device_id(entity_id)) {
        tokens.set(Token::DeviceId, device_id);
    }

    // Left unset when underivable; only templates using it fail
    if let Some(service_id) = tokens.get(strategy_token(template.config.serviceid)).map(str::to_string) {
        tokens.set(Token::ServiceId, service_id);
    }

    tokens
}

/// The token carrying the value a strategy selects as the service id.
fn strategy_token(strategy: ServiceIdStrategy) -> Token {
    match strategy {
        ServiceIdStrategy::Entity => Token::Entity,
        ServiceIdStrategy::State => Token::State,
        ServiceIdStrategy::Attr => Token::Attribute,
        ServiceIdStrategy::Device => Token::DeviceId,
    }
}
