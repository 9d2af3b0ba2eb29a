// Error types for card setup, template application and calculations
use crate::application::tokens::Token;
use crate::domain::brand::ServiceIdStrategy;
use thiserror::Error;

/// Configuration errors. Fatal for the card instance that hit them and
/// rendered as an error state rather than propagated into the host.
#[derive(Error, Debug)]
pub enum CardError {
    #[error("Invalid configuration: entity is required")]
    MissingEntity,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("Invalid configuration for region '{region}': {source}")]
    InvalidRegion {
        region: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Unknown brand '{0}'")]
    UnknownBrand(String),

    #[error("Template token {} could not be resolved", .0.placeholder())]
    UnresolvedToken(Token),

    #[error("Service id could not be derived using strategy '{0:?}'")]
    ServiceIdUnavailable(ServiceIdStrategy),

    #[error("Template details must be an object")]
    DetailsNotAnObject,

    #[error("Merged configuration is invalid: {0}")]
    Merge(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum CalcError {
    #[error("calc_entities is empty")]
    NoInputs,

    #[error("Entity '{0}' not found")]
    MissingEntity(String),

    #[error("Value '{value}' of '{entity_id}' is not numeric")]
    NotNumeric { entity_id: String, value: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum ActionError {
    #[error("Item has neither a service nor an entity")]
    NothingToDo,

    #[error("Service '{0}' must be of the form domain.service")]
    MalformedService(String),
}

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {name}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse {name}: {source}")]
    Toml {
        name: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Duplicate brand domain '{0}'")]
    DuplicateBrand(String),
}
