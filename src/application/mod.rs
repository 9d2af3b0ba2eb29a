// Application layer - resolution engine, template workflow and host seams
pub mod actions;
pub mod calculation;
pub mod card_service;
pub mod entity_resolver;
pub mod host;
pub mod item_normalizer;
pub mod localization;
pub mod shape_resolver;
pub mod template_service;
pub mod tokens;
