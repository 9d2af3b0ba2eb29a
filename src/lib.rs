//! Configuration-driven view-model engine for an EV charger dashboard card.
//!
//! The host pushes a card configuration and entity state snapshots; the card
//! resolves every display region into render-ready items. The editor applies
//! brand templates to produce concrete per-installation configurations.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

pub use application::host::{DeviceRegistry, HostEvents, ServiceCaller, StateStore};
pub use application::localization::{Locale, Localizer};
pub use error::{ActionError, CalcError, CardError, CatalogueError, TemplateError};
pub use presentation::card::{CardRender, ChargerCard};
pub use presentation::editor::CardEditor;
