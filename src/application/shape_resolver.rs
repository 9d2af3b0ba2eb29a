// Data shape resolver - fans item normalization out over a region
use crate::application::item_normalizer::ItemNormalizer;
use crate::domain::item::{ItemDescriptor, NormalizedItem};
use crate::domain::shape::{DataShape, ResolvedShape};
use serde_json::Value;

/// Runs unconditionally on every state update; holds no cache.
#[derive(Clone, Copy)]
pub struct ShapeResolver<'a> {
    normalizer: ItemNormalizer<'a>,
}

impl<'a> ShapeResolver<'a> {
    pub fn new(normalizer: ItemNormalizer<'a>) -> Self {
        Self { normalizer }
    }

    pub fn resolve(&self, shape: &DataShape) -> ResolvedShape {
        match shape {
            DataShape::Item(item) => ResolvedShape::Item(self.normalizer.normalize(item)),
            DataShape::List(items) => ResolvedShape::List(self.normalize_all(items)),
            DataShape::StateKeyed(lists) => ResolvedShape::StateKeyed(
                lists
                    .iter()
                    .map(|(state, items)| (state.clone(), self.normalize_all(items)))
                    .collect(),
            ),
            DataShape::Scalar(value) => ResolvedShape::Scalar(value.clone()),
        }
    }

    /// Decode and resolve a raw configuration subtree in one step.
    pub fn resolve_raw(&self, raw: &Value) -> Result<Option<ResolvedShape>, serde_json::Error> {
        Ok(DataShape::decode(raw)?.map(|shape| self.resolve(&shape)))
    }

    fn normalize_all(&self, items: &[ItemDescriptor]) -> Vec<NormalizedItem> {
        items.iter().map(|item| self.normalizer.normalize(item)).collect()
    }
}
