//! Features and feature collections.
//!
//! A `Feature` couples a geometry with an opaque property mapping; a
//! `FeatureCollection` is an ordered sequence of features. Order matters for
//! result stability (k-NN rank ties, index-to-feature correspondence) but
//! carries no geometric meaning.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::geometry::Geometry;

/// A geometry with properties and an optional identity.
///
/// Properties are opaque to geometric operations and are deep-copied, never
/// aliased, whenever an operation produces a derived feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

impl Feature {
    /// Create a feature with empty properties
    pub fn new(geometry: Geometry) -> Self {
        Self { id: None, properties: Map::new(), geometry }
    }

    /// Create a feature with properties
    pub fn with_properties(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self { id: None, properties, geometry }
    }

    /// Builder-style identity setter
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder-style property setter
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Copy of this feature with one extra property set.
    ///
    /// The property map is cloned first so the input feature is never
    /// mutated in place.
    pub fn tagged(&self, key: &str, value: impl Into<Value>) -> Self {
        let mut out = self.clone();
        out.properties.insert(key.to_string(), value.into());
        out
    }
}

/// An ordered sequence of features
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn empty() -> Self {
        Self { features: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Only the Point features, in input order
    pub fn point_features(&self) -> Vec<&Feature> {
        self.features
            .iter()
            .filter(|f| matches!(f.geometry, Geometry::Point { .. }))
            .collect()
    }

    /// Geometries of all features, in input order
    pub fn geometries(&self) -> Vec<Geometry> {
        self.features.iter().map(|f| f.geometry.clone()).collect()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        Self { features: iter.into_iter().collect() }
    }
}
