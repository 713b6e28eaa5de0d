use std::collections::BTreeMap;

use crate::feature::{Feature, GeoPoint, GeometryKind, LabelPos, LabelStyle};
use crate::layout::types::PlacedInstance;

/// One registered label. Everything below the `feature` field is derived
/// at registration; the per-pass fields are rewritten by every full
/// layout pass and must not be trusted in between.
#[derive(Debug, Clone)]
pub struct Label {
    pub feature: Feature,
    /// Marker footprint, zero for non-point geometries.
    pub icon_size: (f32, f32),
    pub icon_anchor: (f32, f32),
    pub reference_point: GeoPoint,
    pub priority: f64,
    // per-pass state
    pub text: String,
    pub style: LabelStyle,
    pub measured: Option<(f32, f32)>,
    pub chosen_pos: Option<LabelPos>,
    pub placed: bool,
    pub instances: Vec<PlacedInstance>,
}

/// The set of currently registered labels, keyed by feature identity.
/// Mutations never trigger layout; callers decide when to run a pass, so
/// batched feature additions cost a single pass.
#[derive(Debug, Default)]
pub struct LabelRegistry {
    labels: BTreeMap<String, Label>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a feature's label. Returns `None` (and records nothing) for
    /// features without a label option. Re-registering an id replaces the
    /// previous entry wholesale.
    pub fn register(&mut self, feature: Feature) -> Option<&Label> {
        feature.options.label.as_ref()?;
        let (icon_size, icon_anchor) = match feature.geometry.kind() {
            GeometryKind::Point => feature
                .icon
                .map(|icon| (icon.size, icon.anchor))
                .unwrap_or_default(),
            _ => Default::default(),
        };
        let reference_point = feature.geometry.reference_point();
        let priority = feature.options.priority.resolve(&feature);
        let id = feature.id.clone();
        let label = Label {
            feature,
            icon_size,
            icon_anchor,
            reference_point,
            priority,
            text: String::new(),
            style: LabelStyle::default(),
            measured: None,
            chosen_pos: None,
            placed: false,
            instances: Vec::new(),
        };
        self.labels.insert(id.clone(), label);
        self.labels.get(&id)
    }

    /// Register a whole group of features with no intermediate work.
    pub fn register_all(&mut self, features: impl IntoIterator<Item = Feature>) {
        for feature in features {
            self.register(feature);
        }
    }

    pub fn unregister(&mut self, feature_id: &str) -> bool {
        self.labels.remove(feature_id).is_some()
    }

    pub fn get(&self, feature_id: &str) -> Option<&Label> {
        self.labels.get(feature_id)
    }

    pub(crate) fn get_mut(&mut self, feature_id: &str) -> Option<&mut Label> {
        self.labels.get_mut(feature_id)
    }

    /// Labels in feature-id order. Layout passes re-derive their own
    /// priority order from this.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Label)> {
        self.labels.iter().map(|(id, label)| (id.as_str(), label))
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Label> {
        self.labels.values_mut()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureGeometry, IconSpec, LabelOptions, Prop};

    fn point_feature(id: &str, lat: f64, lng: f64) -> Feature {
        Feature::new(
            id,
            FeatureGeometry::Point(GeoPoint::new(lat, lng)),
            LabelOptions::default().with_label(id),
        )
    }

    #[test]
    fn unlabeled_features_are_ignored() {
        let mut registry = LabelRegistry::new();
        let feature = Feature::new(
            "silent",
            FeatureGeometry::Point(GeoPoint::new(0.0, 0.0)),
            LabelOptions::default(),
        );
        assert!(registry.register(feature).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn icon_footprint_only_applies_to_points() {
        let mut registry = LabelRegistry::new();
        let point = point_feature("p", 0.0, 0.0).with_icon(IconSpec::circle(5.0));
        let label = registry.register(point).expect("registered");
        assert_eq!(label.icon_size, (10.0, 10.0));
        assert_eq!(label.icon_anchor, (5.0, 5.0));

        let line = Feature::new(
            "l",
            FeatureGeometry::Line(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)]),
            LabelOptions::default().with_label("line"),
        )
        .with_icon(IconSpec::circle(5.0));
        let label = registry.register(line).expect("registered");
        assert_eq!(label.icon_size, (0.0, 0.0));
    }

    #[test]
    fn priority_function_resolves_at_registration() {
        let mut registry = LabelRegistry::new();
        let mut feature = point_feature("scored", 0.0, 0.0);
        feature.options.priority = Prop::computed(|f: &Feature| f.id.len() as f64);
        let label = registry.register(feature).expect("registered");
        assert_eq!(label.priority, 6.0);
    }

    #[test]
    fn reregistering_overwrites() {
        let mut registry = LabelRegistry::new();
        registry.register(point_feature("a", 1.0, 1.0));
        registry.register(point_feature("a", 2.0, 2.0));
        assert_eq!(registry.len(), 1);
        let label = registry.get("a").expect("present");
        assert_eq!(label.reference_point, GeoPoint::new(2.0, 2.0));
    }

    #[test]
    fn unregister_removes_only_the_target() {
        let mut registry = LabelRegistry::new();
        registry.register_all([point_feature("a", 0.0, 0.0), point_feature("b", 0.0, 1.0)]);
        assert!(registry.unregister("a"));
        assert!(!registry.unregister("a"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("b").is_some());
    }
}
