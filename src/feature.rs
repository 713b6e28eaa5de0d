use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::config::EngineConfig;

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Feature geometry as supplied by the host, in geographic space.
///
/// Polygons are a single outer ring; holes do not move the label anchor
/// enough to matter at labeling scales and are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureGeometry {
    Point(GeoPoint),
    Line(Vec<GeoPoint>),
    Polygon(Vec<GeoPoint>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
}

impl FeatureGeometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            FeatureGeometry::Point(_) => GeometryKind::Point,
            FeatureGeometry::Line(_) => GeometryKind::Line,
            FeatureGeometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Geographic anchor the label is positioned against: the point itself,
    /// the polygon's area centroid, or the line's length-weighted centroid.
    pub fn reference_point(&self) -> GeoPoint {
        match self {
            FeatureGeometry::Point(p) => *p,
            FeatureGeometry::Line(points) => line_centroid(points),
            FeatureGeometry::Polygon(ring) => polygon_centroid(ring),
        }
    }
}

/// Length-weighted centroid of a vertex chain. Degenerate chains (fewer
/// than two distinct vertices) fall back to the first vertex.
pub fn line_centroid(points: &[GeoPoint]) -> GeoPoint {
    let Some(first) = points.first() else {
        return GeoPoint::new(0.0, 0.0);
    };
    let mut total = 0.0f64;
    let mut lat = 0.0f64;
    let mut lng = 0.0f64;
    for pair in points.windows(2) {
        let dx = pair[1].lng - pair[0].lng;
        let dy = pair[1].lat - pair[0].lat;
        let len = (dx * dx + dy * dy).sqrt();
        lat += (pair[0].lat + pair[1].lat) * 0.5 * len;
        lng += (pair[0].lng + pair[1].lng) * 0.5 * len;
        total += len;
    }
    if total <= f64::EPSILON {
        return *first;
    }
    GeoPoint::new(lat / total, lng / total)
}

/// Area centroid of a polygon ring. Rings with near-zero area fall back
/// to the vertex mean.
pub fn polygon_centroid(ring: &[GeoPoint]) -> GeoPoint {
    if ring.is_empty() {
        return GeoPoint::new(0.0, 0.0);
    }
    let mut area = 0.0f64;
    let mut lat = 0.0f64;
    let mut lng = 0.0f64;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let cross = a.lng * b.lat - b.lng * a.lat;
        area += cross;
        lat += (a.lat + b.lat) * cross;
        lng += (a.lng + b.lng) * cross;
    }
    if area.abs() <= f64::EPSILON {
        let n = ring.len() as f64;
        let lat = ring.iter().map(|p| p.lat).sum::<f64>() / n;
        let lng = ring.iter().map(|p| p.lng).sum::<f64>() / n;
        return GeoPoint::new(lat, lng);
    }
    GeoPoint::new(lat / (3.0 * area), lng / (3.0 * area))
}

/// Marker icon footprint for point features, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IconSpec {
    pub size: (f32, f32),
    pub anchor: (f32, f32),
}

impl IconSpec {
    pub fn new(size: (f32, f32), anchor: (f32, f32)) -> Self {
        Self { size, anchor }
    }

    /// Footprint of a circle marker of the given radius.
    pub fn circle(radius: f32) -> Self {
        Self {
            size: (radius * 2.0, radius * 2.0),
            anchor: (radius, radius),
        }
    }
}

/// A label property that is either fixed or derived from the feature.
/// Computed properties are resolved once per layout pass (priority once,
/// at registration).
#[derive(Clone)]
pub enum Prop<T> {
    Literal(T),
    Computed(Arc<dyn Fn(&Feature) -> T + Send + Sync>),
}

impl<T: Clone> Prop<T> {
    pub fn resolve(&self, feature: &Feature) -> T {
        match self {
            Prop::Literal(value) => value.clone(),
            Prop::Computed(f) => f(feature),
        }
    }
}

impl<T> Prop<T> {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Feature) -> T + Send + Sync + 'static,
    {
        Prop::Computed(Arc::new(f))
    }
}

impl<T: fmt::Debug> fmt::Debug for Prop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Prop::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<T> From<T> for Prop<T> {
    fn from(value: T) -> Self {
        Prop::Literal(value)
    }
}

impl From<&str> for Prop<String> {
    fn from(value: &str) -> Self {
        Prop::Literal(value.to_string())
    }
}

/// Relative placement policy for a label. `Auto` walks the configured
/// slot order until one fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosPolicy {
    Auto,
    Right,
    Left,
    Center,
}

/// The slot a placed label actually occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPos {
    Right,
    Left,
    Center,
}

/// Style attributes applied to the rendered label. The engine only reads
/// the font fields (for measurement); everything else passes through to
/// the render layer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    pub font_family: String,
    pub font_size: f32,
    pub attrs: BTreeMap<String, String>,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            font_size: 12.0,
            attrs: BTreeMap::new(),
        }
    }
}

/// Per-feature label options, mirroring the host's layer option surface.
/// A feature with `label: None` is not tracked at all.
#[derive(Debug, Clone)]
pub struct LabelOptions {
    pub label: Option<Prop<String>>,
    pub gap: f32,
    pub pos: PosPolicy,
    pub style: Prop<LabelStyle>,
    pub priority: Prop<f64>,
    pub marker_with_label_only: bool,
    pub repeat_along_lines: bool,
    pub repeat_distance: f32,
}

impl LabelOptions {
    /// Options seeded from the engine-level defaults, with no label text.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            label: None,
            gap: config.label_gap,
            pos: config.label_pos,
            style: Prop::Literal(config.default_style.clone()),
            priority: Prop::Literal(config.label_priority),
            marker_with_label_only: config.marker_with_label_only,
            repeat_along_lines: config.repeat_along_lines,
            repeat_distance: config.repeat_distance,
        }
    }

    pub fn with_label(mut self, label: impl Into<Prop<String>>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// One labeled map feature as handed to `LabelRegistry::register`.
#[derive(Debug, Clone)]
pub struct Feature {
    pub id: String,
    pub geometry: FeatureGeometry,
    pub icon: Option<IconSpec>,
    pub options: LabelOptions,
}

impl Feature {
    pub fn new(id: impl Into<String>, geometry: FeatureGeometry, options: LabelOptions) -> Self {
        Self {
            id: id.into(),
            geometry,
            icon: None,
            options,
        }
    }

    pub fn with_icon(mut self, icon: IconSpec) -> Self {
        self.icon = Some(icon);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_reference_is_the_point() {
        let p = GeoPoint::new(10.0, 20.0);
        assert_eq!(FeatureGeometry::Point(p).reference_point(), p);
    }

    #[test]
    fn polygon_centroid_of_square() {
        let ring = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 4.0),
            GeoPoint::new(4.0, 4.0),
            GeoPoint::new(4.0, 0.0),
        ];
        let c = polygon_centroid(&ring);
        assert!((c.lat - 2.0).abs() < 1e-9 && (c.lng - 2.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_polygon_falls_back_to_vertex_mean() {
        let ring = vec![GeoPoint::new(1.0, 1.0), GeoPoint::new(3.0, 3.0)];
        let c = polygon_centroid(&ring);
        assert!((c.lat - 2.0).abs() < 1e-9 && (c.lng - 2.0).abs() < 1e-9);
    }

    #[test]
    fn line_centroid_weights_by_length() {
        // One long horizontal segment and one short vertical one: the
        // centroid must sit close to the long segment's midpoint.
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 10.0),
            GeoPoint::new(1.0, 10.0),
        ];
        let c = line_centroid(&points);
        assert!((c.lng - (5.0 * 10.0 + 10.0 * 1.0) / 11.0).abs() < 1e-9);
        assert!((c.lat - (0.5 * 1.0) / 11.0).abs() < 1e-9);
    }

    #[test]
    fn line_centroid_of_single_vertex() {
        let points = vec![GeoPoint::new(2.0, 3.0)];
        assert_eq!(line_centroid(&points), GeoPoint::new(2.0, 3.0));
    }

    #[test]
    fn computed_prop_resolves_against_feature() {
        let feature = Feature::new(
            "roads/1",
            FeatureGeometry::Point(GeoPoint::new(0.0, 0.0)),
            LabelOptions::default().with_label("x"),
        );
        let prop = Prop::computed(|f: &Feature| format!("label for {}", f.id));
        assert_eq!(prop.resolve(&feature), "label for roads/1");
    }

    #[test]
    fn circle_icon_footprint() {
        let icon = IconSpec::circle(6.0);
        assert_eq!(icon.size, (12.0, 12.0));
        assert_eq!(icon.anchor, (6.0, 6.0));
    }
}
