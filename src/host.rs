use serde::{Deserialize, Serialize};

use crate::feature::{GeoPoint, LabelStyle};

/// View state the host hands to a layout pass. `origin` is the pixel
/// position of the viewport's top-left corner in layer space; the engine
/// treats `zoom` as opaque and only forwards it through `project`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub origin: (f32, f32),
    pub zoom: f64,
}

impl ViewTransform {
    pub fn new(origin: (f32, f32), zoom: f64) -> Self {
        Self { origin, zoom }
    }
}

/// The map-side collaborator. The engine owns ordering, candidate search,
/// collision checks, and culling; projection, text measurement, and marker
/// visibility stay with the host.
pub trait MapHost {
    /// Project a geographic point into layer-space pixels under `transform`.
    fn project(&self, point: GeoPoint, transform: &ViewTransform) -> (f32, f32);

    /// Pixel size of `text` as it will render with `style`.
    fn measure_label(&self, text: &str, style: &LabelStyle) -> (f32, f32);

    /// Show or hide the marker (and its shadow, if any) owning `feature_id`.
    /// Only called for labels with `marker_with_label_only` set.
    fn set_marker_visible(&mut self, feature_id: &str, visible: bool);
}
