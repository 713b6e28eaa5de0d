pub(crate) mod line_positions;
mod placement;
mod reposition;
pub(crate) mod types;

pub use line_positions::{LineAnchors, LinePoint, line_anchors};
pub use types::{Bounds, PassStats, PlacedInstance};

use log::{debug, trace};
use std::cmp::Ordering;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::feature::Feature;
use crate::host::{MapHost, ViewTransform};
use crate::registry::{Label, LabelRegistry};

/// The placement engine. Owns the registry and re-derives every label's
/// visibility and position from scratch on each full pass; nothing sticks
/// between passes except the chosen slots that seed the animation
/// repositioner.
pub struct LabelEngine {
    config: EngineConfig,
    registry: LabelRegistry,
}

impl LabelEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: LabelRegistry::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &LabelRegistry {
        &self.registry
    }

    /// Track a feature's label; no layout pass is triggered. Returns
    /// whether the feature was actually registered (it carries a label).
    pub fn register(&mut self, feature: Feature) -> bool {
        self.registry.register(feature).is_some()
    }

    /// Register a group of features at once; callers run a single pass
    /// afterwards instead of one per member.
    pub fn register_all(&mut self, features: impl IntoIterator<Item = Feature>) {
        self.registry.register_all(features);
    }

    pub fn unregister(&mut self, feature_id: &str) -> bool {
        self.registry.unregister(feature_id)
    }

    /// Labels with at least one placed instance, for the render layer.
    pub fn placements(&self) -> impl Iterator<Item = (&str, &Label)> {
        self.registry.iter().filter(|(_, label)| label.placed)
    }

    /// One full layout pass: order by priority, search candidate slots,
    /// resolve collisions against everything placed earlier in the pass,
    /// cull against the viewport, and sync marker visibility.
    pub fn run_full_layout<H: MapHost>(
        &mut self,
        host: &mut H,
        transform: &ViewTransform,
        viewport: (f32, f32),
    ) -> PassStats {
        let started = Instant::now();
        let extent = Bounds::new(
            transform.origin.0,
            transform.origin.1,
            transform.origin.0 + viewport.0,
            transform.origin.1 + viewport.1,
        );

        // Descending priority. The registry iterates in feature-id order
        // and the sort is stable, so equal priorities break on id and the
        // outcome does not depend on registration order.
        let mut order: Vec<(f64, String)> = self
            .registry
            .iter()
            .map(|(id, label)| (label.priority, id.to_string()))
            .collect();
        order.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let mut placed_boxes: Vec<Bounds> = Vec::new();
        let mut stats = PassStats {
            labels: order.len(),
            ..Default::default()
        };
        for (_, id) in &order {
            let Some(label) = self.registry.get_mut(id) else {
                continue;
            };
            placement::place_label(
                label,
                &*host,
                transform,
                &extent,
                &mut placed_boxes,
                &self.config,
            );
            if label.placed {
                stats.placed += 1;
                stats.instances += label.instances.len();
            } else {
                trace!("label {id} hidden: no free slot");
            }
            if label.feature.options.marker_with_label_only {
                host.set_marker_visible(id, label.placed);
            }
        }
        debug!(
            "label pass: {}/{} placed, {} instances in {:?}",
            stats.placed,
            stats.labels,
            stats.instances,
            started.elapsed()
        );
        stats
    }

    /// Lightweight pass for transform-animation frames: placed instances
    /// are re-projected and re-offset with their recorded slots, nothing
    /// else moves.
    pub fn run_animation_reposition<H: MapHost>(&mut self, host: &H, transform: &ViewTransform) {
        reposition::reposition(&mut self.registry, host, transform);
    }
}
