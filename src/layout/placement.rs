//! Candidate search and collision resolution for a single label within a
//! full layout pass. All functions here work with pure geometry; the host
//! is only consulted for projection and text measurement.

use crate::config::EngineConfig;
use crate::feature::{FeatureGeometry, GeoPoint, LabelPos, PosPolicy};
use crate::host::{MapHost, ViewTransform};
use crate::layout::line_positions::{LineAnchors, line_anchors};
use crate::layout::types::{Bounds, PlacedInstance};
use crate::registry::Label;

/// Top-left corner of the label box for a slot, relative to the anchor
/// pixel `p` and the marker footprint.
pub(crate) fn offset_origin(
    pos: LabelPos,
    p: (f32, f32),
    icon_anchor: (f32, f32),
    icon_size: (f32, f32),
    label_size: (f32, f32),
    gap: f32,
) -> (f32, f32) {
    let (ax, ay) = icon_anchor;
    let (sw, sh) = icon_size;
    let (lw, lh) = label_size;
    match pos {
        LabelPos::Right => (p.0 + sw - ax + gap, p.1 + sh / 2.0 - ay - lh / 2.0),
        LabelPos::Left => (p.0 - ax - gap - lw, p.1 + sh / 2.0 - ay - lh / 2.0),
        LabelPos::Center => (p.0 - ax - lw / 2.0, p.1 - ay - lh / 2.0),
    }
}

/// Candidate anchor pixels for one label under the current transform,
/// each paired with the geographic point it was projected from. Repeated
/// line labels fan out along the projected chain; everything else anchors
/// at the single reference point.
fn candidate_anchors<H: MapHost>(
    label: &Label,
    host: &H,
    transform: &ViewTransform,
) -> Vec<((f32, f32), GeoPoint)> {
    match &label.feature.geometry {
        FeatureGeometry::Line(points) if label.feature.options.repeat_along_lines => {
            let chain: Vec<(f32, f32)> = points
                .iter()
                .map(|point| host.project(*point, transform))
                .collect();
            match line_anchors(&chain, label.feature.options.repeat_distance) {
                LineAnchors::Collapsed(p) => vec![(p, label.reference_point)],
                LineAnchors::Spaced(anchors) => anchors
                    .into_iter()
                    .map(|lp| {
                        let a = points[lp.segment];
                        let b = points[lp.segment + 1];
                        let t = lp.t as f64;
                        let geo = GeoPoint::new(
                            a.lat + (b.lat - a.lat) * t,
                            a.lng + (b.lng - a.lng) * t,
                        );
                        (lp.point, geo)
                    })
                    .collect(),
            }
        }
        _ => vec![(
            host.project(label.reference_point, transform),
            label.reference_point,
        )],
    }
}

/// Resolve one label against the boxes already placed this pass.
///
/// Rewrites all of the label's per-pass state. Anchors outside the view
/// extent are culled before any box math; each surviving anchor walks the
/// slot list and keeps the first slot whose box is on screen and clear of
/// every placed box. Accepted boxes (label and marker footprint) join
/// `placed_boxes` so later, lower-priority labels yield to them.
pub(crate) fn place_label<H: MapHost>(
    label: &mut Label,
    host: &H,
    transform: &ViewTransform,
    extent: &Bounds,
    placed_boxes: &mut Vec<Bounds>,
    config: &EngineConfig,
) {
    label.measured = None;
    label.instances.clear();
    label.chosen_pos = None;
    label.placed = false;
    label.text = match &label.feature.options.label {
        Some(prop) => prop.resolve(&label.feature),
        None => String::new(),
    };
    label.style = label.feature.options.style.resolve(&label.feature);

    let gap = label.feature.options.gap;
    for (p, anchor_geo) in candidate_anchors(label, host, transform) {
        if !extent.contains(p) {
            continue;
        }
        let marker_box = Bounds::new(
            p.0 - label.icon_anchor.0,
            p.1 - label.icon_anchor.1,
            p.0 - label.icon_anchor.0 + label.icon_size.0,
            p.1 - label.icon_anchor.1 + label.icon_size.1,
        );
        // A marker footprint colliding with placed boxes is advisory by
        // default; the enforcing variant drops the anchor outright.
        let icon_blocked =
            !marker_box.is_empty() && placed_boxes.iter().any(|b| b.intersects(&marker_box));
        if icon_blocked && config.enforce_icon_clearance {
            continue;
        }
        let size = match label.measured {
            Some(size) => size,
            None => {
                let size = host.measure_label(&label.text, &label.style);
                label.measured = Some(size);
                size
            }
        };
        let slots: &[LabelPos] = match label.feature.options.pos {
            PosPolicy::Auto => config.auto_pos_order.as_slice(),
            PosPolicy::Right => &[LabelPos::Right],
            PosPolicy::Left => &[LabelPos::Left],
            PosPolicy::Center => &[LabelPos::Center],
        };
        for &slot in slots {
            let origin = offset_origin(slot, p, label.icon_anchor, label.icon_size, size, gap);
            let bounds = Bounds::from_origin_size(origin, size);
            if bounds.outside(extent) {
                continue;
            }
            if placed_boxes.iter().any(|b| b.intersects(&bounds)) {
                continue;
            }
            placed_boxes.push(bounds);
            placed_boxes.push(marker_box);
            if label.chosen_pos.is_none() {
                label.chosen_pos = Some(slot);
            }
            label.instances.push(PlacedInstance {
                anchor_geo,
                origin,
                bounds,
                pos: slot,
            });
            break;
        }
    }
    label.placed = !label.instances.is_empty();
}
