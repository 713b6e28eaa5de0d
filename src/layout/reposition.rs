//! Position-only refresh used while the view transform is animating
//! between full passes.

use crate::host::{MapHost, ViewTransform};
use crate::layout::placement::offset_origin;
use crate::layout::types::Bounds;
use crate::registry::LabelRegistry;

/// Re-project every placed instance under `transform` and reapply its
/// recorded slot offset. No measurement, no collision checks, no
/// membership or marker-visibility changes; hidden labels stay hidden.
pub(crate) fn reposition<H: MapHost>(
    registry: &mut LabelRegistry,
    host: &H,
    transform: &ViewTransform,
) {
    for label in registry.values_mut() {
        if !label.placed {
            continue;
        }
        let size = label.measured.unwrap_or_default();
        let gap = label.feature.options.gap;
        let icon_anchor = label.icon_anchor;
        let icon_size = label.icon_size;
        for instance in &mut label.instances {
            let p = host.project(instance.anchor_geo, transform);
            let origin = offset_origin(instance.pos, p, icon_anchor, icon_size, size, gap);
            instance.origin = origin;
            instance.bounds = Bounds::from_origin_size(origin, size);
        }
    }
}
