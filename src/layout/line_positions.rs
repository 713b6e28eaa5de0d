//! Anchor generation for labels repeated along line features. Works on
//! an already-projected pixel vertex chain; output is deterministic for
//! a given chain and spacing.

/// A generated on-chain anchor: the interpolated pixel point plus the
/// segment index and interpolation parameter that produced it, so the
/// caller can map it back onto the geographic chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
    pub point: (f32, f32),
    pub segment: usize,
    pub t: f32,
}

/// Output of [`line_anchors`].
#[derive(Debug, Clone, PartialEq)]
pub enum LineAnchors {
    /// Chain shorter than the spacing: one anchor at the length-weighted
    /// centroid, which is not necessarily on the chain.
    Collapsed((f32, f32)),
    /// Evenly spaced on-chain anchors, first at `dist / 2` from the
    /// chain start, trailing partial spacing dropped.
    Spaced(Vec<LinePoint>),
}

impl LineAnchors {
    pub fn len(&self) -> usize {
        match self {
            LineAnchors::Collapsed(_) => 1,
            LineAnchors::Spaced(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Candidate anchors spaced `dist` pixels apart along `chain`.
///
/// Chains with fewer than two vertices yield no anchors; chains whose
/// bounding-box diagonal is at most `dist` collapse to the single
/// centroid anchor.
pub fn line_anchors(chain: &[(f32, f32)], dist: f32) -> LineAnchors {
    if chain.len() < 2 || dist <= 0.0 {
        return LineAnchors::Spaced(Vec::new());
    }
    if bbox_diagonal(chain) <= dist {
        return LineAnchors::Collapsed(chain_centroid(chain));
    }

    let mut anchors = Vec::new();
    // Next emission point, measured as cumulative distance from the
    // chain start. Each emitted anchor restarts the spacing from itself.
    let mut next = dist / 2.0;
    let mut traveled = 0.0f32;
    for (segment, pair) in chain.windows(2).enumerate() {
        let dx = pair[1].0 - pair[0].0;
        let dy = pair[1].1 - pair[0].1;
        let seg_len = (dx * dx + dy * dy).sqrt();
        if seg_len <= f32::EPSILON {
            continue;
        }
        while traveled + seg_len >= next {
            let t = ((next - traveled) / seg_len).clamp(0.0, 1.0);
            anchors.push(LinePoint {
                point: (pair[0].0 + dx * t, pair[0].1 + dy * t),
                segment,
                t,
            });
            next += dist;
        }
        traveled += seg_len;
    }
    LineAnchors::Spaced(anchors)
}

fn bbox_diagonal(chain: &[(f32, f32)]) -> f32 {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for &(x, y) in chain {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    let dx = max_x - min_x;
    let dy = max_y - min_y;
    (dx * dx + dy * dy).sqrt()
}

/// Length-weighted centroid of the chain (not the vertex mean).
fn chain_centroid(chain: &[(f32, f32)]) -> (f32, f32) {
    let mut total = 0.0f32;
    let mut cx = 0.0f32;
    let mut cy = 0.0f32;
    for pair in chain.windows(2) {
        let dx = pair[1].0 - pair[0].0;
        let dy = pair[1].1 - pair[0].1;
        let len = (dx * dx + dy * dy).sqrt();
        cx += (pair[0].0 + pair[1].0) * 0.5 * len;
        cy += (pair[0].1 + pair[1].1) * 0.5 * len;
        total += len;
    }
    if total <= f32::EPSILON {
        return chain[0];
    }
    (cx / total, cy / total)
}
