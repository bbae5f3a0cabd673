//! L4 Atomic Layer: Nearest-anchor selection

use crate::geometry::{Anchor, Vec2};

/// Index of the anchor closest to `offset`.
///
/// Ties keep the lowest index. `None` when there are no anchors.
pub fn nearest(anchors: &[Anchor], offset: Vec2) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, anchor) in anchors.iter().enumerate() {
        let distance = offset.distance(anchor.position());
        match best {
            Some((_, min)) if distance >= min => {}
            _ => best = Some((index, distance)),
        }
    }

    best.map(|(index, _)| index)
}
