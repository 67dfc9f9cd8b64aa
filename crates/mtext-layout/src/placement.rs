//! Moves a finished layout from its local frame to the insertion point.
//!
//! The local frame has its origin at the top-left of the first line
//! (bottom-left for bottom-to-top flow). Placement shifts the block so the
//! attachment point lands on the origin, rotates it by the entity angle and
//! translates it to the insertion point.

use crate::geometry::Transform;
use crate::options::{FlowDirection, HorizontalAnchor, MTextEntity, VerticalAnchor};
use crate::output::LayoutResult;

/// Offset that brings the attachment point of `result` to the origin.
#[must_use]
pub fn anchor_offset(result: &LayoutResult, entity: &MTextEntity) -> (f64, f64) {
    let (left, right) = if entity.wraps() {
        (0.0, entity.width)
    } else if result.bounds.is_empty() {
        (0.0, 0.0)
    } else {
        (result.bounds.min.x, result.bounds.max.x)
    };
    let dx = match entity.attachment.horizontal() {
        HorizontalAnchor::Left => -left,
        HorizontalAnchor::Center => -(left + right) / 2.0,
        HorizontalAnchor::Right => -right,
    };

    let total = result.total_height;
    let dy = match (entity.flow_direction, entity.attachment.vertical()) {
        (FlowDirection::BottomToTop, VerticalAnchor::Top) => -total,
        (FlowDirection::BottomToTop, VerticalAnchor::Middle) => -total / 2.0,
        (FlowDirection::BottomToTop, VerticalAnchor::Bottom) => 0.0,
        (_, VerticalAnchor::Top) => 0.0,
        (_, VerticalAnchor::Middle) => total / 2.0,
        (_, VerticalAnchor::Bottom) => total,
    };
    (dx, dy)
}

/// Full local-to-drawing transform for `result`.
#[must_use]
pub fn placement_transform(result: &LayoutResult, entity: &MTextEntity) -> Transform {
    let (dx, dy) = anchor_offset(result, entity);
    Transform::translation(dx, dy)
        .then(&Transform::rotation(entity.angle()))
        .then(&Transform::translation(entity.insertion.x, entity.insertion.y))
}

/// Move `result` into drawing coordinates.
pub fn place(result: &mut LayoutResult, entity: &MTextEntity) {
    let transform = placement_transform(result, entity);
    result.transform(&transform);
}
