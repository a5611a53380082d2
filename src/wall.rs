//! Wall-aware placement for doors and windows.
//!
//! A wall item is described by the wall it sits on and its offset along that
//! wall. These functions turn that description into a world position,
//! rotation and footprint that sit flush against the wall.

use crate::geometry::clamp_range;
use crate::model::{Item, Room, Rotation, WallMount, WallSide};
use crate::types::{Footprint, Placeable};

/// Distances from each footprint edge to its matching wall, in tie-break order.
fn wall_distances(footprint: &Footprint, room: &Room) -> [(WallSide, f64); 4] {
    let walls = room.walls();
    [
        (WallSide::Left, footprint.x - walls.left),
        (WallSide::Right, walls.right - footprint.right()),
        (WallSide::Bottom, footprint.y - walls.bottom),
        (WallSide::Top, walls.top - footprint.top()),
    ]
}

/// Picks the wall with the smallest distance after `measure` is applied.
///
/// Ties resolve in the order left, right, bottom, top.
pub(crate) fn nearest_wall(
    footprint: &Footprint,
    room: &Room,
    measure: impl Fn(f64) -> f64,
) -> WallSide {
    let mut best = (WallSide::Left, f64::INFINITY);
    for (side, raw) in wall_distances(footprint, room) {
        let distance = measure(raw);
        if distance < best.1 {
            best = (side, distance);
        }
    }
    best.0
}

/// Largest offset that keeps `span` inside a wall of length `wall_len`.
#[inline]
fn max_offset(wall_len: f64, span: f64) -> f64 {
    (wall_len - span).max(0.0)
}

/// Snaps a door or window onto its wall.
///
/// Left/right walls: windows turn to 90° so their long edge runs along Y,
/// doors keep 0°. Top/bottom walls: windows keep 0°, doors turn to 90°. The
/// offset is clamped into the wall and becomes the along-wall coordinate; the
/// other coordinate puts the item flush against the wall.
///
/// Items without a wall side, and items that are neither door nor window,
/// are left untouched.
pub fn apply_wall_placement(item: &mut Item, room: &Room) {
    let is_window = item.is_window();
    let Some(side) = item.wall_side() else {
        return;
    };

    item.rotation = match (side.is_vertical(), is_window) {
        (true, true) | (false, false) => Rotation::Deg90,
        (true, false) | (false, true) => Rotation::Deg0,
    };

    let footprint = item.footprint();
    let (span, thickness, wall_len) = if side.is_vertical() {
        (footprint.l, footprint.w, room.length_cm)
    } else {
        (footprint.w, footprint.l, room.width_cm)
    };

    let Some(mount) = item.wall_mount_mut() else {
        return;
    };
    mount.offset_cm = clamp_range(mount.offset_cm, 0.0, max_offset(wall_len, span));
    let offset = mount.offset_cm;

    match side {
        WallSide::Left => {
            item.pos.y = offset;
            item.pos.x = 0.0;
        }
        WallSide::Right => {
            item.pos.y = offset;
            item.pos.x = room.width_cm - thickness;
        }
        WallSide::Bottom => {
            item.pos.x = offset;
            item.pos.y = 0.0;
        }
        WallSide::Top => {
            item.pos.x = offset;
            item.pos.y = room.length_cm - thickness;
        }
    }
}

/// Attaches a door or window to whichever wall its footprint is closest to.
///
/// The along-wall offset is taken from the item's current position, clamped
/// into the wall, and [`apply_wall_placement`] is run afterwards.
pub fn stick_to_nearest_wall(item: &mut Item, room: &Room) {
    if !item.is_wall_item() {
        return;
    }
    let footprint = item.footprint();
    let side = nearest_wall(&footprint, room, f64::abs);

    let offset = if side.is_vertical() {
        clamp_range(item.pos.y, 0.0, max_offset(room.length_cm, footprint.l))
    } else {
        clamp_range(item.pos.x, 0.0, max_offset(room.width_cm, footprint.w))
    };

    if let Some(mount) = item.wall_mount_mut() {
        mount.side = Some(side);
        mount.offset_cm = offset;
    }
    apply_wall_placement(item, room);
}

/// Keeps an item's footprint inside the room.
///
/// An item larger than the room ends up at the origin on that axis.
pub fn clamp_inside_room(item: &mut Item, room: &Room) {
    let footprint = item.footprint();
    item.pos.x = clamp_range(item.pos.x, 0.0, room.width_cm - footprint.w);
    item.pos.y = clamp_range(item.pos.y, 0.0, room.length_cm - footprint.l);
}

/// Puts a fresh wall item in the middle of `side`.
pub(crate) fn center_on_wall(item: &mut Item, room: &Room, side: WallSide) {
    let span = item.span_along_wall_if(side);
    let wall_len = if side.is_vertical() {
        room.length_cm
    } else {
        room.width_cm
    };
    if let Some(mount) = item.wall_mount_mut() {
        *mount = WallMount::on(side, ((wall_len - span) / 2.0).max(0.0));
    }
    apply_wall_placement(item, room);
}

impl Item {
    /// Along-wall length the item would have once placed on `side`.
    fn span_along_wall_if(&self, side: WallSide) -> f64 {
        let rotation = match (side.is_vertical(), self.is_window()) {
            (true, true) | (false, false) => Rotation::Deg90,
            _ => Rotation::Deg0,
        };
        let footprint = self.clone().with_rotation(rotation).footprint();
        if side.is_vertical() {
            footprint.l
        } else {
            footprint.w
        }
    }
}
