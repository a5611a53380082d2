//! Snapping algorithms.
//!
//! Three flavours are offered:
//! - soft wall snapping: edges within the room's snap epsilon land on the wall
//! - hard wall snapping: the item moves flush to its closest wall
//! - neighbour snapping: facing edges within epsilon of another item close the gap
//!
//! All functions move only `pos`; they never touch rotation or size.

use crate::geometry::ranges_overlap;
use crate::model::{Item, Room, WallSide};
use crate::types::{Placeable, Vec2};
use crate::wall::{clamp_inside_room, nearest_wall};

/// Soft snap: each edge within `room.snap_epsilon_cm` of its wall lands on it.
///
/// X and Y are handled independently, so an item near a corner snaps into the
/// corner. When both opposite edges qualify (item almost as wide as the room)
/// the right/top wall wins.
pub fn snap_to_walls(item: &mut Item, room: &Room) {
    let footprint = item.footprint();
    let eps = room.snap_epsilon_cm;
    let walls = room.walls();

    if (footprint.x - walls.left).abs() <= eps {
        item.pos.x = walls.left;
    }
    if (footprint.right() - walls.right).abs() <= eps {
        item.pos.x = walls.right - footprint.w;
    }
    if (footprint.y - walls.bottom).abs() <= eps {
        item.pos.y = walls.bottom;
    }
    if (footprint.top() - walls.top).abs() <= eps {
        item.pos.y = walls.top - footprint.l;
    }
}

/// Hard snap: moves the item flush to the wall with the smallest clearance.
///
/// Clearances below zero (item poking through a wall) count as zero. Ties
/// resolve left, right, bottom, top. The result is clamped inside the room.
/// Returns the wall the item was moved to.
pub fn snap_to_nearest_wall(item: &mut Item, room: &Room) -> WallSide {
    let footprint = item.footprint();
    let walls = room.walls();
    let side = nearest_wall(&footprint, room, |d| d.max(0.0));

    match side {
        WallSide::Left => item.pos.x = walls.left,
        WallSide::Right => item.pos.x = walls.right - footprint.w,
        WallSide::Bottom => item.pos.y = walls.bottom,
        WallSide::Top => item.pos.y = walls.top - footprint.l,
    }
    clamp_inside_room(item, room);
    side
}

/// Keeps the candidate delta with the smallest magnitude.
fn consider(best: &mut Option<f64>, delta: f64, eps: f64) {
    if delta.abs() > eps {
        return;
    }
    match best {
        Some(current) if current.abs() <= delta.abs() => {}
        _ => *best = Some(delta),
    }
}

/// Computes the shift that closes the smallest gap to a neighbour.
///
/// For X, only neighbours whose Y range strictly overlaps the item's are
/// considered (and vice versa). Both facing-edge gaps are candidates when
/// their magnitude is within `epsilon`; the smallest per axis wins, the
/// first one found on ties. The item itself (same id) is skipped.
pub fn neighbor_snap_offset<'a>(
    item: &Item,
    others: impl IntoIterator<Item = &'a Item>,
    epsilon: f64,
) -> Vec2 {
    let a = item.footprint();
    let mut best_dx = None;
    let mut best_dy = None;

    for other in others {
        if other.id == item.id {
            continue;
        }
        let b = other.footprint();

        if ranges_overlap(a.y, a.top(), b.y, b.top()) {
            consider(&mut best_dx, b.x - a.right(), epsilon);
            consider(&mut best_dx, b.right() - a.x, epsilon);
        }
        if ranges_overlap(a.x, a.right(), b.x, b.right()) {
            consider(&mut best_dy, b.y - a.top(), epsilon);
            consider(&mut best_dy, b.top() - a.y, epsilon);
        }
    }

    Vec2::new(best_dx.unwrap_or(0.0), best_dy.unwrap_or(0.0))
}

/// Applies [`neighbor_snap_offset`] to the item.
pub fn snap_to_neighbors<'a>(
    item: &mut Item,
    others: impl IntoIterator<Item = &'a Item>,
    epsilon: f64,
) {
    let offset = neighbor_snap_offset(item, others, epsilon);
    item.pos += offset;
}
