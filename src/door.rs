//! Door swing geometry.
//!
//! An inward door reserves the quarter disk its leaf sweeps through while
//! opening. The sweep is a circular sector centred on the hinge with the leaf
//! length as radius, running from the closed leaf (along the wall) to the open
//! leaf (perpendicular to the wall, pointing into the room).

use std::f64::consts::{PI, TAU};

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{Item, Room, WallSide};
use crate::types::{Footprint, Placeable, Vec2};

/// Swing sector of an inward door.
///
/// `start`/`end` are radians measured in a y-down frame (screen convention),
/// with `end >= start` and `end - start <= PI`. They are bookkeeping for arc
/// drawing only; collision tests work on `center` and `radius_cm`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoorSweep {
    pub center: Vec2,
    pub radius_cm: f64,
    pub start: f64,
    pub end: f64,
}

/// Hinge side, leaf geometry and wall frame shared by sweep computations.
struct Leaf {
    side: WallSide,
    hinge_right: bool,
    length: f64,
    /// Along-wall coordinate where the leaf starts.
    along: f64,
}

impl Leaf {
    fn of(item: &Item) -> Option<Self> {
        let door = item.door_attrs()?;
        if !door.inward {
            return None;
        }
        let side = door.mount.side?;
        let along = if side.is_vertical() {
            item.pos.y
        } else {
            item.pos.x
        };
        Some(Self {
            side,
            hinge_right: door.hinge_right,
            length: item.span_along_wall(),
            along,
        })
    }

    fn hinge_coord(&self) -> f64 {
        if self.hinge_right {
            self.along + self.length
        } else {
            self.along
        }
    }

    fn tip_coord(&self) -> f64 {
        if self.hinge_right {
            self.along
        } else {
            self.along + self.length
        }
    }

    fn pivot(&self, room: &Room) -> Vec2 {
        let hinge = self.hinge_coord();
        match self.side {
            WallSide::Left => Vec2::new(0.0, hinge),
            WallSide::Right => Vec2::new(room.width_cm, hinge),
            WallSide::Bottom => Vec2::new(hinge, 0.0),
            WallSide::Top => Vec2::new(hinge, room.length_cm),
        }
    }
}

/// Angle of a plan vector in the y-down drawing frame.
#[inline]
fn screen_angle(v: Vec2) -> f64 {
    (-v.y).atan2(v.x)
}

/// Computes the swing sector of an inward door.
///
/// Returns `None` for anything that is not an inward door mounted on a wall.
///
/// # Example
/// ```
/// use room_planner::door::door_sweep;
/// use room_planner::model::{Item, Room, WallSide};
/// use room_planner::wall::apply_wall_placement;
///
/// let room = Room::new(400.0, 300.0, 4.0);
/// let mut door = Item::door("Door", 90.0, true).on_wall(WallSide::Bottom, 100.0);
/// apply_wall_placement(&mut door, &room);
///
/// let sweep = door_sweep(&door, &room).unwrap();
/// assert_eq!(sweep.radius_cm, 90.0);
/// assert_eq!(sweep.center.x, 100.0);
/// ```
pub fn door_sweep(item: &Item, room: &Room) -> Option<DoorSweep> {
    let leaf = Leaf::of(item)?;
    let center = leaf.pivot(room);
    let axis = leaf.side.axis();
    let normal = leaf.side.inward_normal();

    let closed = axis * (leaf.tip_coord() - leaf.hinge_coord());
    let cw = closed.rotated_cw();
    let open = if cw.dot(&normal) >= 0.0 {
        cw
    } else {
        closed.rotated_ccw()
    };

    let mut start = screen_angle(closed);
    let mut delta = screen_angle(open) - start;
    if delta > PI {
        delta -= TAU;
    }
    if delta < -PI {
        delta += TAU;
    }
    if delta < 0.0 {
        start += delta;
        delta = -delta;
    }

    Some(DoorSweep {
        center,
        radius_cm: leaf.length,
        start,
        end: start + delta,
    })
}

/// Checks whether a rectangle reaches into a door's swing area.
///
/// The sector is approximated corner by corner: a corner is inside when it
/// lies on the room side of the wall, on the leaf side of the hinge, within
/// one radius along both wall axes, and within the radius of the hinge.
/// A rectangle that straddles the sector without any corner inside it (for
/// example a thin bar crossing the pivot) is not detected.
pub fn rect_intersects_door_sweep(rect: &Footprint, door: &Item, room: &Room) -> bool {
    let Some(sweep) = door_sweep(door, room) else {
        return false;
    };
    let Some(side) = door.wall_side() else {
        return false;
    };
    let hinge_right = door.door_attrs().is_some_and(|attrs| attrs.hinge_right);
    let axis = side.axis();
    let normal = side.inward_normal();
    let radius = sweep.radius_cm;

    rect.corners().iter().any(|corner| {
        let d = *corner - sweep.center;
        let along = d.dot(&axis);
        let inward = d.dot(&normal);

        let on_room_side = inward >= 0.0;
        let on_leaf_side = if hinge_right { along <= 0.0 } else { along >= 0.0 };
        let within_box = along.abs() <= radius && inward <= radius;
        let within_radius = d.length_squared() <= radius * radius;

        on_room_side && on_leaf_side && within_box && within_radius
    })
}

/// Convenience wrapper taking any placed item as the rectangle.
pub fn item_intersects_door_sweep(item: &impl Placeable, door: &Item, room: &Room) -> bool {
    rect_intersects_door_sweep(&item.footprint(), door, room)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Size;
    use crate::wall::apply_wall_placement;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn room() -> Room {
        Room::new(400.0, 300.0, 4.0)
    }

    fn placed_door(side: WallSide, offset: f64, hinge_right: bool) -> Item {
        let mut door = Item::door("Door", 90.0, true).on_wall(side, offset);
        if let Some(attrs) = door.door_mut() {
            attrs.hinge_right = hinge_right;
        }
        apply_wall_placement(&mut door, &room());
        door
    }

    fn assert_quarter_turn(sweep: &DoorSweep) {
        assert!(sweep.end >= sweep.start);
        assert!((sweep.end - sweep.start - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn bottom_wall_left_hinge_pivots_at_leaf_start() {
        let door = placed_door(WallSide::Bottom, 100.0, false);
        let sweep = door_sweep(&door, &room()).expect("inward door has a sweep");

        assert_eq!(sweep.radius_cm, 90.0);
        assert_eq!(sweep.center, Vec2::new(door.pos.x, 0.0));
        assert_quarter_turn(&sweep);
        // Closed leaf points along +X (angle 0), open leaf into the room (+Y, -PI/2 on screen).
        assert!((sweep.start + FRAC_PI_2).abs() < EPS);
        assert!(sweep.end.abs() < EPS);
    }

    #[test]
    fn hinge_side_moves_the_pivot() {
        let left = door_sweep(&placed_door(WallSide::Bottom, 100.0, false), &room()).unwrap();
        let right = door_sweep(&placed_door(WallSide::Bottom, 100.0, true), &room()).unwrap();
        assert_eq!(left.center.x, 100.0);
        assert_eq!(right.center.x, 190.0);
        assert_quarter_turn(&right);
    }

    #[test]
    fn every_wall_opens_into_the_room() {
        for side in WallSide::ALL {
            for hinge_right in [false, true] {
                let door = placed_door(side, 60.0, hinge_right);
                let sweep = door_sweep(&door, &room()).unwrap();
                assert_quarter_turn(&sweep);

                // The bisector of the sector lies inside the room.
                let mid = (sweep.start + sweep.end) / 2.0;
                let probe = Vec2::new(
                    sweep.center.x + mid.cos() * 10.0,
                    sweep.center.y - mid.sin() * 10.0,
                );
                assert!(
                    probe.x > 0.0 && probe.x < 400.0 && probe.y > 0.0 && probe.y < 300.0,
                    "sweep on {side} (hinge right: {hinge_right}) points out of the room"
                );
            }
        }
    }

    #[test]
    fn outward_and_unmounted_doors_have_no_sweep() {
        let mut outward = Item::door("Out", 90.0, false).on_wall(WallSide::Left, 0.0);
        apply_wall_placement(&mut outward, &room());
        assert!(door_sweep(&outward, &room()).is_none());

        let loose = Item::door("Loose", 90.0, true);
        assert!(door_sweep(&loose, &room()).is_none());

        let table = Item::new("Table", Size::default());
        assert!(door_sweep(&table, &room()).is_none());
    }

    #[test]
    fn corner_inside_quadrant_hits_sweep() {
        let door = placed_door(WallSide::Bottom, 100.0, false);
        let near = Footprint::new(110.0, 10.0, 40.0, 40.0);
        assert!(rect_intersects_door_sweep(&near, &door, &room()));

        let behind_hinge = Footprint::new(40.0, 10.0, 40.0, 40.0);
        assert!(!rect_intersects_door_sweep(&behind_hinge, &door, &room()));

        let beyond_radius = Footprint::new(170.0, 70.0, 40.0, 40.0);
        assert!(!rect_intersects_door_sweep(&beyond_radius, &door, &room()));
    }

    #[test]
    fn right_hinge_mirrors_the_quadrant() {
        let door = placed_door(WallSide::Bottom, 100.0, true);
        let left_of_hinge = Footprint::new(150.0, 10.0, 20.0, 20.0);
        let right_of_hinge = Footprint::new(200.0, 10.0, 20.0, 20.0);
        assert!(rect_intersects_door_sweep(&left_of_hinge, &door, &room()));
        assert!(!rect_intersects_door_sweep(&right_of_hinge, &door, &room()));
    }

    #[test]
    fn bar_straddling_pivot_is_a_known_miss() {
        let door = placed_door(WallSide::Bottom, 100.0, false);
        // All four corners sit outside the quarter disk although the bar crosses it.
        let bar = Footprint::new(20.0, 20.0, 200.0, 5.0);
        assert!(!rect_intersects_door_sweep(&bar, &door, &room()));
    }
}
