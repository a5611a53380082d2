//! The scene: one room, its items and the human probe.
//!
//! The scene is the only authority for placement legality. Items never
//! validate themselves; callers mutate an item, then ask the scene whether the
//! new placement is legal and store the answer in `Item::invalid`.

use crate::door::{DoorSweep, door_sweep, item_intersects_door_sweep};
use crate::geometry::{aabb_overlap, vertical_overlap};
use crate::model::{HumanProbe, Item, ItemId, Palette, Room, WallSide};
use crate::snap;
use crate::types::{Placeable, Vec2};
use crate::wall;

/// Errors raised by id-based scene operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    UnknownItem(ItemId),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::UnknownItem(id) => write!(f, "Unknown item: {}", id),
        }
    }
}

impl std::error::Error for SceneError {}

/// Result of a pick at a plan point.
#[derive(Debug, Clone, PartialEq)]
pub enum Pick {
    Human,
    Item(ItemId),
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub room: Room,
    pub human: HumanProbe,
    items: Vec<Item>,
    palette: Palette,
    next_seq: u64,
}

impl Scene {
    pub fn new(room: Room) -> Self {
        Self {
            room,
            ..Self::default()
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.iter().any(|it| &it.id == id)
    }

    /// Adds an item and returns its id.
    ///
    /// An empty id, or one already used in this scene, is replaced by a fresh
    /// `item-<n>` id. An empty colour is filled from the pastel palette.
    pub fn add(&mut self, mut item: Item) -> ItemId {
        if item.id.is_empty() || self.contains(&item.id) {
            item.id = self.fresh_id();
        }
        if item.color.trim().is_empty() {
            item.color = self.palette.next_color();
        }
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    fn fresh_id(&mut self) -> ItemId {
        loop {
            self.next_seq += 1;
            let candidate = ItemId::new(format!("item-{}", self.next_seq));
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    pub fn remove(&mut self, id: &ItemId) -> Result<Item, SceneError> {
        let index = self.index_of(id)?;
        Ok(self.items.remove(index))
    }

    pub(crate) fn palette(&self) -> &Palette {
        &self.palette
    }

    pub(crate) fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Drops every item and restarts the colour cycle.
    pub fn clear_items(&mut self) {
        self.items.clear();
        self.palette.reset();
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|it| &it.id == id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|it| &it.id == id)
    }

    /// Like [`Scene::get`], but an unknown id is an error.
    pub fn item(&self, id: &ItemId) -> Result<&Item, SceneError> {
        self.get(id)
            .ok_or_else(|| SceneError::UnknownItem(id.clone()))
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Result<&mut Item, SceneError> {
        self.get_mut(id)
            .ok_or_else(|| SceneError::UnknownItem(id.clone()))
    }

    fn index_of(&self, id: &ItemId) -> Result<usize, SceneError> {
        self.items
            .iter()
            .position(|it| &it.id == id)
            .ok_or_else(|| SceneError::UnknownItem(id.clone()))
    }

    /// Checks whether `candidate` would sit illegally in this scene.
    ///
    /// The candidate need not be part of the scene; an item with the same id
    /// is skipped. Against every other item, in order:
    /// 1. a window and a hangable may not overlap at all
    /// 2. nothing may reach into an inward door's sweep, in either direction
    /// 3. carpets are exempt from the remaining test
    /// 4. footprints and height intervals may not both overlap
    ///
    /// Finally the footprint must lie inside the room.
    pub fn any_collision(&self, candidate: &Item) -> bool {
        let a = candidate.footprint();

        for other in self.items.iter().filter(|it| it.id != candidate.id) {
            let b = other.footprint();

            let window_vs_hangable = (candidate.is_hangable() && other.is_window())
                || (candidate.is_window() && other.is_hangable());
            if window_vs_hangable && aabb_overlap(&a, &b) {
                return true;
            }

            if candidate.is_inward_door()
                && item_intersects_door_sweep(other, candidate, &self.room)
            {
                return true;
            }
            if other.is_inward_door() && item_intersects_door_sweep(candidate, other, &self.room) {
                return true;
            }

            if candidate.is_carpet() || other.is_carpet() {
                continue;
            }
            if aabb_overlap(&a, &b) && vertical_overlap(candidate, other) {
                return true;
            }
        }

        !self.room.contains(&a)
    }

    /// Finds the highest non-carpet item under a footprint.
    ///
    /// Ties on the top height keep the item found first.
    pub fn find_support_under(&self, item: &Item) -> Option<&Item> {
        let footprint = item.footprint();
        let mut best: Option<&Item> = None;

        for other in &self.items {
            if other.id == item.id || other.is_carpet() {
                continue;
            }
            if !aabb_overlap(&footprint, &other.footprint()) {
                continue;
            }
            if best.is_none_or(|b| other.top_z() > b.top_z()) {
                best = Some(other);
            }
        }
        best
    }

    /// Recomputes the `invalid` flag of one item and returns it.
    pub fn revalidate(&mut self, id: &ItemId) -> Result<bool, SceneError> {
        let invalid = self.any_collision(self.item(id)?);
        self.item_mut(id)?.invalid = invalid;
        Ok(invalid)
    }

    /// Recomputes the `invalid` flag of every item.
    pub fn revalidate_all(&mut self) {
        let flags: Vec<bool> = self.items.iter().map(|it| self.any_collision(it)).collect();
        for (item, invalid) in self.items.iter_mut().zip(flags) {
            item.invalid = invalid;
        }
    }

    pub fn snap_to_walls(&mut self, id: &ItemId) -> Result<(), SceneError> {
        let room = self.room.clone();
        snap::snap_to_walls(self.item_mut(id)?, &room);
        Ok(())
    }

    pub fn snap_to_nearest_wall(&mut self, id: &ItemId) -> Result<WallSide, SceneError> {
        let room = self.room.clone();
        Ok(snap::snap_to_nearest_wall(self.item_mut(id)?, &room))
    }

    /// Shifts an item so it closes small gaps to its neighbours.
    pub fn snap_to_neighbors(&mut self, id: &ItemId) -> Result<(), SceneError> {
        let offset = snap::neighbor_snap_offset(
            self.item(id)?,
            self.items.iter(),
            self.room.snap_epsilon_cm,
        );
        self.item_mut(id)?.pos += offset;
        Ok(())
    }

    pub fn apply_wall_placement(&mut self, id: &ItemId) -> Result<(), SceneError> {
        let room = self.room.clone();
        wall::apply_wall_placement(self.item_mut(id)?, &room);
        Ok(())
    }

    pub fn stick_to_nearest_wall(&mut self, id: &ItemId) -> Result<(), SceneError> {
        let room = self.room.clone();
        wall::stick_to_nearest_wall(self.item_mut(id)?, &room);
        Ok(())
    }

    pub fn clamp_inside_room(&mut self, id: &ItemId) -> Result<(), SceneError> {
        let room = self.room.clone();
        wall::clamp_inside_room(self.item_mut(id)?, &room);
        Ok(())
    }

    /// Door sweep of an item; `Ok(None)` when it is not an inward wall door.
    pub fn door_sweep(&self, id: &ItemId) -> Result<Option<DoorSweep>, SceneError> {
        Ok(door_sweep(self.item(id)?, &self.room))
    }

    /// Ids of the items the human probe currently bumps into.
    pub fn human_conflicts(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|it| self.human.collides_with(it))
            .map(|it| it.id.clone())
            .collect()
    }

    /// Moves the human probe, keeping its centre inside the room.
    pub fn move_human(&mut self, pos: Vec2) {
        let room = self.room.clone();
        self.human.move_to(pos, &room);
    }

    /// Finds what sits on top at a plan point.
    ///
    /// The human probe wins when the point lies inside its circle. Otherwise
    /// the item with the greatest base height wins, then the greatest top
    /// height, then the most recently added one.
    pub fn pick_topmost(&self, point: Vec2) -> Option<Pick> {
        if self.human.contains_point(&point) {
            return Some(Pick::Human);
        }
        self.items
            .iter()
            .filter(|it| it.footprint().contains_point(&point))
            .fold(None::<&Item>, |best, it| match best {
                Some(b) if (b.z_from_floor_cm, b.top_z()) > (it.z_from_floor_cm, it.top_z()) => {
                    Some(b)
                }
                _ => Some(it),
            })
            .map(|it| Pick::Item(it.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Size;

    fn scene() -> Scene {
        Scene::new(Room::new(400.0, 300.0, 4.0))
    }

    fn door_on_bottom(scene: &mut Scene, offset: f64, leaf: f64, hinge_right: bool) -> ItemId {
        let mut door = Item::door("Door", leaf, true).on_wall(WallSide::Bottom, offset);
        if let Some(attrs) = door.door_mut() {
            attrs.hinge_right = hinge_right;
        }
        wall::apply_wall_placement(&mut door, &scene.room);
        scene.add(door)
    }

    #[test]
    fn placement_helpers_work_by_id() {
        let mut scene = scene();
        let sofa = scene.add(Item::new("Sofa", Size::new(60.0, 50.0, 40.0)).at(3.0, 100.0));
        scene.snap_to_walls(&sofa).unwrap();
        assert_eq!(scene.item(&sofa).unwrap().pos, Vec2::new(0.0, 100.0));

        scene.item_mut(&sofa).unwrap().pos = Vec2::new(-10.0, 9999.0);
        scene.clamp_inside_room(&sofa).unwrap();
        assert_eq!(scene.item(&sofa).unwrap().pos, Vec2::new(0.0, 250.0));

        let door = scene.add(Item::door("Door", 90.0, true).at(395.0, 100.0));
        scene.stick_to_nearest_wall(&door).unwrap();
        assert_eq!(scene.item(&door).unwrap().wall_side(), Some(WallSide::Right));

        if let Some(mount) = scene.item_mut(&door).unwrap().wall_mount_mut() {
            mount.offset_cm = 20.0;
        }
        scene.apply_wall_placement(&door).unwrap();
        assert_eq!(scene.item(&door).unwrap().pos.y, 20.0);

        let ghost = ItemId::from("ghost");
        assert!(matches!(scene.snap_to_walls(&ghost), Err(SceneError::UnknownItem(_))));
        assert!(scene.apply_wall_placement(&ghost).is_err());
        assert!(scene.stick_to_nearest_wall(&ghost).is_err());
        assert!(scene.clamp_inside_room(&ghost).is_err());
    }

    #[test]
    fn add_assigns_unique_ids_and_colors() {
        let mut scene = scene();
        let a = scene.add(Item::default());
        let b = scene.add(Item::default().with_id(a.as_str()));
        let c = scene.add(Item::default().with_id("custom").with_color("#123456"));

        assert_ne!(a, b, "duplicate ids must be regenerated");
        assert_eq!(c.as_str(), "custom");
        assert_eq!(scene.get(&c).map(|it| it.color.as_str()), Some("#123456"));
        assert!(scene.items().iter().all(|it| !it.color.is_empty()));
    }

    #[test]
    fn fresh_ids_skip_taken_ones() {
        let mut scene = scene();
        scene.add(Item::default().with_id("item-1"));
        let generated = scene.add(Item::default());
        assert_eq!(generated.as_str(), "item-2");
    }

    #[test]
    fn remove_unknown_item_is_an_error() {
        let mut scene = scene();
        let id = scene.add(Item::default());
        assert!(scene.remove(&id).is_ok());
        assert_eq!(scene.remove(&id), Err(SceneError::UnknownItem(id)));
    }

    #[test]
    fn overlapping_furniture_collides_unless_stacked() {
        let mut scene = scene();
        scene.add(Item::new("Table", Size::new(100.0, 60.0, 75.0)).at(50.0, 50.0));

        let chair = Item::new("Chair", Size::new(40.0, 40.0, 45.0)).at(80.0, 60.0);
        assert!(scene.any_collision(&chair));

        let lamp = Item::hangable("Lamp", Size::new(20.0, 20.0, 10.0), 75.0).at(80.0, 60.0);
        assert!(!scene.any_collision(&lamp), "resting on top is legal");

        let touching = Item::new("Side", Size::new(40.0, 40.0, 45.0)).at(150.0, 50.0);
        assert!(!scene.any_collision(&touching), "shared edge is not an overlap");
    }

    #[test]
    fn carpets_underlie_anything() {
        let mut scene = scene();
        scene.add(Item::carpet("Rug", Size::new(200.0, 150.0, 1.0)).at(50.0, 50.0));
        let sofa = Item::new("Sofa", Size::new(180.0, 80.0, 80.0)).at(60.0, 60.0);
        assert!(!scene.any_collision(&sofa));
    }

    #[test]
    fn hangable_over_window_is_rejected_regardless_of_height() {
        let mut scene = scene();
        let mut window = Item::window("Window", 120.0);
        wall::center_on_wall(&mut window, &scene.room, WallSide::Top);
        let footprint = window.footprint();
        scene.add(window);

        for z in [0.0, 120.0, 250.0] {
            let shelf = Item::hangable("Shelf", Size::new(80.0, 20.0, 3.0), z)
                .at(footprint.x, footprint.y - 18.0);
            assert!(scene.any_collision(&shelf), "shelf at z={z} covers the window");
        }

        let cabinet = Item::new("Cabinet", Size::new(80.0, 20.0, 40.0))
            .at(footprint.x, footprint.y - 18.0);
        assert!(!scene.any_collision(&cabinet), "plain furniture may stand under a window");
    }

    #[test]
    fn box_inside_door_sweep_collides() {
        let mut scene = scene();
        let door = door_on_bottom(&mut scene, 100.0, 90.0, false);
        let sweep = scene
            .door_sweep(&door)
            .expect("door exists")
            .expect("inward door has a sweep");

        let boxed = Item::new("Box", Size::new(40.0, 40.0, 10.0))
            .at(sweep.center.x + 10.0, sweep.center.y + 10.0);
        assert!(scene.any_collision(&boxed));
    }

    #[test]
    fn sweep_blocks_far_end_and_right_hinge() {
        let mut scene = scene();
        door_on_bottom(&mut scene, 150.0, 100.0, false);
        let blocker = Item::new("Blocker", Size::new(25.0, 25.0, 40.0)).at(210.0, 16.0);
        assert!(scene.any_collision(&blocker));

        let mut scene = self::scene();
        let door = door_on_bottom(&mut scene, 200.0, 90.0, true);
        let center = scene.door_sweep(&door).unwrap().unwrap().center;
        assert_eq!(center.x, 290.0);
        let blocker = Item::new("Blocker", Size::new(12.0, 12.0, 30.0)).at(218.0, 14.0);
        assert!(scene.any_collision(&blocker));
    }

    #[test]
    fn door_checks_its_own_sweep_as_candidate() {
        let mut scene = scene();
        scene.add(Item::new("Box", Size::new(30.0, 30.0, 30.0)).at(120.0, 20.0));

        let mut door = Item::door("Door", 90.0, true).on_wall(WallSide::Bottom, 100.0);
        wall::apply_wall_placement(&mut door, &scene.room);
        assert!(scene.any_collision(&door));

        let mut outward = Item::door("Door", 90.0, false).on_wall(WallSide::Bottom, 100.0);
        wall::apply_wall_placement(&mut outward, &scene.room);
        assert!(!scene.any_collision(&outward));
    }

    #[test]
    fn leaving_the_room_is_a_collision() {
        let scene = scene();
        let item = Item::new("Box", Size::default()).at(360.0, 10.0);
        assert!(scene.any_collision(&item));
        let inside = Item::new("Box", Size::default()).at(350.0, 250.0);
        assert!(!scene.any_collision(&inside));
    }

    #[test]
    fn support_is_highest_overlapping_non_carpet() {
        let mut scene = scene();
        scene.add(Item::carpet("Rug", Size::new(300.0, 200.0, 5.0)).at(0.0, 0.0));
        scene.add(Item::new("Desk", Size::new(100.0, 60.0, 75.0)).at(50.0, 50.0));
        let cabinet = scene.add(Item::new("Cabinet", Size::new(40.0, 40.0, 120.0)).at(130.0, 50.0));

        let shelf = Item::hangable("Shelf", Size::new(60.0, 20.0, 3.0), 0.0).at(120.0, 60.0);
        assert_eq!(scene.find_support_under(&shelf).map(|it| &it.id), Some(&cabinet));

        let nothing_below = Item::hangable("Shelf", Size::new(20.0, 20.0, 3.0), 0.0).at(350.0, 250.0);
        assert!(scene.find_support_under(&nothing_below).is_none());
    }

    #[test]
    fn support_ties_keep_first_found() {
        let mut scene = scene();
        let first = scene.add(Item::new("A", Size::new(50.0, 50.0, 40.0)).at(0.0, 0.0));
        scene.add(Item::new("B", Size::new(50.0, 50.0, 40.0)).at(50.0, 0.0));
        let shelf = Item::hangable("Shelf", Size::new(40.0, 10.0, 3.0), 0.0).at(30.0, 10.0);
        assert_eq!(scene.find_support_under(&shelf).map(|it| &it.id), Some(&first));
    }

    #[test]
    fn neighbor_snap_by_id_uses_room_epsilon() {
        let mut scene = scene();
        scene.add(Item::new("A", Size::new(60.0, 60.0, 10.0)).at(50.0, 50.0));
        let b = scene.add(Item::new("B", Size::new(60.0, 60.0, 10.0)).at(111.0, 50.0));
        scene.snap_to_neighbors(&b).unwrap();
        assert_eq!(scene.get(&b).map(|it| it.pos.x), Some(110.0));
    }

    #[test]
    fn human_conflicts_list_low_items() {
        let mut scene = scene();
        let bed = scene.add(Item::new("Bed", Size::new(100.0, 100.0, 40.0)).at(50.0, 50.0));
        scene.add(Item::hangable("Shelf", Size::new(100.0, 100.0, 3.0), 120.0).at(50.0, 50.0));
        scene.add(Item::carpet("Rug", Size::new(100.0, 100.0, 1.0)).at(50.0, 50.0));
        assert_eq!(scene.human_conflicts(), vec![bed]);

        scene.move_human(Vec2::new(380.0, 280.0));
        assert!(scene.human_conflicts().is_empty());
    }

    #[test]
    fn pick_prefers_human_then_highest_item() {
        let mut scene = scene();
        scene.add(Item::new("Base", Size::new(80.0, 80.0, 40.0)).at(100.0, 100.0));
        let shelf = scene.add(Item::hangable("Above", Size::new(80.0, 80.0, 3.0), 120.0).at(100.0, 100.0));

        assert_eq!(scene.pick_topmost(Vec2::new(110.0, 110.0)), Some(Pick::Item(shelf)));
        assert_eq!(scene.pick_topmost(Vec2::new(60.0, 60.0)), Some(Pick::Human));
        assert_eq!(scene.pick_topmost(Vec2::new(390.0, 290.0)), None);
    }

    #[test]
    fn pick_ties_go_to_latest_item() {
        let mut scene = scene();
        scene.add(Item::new("First", Size::default()).at(200.0, 200.0));
        let second = scene.add(Item::new("Second", Size::default()).at(200.0, 200.0));
        assert_eq!(scene.pick_topmost(Vec2::new(220.0, 220.0)), Some(Pick::Item(second)));
    }

    #[test]
    fn revalidate_all_sets_flags() {
        let mut scene = scene();
        let a = scene.add(Item::new("A", Size::default()).at(100.0, 100.0));
        let b = scene.add(Item::new("B", Size::default()).at(120.0, 120.0));
        let c = scene.add(Item::new("C", Size::default()).at(300.0, 100.0));
        scene.revalidate_all();
        assert!(scene.get(&a).unwrap().invalid);
        assert!(scene.get(&b).unwrap().invalid);
        assert!(!scene.get(&c).unwrap().invalid);
    }
}
