//! Data models for the room layout.
//!
//! This module defines the fundamental data structures of the planner:
//! - `Room`: the rectangular floor the layout lives in
//! - `Item`: a placed rectangular object, its category carried by `ItemKind`
//! - `HumanProbe`: a circular clearance check standing somewhere in the room
//!
//! Numeric setters follow a clamp-not-reject policy: out-of-range values are
//! pulled back into their valid range and non-finite values keep the previous
//! value, so an edit always makes forward progress.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geometry::{circle_intersects_rect, clamp_range, finite_or};
use crate::types::{Footprint, Placeable, Vec2};

pub const DEFAULT_ROOM_WIDTH_CM: f64 = 400.0;
pub const DEFAULT_ROOM_LENGTH_CM: f64 = 300.0;
pub const DEFAULT_SNAP_EPSILON_CM: f64 = 4.0;
pub const MIN_ROOM_DIMENSION_CM: f64 = 1.0;
pub const MIN_ITEM_DIMENSION_CM: f64 = 1.0;

pub const DOOR_THICKNESS_CM: f64 = 8.0;
pub const DOOR_HEIGHT_CM: f64 = 200.0;
pub const WINDOW_THICKNESS_CM: f64 = 6.0;

/// Items resting lower than this count as obstacles for the human probe.
pub const LOW_CLEARANCE_CM: f64 = 10.0;

/// Pastel colours handed out to items created without an explicit colour.
pub const PASTELS: [&str; 16] = [
    "#a3e1dc", "#f7c5cc", "#c7d2fe", "#fde68a", "#b9fbc0", "#fbcfe8", "#bfdbfe", "#fcd5ce",
    "#caffbf", "#ffd6a5", "#fdffb6", "#bdb2ff", "#ffc6ff", "#9bf6ff", "#bde0fe", "#cdeac0",
];

/// The rectangular room. Origin is the bottom-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    pub width_cm: f64,
    pub length_cm: f64,
    pub snap_epsilon_cm: f64,
}

/// Wall coordinates of a room.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Walls {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Room {
    /// Creates a room, clamping every value into its valid range.
    pub fn new(width_cm: f64, length_cm: f64, snap_epsilon_cm: f64) -> Self {
        let mut room = Self::default();
        room.resize(width_cm, length_cm);
        room.set_snap_epsilon(snap_epsilon_cm);
        room
    }

    /// Changes the room extent. Values below 1 cm are raised to 1 cm.
    pub fn resize(&mut self, width_cm: f64, length_cm: f64) {
        self.width_cm = finite_or(width_cm, self.width_cm).max(MIN_ROOM_DIMENSION_CM);
        self.length_cm = finite_or(length_cm, self.length_cm).max(MIN_ROOM_DIMENSION_CM);
    }

    /// Changes the soft-snap threshold. Negative values become 0.
    pub fn set_snap_epsilon(&mut self, snap_epsilon_cm: f64) {
        self.snap_epsilon_cm = finite_or(snap_epsilon_cm, self.snap_epsilon_cm).max(0.0);
    }

    pub fn walls(&self) -> Walls {
        Walls {
            left: 0.0,
            right: self.width_cm,
            bottom: 0.0,
            top: self.length_cm,
        }
    }

    /// Checks whether a footprint lies completely inside the room.
    pub fn contains(&self, footprint: &Footprint) -> bool {
        footprint.x >= 0.0
            && footprint.y >= 0.0
            && footprint.right() <= self.width_cm
            && footprint.top() <= self.length_cm
    }
}

impl Default for Room {
    fn default() -> Self {
        Self {
            width_cm: DEFAULT_ROOM_WIDTH_CM,
            length_cm: DEFAULT_ROOM_LENGTH_CM,
            snap_epsilon_cm: DEFAULT_SNAP_EPSILON_CM,
        }
    }
}

/// Un-rotated dimensions of an item.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Size {
    #[serde(rename = "wCm")]
    pub w_cm: f64,
    #[serde(rename = "lCm")]
    pub l_cm: f64,
    #[serde(rename = "hCm")]
    pub h_cm: f64,
}

impl Size {
    #[inline]
    pub const fn new(w_cm: f64, l_cm: f64, h_cm: f64) -> Self {
        Self { w_cm, l_cm, h_cm }
    }

    /// Returns a copy clamped to `w, l >= 1` and `h >= 0`.
    ///
    /// Non-finite components are replaced by the matching component of
    /// `fallback`.
    pub fn clamped(self, fallback: Size) -> Self {
        Self {
            w_cm: finite_or(self.w_cm, fallback.w_cm).max(MIN_ITEM_DIMENSION_CM),
            l_cm: finite_or(self.l_cm, fallback.l_cm).max(MIN_ITEM_DIMENSION_CM),
            h_cm: finite_or(self.h_cm, fallback.h_cm).max(0.0),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(50.0, 50.0, 50.0)
    }
}

/// Plan rotation. Only quarter turns are supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
}

impl Rotation {
    /// Maps an arbitrary angle onto the nearest supported rotation.
    ///
    /// Odd multiples of 90° become `Deg90`, everything else `Deg0`.
    pub fn from_degrees(degrees: f64) -> Self {
        let quarters = finite_or(degrees, 0.0) / 90.0;
        if (quarters.round() as i64).rem_euclid(2) == 1 {
            Rotation::Deg90
        } else {
            Rotation::Deg0
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg0,
        }
    }
}

/// One of the four room walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WallSide {
    Left,
    Right,
    Bottom,
    Top,
}

impl WallSide {
    /// All walls in tie-break order.
    pub const ALL: [WallSide; 4] = [
        WallSide::Left,
        WallSide::Right,
        WallSide::Bottom,
        WallSide::Top,
    ];

    /// Left and right walls run along Y.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, WallSide::Left | WallSide::Right)
    }

    /// Unit tangent of the wall line.
    pub fn axis(self) -> Vec2 {
        if self.is_vertical() {
            Vec2::new(0.0, 1.0)
        } else {
            Vec2::new(1.0, 0.0)
        }
    }

    /// Unit normal pointing into the room.
    pub fn inward_normal(self) -> Vec2 {
        match self {
            WallSide::Left => Vec2::new(1.0, 0.0),
            WallSide::Right => Vec2::new(-1.0, 0.0),
            WallSide::Bottom => Vec2::new(0.0, 1.0),
            WallSide::Top => Vec2::new(0.0, -1.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WallSide::Left => "left",
            WallSide::Right => "right",
            WallSide::Bottom => "bottom",
            WallSide::Top => "top",
        }
    }
}

impl fmt::Display for WallSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall attachment of a door or window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WallMount {
    pub side: Option<WallSide>,
    /// Position measured along the wall.
    pub offset_cm: f64,
}

impl WallMount {
    pub fn on(side: WallSide, offset_cm: f64) -> Self {
        Self {
            side: Some(side),
            offset_cm,
        }
    }
}

/// Door-specific attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorAttrs {
    /// Inward doors reserve their swing area inside the room.
    pub inward: bool,
    /// Hinge sits at the far end of the leaf along the wall axis.
    pub hinge_right: bool,
    pub mount: WallMount,
}

impl Default for DoorAttrs {
    fn default() -> Self {
        Self {
            inward: true,
            hinge_right: false,
            mount: WallMount::default(),
        }
    }
}

/// Closed set of item categories.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ItemKind {
    #[default]
    Furniture,
    /// Lies on the floor and may underlie anything.
    Carpet,
    /// Floats on top of whatever supports it.
    Hangable,
    Door(DoorAttrs),
    Window(WallMount),
}

/// Stable identity of an item inside a scene.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A placed rectangular object.
///
/// # Fields
/// * `pos` - Bottom-left corner of the un-rotated footprint
/// * `size` - Un-rotated dimensions; rotation swaps width and length only
/// * `z_from_floor_cm` - Base height above the floor
/// * `invalid` - Transient flag set by callers from the collision engine
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub pos: Vec2,
    pub size: Size,
    pub z_from_floor_cm: f64,
    pub rotation: Rotation,
    pub kind: ItemKind,
    pub color: String,
    pub invalid: bool,
}

impl Item {
    /// Creates a furniture item at the default position.
    ///
    /// The id stays empty until the item is added to a scene.
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            id: ItemId::default(),
            name: name.into(),
            pos: Vec2::new(10.0, 10.0),
            size: size.clamped(Size::default()),
            z_from_floor_cm: 0.0,
            rotation: Rotation::Deg0,
            kind: ItemKind::Furniture,
            color: String::new(),
            invalid: false,
        }
    }

    pub fn carpet(name: impl Into<String>, size: Size) -> Self {
        Self::new(name, size).with_kind(ItemKind::Carpet)
    }

    pub fn hangable(name: impl Into<String>, size: Size, z_from_floor_cm: f64) -> Self {
        Self::new(name, size)
            .with_kind(ItemKind::Hangable)
            .with_z(z_from_floor_cm)
    }

    /// Creates a door whose leaf spans `leaf_cm` along its wall.
    pub fn door(name: impl Into<String>, leaf_cm: f64, inward: bool) -> Self {
        let size = Size::new(DOOR_THICKNESS_CM, leaf_cm, DOOR_HEIGHT_CM);
        Self::new(name, size).with_kind(ItemKind::Door(DoorAttrs {
            inward,
            ..DoorAttrs::default()
        }))
    }

    /// Creates a window spanning `span_cm` along its wall.
    pub fn window(name: impl Into<String>, span_cm: f64) -> Self {
        let size = Size::new(span_cm, WINDOW_THICKNESS_CM, 0.0);
        Self::new(name, size).with_kind(ItemKind::Window(WallMount::default()))
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn at(mut self, x_cm: f64, y_cm: f64) -> Self {
        self.pos = Vec2::new(x_cm, y_cm);
        self
    }

    pub fn with_z(mut self, z_from_floor_cm: f64) -> Self {
        self.set_z(z_from_floor_cm);
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        if self.is_carpet() {
            self.z_from_floor_cm = 0.0;
        }
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Attaches a door or window to a wall. Other items are returned unchanged.
    pub fn on_wall(mut self, side: WallSide, offset_cm: f64) -> Self {
        if let Some(mount) = self.wall_mount_mut() {
            *mount = WallMount::on(side, offset_cm);
        }
        self
    }

    #[inline]
    pub fn is_carpet(&self) -> bool {
        matches!(self.kind, ItemKind::Carpet)
    }

    #[inline]
    pub fn is_hangable(&self) -> bool {
        matches!(self.kind, ItemKind::Hangable)
    }

    #[inline]
    pub fn is_door(&self) -> bool {
        matches!(self.kind, ItemKind::Door(_))
    }

    #[inline]
    pub fn is_window(&self) -> bool {
        matches!(self.kind, ItemKind::Window(_))
    }

    /// Doors and windows live on a wall.
    #[inline]
    pub fn is_wall_item(&self) -> bool {
        self.is_door() || self.is_window()
    }

    pub fn is_inward_door(&self) -> bool {
        self.door_attrs().is_some_and(|door| door.inward)
    }

    pub fn door_attrs(&self) -> Option<&DoorAttrs> {
        match &self.kind {
            ItemKind::Door(door) => Some(door),
            _ => None,
        }
    }

    pub fn door_mut(&mut self) -> Option<&mut DoorAttrs> {
        match &mut self.kind {
            ItemKind::Door(door) => Some(door),
            _ => None,
        }
    }

    pub fn wall_mount(&self) -> Option<&WallMount> {
        match &self.kind {
            ItemKind::Door(door) => Some(&door.mount),
            ItemKind::Window(mount) => Some(mount),
            _ => None,
        }
    }

    pub fn wall_mount_mut(&mut self) -> Option<&mut WallMount> {
        match &mut self.kind {
            ItemKind::Door(door) => Some(&mut door.mount),
            ItemKind::Window(mount) => Some(mount),
            _ => None,
        }
    }

    pub fn wall_side(&self) -> Option<WallSide> {
        self.wall_mount().and_then(|mount| mount.side)
    }

    /// Sets the size, clamped to `w, l >= 1` and `h >= 0`.
    pub fn set_size(&mut self, size: Size) {
        self.size = size.clamped(self.size);
    }

    /// Sets the base height, clamped to `>= 0`. Carpets stay on the floor.
    pub fn set_z(&mut self, z_from_floor_cm: f64) {
        self.z_from_floor_cm = if self.is_carpet() {
            0.0
        } else {
            finite_or(z_from_floor_cm, self.z_from_floor_cm).max(0.0)
        };
    }

    /// Switches a furniture-family item between furniture, carpet and hangable.
    ///
    /// Carpet wins when both flags are set. Doors and windows keep their kind.
    pub fn set_furniture_flags(&mut self, carpet: bool, hangable: bool) {
        if self.is_wall_item() {
            return;
        }
        self.kind = if carpet {
            ItemKind::Carpet
        } else if hangable {
            ItemKind::Hangable
        } else {
            ItemKind::Furniture
        };
    }

    /// Length of the item measured along its wall.
    ///
    /// Items without a wall side are measured along X.
    pub fn span_along_wall(&self) -> f64 {
        let footprint = self.footprint();
        match self.wall_side() {
            Some(side) if side.is_vertical() => footprint.l,
            _ => footprint.w,
        }
    }

    /// Changes the along-wall length, keeping the thickness.
    pub fn set_span_along_wall(&mut self, span_cm: f64) {
        let vertical = self.wall_side().is_some_and(WallSide::is_vertical);
        let mut size = self.size;
        match (vertical, self.rotation) {
            (true, Rotation::Deg0) | (false, Rotation::Deg90) => size.l_cm = span_cm,
            (true, Rotation::Deg90) | (false, Rotation::Deg0) => size.w_cm = span_cm,
        }
        self.set_size(size);
    }
}

impl Default for Item {
    fn default() -> Self {
        Self::new("Item", Size::default())
    }
}

impl Placeable for Item {
    fn footprint(&self) -> Footprint {
        let (w, l) = match self.rotation {
            Rotation::Deg0 => (self.size.w_cm, self.size.l_cm),
            Rotation::Deg90 => (self.size.l_cm, self.size.w_cm),
        };
        Footprint::new(self.pos.x, self.pos.y, w, l)
    }

    fn base_z(&self) -> f64 {
        self.z_from_floor_cm
    }

    fn top_z(&self) -> f64 {
        if self.is_carpet() {
            0.0
        } else {
            self.z_from_floor_cm + self.size.h_cm
        }
    }

    fn is_vertical_obstacle(&self) -> bool {
        !self.is_carpet()
    }
}

/// A person standing in the room, used to report clearance conflicts.
///
/// Never an obstacle for items.
#[derive(Clone, Debug, PartialEq)]
pub struct HumanProbe {
    pub pos: Vec2,
    pub radius_cm: f64,
}

impl HumanProbe {
    pub const DEFAULT_RADIUS_CM: f64 = 30.0;
    pub const MIN_RADIUS_CM: f64 = 1.0;

    pub fn new(pos: Vec2, radius_cm: f64) -> Self {
        Self {
            pos,
            radius_cm: finite_or(radius_cm, Self::DEFAULT_RADIUS_CM).max(Self::MIN_RADIUS_CM),
        }
    }

    /// Checks whether the probe's circle reaches a low obstacle.
    ///
    /// Carpets and items lifted to [`LOW_CLEARANCE_CM`] or higher never
    /// conflict with a person.
    pub fn collides_with(&self, item: &Item) -> bool {
        if item.is_carpet() || item.z_from_floor_cm >= LOW_CLEARANCE_CM {
            return false;
        }
        circle_intersects_rect(&self.pos, self.radius_cm, &item.footprint())
    }

    /// Moves the probe, keeping its centre inside the room.
    pub fn move_to(&mut self, pos: Vec2, room: &Room) {
        let x = finite_or(pos.x, self.pos.x);
        let y = finite_or(pos.y, self.pos.y);
        self.pos = Vec2::new(
            clamp_range(x, 0.0, room.width_cm),
            clamp_range(y, 0.0, room.length_cm),
        );
    }

    pub fn set_radius(&mut self, radius_cm: f64) {
        self.radius_cm = finite_or(radius_cm, self.radius_cm).max(Self::MIN_RADIUS_CM);
    }

    /// Checks whether a point lies inside the probe's circle.
    pub fn contains_point(&self, point: &Vec2) -> bool {
        (*point - self.pos).length_squared() <= self.radius_cm * self.radius_cm
    }
}

impl Default for HumanProbe {
    fn default() -> Self {
        Self::new(Vec2::new(60.0, 60.0), Self::DEFAULT_RADIUS_CM)
    }
}

/// Cycles through [`PASTELS`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette {
    index: usize,
}

impl Palette {
    pub fn next_color(&mut self) -> String {
        let color = PASTELS[self.index % PASTELS.len()];
        self.index += 1;
        color.to_string()
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_swaps_width_and_length_only_at_90() {
        for (w, l, h) in [(60.0, 40.0, 75.0), (10.0, 90.0, 200.0), (25.0, 25.0, 3.0)] {
            let item = Item::new("T", Size::new(w, l, h)).at(5.0, 7.0);
            let straight = item.footprint();
            assert_eq!((straight.x, straight.y, straight.w, straight.l), (5.0, 7.0, w, l));

            let turned = item.clone().with_rotation(Rotation::Deg90);
            let rotated = turned.footprint();
            assert_eq!((rotated.w, rotated.l), (l, w));
            assert_eq!(turned.top_z(), h, "rotation must not touch the height");
        }
    }

    #[test]
    fn carpet_has_no_vertical_extent() {
        let carpet = Item::carpet("Rug", Size::new(200.0, 150.0, 2.0)).with_z(30.0);
        assert_eq!(carpet.z_from_floor_cm, 0.0);
        assert_eq!(carpet.top_z(), 0.0);
        assert!(!carpet.is_vertical_obstacle());
    }

    #[test]
    fn rotation_from_degrees_normalizes() {
        assert_eq!(Rotation::from_degrees(0.0), Rotation::Deg0);
        assert_eq!(Rotation::from_degrees(90.0), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(180.0), Rotation::Deg0);
        assert_eq!(Rotation::from_degrees(270.0), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(-90.0), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(f64::NAN), Rotation::Deg0);
        assert_eq!(Rotation::Deg0.toggled(), Rotation::Deg90);
    }

    #[test]
    fn numeric_setters_clamp_instead_of_rejecting() {
        let mut item = Item::new("Box", Size::new(40.0, 40.0, 40.0));
        item.set_size(Size::new(-5.0, f64::NAN, -1.0));
        assert_eq!(item.size, Size::new(MIN_ITEM_DIMENSION_CM, 40.0, 0.0));

        item.set_z(-12.0);
        assert_eq!(item.z_from_floor_cm, 0.0);
        item.set_z(f64::INFINITY);
        assert_eq!(item.z_from_floor_cm, 0.0);

        let mut room = Room::default();
        room.resize(-10.0, f64::NAN);
        assert_eq!(room.width_cm, MIN_ROOM_DIMENSION_CM);
        assert_eq!(room.length_cm, DEFAULT_ROOM_LENGTH_CM);
        room.set_snap_epsilon(-3.0);
        assert_eq!(room.snap_epsilon_cm, 0.0);
    }

    #[test]
    fn span_follows_wall_orientation() {
        let mut door = Item::door("Door", 90.0, true).on_wall(WallSide::Left, 0.0);
        assert_eq!(door.span_along_wall(), 90.0);

        door.set_span_along_wall(110.0);
        assert_eq!(door.size.l_cm, 110.0);
        assert_eq!(door.size.w_cm, DOOR_THICKNESS_CM);

        let mut window = Item::window("Window", 120.0).on_wall(WallSide::Top, 0.0);
        assert_eq!(window.span_along_wall(), 120.0);
        window.set_span_along_wall(80.0);
        assert_eq!(window.size.w_cm, 80.0);
        assert_eq!(window.size.l_cm, WINDOW_THICKNESS_CM);
    }

    #[test]
    fn furniture_flags_do_not_touch_wall_items() {
        let mut door = Item::door("Door", 90.0, true);
        door.set_furniture_flags(true, false);
        assert!(door.is_door());

        let mut shelf = Item::new("Shelf", Size::default());
        shelf.set_furniture_flags(true, true);
        assert!(shelf.is_carpet());
        shelf.set_furniture_flags(false, true);
        assert!(shelf.is_hangable());
    }

    #[test]
    fn human_ignores_carpets_and_elevated_items() {
        let human = HumanProbe::new(Vec2::new(60.0, 60.0), 30.0);
        let block = Item::new("Block", Size::new(100.0, 100.0, 10.0)).at(50.0, 50.0);
        assert!(human.collides_with(&block));

        let shelf = block.clone().with_kind(ItemKind::Hangable).with_z(LOW_CLEARANCE_CM);
        assert!(!human.collides_with(&shelf));

        let rug = Item::carpet("Rug", Size::new(100.0, 100.0, 1.0)).at(50.0, 50.0);
        assert!(!human.collides_with(&rug));

        let far = HumanProbe::new(Vec2::new(5000.0, 5000.0), 30.0);
        assert!(!far.collides_with(&block));
    }

    #[test]
    fn human_move_is_clamped_into_room() {
        let room = Room::new(500.0, 350.0, 4.0);
        let mut human = HumanProbe::default();
        human.move_to(Vec2::new(-20.0, 900.0), &room);
        assert_eq!(human.pos, Vec2::new(0.0, 350.0));
        human.set_radius(0.0);
        assert_eq!(human.radius_cm, HumanProbe::MIN_RADIUS_CM);
    }

    #[test]
    fn palette_cycles() {
        let mut palette = Palette::default();
        let first = palette.next_color();
        for _ in 1..PASTELS.len() {
            palette.next_color();
        }
        assert_eq!(palette.next_color(), first);
        palette.reset();
        assert_eq!(palette.next_color(), PASTELS[0]);
    }
}
