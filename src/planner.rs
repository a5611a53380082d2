//! The planning context: one scene, its undo history and the view zoom.
//!
//! Every user-level operation lives here. Each one follows the same shape:
//! mutate the live item, run the placement helpers, recompute the item's
//! `invalid` flag through the scene, then commit a history snapshot. Only a
//! drag is rolled back automatically when it ends on an illegal spot.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geometry::{clamp_range, finite_or};
use crate::history::{DEFAULT_HISTORY_LIMIT, History};
use crate::model::{
    DEFAULT_ROOM_LENGTH_CM, DEFAULT_ROOM_WIDTH_CM, DEFAULT_SNAP_EPSILON_CM, HumanProbe, Item,
    ItemId, Rotation, Room, Size, WallSide,
};
use crate::scene::{Scene, SceneError};
use crate::snapshot::{SceneDataError, SceneSnapshot, deserialize, serialize};
use crate::types::{Placeable, Vec2};
use crate::{snap, wall};

pub const MIN_PIXELS_PER_CM: f64 = 0.1;
pub const MAX_PIXELS_PER_CM: f64 = 10.0;

pub const DEFAULT_DOOR_LEAF_CM: f64 = 90.0;
pub const DEFAULT_WINDOW_SPAN_CM: f64 = 120.0;
pub const DOOR_COLOR: &str = "#9ca3af";
pub const WINDOW_COLOR: &str = "#60a5fa88";

/// Start-up settings of a planner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlannerSettings {
    pub room_width_cm: f64,
    pub room_length_cm: f64,
    pub snap_epsilon_cm: f64,
    /// Maximum number of undo steps kept.
    pub history_limit: usize,
    pub human_radius_cm: f64,
    pub pixels_per_cm: f64,
    /// Start with the sample furniture instead of an empty room.
    pub seed_sample: bool,
}

impl PlannerSettings {
    pub const DEFAULT_PIXELS_PER_CM: f64 = 2.0;

    pub fn builder() -> PlannerSettingsBuilder {
        PlannerSettingsBuilder::default()
    }
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            room_width_cm: DEFAULT_ROOM_WIDTH_CM,
            room_length_cm: DEFAULT_ROOM_LENGTH_CM,
            snap_epsilon_cm: DEFAULT_SNAP_EPSILON_CM,
            history_limit: DEFAULT_HISTORY_LIMIT,
            human_radius_cm: HumanProbe::DEFAULT_RADIUS_CM,
            pixels_per_cm: Self::DEFAULT_PIXELS_PER_CM,
            seed_sample: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlannerSettingsBuilder {
    settings: PlannerSettings,
}

impl PlannerSettingsBuilder {
    pub fn room(mut self, width_cm: f64, length_cm: f64) -> Self {
        self.settings.room_width_cm = width_cm;
        self.settings.room_length_cm = length_cm;
        self
    }

    pub fn snap_epsilon(mut self, epsilon_cm: f64) -> Self {
        self.settings.snap_epsilon_cm = epsilon_cm;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.settings.history_limit = limit;
        self
    }

    pub fn human_radius(mut self, radius_cm: f64) -> Self {
        self.settings.human_radius_cm = radius_cm;
        self
    }

    pub fn pixels_per_cm(mut self, pixels_per_cm: f64) -> Self {
        self.settings.pixels_per_cm = pixels_per_cm;
        self
    }

    pub fn seed_sample(mut self, seed: bool) -> Self {
        self.settings.seed_sample = seed;
        self
    }

    pub fn build(self) -> PlannerSettings {
        self.settings
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannerError {
    Scene(SceneError),
    Data(SceneDataError),
    NoDragInProgress,
}

impl std::fmt::Display for PlannerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlannerError::Scene(err) => write!(f, "{}", err),
            PlannerError::Data(err) => write!(f, "{}", err),
            PlannerError::NoDragInProgress => write!(f, "No drag in progress"),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlannerError::Scene(err) => Some(err),
            PlannerError::Data(err) => Some(err),
            PlannerError::NoDragInProgress => None,
        }
    }
}

impl From<SceneError> for PlannerError {
    fn from(err: SceneError) -> Self {
        PlannerError::Scene(err)
    }
}

impl From<SceneDataError> for PlannerError {
    fn from(err: SceneDataError) -> Self {
        PlannerError::Data(err)
    }
}

/// Category of a newly added item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NewItemKind {
    #[default]
    Furniture,
    Carpet,
    Hangable,
    Door,
    Window,
}

/// Request to add an item. Missing fields take the usual defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(default)]
    pub kind: NewItemKind,
    pub name: Option<String>,
    /// Furniture-family size.
    pub size: Option<Size>,
    pub pos: Option<Vec2>,
    pub z_from_floor_cm: Option<f64>,
    pub color: Option<String>,
    /// Door leaf length or window span.
    pub span_cm: Option<f64>,
    pub door_inward: Option<bool>,
    /// Wall to centre a door or window on. Doors default to left, windows to top.
    pub wall_side: Option<WallSide>,
}

/// Partial update of an item. `None` leaves a field alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemEdit {
    pub name: Option<String>,
    pub size: Option<Size>,
    pub rotation_deg: Option<f64>,
    pub z_from_floor_cm: Option<f64>,
    pub color: Option<String>,
    pub is_carpet: Option<bool>,
    pub is_hangable: Option<bool>,
    pub wall_side: Option<WallSide>,
    pub offset_cm: Option<f64>,
    pub door_inward: Option<bool>,
    pub door_hinge_right: Option<bool>,
    /// Along-wall length of a door or window.
    pub span_cm: Option<f64>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ItemEdit {
    fn apply_to(&self, item: &mut Item, room: &Room) {
        if let Some(name) = non_blank(self.name.as_deref()) {
            item.name = name;
        }

        if !item.is_wall_item() {
            if let Some(size) = self.size {
                item.set_size(size);
            }
            if let Some(degrees) = self.rotation_deg {
                item.rotation = Rotation::from_degrees(degrees);
            }
            if let Some(color) = non_blank(self.color.as_deref()) {
                item.color = color;
            }
            let carpet = self.is_carpet.unwrap_or(item.is_carpet());
            let hangable = self.is_hangable.unwrap_or(item.is_hangable());
            item.set_furniture_flags(carpet, hangable);
        }

        // Only hangables float; everything else stands on the floor.
        if item.is_hangable() {
            item.set_z(self.z_from_floor_cm.unwrap_or(item.z_from_floor_cm));
        } else {
            item.z_from_floor_cm = 0.0;
        }

        if item.is_wall_item() {
            let side = self
                .wall_side
                .or(item.wall_side())
                .unwrap_or(WallSide::Left);
            if let Some(mount) = item.wall_mount_mut() {
                mount.side = Some(side);
                if let Some(offset) = self.offset_cm.filter(|v| v.is_finite()) {
                    mount.offset_cm = offset;
                }
            }
            if let Some(door) = item.door_mut() {
                door.inward = self.door_inward.unwrap_or(door.inward);
                door.hinge_right = self.door_hinge_right.unwrap_or(door.hinge_right);
            }
            // Orient for the new wall first so the span lands on the right axis.
            wall::apply_wall_placement(item, room);
            if let Some(span) = self.span_cm.filter(|v| v.is_finite()) {
                item.set_span_along_wall(span);
                wall::apply_wall_placement(item, room);
            }
        }
    }
}

/// How a drag ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DragOutcome {
    Committed,
    /// The item ended on an illegal spot and the scene was restored.
    RolledBack,
}

#[derive(Clone, Debug)]
struct DragSession {
    id: ItemId,
    grab_offset: Vec2,
    before: String,
}

#[derive(Debug)]
pub struct Planner {
    scene: Scene,
    history: History,
    pixels_per_cm: f64,
    drag: Option<DragSession>,
    settings: PlannerSettings,
}

impl Planner {
    /// Creates a planner with an empty room, or the sample scene when asked to.
    pub fn new(settings: PlannerSettings) -> Self {
        let mut scene = Scene::new(Room::new(
            settings.room_width_cm,
            settings.room_length_cm,
            settings.snap_epsilon_cm,
        ));
        scene.human.set_radius(settings.human_radius_cm);

        let mut planner = Self {
            scene,
            history: History::new(settings.history_limit),
            pixels_per_cm: PlannerSettings::DEFAULT_PIXELS_PER_CM,
            drag: None,
            settings,
        };
        planner.set_zoom(settings.pixels_per_cm);
        if settings.seed_sample {
            planner.fill_sample();
        }
        planner.reset_history();
        planner
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn pixels_per_cm(&self) -> f64 {
        self.pixels_per_cm
    }

    /// Changes the zoom, clamped into `[0.1, 10]` pixels per centimetre.
    pub fn set_zoom(&mut self, pixels_per_cm: f64) {
        self.pixels_per_cm = clamp_range(
            finite_or(pixels_per_cm, self.pixels_per_cm),
            MIN_PIXELS_PER_CM,
            MAX_PIXELS_PER_CM,
        );
    }

    pub fn export(&self) -> SceneSnapshot {
        serialize(&self.scene, self.pixels_per_cm)
    }

    fn snapshot_json(&self) -> String {
        // The snapshot records hold only strings, numbers and booleans.
        self.export().to_json().unwrap_or_default()
    }

    fn commit(&mut self) {
        let state = self.snapshot_json();
        self.history.push(state);
    }

    fn reset_history(&mut self) {
        let state = self.snapshot_json();
        self.history.clear(state);
    }

    /// Replaces the whole scene from a snapshot without touching history.
    ///
    /// The colour cycle carries on from the live scene.
    fn apply(&mut self, snapshot: &SceneSnapshot) -> Result<(), PlannerError> {
        let mut scene = deserialize(snapshot)?;
        scene.set_palette(self.scene.palette().clone());
        self.scene = scene;
        if let Some(pixels_per_cm) = snapshot.pixels_per_cm {
            self.set_zoom(pixels_per_cm);
        }
        self.drag = None;
        Ok(())
    }

    fn restore(&mut self, json: &str) -> Result<(), PlannerError> {
        let snapshot = SceneSnapshot::from_json(json)?;
        self.apply(&snapshot)
    }

    /// Replaces the scene with imported data and starts a fresh history.
    ///
    /// The live scene is untouched when the data is rejected.
    pub fn import(&mut self, snapshot: &SceneSnapshot) -> Result<(), PlannerError> {
        self.apply(snapshot)?;
        self.reset_history();
        Ok(())
    }

    pub fn import_json(&mut self, json: &str) -> Result<(), PlannerError> {
        let snapshot = SceneSnapshot::from_json(json)?;
        self.import(&snapshot)
    }

    /// Steps back one history entry. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, PlannerError> {
        let Some(state) = self.history.undo().map(str::to_owned) else {
            return Ok(false);
        };
        self.restore(&state)?;
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, PlannerError> {
        let Some(state) = self.history.redo().map(str::to_owned) else {
            return Ok(false);
        };
        self.restore(&state)?;
        Ok(true)
    }

    /// Adds an item and commits.
    ///
    /// Doors and windows are centred on their wall (doors on the left wall,
    /// windows on the top wall unless told otherwise).
    pub fn add_item(&mut self, request: &NewItem) -> Result<ItemId, PlannerError> {
        let name = non_blank(request.name.as_deref());
        let room = self.scene.room.clone();

        let mut item = match request.kind {
            NewItemKind::Door => {
                let leaf = finite_or(
                    request.span_cm.unwrap_or(DEFAULT_DOOR_LEAF_CM),
                    DEFAULT_DOOR_LEAF_CM,
                );
                let inward = request.door_inward.unwrap_or(true);
                let mut door = Item::door(name.unwrap_or_else(|| "Door".to_string()), leaf, inward)
                    .with_color(DOOR_COLOR);
                wall::center_on_wall(&mut door, &room, request.wall_side.unwrap_or(WallSide::Left));
                door
            }
            NewItemKind::Window => {
                let span = finite_or(
                    request.span_cm.unwrap_or(DEFAULT_WINDOW_SPAN_CM),
                    DEFAULT_WINDOW_SPAN_CM,
                );
                let mut window = Item::window(name.unwrap_or_else(|| "Window".to_string()), span)
                    .with_color(WINDOW_COLOR);
                wall::center_on_wall(&mut window, &room, request.wall_side.unwrap_or(WallSide::Top));
                window
            }
            kind => {
                let name = name.unwrap_or_else(|| format!("Item {}", self.scene.len() + 1));
                let mut item = Item::new(name, request.size.unwrap_or_default());
                item.set_furniture_flags(kind == NewItemKind::Carpet, kind == NewItemKind::Hangable);
                if let Some(pos) = request.pos.filter(Vec2::is_finite) {
                    item.pos = pos;
                }
                if kind == NewItemKind::Hangable {
                    if let Some(z) = request.z_from_floor_cm {
                        item.set_z(z);
                    }
                }
                item
            }
        };
        if let Some(color) = non_blank(request.color.as_deref()) {
            item.color = color;
        }

        let id = self.scene.add(item);
        self.scene.revalidate(&id)?;
        self.commit();
        Ok(id)
    }

    pub fn remove_item(&mut self, id: &ItemId) -> Result<Item, PlannerError> {
        let removed = self.scene.remove(id)?;
        self.scene.revalidate_all();
        self.commit();
        Ok(removed)
    }

    /// Applies an edit, normalises the placement and commits.
    ///
    /// An edit that leaves the item in an illegal spot is kept and flagged
    /// `invalid`; undo takes it back.
    pub fn edit_item(&mut self, id: &ItemId, edit: &ItemEdit) -> Result<Item, PlannerError> {
        let room = self.scene.room.clone();
        {
            let item = self.scene.item_mut(id)?;
            edit.apply_to(item, &room);
            wall::clamp_inside_room(item, &room);
            snap::snap_to_walls(item, &room);
        }
        self.scene.snap_to_neighbors(id)?;
        self.scene.revalidate(id)?;
        self.commit();
        Ok(self.scene.item(id)?.clone())
    }

    /// Toggles between 0° and 90°, then clamps, snaps and commits.
    ///
    /// Doors and windows are put straight back onto their wall, so turning
    /// them never leaves them perpendicular to it.
    pub fn rotate_item(&mut self, id: &ItemId) -> Result<Item, PlannerError> {
        let room = self.scene.room.clone();
        {
            let item = self.scene.item_mut(id)?;
            item.rotation = item.rotation.toggled();
            wall::apply_wall_placement(item, &room);
            wall::clamp_inside_room(item, &room);
            snap::snap_to_walls(item, &room);
        }
        self.scene.snap_to_neighbors(id)?;
        self.scene.revalidate(id)?;
        self.commit();
        Ok(self.scene.item(id)?.clone())
    }

    /// Copies an item 5 cm up and to the right and commits.
    pub fn duplicate_item(&mut self, id: &ItemId) -> Result<ItemId, PlannerError> {
        let source = self.scene.item(id)?;
        let mut copy = source.clone().with_id(ItemId::default());
        copy.name = format!("{} copy", source.name);
        copy.pos += Vec2::new(5.0, 5.0);

        let copy_id = self.scene.add(copy);
        self.scene.revalidate(&copy_id)?;
        self.commit();
        Ok(copy_id)
    }

    /// Moves an item flush to its closest wall and commits.
    pub fn snap_item_to_wall(&mut self, id: &ItemId) -> Result<WallSide, PlannerError> {
        let side = self.scene.snap_to_nearest_wall(id)?;
        self.scene.revalidate(id)?;
        self.commit();
        Ok(side)
    }

    /// Starts dragging `id`, grabbed at the plan point `grab`.
    pub fn begin_drag(&mut self, id: &ItemId, grab: Vec2) -> Result<(), PlannerError> {
        let item = self.scene.item(id)?;
        let grab_offset = grab - item.pos;
        self.drag = Some(DragSession {
            id: id.clone(),
            grab_offset: if grab_offset.is_finite() {
                grab_offset
            } else {
                Vec2::zero()
            },
            before: self.snapshot_json(),
        });
        Ok(())
    }

    /// Moves the dragged item so the grab point follows `point`.
    ///
    /// Returns whether the new spot is illegal.
    pub fn drag_to(&mut self, point: Vec2) -> Result<bool, PlannerError> {
        let session = self.drag.as_ref().ok_or(PlannerError::NoDragInProgress)?;
        let id = session.id.clone();
        let target = point - session.grab_offset;
        let room = self.scene.room.clone();

        {
            let item = self.scene.item_mut(&id)?;
            if target.is_finite() {
                item.pos = target;
            }
            if item.is_wall_item() {
                wall::stick_to_nearest_wall(item, &room);
            }
            wall::clamp_inside_room(item, &room);
            snap::snap_to_walls(item, &room);
        }
        self.scene.snap_to_neighbors(&id)?;

        let item = self.scene.item(&id)?;
        let support_top = if item.is_hangable() {
            self.scene.find_support_under(item).map(|support| support.top_z())
        } else {
            None
        };
        let item = self.scene.item_mut(&id)?;
        item.z_from_floor_cm = match (item.is_hangable(), support_top) {
            (true, Some(top)) => top,
            (true, None) => item.z_from_floor_cm.max(0.0),
            (false, _) => 0.0,
        };

        Ok(self.scene.revalidate(&id)?)
    }

    /// Finishes the drag: commits a legal spot, restores the pre-drag scene otherwise.
    ///
    /// A drag that changed nothing leaves history alone.
    pub fn end_drag(&mut self) -> Result<DragOutcome, PlannerError> {
        let session = self.drag.take().ok_or(PlannerError::NoDragInProgress)?;
        let invalid = self.scene.get(&session.id).is_some_and(|it| it.invalid);
        if invalid {
            self.restore(&session.before)?;
            self.history.set_current(session.before);
            return Ok(DragOutcome::RolledBack);
        }
        if self.snapshot_json() != session.before {
            self.commit();
        }
        Ok(DragOutcome::Committed)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether `candidate` would collide if placed into the current scene.
    pub fn check_collision(&self, candidate: &Item) -> bool {
        self.scene.any_collision(candidate)
    }

    /// Moves and resizes the human probe. Not recorded in history.
    pub fn update_human(&mut self, pos: Option<Vec2>, radius_cm: Option<f64>) -> Vec<ItemId> {
        if let Some(radius) = radius_cm {
            self.scene.human.set_radius(radius);
        }
        if let Some(pos) = pos {
            self.scene.move_human(pos);
        }
        self.scene.human_conflicts()
    }

    /// Resizes the room, re-validates every item and commits.
    pub fn resize_room(
        &mut self,
        width_cm: f64,
        length_cm: f64,
        snap_epsilon_cm: Option<f64>,
    ) -> &Room {
        self.scene.room.resize(width_cm, length_cm);
        if let Some(epsilon) = snap_epsilon_cm {
            self.scene.room.set_snap_epsilon(epsilon);
        }
        let human = self.scene.human.pos;
        self.scene.move_human(human);
        self.scene.revalidate_all();
        self.commit();
        &self.scene.room
    }

    fn fill_sample(&mut self) {
        self.scene.clear_items();
        let sample = [
            Item::new("Bed", Size::new(160.0, 200.0, 40.0)).at(20.0, 20.0),
            Item::new("Desk", Size::new(140.0, 70.0, 75.0)).at(210.0, 30.0),
            Item::new("Wardrobe", Size::new(120.0, 60.0, 210.0)).at(260.0, 180.0),
            Item::carpet("Carpet", Size::new(220.0, 160.0, 0.0)).at(90.0, 90.0),
            Item::hangable("Shelf", Size::new(80.0, 25.0, 3.0), 120.0).at(20.0, 240.0),
        ];
        for item in sample {
            self.scene.add(item);
        }
        self.scene.revalidate_all();
    }

    /// Replaces all items with a small furnished bedroom and commits.
    pub fn seed_sample(&mut self) {
        self.drag = None;
        self.fill_sample();
        self.commit();
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerSettings::default())
    }
}
