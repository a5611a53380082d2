//! Flat JSON snapshots of a scene.
//!
//! The records in this module mirror the persisted shape one to one:
//!
//! ```json
//! {
//!   "room": { "widthCm": 400, "lengthCm": 300, "snapEpsilonCm": 4 },
//!   "items": [ { "id": "item-1", "name": "Bed", "pos": { "xCm": 20, "yCm": 20 }, ... } ],
//!   "human": { "pos": { "xCm": 60, "yCm": 60 }, "radiusCm": 30 },
//!   "pixelsPerCm": 2
//! }
//! ```
//!
//! Item categories are stored as independent boolean flags. On the way in,
//! contradictory flags resolve by precedence door > window > carpet >
//! hangable > furniture.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{
    DoorAttrs, HumanProbe, Item, ItemId, ItemKind, Rotation, Room, Size, WallMount, WallSide,
    DEFAULT_SNAP_EPSILON_CM,
};
use crate::scene::Scene;
use crate::types::Vec2;

/// Import failures. The live scene is never touched when one is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneDataError {
    Malformed(String),
    MissingRoom,
    InvalidRoom(String),
}

impl std::fmt::Display for SceneDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneDataError::Malformed(msg) => write!(f, "Malformed scene data: {}", msg),
            SceneDataError::MissingRoom => write!(f, "Scene data has no room"),
            SceneDataError::InvalidRoom(msg) => write!(f, "Invalid room: {}", msg),
        }
    }
}

impl std::error::Error for SceneDataError {}

impl From<serde_json::Error> for SceneDataError {
    fn from(err: serde_json::Error) -> Self {
        SceneDataError::Malformed(err.to_string())
    }
}

fn default_snap_epsilon() -> f64 {
    DEFAULT_SNAP_EPSILON_CM
}

fn default_true() -> bool {
    true
}

fn default_item_name() -> String {
    "Item".to_string()
}

fn default_item_pos() -> Vec2 {
    Vec2::new(10.0, 10.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub width_cm: f64,
    pub length_cm: f64,
    #[serde(default = "default_snap_epsilon")]
    pub snap_epsilon_cm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    /// Regenerated when missing or already taken.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_item_name")]
    pub name: String,
    #[serde(default = "default_item_pos")]
    pub pos: Vec2,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub z_from_floor_cm: f64,
    /// 0 or 90; other angles are folded onto the nearest quarter turn.
    #[serde(default)]
    pub rotation_deg: f64,
    #[serde(default)]
    pub is_hangable: bool,
    #[serde(default)]
    pub is_carpet: bool,
    #[serde(default)]
    pub is_door: bool,
    #[serde(default)]
    pub is_window: bool,
    #[serde(default = "default_true")]
    pub door_inward: bool,
    #[serde(default)]
    pub door_hinge_right: bool,
    #[serde(default)]
    pub wall_side: Option<WallSide>,
    #[serde(default)]
    pub offset_cm: f64,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HumanRecord {
    pub pos: Vec2,
    pub radius_cm: f64,
}

/// A complete scene as stored in files and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    #[serde(default)]
    pub room: Option<RoomRecord>,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub human: Option<HumanRecord>,
    #[serde(default)]
    pub pixels_per_cm: Option<f64>,
}

impl SceneSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SceneDataError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SceneDataError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<&Room> for RoomRecord {
    fn from(room: &Room) -> Self {
        Self {
            width_cm: room.width_cm,
            length_cm: room.length_cm,
            snap_epsilon_cm: room.snap_epsilon_cm,
        }
    }
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        let mount = item.wall_mount().copied().unwrap_or_default();
        let door = item.door_attrs().copied().unwrap_or_default();
        Self {
            id: Some(item.id.to_string()),
            name: item.name.clone(),
            pos: item.pos,
            size: item.size,
            z_from_floor_cm: item.z_from_floor_cm,
            rotation_deg: f64::from(item.rotation.degrees()),
            is_hangable: item.is_hangable(),
            is_carpet: item.is_carpet(),
            is_door: item.is_door(),
            is_window: item.is_window(),
            door_inward: door.inward,
            door_hinge_right: door.hinge_right,
            wall_side: mount.side,
            offset_cm: mount.offset_cm,
            color: item.color.clone(),
        }
    }
}

impl ItemRecord {
    fn kind(&self) -> ItemKind {
        let mount = WallMount {
            side: self.wall_side,
            offset_cm: self.offset_cm,
        };
        if self.is_door {
            ItemKind::Door(DoorAttrs {
                inward: self.door_inward,
                hinge_right: self.door_hinge_right,
                mount,
            })
        } else if self.is_window {
            ItemKind::Window(mount)
        } else if self.is_carpet {
            ItemKind::Carpet
        } else if self.is_hangable {
            ItemKind::Hangable
        } else {
            ItemKind::Furniture
        }
    }

    /// Builds the item this record describes.
    ///
    /// Numbers are clamped like any other edit; positions are kept as stored.
    pub fn to_item(&self) -> Item {
        let name = if self.name.trim().is_empty() {
            default_item_name()
        } else {
            self.name.clone()
        };
        let mut item = Item::new(name, self.size)
            .with_id(ItemId::new(self.id.clone().unwrap_or_default()))
            .with_rotation(Rotation::from_degrees(self.rotation_deg))
            .with_kind(self.kind())
            .with_color(self.color.clone());
        item.pos = self.pos;
        item.set_z(self.z_from_floor_cm);
        if let Some(mount) = item.wall_mount_mut() {
            mount.offset_cm = mount.offset_cm.max(0.0);
        }
        item
    }
}

/// Captures the whole scene plus the view zoom.
pub fn serialize(scene: &Scene, pixels_per_cm: f64) -> SceneSnapshot {
    SceneSnapshot {
        room: Some(RoomRecord::from(&scene.room)),
        items: scene.items().iter().map(ItemRecord::from).collect(),
        human: Some(HumanRecord {
            pos: scene.human.pos,
            radius_cm: scene.human.radius_cm,
        }),
        pixels_per_cm: Some(pixels_per_cm),
    }
}

fn checked_extent(value: f64, name: &str) -> Result<f64, SceneDataError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SceneDataError::InvalidRoom(format!(
            "{} must be positive, got: {}",
            name, value
        )));
    }
    Ok(value)
}

/// Rebuilds a scene from a snapshot.
///
/// Ids are kept when present and unique, otherwise regenerated. Every
/// item's `invalid` flag is recomputed against the rebuilt scene.
pub fn deserialize(snapshot: &SceneSnapshot) -> Result<Scene, SceneDataError> {
    let record = snapshot.room.as_ref().ok_or(SceneDataError::MissingRoom)?;
    let width = checked_extent(record.width_cm, "widthCm")?;
    let length = checked_extent(record.length_cm, "lengthCm")?;
    let mut scene = Scene::new(Room::new(width, length, record.snap_epsilon_cm));

    for item in &snapshot.items {
        scene.add(item.to_item());
    }
    if let Some(human) = &snapshot.human {
        scene.human = HumanProbe::new(scene.human.pos, human.radius_cm);
        scene.move_human(human.pos);
    }
    scene.revalidate_all();
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wall::apply_wall_placement;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new(Room::new(500.0, 350.0, 5.0));
        scene.add(Item::new("Bed", Size::new(160.0, 200.0, 40.0)).at(20.0, 20.0));
        scene.add(Item::new("Bed", Size::new(90.0, 200.0, 40.0)).at(300.0, 20.0));
        scene.add(Item::carpet("Rug", Size::new(220.0, 160.0, 0.0)).at(90.0, 90.0));
        scene.add(
            Item::hangable("Shelf", Size::new(80.0, 25.0, 3.0), 120.0)
                .at(20.0, 240.0)
                .with_rotation(Rotation::Deg90),
        );
        let mut door = Item::door("Door", 90.0, false).on_wall(WallSide::Right, 40.0);
        if let Some(attrs) = door.door_mut() {
            attrs.hinge_right = true;
        }
        apply_wall_placement(&mut door, &scene.room);
        scene.add(door);
        scene
    }

    fn sorted_names(scene: &Scene) -> Vec<String> {
        let mut names: Vec<String> = scene.items().iter().map(|it| it.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn round_trip_keeps_items_room_and_human() {
        let mut original = sample_scene();
        original.move_human(Vec2::new(250.0, 300.0));

        let json = serialize(&original, 2.5).to_json().expect("serializable");
        let snapshot = SceneSnapshot::from_json(&json).expect("parsable");
        let restored = deserialize(&snapshot).expect("valid data");

        assert_eq!(sorted_names(&restored), sorted_names(&original));
        assert_eq!(restored.room, original.room);
        assert_eq!(restored.human, original.human);
        assert_eq!(snapshot.pixels_per_cm, Some(2.5));
        for item in original.items() {
            let back = restored.get(&item.id).expect("id preserved");
            assert_eq!(back.kind, item.kind, "{} changed kind", item.name);
            assert_eq!(back.pos, item.pos);
            assert_eq!(back.rotation, item.rotation);
            assert_eq!(back.color, item.color);
        }
    }

    #[test]
    fn serialized_keys_follow_the_schema() {
        let value = serde_json::to_value(serialize(&sample_scene(), 2.0)).unwrap();
        assert_eq!(value["room"]["widthCm"], 500.0);
        assert_eq!(value["pixelsPerCm"], 2.0);

        let door = &value["items"][4];
        assert_eq!(door["isDoor"], true);
        assert_eq!(door["doorInward"], false);
        assert_eq!(door["doorHingeRight"], true);
        assert_eq!(door["wallSide"], "right");
        assert_eq!(door["rotationDeg"], 0.0);
        assert_eq!(door["size"]["lCm"], 90.0);

        let bed = &value["items"][0];
        assert!(bed["wallSide"].is_null());
        assert_eq!(bed["pos"]["xCm"], 20.0);
    }

    #[test]
    fn missing_fields_take_item_defaults() {
        let snapshot = SceneSnapshot::from_json(
            r#"{"room":{"widthCm":400,"lengthCm":300},"items":[{"isDoor":true},{"name":"Box"}]}"#,
        )
        .unwrap();
        let scene = deserialize(&snapshot).unwrap();

        let door = &scene.items()[0];
        assert_eq!(door.name, "Item");
        assert!(door.is_inward_door(), "doors swing inward unless told otherwise");
        assert_eq!(scene.room.snap_epsilon_cm, DEFAULT_SNAP_EPSILON_CM);

        let boxed = &scene.items()[1];
        assert_eq!(boxed.pos, Vec2::new(10.0, 10.0));
        assert_eq!(boxed.size, Size::default());
        assert!(!boxed.id.is_empty(), "missing id must be generated");
        assert_ne!(boxed.id, door.id);
    }

    #[test]
    fn contradictory_flags_resolve_by_precedence() {
        let snapshot = SceneSnapshot::from_json(
            r#"{"room":{"widthCm":400,"lengthCm":300},"items":[
                {"name":"a","isDoor":true,"isWindow":true,"isCarpet":true},
                {"name":"b","isWindow":true,"isHangable":true},
                {"name":"c","isCarpet":true,"isHangable":true,"zFromFloorCm":50}
            ]}"#,
        )
        .unwrap();
        let scene = deserialize(&snapshot).unwrap();
        let items = scene.items();
        assert!(items[0].is_door());
        assert!(items[1].is_window());
        assert!(items[2].is_carpet());
        assert_eq!(items[2].z_from_floor_cm, 0.0);
    }

    #[test]
    fn duplicate_ids_are_regenerated() {
        let snapshot = SceneSnapshot::from_json(
            r#"{"room":{"widthCm":400,"lengthCm":300},"items":[
                {"id":"x","name":"one"},{"id":"x","name":"two"}
            ]}"#,
        )
        .unwrap();
        let scene = deserialize(&snapshot).unwrap();
        assert_eq!(scene.items()[0].id.as_str(), "x");
        assert_ne!(scene.items()[1].id.as_str(), "x");
    }

    #[test]
    fn invalid_flag_is_recomputed_on_load() {
        let snapshot = SceneSnapshot::from_json(
            r#"{"room":{"widthCm":400,"lengthCm":300},"items":[
                {"name":"a","pos":{"xCm":100,"yCm":100}},
                {"name":"b","pos":{"xCm":120,"yCm":120}},
                {"name":"c","pos":{"xCm":300,"yCm":100}}
            ]}"#,
        )
        .unwrap();
        let scene = deserialize(&snapshot).unwrap();
        let flags: Vec<bool> = scene.items().iter().map(|it| it.invalid).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn bad_data_is_reported() {
        assert!(matches!(
            SceneSnapshot::from_json("{not json"),
            Err(SceneDataError::Malformed(_))
        ));
        assert!(matches!(
            SceneSnapshot::from_json(r#"{"items":"nope"}"#),
            Err(SceneDataError::Malformed(_))
        ));

        let no_room = SceneSnapshot::from_json(r#"{"items":[]}"#).unwrap();
        assert!(matches!(deserialize(&no_room), Err(SceneDataError::MissingRoom)));

        let flat = SceneSnapshot::from_json(r#"{"room":{"widthCm":0,"lengthCm":300}}"#).unwrap();
        assert!(matches!(deserialize(&flat), Err(SceneDataError::InvalidRoom(_))));
    }
}
