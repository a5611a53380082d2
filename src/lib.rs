//! Room layout engine: a rectangular room, furniture, doors and windows.
//!
//! The crate keeps a scene of placed items legal: it detects collisions
//! (including door swing areas), snaps items to walls and neighbours, keeps
//! doors and windows on their walls, and records an undo history of whole
//! scene snapshots. [`planner::Planner`] ties these together; [`api`] serves
//! it over HTTP.

pub mod api;
pub mod config;
pub mod door;
pub mod geometry;
pub mod history;
pub mod model;
pub mod planner;
pub mod scene;
pub mod snap;
pub mod snapshot;
pub mod types;
pub mod wall;
