//! Engine-independent parts of the racing scene: track geometry, raster
//! textures, vehicle models and the player's kinematic model.

pub mod config;
pub mod extrude;
pub mod geometry;
pub mod model;
pub mod shapes;
pub mod texture;
pub mod vehicle;

pub use config::{ConfigError, SceneConfig};
pub use geometry::{GeometryError, MapSize, TrackGeometry};
pub use vehicle::{Control, InputEvent, VehicleParams, VehicleState};
