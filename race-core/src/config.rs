use std::f32::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{GeometryError, MapSize, TrackGeometry};
use crate::model::PLAYER_RED;
use crate::shapes::DEFAULT_ARC_DIVISIONS;
use crate::vehicle::VehicleParams;

const BUILTIN_SCENE: &str = include_str!("../assets/scene.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize scene config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("camera field of view must be between 0 and 180 degrees, got {0}")]
    FieldOfView(f32),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SceneConfig {
    #[serde(default)]
    pub track: TrackSettings,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub vehicle: VehicleSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub scene: DisplaySettings,
    #[serde(default = "default_parked")]
    pub parked: Vec<ParkedVehicle>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrackSettings {
    pub radius: f32,
    pub width: f32,
    pub extrude_depth: f32,
    pub arc_divisions: usize,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            radius: TrackGeometry::REFERENCE_RADIUS,
            width: TrackGeometry::REFERENCE_WIDTH,
            extrude_depth: 6.0,
            arc_divisions: DEFAULT_ARC_DIVISIONS,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MapSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 700.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct VehicleSettings {
    pub top_speed: f32,
    pub acceleration: f32,
    pub turn_rate: f32,
    /// Time step fed to the kinematic model each frame.
    pub frame_time_delta: f32,
    pub body_color: u32,
    pub start_position: [f32; 2],
    pub start_heading: f32,
}

impl Default for VehicleSettings {
    fn default() -> Self {
        let params = VehicleParams::default();
        Self {
            top_speed: params.top_speed,
            acceleration: params.acceleration,
            turn_rate: params.turn_rate,
            frame_time_delta: 1.0,
            body_color: PLAYER_RED,
            start_position: [-380.0, 0.0],
            start_heading: FRAC_PI_2,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 55.0,
            near: 0.1,
            far: 3000.0,
            position: [500.0, 500.0, 1000.0],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    /// Grid and axes gizmos on the ground plane.
    pub show_helpers: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { show_helpers: true }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Car,
    Truck,
}

/// A vehicle that stands in the scene without being driven.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ParkedVehicle {
    pub kind: VehicleKind,
    pub position: [f32; 2],
    #[serde(default)]
    pub heading: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            track: TrackSettings::default(),
            map: MapSettings::default(),
            vehicle: VehicleSettings::default(),
            camera: CameraSettings::default(),
            scene: DisplaySettings::default(),
            parked: default_parked(),
        }
    }
}

fn default_parked() -> Vec<ParkedVehicle> {
    vec![ParkedVehicle {
        kind: VehicleKind::Truck,
        position: [380.0, 0.0],
        heading: FRAC_PI_2,
    }]
}

impl SceneConfig {
    /// Load a scene from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The scene compiled into the binary.
    pub fn load_builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_SCENE)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Save this scene to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn map_size(&self) -> MapSize {
        MapSize::new(self.map.width, self.map.height)
    }

    pub fn vehicle_params(&self) -> VehicleParams {
        VehicleParams {
            top_speed: self.vehicle.top_speed,
            acceleration: self.vehicle.acceleration,
            turn_rate: self.vehicle.turn_rate,
        }
    }

    /// Check every value and derive the track geometry.
    pub fn validate(&self) -> Result<TrackGeometry, ConfigError> {
        for (field, value) in [
            ("track.extrude_depth", self.track.extrude_depth),
            ("vehicle.top_speed", self.vehicle.top_speed),
            ("vehicle.acceleration", self.vehicle.acceleration),
            ("vehicle.turn_rate", self.vehicle.turn_rate),
            ("vehicle.frame_time_delta", self.vehicle.frame_time_delta),
            ("camera.near", self.camera.near),
            ("camera.far", self.camera.far),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.track.arc_divisions == 0 {
            return Err(ConfigError::NotPositive {
                field: "track.arc_divisions",
                value: 0.0,
            });
        }
        let fov = self.camera.fov_degrees;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(ConfigError::FieldOfView(fov));
        }

        let geometry = TrackGeometry::new(self.track.radius, self.track.width)?;
        geometry.check_map(self.map_size())?;
        Ok(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scene_is_the_reference_track() {
        let config = SceneConfig::load_builtin().unwrap();
        assert_eq!(config.track.radius, 225.0);
        assert_eq!(config.track.width, 45.0);
        assert_eq!(config.map_size(), MapSize::new(900.0, 700.0));
        assert_eq!(config.vehicle_params(), VehicleParams::default());
        assert_eq!(config.vehicle.body_color, PLAYER_RED);

        let geometry = config.validate().unwrap();
        assert_eq!(geometry.inner_radius, 180.0);
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.track, TrackSettings::default());
        assert_eq!(config.camera, CameraSettings::default());
        assert_eq!(config.parked, default_parked());
        assert!(config.scene.show_helpers);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SceneConfig::from_toml_str(
            r#"
            [vehicle]
            top_speed = 12.5
            body_color = 0x2255aa

            [[parked]]
            kind = "car"
            position = [10.0, 20.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.vehicle.top_speed, 12.5);
        assert_eq!(config.vehicle.acceleration, 0.4);
        assert_eq!(config.vehicle.body_color, 0x2255aa);
        assert_eq!(
            config.parked,
            vec![ParkedVehicle {
                kind: VehicleKind::Car,
                position: [10.0, 20.0],
                heading: 0.0,
            }]
        );
    }

    #[test]
    fn round_trips_through_toml() {
        let config = SceneConfig::load_builtin().unwrap();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(SceneConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn save_and_load() {
        let path = std::env::temp_dir().join(format!("race-core-scene-{}.toml", std::process::id()));
        let mut config = SceneConfig::default();
        config.map.width = 1000.0;
        config.save(&path).unwrap();
        let loaded = SceneConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SceneConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SceneConfig::from_toml_str("[track\nradius = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = SceneConfig::default();
        config.track.width = 300.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Geometry(GeometryError::WidthExceedsRadius { .. }))
        ));

        let mut config = SceneConfig::default();
        config.map.width = 400.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Geometry(GeometryError::MapTooSmall { .. }))
        ));

        let mut config = SceneConfig::default();
        config.vehicle.acceleration = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "vehicle.acceleration",
                ..
            })
        ));

        let mut config = SceneConfig::default();
        config.camera.fov_degrees = 190.0;
        assert!(matches!(config.validate(), Err(ConfigError::FieldOfView(_))));
    }
}
