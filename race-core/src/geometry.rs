use std::f32::consts::{FRAC_PI_3, PI};

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("track radius must be a positive finite number, got {0}")]
    InvalidRadius(f32),

    #[error("track width must be a positive finite number, got {0}")]
    InvalidWidth(f32),

    #[error("track width {width} must be smaller than track radius {radius}")]
    WidthExceedsRadius { radius: f32, width: f32 },

    #[error("{name} is outside the domain of {function}: {value}")]
    OutOfDomain {
        name: &'static str,
        function: &'static str,
        value: f32,
    },

    #[error("map {width}x{height} cannot hold the outer track arcs (needs at least {min_width}x{min_height})")]
    MapTooSmall {
        width: f32,
        height: f32,
        min_width: f32,
        min_height: f32,
    },
}

/// Ground plane footprint. The track is centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSize {
    pub width: f32,
    pub height: f32,
}

impl MapSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Constants of the figure-eight track, derived once from radius and width.
///
/// The track is two circles of `track_radius` around `(-arc_center_x, 0)` and
/// `(arc_center_x, 0)`. The arc angles mark where the inner and outer edges of
/// the two loops meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub track_radius: f32,
    pub track_width: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub arc_angle_1: f32,
    pub arc_angle_2: f32,
    pub arc_angle_3: f32,
    pub arc_angle_4: f32,
    pub arc_center_x: f32,
}

impl TrackGeometry {
    pub const REFERENCE_RADIUS: f32 = 225.0;
    pub const REFERENCE_WIDTH: f32 = 45.0;

    pub fn new(track_radius: f32, track_width: f32) -> Result<Self, GeometryError> {
        if !track_radius.is_finite() || track_radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(track_radius));
        }
        if !track_width.is_finite() || track_width <= 0.0 {
            return Err(GeometryError::InvalidWidth(track_width));
        }
        if track_width >= track_radius {
            return Err(GeometryError::WidthExceedsRadius {
                radius: track_radius,
                width: track_width,
            });
        }

        let inner_radius = track_radius - track_width;
        let outer_radius = track_radius + track_width;

        let arc_angle_1 = FRAC_PI_3;
        let delta_y = arc_angle_1.sin() * inner_radius;
        let arc_angle_2 = checked_asin("arc angle 2", delta_y / outer_radius)?;

        let arc_center_x =
            (arc_angle_1.cos() * inner_radius + arc_angle_2.cos() * outer_radius) / 2.0;

        let arc_angle_3 = checked_acos("arc angle 3", arc_center_x / inner_radius)?;
        let arc_angle_4 = checked_acos("arc angle 4", arc_center_x / outer_radius)?;

        let geometry = Self {
            track_radius,
            track_width,
            inner_radius,
            outer_radius,
            arc_angle_1,
            arc_angle_2,
            arc_angle_3,
            arc_angle_4,
            arc_center_x,
        };
        debug!(?geometry, "derived track geometry");
        Ok(geometry)
    }

    /// The 225/45 track the scene ships with.
    pub fn reference() -> Self {
        Self {
            track_radius: Self::REFERENCE_RADIUS,
            track_width: Self::REFERENCE_WIDTH,
            inner_radius: 180.0,
            outer_radius: 270.0,
            arc_angle_1: FRAC_PI_3,
            arc_angle_2: 0.615_479_7,
            arc_angle_3: 0.530_859_1,
            arc_angle_4: 0.958_296_1,
            arc_center_x: 155.227_04,
        }
    }

    pub fn left_center(&self) -> [f32; 2] {
        [-self.arc_center_x, 0.0]
    }

    pub fn right_center(&self) -> [f32; 2] {
        [self.arc_center_x, 0.0]
    }

    /// Smallest map that keeps both outer arcs inside the field boundary.
    pub fn min_map_size(&self) -> MapSize {
        MapSize::new(
            2.0 * (self.arc_center_x + self.outer_radius),
            2.0 * self.outer_radius,
        )
    }

    pub fn check_map(&self, map: MapSize) -> Result<(), GeometryError> {
        let min = self.min_map_size();
        if map.width < min.width || map.height < min.height {
            return Err(GeometryError::MapTooSmall {
                width: map.width,
                height: map.height,
                min_width: min.width,
                min_height: min.height,
            });
        }
        Ok(())
    }
}

fn checked_asin(name: &'static str, value: f32) -> Result<f32, GeometryError> {
    if !(-1.0..=1.0).contains(&value) {
        return Err(GeometryError::OutOfDomain {
            name,
            function: "asin",
            value,
        });
    }
    Ok(value.asin())
}

fn checked_acos(name: &'static str, value: f32) -> Result<f32, GeometryError> {
    if !(-1.0..=1.0).contains(&value) {
        return Err(GeometryError::OutOfDomain {
            name,
            function: "acos",
            value,
        });
    }
    let angle = value.acos();
    debug_assert!((0.0..=PI).contains(&angle));
    Ok(angle)
}
