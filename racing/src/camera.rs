use std::f32::consts::FRAC_PI_2;

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::SceneSetup;

pub const AMBIENT_INTENSITY: f32 = 1.0;
/// Ambient brightness at full intensity.
const AMBIENT_BRIGHTNESS: f32 = 500.0;
/// Directional illuminance at full intensity, in lux.
const DIRECTIONAL_ILLUMINANCE: f32 = 10_000.0;
pub const DIRECTIONAL_INTENSITY: f32 = 0.86;

/// Grid helper extent and cell count on the ground plane.
pub const GRID_SIZE: f32 = 1300.0;
pub const GRID_DIVISIONS: u32 = 50;
pub const AXES_LENGTH: f32 = 300.0;

const ORBIT_SPEED: f32 = 0.005;
const PAN_SPEED: f32 = 0.001;
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;
const MIN_RADIUS: f32 = 10.0;

/// Spherical camera rig around a target point, z up.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    /// Angle around +z, measured from +x.
    pub yaw: f32,
    /// Elevation above the ground plane.
    pub pitch: f32,
    pub max_radius: f32,
}

impl OrbitCamera {
    pub fn looking_from(position: Vec3, target: Vec3, max_radius: f32) -> Self {
        let offset = position - target;
        let radius = offset.length().max(MIN_RADIUS);
        Self {
            target,
            radius,
            yaw: offset.y.atan2(offset.x),
            pitch: (offset.z / radius).clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH),
            max_radius: max_radius.max(MIN_RADIUS),
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.radius * Vec3::new(cos_pitch * cos_yaw, cos_pitch * sin_yaw, sin_pitch)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(self.target, Vec3::Z)
    }

    /// Dragging right spins the view around the target, dragging down
    /// raises the camera.
    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_SPEED;
        self.pitch = (self.pitch + delta.y * ORBIT_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move the target so the scene follows the cursor.
    pub fn pan(&mut self, delta: Vec2) {
        let transform = self.transform();
        let scale = self.radius * PAN_SPEED;
        self.target += (*transform.left() * delta.x + *transform.up() * delta.y) * scale;
    }

    /// Positive amounts move closer.
    pub fn zoom(&mut self, amount: f32) {
        self.radius = (self.radius * (1.0 - amount)).clamp(MIN_RADIUS, self.max_radius);
    }
}

pub fn setup_camera(mut commands: Commands, scene: Res<SceneSetup>) {
    let settings = &scene.config.camera;
    let rig = OrbitCamera::looking_from(
        Vec3::from_array(settings.position),
        Vec3::ZERO,
        settings.far * 0.9,
    );

    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: settings.fov_degrees.to_radians(),
            near: settings.near,
            far: settings.far,
            ..default()
        }),
        rig.transform(),
        rig,
        AmbientLight {
            brightness: AMBIENT_BRIGHTNESS * AMBIENT_INTENSITY,
            ..default()
        },
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: DIRECTIONAL_ILLUMINANCE * DIRECTIONAL_INTENSITY,
            ..default()
        },
        Transform::from_xyz(0.0, 1.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));
    info!(fov = settings.fov_degrees, "Camera ready");
}

pub fn orbit_camera(
    mut camera_query: Query<(&mut Transform, &mut OrbitCamera)>,
    mut scroll_events: MessageReader<MouseWheel>,
    mut motion_events: MessageReader<MouseMotion>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
) {
    let Ok((mut transform, mut rig)) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let zoom_delta = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };
        rig.zoom(zoom_delta);
    }

    let delta: Vec2 = motion_events.read().map(|event| event.delta).sum();
    if mouse_buttons.pressed(MouseButton::Left) {
        rig.rotate(delta);
    } else if mouse_buttons.pressed(MouseButton::Middle) || mouse_buttons.pressed(MouseButton::Right)
    {
        rig.pan(delta);
    }

    if rig.is_changed() {
        *transform = rig.transform();
    }
}

pub fn draw_helpers(mut gizmos: Gizmos) {
    let spacing = GRID_SIZE / GRID_DIVISIONS as f32;
    gizmos.grid(
        Isometry3d::IDENTITY,
        UVec2::splat(GRID_DIVISIONS),
        Vec2::splat(spacing),
        Color::srgb(0.35, 0.35, 0.35),
    );
    gizmos.axes(Transform::IDENTITY, AXES_LENGTH);
}
