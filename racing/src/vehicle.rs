use bevy::prelude::*;
use race_core::{Control, InputEvent, SceneConfig, VehicleParams, VehicleState};

pub const KEY_BINDINGS: [(KeyCode, Control); 4] = [
    (KeyCode::ArrowUp, Control::Forward),
    (KeyCode::ArrowDown, Control::Backward),
    (KeyCode::ArrowLeft, Control::TurnLeft),
    (KeyCode::ArrowRight, Control::TurnRight),
];

/// The keyboard-driven car.
#[derive(Component, Default)]
pub struct PlayerVehicle {
    pub state: VehicleState,
}

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct DriveSettings {
    pub params: VehicleParams,
    pub frame_time_delta: f32,
}

impl DriveSettings {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            params: config.vehicle_params(),
            frame_time_delta: config.vehicle.frame_time_delta,
        }
    }
}

/// Translate this frame's key state into input events.
///
/// Releases of keys held from earlier frames come first. Every held key then
/// reports a press, the same way keyboard auto-repeat would. A key pressed
/// and released within the frame reports its press before its release.
pub fn input_events(keyboard: &ButtonInput<KeyCode>) -> Vec<InputEvent> {
    let mut events = Vec::new();
    for &(key, control) in &KEY_BINDINGS {
        if keyboard.just_released(key) && !keyboard.just_pressed(key) {
            events.push(InputEvent::Released(control));
        }
    }
    for &(key, control) in &KEY_BINDINGS {
        if keyboard.pressed(key) {
            events.push(InputEvent::Pressed(control));
        } else if keyboard.just_pressed(key) && keyboard.just_released(key) {
            events.push(InputEvent::Pressed(control));
            events.push(InputEvent::Released(control));
        }
    }
    events
}

pub fn read_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut PlayerVehicle>,
) {
    let events = input_events(&keyboard);
    if events.is_empty() {
        return;
    }
    for mut player in &mut query {
        player.state = events
            .iter()
            .fold(player.state, |state, &event| state.handle(event));
    }
}

/// Move along the local +x axis, then turn about the local +z axis.
pub fn apply_step(transform: &mut Transform, state: &VehicleState) {
    let forward = transform.local_x();
    transform.translation += forward * state.position_offset;
    transform.rotate_local_z(state.heading_delta);
}

pub fn drive_player(
    settings: Res<DriveSettings>,
    mut query: Query<(&mut PlayerVehicle, &mut Transform)>,
) {
    for (mut player, mut transform) in &mut query {
        player.state = player
            .state
            .update(&settings.params, settings.frame_time_delta);
        apply_step(&mut transform, &player.state);
    }
}
