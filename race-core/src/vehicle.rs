use tracing::trace;

/// Speeds below this magnitude snap to a standstill.
pub const STOP_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleParams {
    pub top_speed: f32,
    pub acceleration: f32,
    /// Heading change per frame while a turn key is held, in radians.
    pub turn_rate: f32,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            top_speed: 20.0,
            acceleration: 0.4,
            turn_rate: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Pressed(Control),
    Released(Control),
}

/// Player vehicle state.
///
/// `position_offset` and `heading_delta` are the outputs of the most recent
/// [`VehicleState::update`]: how far to move along the vehicle's forward axis
/// and how much to turn it this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub position_offset: f32,
    pub heading_delta: f32,
    pub speed: f32,
    pub accelerating: bool,
    pub decelerating: bool,
    pub rotating: bool,
    /// `1.0` after the forward key, `-1.0` after the backward key.
    pub direction: f32,
    /// `1.0` turning left, `-1.0` turning right.
    pub rotation_direction: f32,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            position_offset: 0.0,
            heading_delta: 0.0,
            speed: 0.0,
            accelerating: false,
            decelerating: false,
            rotating: false,
            direction: 1.0,
            rotation_direction: 1.0,
        }
    }
}

impl VehicleState {
    pub fn handle(mut self, event: InputEvent) -> Self {
        match event {
            InputEvent::Pressed(Control::Forward) => {
                self.direction = 1.0;
                self.accelerating = true;
                self.decelerating = false;
            }
            InputEvent::Pressed(Control::Backward) => {
                self.direction = -1.0;
                self.accelerating = true;
                self.decelerating = false;
            }
            InputEvent::Released(Control::Forward | Control::Backward) => {
                self.accelerating = false;
                self.decelerating = true;
            }
            InputEvent::Pressed(Control::TurnLeft) => {
                self.rotating = true;
                self.rotation_direction = 1.0;
            }
            InputEvent::Pressed(Control::TurnRight) => {
                self.rotating = true;
                self.rotation_direction = -1.0;
            }
            InputEvent::Released(Control::TurnLeft | Control::TurnRight) => {
                self.rotating = false;
            }
        }
        self
    }

    /// Advance one frame.
    ///
    /// Speed changes by a fixed step per frame, while the travelled distance
    /// scales with `dt`. The turn step is per frame and flips sign with
    /// `direction`, so steering mirrors while the last throttle input was
    /// backward.
    pub fn update(mut self, params: &VehicleParams, dt: f32) -> Self {
        if self.accelerating && self.speed.abs() < params.top_speed {
            self.speed += self.direction * params.acceleration;
            self.snap_to_rest();
        } else if self.decelerating {
            self.speed -= self.direction * params.acceleration;
            self.snap_to_rest();
        }

        self.position_offset = self.speed * dt;
        self.heading_delta = if self.rotating {
            self.rotation_direction * self.direction * params.turn_rate
        } else {
            0.0
        };

        trace!(
            speed = self.speed,
            offset = self.position_offset,
            heading_delta = self.heading_delta,
            "vehicle step"
        );
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.speed == 0.0
    }

    fn snap_to_rest(&mut self) {
        if self.speed.abs() < STOP_THRESHOLD {
            self.speed = 0.0;
            self.accelerating = false;
            self.decelerating = false;
        }
    }
}
