use crate::gimbal_defs::{
    PITCH_STEP, ROLL_MAX, ROLL_MIN, ROLL_STEP, YAW_LIMIT, YAW_STEP, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};

/// Orientation exactly as it goes on the wire.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// Client-side view of the gimbal. The device is only read once to seed
/// pitch/yaw/roll; everything after that accumulates here.
#[derive(Clone, Debug, PartialEq)]
pub struct GimbalState {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub zoom_ratio: f64,
    pub tracking_enabled: bool,
}

impl GimbalState {
    pub fn seeded(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self {
            pitch,
            yaw,
            roll,
            zoom_ratio: ZOOM_MIN,
            tracking_enabled: false,
        }
    }

    pub fn tilt_up(&mut self) {
        self.pitch -= PITCH_STEP;
    }

    pub fn tilt_down(&mut self) {
        self.pitch += PITCH_STEP;
    }

    pub fn pan_left(&mut self) {
        self.yaw -= YAW_STEP;
    }

    pub fn pan_right(&mut self) {
        self.yaw += YAW_STEP;
    }

    pub fn roll_by(&mut self, steps: f64) {
        self.roll = (self.roll + steps * ROLL_STEP).clamp(ROLL_MIN, ROLL_MAX);
    }

    pub fn zoom_by(&mut self, steps: f64) {
        self.zoom_ratio = (self.zoom_ratio + steps * ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Flips tracking and returns the new value.
    pub fn toggle_tracking(&mut self) -> bool {
        self.tracking_enabled = !self.tracking_enabled;
        self.tracking_enabled
    }

    /// Rounded orientation with yaw folded into the device range. Pitch and
    /// roll are passed through unwrapped.
    pub fn orientation(&self) -> Orientation {
        Orientation {
            pitch: round1(self.pitch),
            yaw: normalize_angle(round1(self.yaw)),
            roll: round1(self.roll),
        }
    }

    pub fn zoom(&self) -> f64 {
        round1(self.zoom_ratio)
    }
}

/// Folds an angle into [-179, 181) by whole turns.
///
/// The two loops run in sequence, so a value the first loop leaves below
/// -179 is pushed back up: `normalize_angle(180.0) == 180.0` and
/// `normalize_angle(-180.0) == 180.0`. Whole turns are taken off with `%`
/// first, which is exact and keeps the loops to at most one step each.
pub fn normalize_angle(mut angle: f64) -> f64 {
    if angle.abs() > 360.0 {
        angle %= 360.0;
    }
    while angle > YAW_LIMIT {
        angle -= 360.0;
    }
    while angle < -YAW_LIMIT {
        angle += 360.0;
    }
    angle
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
