pub const PITCH_STEP: f64 = 5.0;
pub const YAW_STEP: f64 = 5.0;
pub const ROLL_STEP: f64 = 5.0;
pub const ROLL_MIN: f64 = -133.0;
pub const ROLL_MAX: f64 = 133.0;

pub const ZOOM_STEP: f64 = 0.1;
pub const ZOOM_MIN: f64 = 1.0;
pub const ZOOM_MAX: f64 = 5.1;
pub const ZOOM_SPEED: u8 = 3;

pub const YAW_LIMIT: f64 = 179.0;

pub const FOCUS_CENTER: (i32, i32) = (50, 50);
pub const FOCUS_MIN: i32 = 0;
pub const FOCUS_MAX: i32 = 100;
pub const FOCUS_MSG_ID: u16 = 701;

pub const TRACKING_CONFIG_KEY: u8 = 3;
pub const TRACKING_ON: u8 = 0;
pub const TRACKING_OFF: u8 = 1;
