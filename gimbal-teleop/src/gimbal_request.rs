use crate::gimbal_defs::{
    FOCUS_MSG_ID, TRACKING_CONFIG_KEY, TRACKING_OFF, TRACKING_ON, ZOOM_SPEED,
};
use crate::gimbal_state::Orientation;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

pub struct DeviceRequest {
    pub operation: &'static str,
    pub body: Value,
}

pub fn set_abs_degree(orientation: Orientation) -> DeviceRequest {
    build(
        "setAbsDegree",
        json!({
            "cmd": "setAbsDegree",
            "rollDegree": orientation.roll,
            "pitchDegree": orientation.pitch,
            "yawDegree": orientation.yaw,
        }),
    )
}

pub fn set_zoom_ratio(ratio: f64) -> DeviceRequest {
    build(
        "SetZoomRatio",
        json!({
            "cmd": "SetZoomRatio",
            "type": 0,
            "speed": ZOOM_SPEED,
            "ratio": ratio,
        }),
    )
}

pub fn focus(x: i32, y: i32) -> DeviceRequest {
    build("Focus", json!({ "msg_id": FOCUS_MSG_ID, "x": x, "y": y }))
}

pub fn set_tracking(enabled: bool) -> DeviceRequest {
    build(
        "SdkSetConfig",
        json!({
            "cmd": "SdkSetConfig",
            "key": TRACKING_CONFIG_KEY,
            "val": tracking_wire_value(enabled),
        }),
    )
}

/// The device flag is "tracking disabled", so on maps to 0.
pub fn tracking_wire_value(enabled: bool) -> u8 {
    if enabled {
        TRACKING_ON
    } else {
        TRACKING_OFF
    }
}

fn build(operation: &'static str, body: Value) -> DeviceRequest {
    DeviceRequest { operation, body }
}

#[derive(Deserialize)]
struct GimbalStatus {
    #[serde(rename = "Degree")]
    degree: Vec<f64>,
}

/// Reads `{"Degree": [roll, pitch, yaw]}` into an unrounded orientation.
pub fn parse_position(body: &str) -> Result<Orientation> {
    let status: GimbalStatus =
        serde_json::from_str(body).context("parse gimbal position response failed")?;
    match status.degree[..] {
        [roll, pitch, yaw, ..] => Ok(Orientation { pitch, yaw, roll }),
        _ => Err(anyhow!(
            "expected 3 degree values, got {}",
            status.degree.len()
        )),
    }
}
