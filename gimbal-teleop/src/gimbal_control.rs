use crate::config::Endpoints;
use crate::error::CommandError;
use crate::gimbal_defs::{FOCUS_CENTER, FOCUS_MAX, FOCUS_MIN};
use crate::gimbal_request::{self, DeviceRequest};
use crate::gimbal_state::{GimbalState, Orientation};
use crate::key_input::KeyEvent;
use crate::transport::{DeviceTransport, HttpReply};
use anyhow::bail;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the gimbal state and turns key events into device commands.
///
/// Every command is best effort: failures are logged and local state is kept
/// as is, with no retry.
pub struct GimbalController<T> {
    transport: T,
    endpoints: Endpoints,
    state: GimbalState,
}

impl<T: DeviceTransport> GimbalController<T> {
    pub fn new(transport: T, endpoints: Endpoints, state: GimbalState) -> Self {
        Self {
            transport,
            endpoints,
            state,
        }
    }

    /// Seeds pitch/yaw/roll from the device, falling back to zero.
    pub fn connect(transport: T, endpoints: Endpoints) -> Self {
        let seed = match fetch_position(&transport, &endpoints.gimbal) {
            Ok(seed) => {
                log::info!(
                    "[Position] pitch={:.1}, yaw={:.1}, roll={:.1}",
                    seed.pitch,
                    seed.yaw,
                    seed.roll
                );
                seed
            }
            Err(err) => {
                log::warn!("[Position] {:#}, starting from zero", err);
                Orientation {
                    pitch: 0.0,
                    yaw: 0.0,
                    roll: 0.0,
                }
            }
        };
        Self::new(
            transport,
            endpoints,
            GimbalState::seeded(seed.pitch, seed.yaw, seed.roll),
        )
    }

    pub fn state(&self) -> &GimbalState {
        &self.state
    }

    /// Pushes the whole local state to the device and forces tracking off.
    pub fn sync_device(&mut self) {
        self.apply_orientation();
        self.apply_zoom();
        self.state.tracking_enabled = false;
        self.apply_tracking();
    }

    pub fn handle(&mut self, key: KeyEvent) -> Flow {
        match key {
            KeyEvent::Up => {
                self.state.tilt_up();
                self.apply_orientation();
            }
            KeyEvent::Down => {
                self.state.tilt_down();
                self.apply_orientation();
            }
            KeyEvent::Left => {
                self.state.pan_left();
                self.apply_orientation();
            }
            KeyEvent::Right => {
                self.state.pan_right();
                self.apply_orientation();
            }
            KeyEvent::Char('a') => {
                self.state.roll_by(1.0);
                self.apply_orientation();
            }
            KeyEvent::Char('s') => {
                self.state.roll_by(-1.0);
                self.apply_orientation();
            }
            KeyEvent::Char('z') => {
                self.state.zoom_by(1.0);
                self.apply_zoom();
            }
            KeyEvent::Char('x') => {
                self.state.zoom_by(-1.0);
                self.apply_zoom();
            }
            KeyEvent::Char('f') => {
                let (x, y) = FOCUS_CENTER;
                match self.focus(x, y) {
                    Ok(_) => log::info!("[Focus] x={}, y={} -> 200", x, y),
                    Err(err) => log::warn!("[Focus] {:#}", err),
                }
            }
            KeyEvent::Char('t') => {
                self.state.toggle_tracking();
                self.apply_tracking();
            }
            KeyEvent::Char('q') | KeyEvent::Interrupt => {
                log::info!("Exiting");
                return Flow::Quit;
            }
            KeyEvent::Char(other) => log::debug!("unbound key {:?}", other),
        }
        Flow::Continue
    }

    pub fn set_abs_degree(&self, orientation: Orientation) -> Result<HttpReply, CommandError> {
        self.send(
            &self.endpoints.gimbal,
            gimbal_request::set_abs_degree(orientation),
        )
    }

    pub fn set_zoom_ratio(&self, ratio: f64) -> Result<HttpReply, CommandError> {
        self.send(&self.endpoints.camera, gimbal_request::set_zoom_ratio(ratio))
    }

    pub fn focus(&self, x: i32, y: i32) -> Result<HttpReply, CommandError> {
        let valid = FOCUS_MIN..=FOCUS_MAX;
        if !valid.contains(&x) || !valid.contains(&y) {
            return Err(CommandError::InvalidFocus { x, y });
        }
        self.send(&self.endpoints.focus, gimbal_request::focus(x, y))
    }

    pub fn set_tracking(&self, enabled: bool) -> Result<HttpReply, CommandError> {
        self.send(&self.endpoints.ai, gimbal_request::set_tracking(enabled))
    }

    fn apply_orientation(&self) {
        let orientation = self.state.orientation();
        let params = format!(
            "pitch={:.1}, yaw={:.1}, roll={:.1}",
            orientation.pitch, orientation.yaw, orientation.roll
        );
        match self.set_abs_degree(orientation) {
            Ok(reply) => log::info!("[PTZ] {} -> {}", params, reply.status),
            Err(err) => log::warn!("[PTZ] {} {:#}", params, err),
        }
    }

    fn apply_zoom(&self) {
        let ratio = self.state.zoom();
        match self.set_zoom_ratio(ratio) {
            Ok(reply) => log::info!("[Zoom] ratio={:.1} -> {}", ratio, reply.status),
            Err(err) => log::warn!("[Zoom] ratio={:.1} {:#}", ratio, err),
        }
    }

    fn apply_tracking(&self) {
        let enabled = self.state.tracking_enabled;
        let label = if enabled { "ON" } else { "OFF" };
        match self.set_tracking(enabled) {
            Ok(reply) => log::info!("[Tracking] {} -> {}", label, reply.status),
            Err(err) => log::warn!("[Tracking] {} {:#}", label, err),
        }
    }

    fn send(&self, url: &str, request: DeviceRequest) -> Result<HttpReply, CommandError> {
        log::debug!("[{}] POST {}", request.operation, url);
        let reply = self.transport.post_json(url, &request.body)?;
        if !reply.is_ok() {
            return Err(CommandError::Status {
                status: reply.status,
                body: reply.body,
            });
        }
        Ok(reply)
    }
}

fn fetch_position<T: DeviceTransport>(transport: &T, url: &str) -> anyhow::Result<Orientation> {
    let reply = transport.get(url)?;
    if !reply.is_ok() {
        bail!("failed with HTTP {}: {}", reply.status, reply.body);
    }
    gimbal_request::parse_position(&reply.body)
}
