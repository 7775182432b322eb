use crate::gimbal_control::{Flow, GimbalController};
use crate::key_input::KeySource;
use crate::transport::DeviceTransport;
use std::thread;
use std::time::Duration;

pub const LEGEND: &str = "
Controls:
  Arrow Up/Down/Left/Right => Adjust pitch/yaw
  a / s => Roll + / -
  z / x => Zoom in / out
  f     => Focus center
  t     => Toggle tracking (ON/OFF)
  q     => Quit
";

pub fn print_legend() {
    println!("{}", LEGEND);
}

/// Polls `keys` and dispatches each key to `controller` until a quit key.
///
/// One key produces at most one command, sent before the next poll.
pub fn run<T, K>(controller: &mut GimbalController<T>, keys: &mut K, poll_interval: Duration)
where
    T: DeviceTransport,
    K: KeySource,
{
    loop {
        if let Some(key) = keys.poll() {
            log::debug!("key {:?}", key);
            if controller.handle(key) == Flow::Quit {
                return;
            }
        }
        thread::sleep(poll_interval);
    }
}
