#[cfg(windows)]
mod console_source;
#[cfg(unix)]
mod termios_source;

#[cfg(windows)]
pub use console_source::ConsoleKeySource as PlatformKeySource;
#[cfg(unix)]
pub use termios_source::TermiosKeySource as PlatformKeySource;

use std::time::Duration;

/// How long each follow-up unit of an escape sequence may take to arrive.
pub const ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);

const ESC: u8 = 0x1b;
const CTRL_C: u8 = 0x03;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    Up,
    Down,
    Left,
    Right,
    Char(char),
    Interrupt,
}

pub trait KeySource {
    /// Returns at most one key, without blocking when nothing is pending.
    fn poll(&mut self) -> Option<KeyEvent>;
}

/// Decodes one logical key that starts with `first`.
///
/// After ESC the next two units are pulled from `next`, which may block for a
/// bounded time and returns `None` when nothing arrives. A lone ESC or an
/// unknown sequence produces no event.
pub fn decode(first: u8, mut next: impl FnMut() -> Option<u8>) -> Option<KeyEvent> {
    match first {
        ESC => decode_escape(&mut next),
        CTRL_C => Some(KeyEvent::Interrupt),
        byte if byte.is_ascii_graphic() || byte == b' ' => Some(KeyEvent::Char(byte as char)),
        _ => None,
    }
}

fn decode_escape(next: &mut impl FnMut() -> Option<u8>) -> Option<KeyEvent> {
    // CSI (`ESC [`) in normal cursor mode, SS3 (`ESC O`) in application mode
    let intro = next()?;
    if intro != b'[' && intro != b'O' {
        return None;
    }
    match next()? {
        b'A' => Some(KeyEvent::Up),
        b'B' => Some(KeyEvent::Down),
        b'C' => Some(KeyEvent::Right),
        b'D' => Some(KeyEvent::Left),
        _ => None,
    }
}
