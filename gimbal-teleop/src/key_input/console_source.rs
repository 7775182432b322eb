use super::{KeyEvent, KeySource};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::time::Duration;

/// Uses the console's own "key available" check and reads one event at a time.
pub struct ConsoleKeySource {
    _raw_mode: RawModeGuard,
}

impl ConsoleKeySource {
    pub fn open() -> Result<Self> {
        let raw_mode = RawModeGuard::new().context("console raw mode setup failed")?;
        Ok(Self {
            _raw_mode: raw_mode,
        })
    }
}

impl KeySource for ConsoleKeySource {
    fn poll(&mut self) -> Option<KeyEvent> {
        if !key_available(event::poll(Duration::ZERO)) {
            return None;
        }
        match event::read() {
            Ok(Event::Key(key)) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                map_key(key.code, key.modifiers)
            }
            Ok(_) => None,
            Err(err) => {
                log::debug!("console read failed: {}", err);
                None
            }
        }
    }
}

fn key_available(polled: std::io::Result<bool>) -> bool {
    polled.unwrap_or_else(|err| {
        log::debug!("console poll failed: {}", err);
        false
    })
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyEvent> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyEvent::Interrupt)
        }
        KeyCode::Up => Some(KeyEvent::Up),
        KeyCode::Down => Some(KeyEvent::Down),
        KeyCode::Left => Some(KeyEvent::Left),
        KeyCode::Right => Some(KeyEvent::Right),
        KeyCode::Char(c) => Some(KeyEvent::Char(c)),
        _ => None,
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn new() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
