use super::{decode, KeyEvent, KeySource, ESCAPE_TIMEOUT};
use anyhow::{Context, Result};
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::io::RawFd;
use std::time::Duration;

/// Reads stdin byte by byte, checking readiness with `poll(2)` first.
pub struct TermiosKeySource {
    fd: RawFd,
    _mode: CbreakGuard,
}

impl TermiosKeySource {
    pub fn open() -> Result<Self> {
        Self::on_fd(libc::STDIN_FILENO).context("stdin cbreak mode setup failed")
    }

    fn on_fd(fd: RawFd) -> io::Result<Self> {
        let mode = CbreakGuard::new(fd)?;
        Ok(Self { fd, _mode: mode })
    }

    fn next_unit(&self) -> Option<u8> {
        if !wait_readable(self.fd, ESCAPE_TIMEOUT) {
            return None;
        }
        read_byte(self.fd).ok().flatten()
    }
}

impl KeySource for TermiosKeySource {
    fn poll(&mut self) -> Option<KeyEvent> {
        if !wait_readable(self.fd, Duration::ZERO) {
            return None;
        }
        match read_byte(self.fd) {
            Ok(Some(first)) => decode(first, || self.next_unit()),
            Ok(None) => {
                log::warn!("stdin closed");
                Some(KeyEvent::Interrupt)
            }
            Err(err) => {
                log::debug!("stdin read failed: {}", err);
                None
            }
        }
    }
}

fn wait_readable(fd: RawFd, timeout: Duration) -> bool {
    let mut pollfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let millis = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
    // SAFETY: `pollfd` is a live, exclusively borrowed array of length 1.
    let ready = unsafe { libc::poll(&mut pollfd, 1, millis) };
    ready > 0 && pollfd.revents & (libc::POLLIN | libc::POLLHUP) != 0
}

fn read_byte(fd: RawFd) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    // SAFETY: the buffer is valid for writes of `byte.len()` bytes.
    let n = unsafe { libc::read(fd, byte.as_mut_ptr().cast(), byte.len()) };
    match n {
        1 => Ok(Some(byte[0])),
        0 => Ok(None),
        _ => Err(io::Error::last_os_error()),
    }
}

fn get_termios(fd: RawFd) -> io::Result<libc::termios> {
    let mut termios = MaybeUninit::<libc::termios>::uninit();
    // SAFETY: `termios` is valid for writes of one `libc::termios`.
    if unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: tcgetattr returned 0, so it filled the whole struct.
    Ok(unsafe { termios.assume_init() })
}

fn set_termios(fd: RawFd, action: libc::c_int, termios: &libc::termios) -> io::Result<()> {
    // SAFETY: `termios` is a valid reference for the duration of the call.
    if unsafe { libc::tcsetattr(fd, action, termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Keys arrive one at a time with no echo; Ctrl+C arrives as a byte instead
/// of a signal. The previous settings come back on drop.
struct CbreakGuard {
    fd: RawFd,
    original: libc::termios,
}

impl CbreakGuard {
    fn new(fd: RawFd) -> io::Result<Self> {
        let original = get_termios(fd)?;
        let mut cbreak = original;
        cbreak.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG);
        cbreak.c_cc[libc::VMIN] = 1;
        cbreak.c_cc[libc::VTIME] = 0;
        set_termios(fd, libc::TCSAFLUSH, &cbreak)?;
        Ok(Self { fd, original })
    }
}

impl Drop for CbreakGuard {
    fn drop(&mut self) {
        if let Err(err) = set_termios(self.fd, libc::TCSADRAIN, &self.original) {
            log::warn!("terminal mode restore failed: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;
    use std::time::Instant;

    struct Pty {
        master: RawFd,
        slave: RawFd,
    }

    impl Pty {
        fn open() -> Self {
            let (mut master, mut slave) = (-1, -1);
            let rc = unsafe {
                libc::openpty(
                    &mut master,
                    &mut slave,
                    ptr::null_mut::<libc::c_char>(),
                    ptr::null_mut::<libc::termios>(),
                    ptr::null_mut::<libc::winsize>(),
                )
            };
            assert_eq!(rc, 0, "openpty failed: {}", io::Error::last_os_error());
            Self { master, slave }
        }

        fn type_bytes(&self, bytes: &[u8]) {
            let n = unsafe { libc::write(self.master, bytes.as_ptr().cast(), bytes.len()) };
            assert_eq!(n, bytes.len() as isize);
        }
    }

    impl Drop for Pty {
        fn drop(&mut self) {
            unsafe {
                libc::close(self.slave);
                libc::close(self.master);
            }
        }
    }

    // The pty line discipline hands bytes over asynchronously.
    fn poll_within(source: &mut TermiosKeySource, limit: Duration) -> Option<KeyEvent> {
        let deadline = Instant::now() + limit;
        loop {
            if let Some(key) = source.poll() {
                return Some(key);
            }
            if Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn poll_returns_at_once_when_idle() {
        let pty = Pty::open();
        let mut source = TermiosKeySource::on_fd(pty.slave).unwrap();

        let started = Instant::now();
        assert_eq!(source.poll(), None);
        assert!(started.elapsed() < ESCAPE_TIMEOUT);
    }

    #[test]
    fn arrow_sequence_arrives_as_one_key() {
        let pty = Pty::open();
        let mut source = TermiosKeySource::on_fd(pty.slave).unwrap();

        pty.type_bytes(b"\x1b[Az");

        let limit = Duration::from_secs(1);
        assert_eq!(poll_within(&mut source, limit), Some(KeyEvent::Up));
        assert_eq!(poll_within(&mut source, limit), Some(KeyEvent::Char('z')));
        assert_eq!(source.poll(), None);
    }

    #[test]
    fn ctrl_c_is_a_key_not_a_signal() {
        let pty = Pty::open();
        let mut source = TermiosKeySource::on_fd(pty.slave).unwrap();

        pty.type_bytes(b"\x03");

        assert_eq!(
            poll_within(&mut source, Duration::from_secs(1)),
            Some(KeyEvent::Interrupt)
        );
    }

    #[test]
    fn lone_escape_gives_up_after_the_timeout() {
        let pty = Pty::open();
        let mut source = TermiosKeySource::on_fd(pty.slave).unwrap();

        pty.type_bytes(b"\x1b");
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(poll_within(&mut source, Duration::from_millis(200)), None);
    }

    #[test]
    fn guard_restores_the_original_mode() {
        let pty = Pty::open();
        let before = get_termios(pty.slave).unwrap();
        assert_ne!(before.c_lflag & libc::ICANON, 0);

        {
            let _source = TermiosKeySource::on_fd(pty.slave).unwrap();
            let during = get_termios(pty.slave).unwrap();
            assert_eq!(during.c_lflag & (libc::ICANON | libc::ECHO | libc::ISIG), 0);
            assert_eq!(during.c_cc[libc::VMIN], 1);
        }

        let after = get_termios(pty.slave).unwrap();
        assert_eq!(after.c_lflag, before.c_lflag);
        assert_eq!(after.c_iflag, before.c_iflag);
        assert_eq!(after.c_oflag, before.c_oflag);
        assert_eq!(after.c_cc, before.c_cc);
    }

    #[test]
    fn non_terminal_fd_fails_setup() {
        let mut fds = [0; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        let result = TermiosKeySource::on_fd(fds[0]);
        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
        assert!(result.is_err());
    }
}
