//! Raw terminal controller: cbreak mode, resize signals, mouse tracking.
//!
//! [`RawTerminal`] owns the transition into byte-at-a-time terminal input
//! and everything needed to undo it. The resize signal handler touches
//! exactly one atomic flag and one self-pipe byte, since it can interrupt the
//! main thread at any point, including mid-decode, so it must never do
//! more. SIGINT/SIGTERM are routed to a quit flag so Ctrl-C is an ordinary
//! teardown path rather than process death with a corrupted terminal.
//!
//! Every operation is a no-op when the input descriptor is not a tty, and
//! restore failures during teardown are logged rather than raised.

use crate::core::error::{GlanceError, Result};
use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGWINCH};
use signal_hook::SigId;
use std::io::Write;
use std::os::unix::io::RawFd;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Enable mouse click + drag reporting in both X10 and SGR encodings.
const MOUSE_TRACKING_ON: &str = "\x1b[?1000h\x1b[?1002h\x1b[?1006h";
const MOUSE_TRACKING_OFF: &str = "\x1b[?1006l\x1b[?1002l\x1b[?1000l";

pub struct RawTerminal {
    fd: RawFd,
    is_tty: bool,
    saved: Option<libc::termios>,
    mouse_tracking: bool,
    signal_ids: Vec<SigId>,
    resize_flag: Arc<AtomicBool>,
    quit_flag: Arc<AtomicBool>,
    pipe_rd: RawFd,
    pipe_wr: RawFd,
}

impl RawTerminal {
    /// Wrap the given input descriptor (stdin in production).
    pub fn new(fd: RawFd) -> Result<Self> {
        if cfg!(not(unix)) {
            return Err(GlanceError::UnsupportedPlatform);
        }

        let is_tty = unsafe { libc::isatty(fd) } == 1;

        // Self-pipe for waking the poll loop from the signal handler.
        let mut fds = [0 as libc::c_int; 2];
        if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
            return Err(GlanceError::Io(std::io::Error::last_os_error()));
        }
        for fd in fds {
            unsafe {
                let flags = libc::fcntl(fd, libc::F_GETFL);
                libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
            }
        }

        Ok(RawTerminal {
            fd,
            is_tty,
            saved: None,
            mouse_tracking: false,
            signal_ids: Vec::new(),
            resize_flag: Arc::new(AtomicBool::new(false)),
            quit_flag: Arc::new(AtomicBool::new(false)),
            pipe_rd: fds[0],
            pipe_wr: fds[1],
        })
    }

    pub fn stdin() -> Result<Self> {
        Self::new(libc::STDIN_FILENO)
    }

    pub fn input_fd(&self) -> RawFd {
        self.fd
    }

    pub fn resize_pipe_fd(&self) -> RawFd {
        self.pipe_rd
    }

    pub fn resize_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.resize_flag)
    }

    pub fn quit_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.quit_flag)
    }

    /// Save terminal attributes, enter cbreak mode and install the signal
    /// handlers. Safe to call when the descriptor is not a tty: signals
    /// are still routed, terminal attributes are left alone.
    pub fn start(&mut self) -> Result<()> {
        if self.is_tty && self.saved.is_none() {
            unsafe {
                let mut termios: libc::termios = std::mem::zeroed();
                if libc::tcgetattr(self.fd, &mut termios) != 0 {
                    return Err(GlanceError::Io(std::io::Error::last_os_error()));
                }
                self.saved = Some(termios);

                // cbreak: non-canonical, no echo, byte-at-a-time reads.
                // ISIG stays on; SIGINT lands on the quit flag below.
                termios.c_lflag &= !(libc::ICANON | libc::ECHO);
                termios.c_cc[libc::VMIN] = 1;
                termios.c_cc[libc::VTIME] = 0;

                if libc::tcsetattr(self.fd, libc::TCSAFLUSH, &termios) != 0 {
                    self.saved = None;
                    return Err(GlanceError::Io(std::io::Error::last_os_error()));
                }
            }
        }

        if self.signal_ids.is_empty() {
            let resize = Arc::clone(&self.resize_flag);
            self.signal_ids
                .push(signal_hook::flag::register(SIGWINCH, resize)?);
            self.signal_ids
                .push(signal_hook::low_level::pipe::register_raw(
                    SIGWINCH,
                    self.pipe_wr,
                )?);
            let quit = Arc::clone(&self.quit_flag);
            self.signal_ids
                .push(signal_hook::flag::register(SIGINT, quit)?);
            let quit = Arc::clone(&self.quit_flag);
            self.signal_ids
                .push(signal_hook::flag::register(SIGTERM, quit)?);
        }

        if self.mouse_tracking && self.is_tty {
            write_sequence(MOUSE_TRACKING_ON);
        }

        Ok(())
    }

    /// Restore the saved attributes and uninstall the handlers. Runs on
    /// every exit path via `Drop`; failures here are logged, never raised.
    pub fn stop(&mut self) {
        for id in self.signal_ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }

        // The desired tracking state is kept so a later start() restores it.
        if self.mouse_tracking && self.is_tty {
            write_sequence(MOUSE_TRACKING_OFF);
        }

        if let Some(saved) = self.saved.take() {
            let rc = unsafe { libc::tcsetattr(self.fd, libc::TCSADRAIN, &saved) };
            if rc != 0 {
                log::warn!(
                    "failed to restore terminal attributes: {}",
                    std::io::Error::last_os_error()
                );
            }
        }
    }

    /// Toggle mouse reporting at runtime. Idempotent.
    pub fn set_mouse_tracking(&mut self, enabled: bool) {
        if enabled == self.mouse_tracking {
            return;
        }
        self.mouse_tracking = enabled;
        if !self.is_tty {
            return;
        }
        write_sequence(if enabled {
            MOUSE_TRACKING_ON
        } else {
            MOUSE_TRACKING_OFF
        });
    }

    /// Current terminal size as (cols, rows); a sane default off-tty.
    pub fn size(&self) -> (u16, u16) {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::ioctl(self.fd, libc::TIOCGWINSZ, &mut ws) };
        if rc == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
            (ws.ws_col, ws.ws_row)
        } else {
            (80, 24)
        }
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        self.stop();
        unsafe {
            libc::close(self.pipe_rd);
            libc::close(self.pipe_wr);
        }
    }
}

fn write_sequence(seq: &str) {
    let mut out = std::io::stdout();
    let _ = out.write_all(seq.as_bytes());
    let _ = out.flush();
}
