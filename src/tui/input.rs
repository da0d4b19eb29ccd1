//! Polling input loop over the terminal descriptor.
//!
//! `get_input` blocks on readiness of the input fd and the resize
//! self-pipe, reassembles partially received escape sequences across
//! calls, and synthesizes `WindowResize` events from the signal flag.
//!
//! Ordering guarantees:
//! - a pending resize always preempts buffered key bytes for the cycle in
//!   which its flag is observed, so a stale-size redraw is never starved
//!   behind keyboard input;
//! - bytes are decoded in arrival order and events returned in that order.
//!
//! An ambiguous ESC prefix is carried with a grace deadline
//! (`complete_wait`); if the rest of the sequence does not arrive in time
//! the prefix force-resolves as a literal escape.

use super::decoder::Decoder;
use super::event::Event;
use super::terminal::RawTerminal;
use crate::core::error::Result;
use std::io;
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const READ_CHUNK: usize = 1024;

pub struct InputHandle {
    fd: RawFd,
    pipe_rd: RawFd,
    resize_flag: Arc<AtomicBool>,
    decoder: Decoder,
    /// Bytes matching a trie prefix, carried until resolved or preempted.
    partial: Vec<u8>,
    /// When the carried prefix force-resolves as a literal escape.
    partial_deadline: Option<Instant>,
    max_wait: Option<Duration>,
    complete_wait: Duration,
    eof: bool,
}

impl InputHandle {
    pub fn new(fd: RawFd, pipe_rd: RawFd, resize_flag: Arc<AtomicBool>) -> Self {
        InputHandle {
            fd,
            pipe_rd,
            resize_flag,
            decoder: Decoder::new(),
            partial: Vec::new(),
            partial_deadline: None,
            max_wait: None,
            complete_wait: Duration::from_millis(125),
            eof: false,
        }
    }

    pub fn from_terminal(terminal: &RawTerminal) -> Self {
        Self::new(
            terminal.input_fd(),
            terminal.resize_pipe_fd(),
            terminal.resize_flag(),
        )
    }

    /// Configure blocking behavior: `max_wait` bounds how long `get_input`
    /// blocks with nothing pending (`None` blocks indefinitely);
    /// `complete_wait` is the grace period for an incomplete escape
    /// sequence before it resolves as a bare ESC.
    pub fn set_input_timeouts(&mut self, max_wait: Option<Duration>, complete_wait: Duration) {
        self.max_wait = max_wait;
        self.complete_wait = complete_wait;
    }

    /// The input descriptor reached end-of-file.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Return pending input as decoded events, blocking up to the
    /// configured timeout when nothing is available.
    pub fn get_input(&mut self) -> Result<Vec<Event>> {
        self.wait_input_ready(self.next_timeout())?;

        // Resize preempts everything: clear the flag, synthesize the
        // event, and leave pending key bytes (and the partial buffer)
        // for the next call.
        if self.resize_flag.swap(false, Ordering::SeqCst) {
            self.drain_resize_pipe();
            return Ok(vec![Event::WindowResize]);
        }
        self.drain_resize_pipe();

        let mut codes = std::mem::take(&mut self.partial);
        codes.extend(self.get_available_raw_input()?);

        let (mut events, consumed, need_more) = self.decoder.drain(&codes, true);
        let mut remainder = codes.split_off(consumed);

        if need_more && !remainder.is_empty() {
            let deadline = *self
                .partial_deadline
                .get_or_insert_with(|| Instant::now() + self.complete_wait);
            if Instant::now() >= deadline {
                // No continuation arrived within the grace period: the
                // prefix is a literal ESC followed by ordinary bytes.
                let (tail, _, _) = self.decoder.drain(&remainder, false);
                events.extend(tail);
                remainder.clear();
                self.partial_deadline = None;
            }
        } else {
            self.partial_deadline = None;
        }
        self.partial = remainder;

        Ok(events)
    }

    /// Effective wait: the grace deadline caps the configured timeout so
    /// an ambiguous prefix resolves promptly.
    fn next_timeout(&self) -> Option<Duration> {
        let Some(deadline) = self.partial_deadline else {
            return self.max_wait;
        };
        let grace = deadline.saturating_duration_since(Instant::now());
        Some(match self.max_wait {
            Some(max) => max.min(grace),
            None => grace,
        })
    }

    /// Block until the input fd or the resize pipe is readable, the
    /// timeout lapses, or a signal interrupts the wait with the resize
    /// flag set.
    fn wait_input_ready(&self, timeout: Option<Duration>) -> io::Result<bool> {
        let mut fds = [
            libc::pollfd {
                fd: self.fd,
                events: libc::POLLIN,
                revents: 0,
            },
            libc::pollfd {
                fd: self.pipe_rd,
                events: libc::POLLIN,
                revents: 0,
            },
        ];
        let timeout_ms = match timeout {
            Some(d) => d.as_millis().min(i32::MAX as u128) as libc::c_int,
            None => -1,
        };

        loop {
            // Once the input fd hit EOF, polling it would spin on POLLHUP,
            // so only the resize pipe is watched from then on.
            let rc = unsafe {
                if self.eof {
                    libc::poll(&mut fds[1], 1, timeout_ms)
                } else {
                    libc::poll(fds.as_mut_ptr(), 2, timeout_ms)
                }
            };
            if rc < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    if self.resize_flag.load(Ordering::SeqCst) {
                        return Ok(false);
                    }
                    continue;
                }
                return Err(err);
            }
            let input_ready =
                !self.eof && fds[0].revents & (libc::POLLIN | libc::POLLHUP) != 0;
            return Ok(input_ready);
        }
    }

    /// Drain currently available input bytes without blocking.
    fn get_available_raw_input(&mut self) -> io::Result<Vec<u8>> {
        let mut codes = Vec::new();
        let mut buf = [0u8; READ_CHUNK];

        while !self.eof && self.readable_now()? {
            let n = unsafe {
                libc::read(self.fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len())
            };
            match n {
                0 => {
                    self.eof = true;
                    break;
                }
                n if n < 0 => {
                    let err = io::Error::last_os_error();
                    match err.kind() {
                        io::ErrorKind::Interrupted => continue,
                        io::ErrorKind::WouldBlock => break,
                        _ => return Err(err),
                    }
                }
                n => codes.extend_from_slice(&buf[..n as usize]),
            }
        }
        Ok(codes)
    }

    fn readable_now(&self) -> io::Result<bool> {
        let mut pollfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let rc = unsafe { libc::poll(&mut pollfd, 1, 0) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err);
        }
        Ok(pollfd.revents & (libc::POLLIN | libc::POLLHUP) != 0)
    }

    /// Empty the wake-up pipe written by the resize signal handler.
    fn drain_resize_pipe(&self) {
        let mut buf = [0u8; 32];
        loop {
            let n = unsafe {
                libc::read(
                    self.pipe_rd,
                    buf.as_mut_ptr() as *mut libc::c_void,
                    buf.len(),
                )
            };
            if n <= 0 {
                break;
            }
        }
    }
}
