//! Terminal mode handling for the page navigation loop.
//!
//! Navigation reads single keys, so stdin leaves canonical mode while the
//! loop runs. Output post-processing stays on so rendered rows keep their
//! `\n` to `\r\n` translation.

use std::collections::VecDeque;
use std::io;
use std::thread::{self, JoinHandle};

use libc::{self, c_int};
use signal_hook::iterator::Signals;

use crate::input::split_sequences;

fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Derives key-at-a-time settings from `original`: no line buffering, no echo,
/// no signal generation, blocking reads of at least one byte.
pub fn key_mode_termios(original: &libc::termios) -> libc::termios {
    let mut mode = *original;
    mode.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG);
    mode.c_cc[libc::VMIN] = 1;
    mode.c_cc[libc::VTIME] = 0;
    mode
}

/// Holds a file descriptor in key mode and restores the saved settings on drop.
pub struct KeyModeGuard {
    fd: c_int,
    original: libc::termios,
}

impl KeyModeGuard {
    pub fn enable(fd: c_int) -> io::Result<Self> {
        let original = get_termios(fd)?;
        set_termios(fd, &key_mode_termios(&original))?;
        Ok(Self { fd, original })
    }

    pub fn stdin() -> io::Result<Self> {
        Self::enable(libc::STDIN_FILENO)
    }

    pub fn fd(&self) -> c_int {
        self.fd
    }

    pub fn original(&self) -> &libc::termios {
        &self.original
    }

    pub fn restore(&self) -> io::Result<()> {
        // Drop keys typed during navigation so they do not reach the prompt.
        let _ = unsafe { libc::tcflush(self.fd, libc::TCIFLUSH) };
        set_termios(self.fd, &self.original)
    }
}

impl Drop for KeyModeGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Reads prompt lines and key sequences from one file descriptor.
///
/// Bytes read past the end of a line stay buffered here, so keys typed ahead
/// of the switch to key mode are still delivered by [`read_sequence`].
///
/// [`read_sequence`]: KeyReader::read_sequence
pub struct KeyReader {
    fd: c_int,
    unread: Vec<u8>,
    pending: VecDeque<String>,
}

impl KeyReader {
    pub fn new(fd: c_int) -> Self {
        Self {
            fd,
            unread: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn stdin() -> Self {
        Self::new(libc::STDIN_FILENO)
    }

    /// Returns the next line including its newline, or `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(end) = self.unread.iter().position(|byte| *byte == b'\n') {
                let line: Vec<u8> = self.unread.drain(..=end).collect();
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }
            if self.fill()? == 0 {
                if self.unread.is_empty() {
                    return Ok(None);
                }
                let line = std::mem::take(&mut self.unread);
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }
        }
    }

    /// Returns the next raw key sequence, or `None` at end of input.
    pub fn read_sequence(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(sequence) = self.pending.pop_front() {
                return Ok(Some(sequence));
            }
            if self.unread.is_empty() && self.fill()? == 0 {
                return Ok(None);
            }

            let chunk = std::mem::take(&mut self.unread);
            self.pending
                .extend(split_sequences(&String::from_utf8_lossy(&chunk)));
        }
    }

    fn fill(&mut self) -> io::Result<usize> {
        let mut buf = [0u8; 256];
        loop {
            let read_len = unsafe { libc::read(self.fd, buf.as_mut_ptr() as *mut _, buf.len()) };
            if read_len < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            let read_len = read_len as usize;
            self.unread.extend_from_slice(&buf[..read_len]);
            return Ok(read_len);
        }
    }
}

/// Returns the column count of the terminal behind `fd`.
pub fn terminal_columns(fd: c_int) -> Option<u16> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 {
        Some(size.ws_col)
    } else {
        None
    }
}

/// Column count of the terminal on stdout.
pub fn stdout_columns() -> Option<u16> {
    terminal_columns(libc::STDOUT_FILENO)
}

/// Stops the signal thread on drop.
pub struct SignalRestoreGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

impl Drop for SignalRestoreGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// On SIGTERM or SIGHUP, restores `original` on `fd` and exits with `128 + signal`.
pub fn restore_on_signal(fd: c_int, original: libc::termios) -> io::Result<SignalRestoreGuard> {
    let mut signals = Signals::new([libc::SIGTERM, libc::SIGHUP])?;
    let handle = signals.handle();

    let thread = thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            let _ = set_termios(fd, &original);
            std::process::exit(128 + signal);
        }
    });

    Ok(SignalRestoreGuard {
        handle,
        thread: Some(thread),
    })
}
