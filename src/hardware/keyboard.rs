use std::io;
use std::io::Read;
use std::sync::mpsc;
use std::sync::mpsc::{Receiver, SyncSender};
use std::thread;

/// Number of keys the stdin producer may queue ahead of the running program.
/// The producer blocks instead of dropping keys once the queue is full.
pub const KEY_QUEUE_CAPACITY: usize = 16;

/// Providing Keyboard Input independent of an implementation.
pub trait KeyboardInput {
    /// Returns the next key if one is pending, does not block.
    fn poll_key(&self) -> Option<u16>;
    /// Blocks until the next key is available.
    /// Returns `None` if no key will ever arrive because the producer is gone.
    fn wait_key(&self) -> Option<u16>;
}

impl KeyboardInput for Receiver<u16> {
    fn poll_key(&self) -> Option<u16> {
        self.try_recv().ok()
    }
    fn wait_key(&self) -> Option<u16> {
        self.recv().ok()
    }
}

/// Starts a thread reading stdin byte by byte and returns the receiving end of the keys.
///
/// The thread ends on end of input, on a read error or once the receiver is dropped.
#[must_use]
pub fn spawn_stdin_keyboard() -> Receiver<u16> {
    let (sender, receiver) = mpsc::sync_channel(KEY_QUEUE_CAPACITY);
    thread::spawn(move || forward_keys(io::stdin().lock(), &sender));
    receiver
}

fn forward_keys(input: impl Read, sender: &SyncSender<u16>) {
    for byte in input.bytes() {
        match byte {
            Ok(b) => {
                if sender.send(u16::from(b)).is_err() {
                    log::debug!("keyboard receiver gone, stop reading stdin");
                    return;
                }
            }
            Err(e) => {
                log::error!("Error reading keyboard input from stdin: {e}");
                return;
            }
        }
    }
    log::debug!("end of keyboard input");
}
