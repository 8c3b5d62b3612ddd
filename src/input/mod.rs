//! Keyboard input plumbing
//!
//! The engine holds at most one subscription to raw key presses. The host
//! keeps a [`KeyboardHandle`] and forwards key events into it; the engine
//! drains the channel once per tick.

use tokio::sync::mpsc;

/// Logical keys the simulation cares about
///
/// Only confirm and cancel have meaning (both toggle pause); anything else
/// the host forwards is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Confirm,
    Cancel,
    Other,
}

/// Sending half of a keyboard subscription
#[derive(Debug, Clone)]
pub struct KeyboardHandle {
    tx: mpsc::UnboundedSender<Key>,
}

impl KeyboardHandle {
    /// Forward a key press to the engine. Silently dropped if the engine
    /// has unsubscribed or been torn down.
    pub fn press(&self, key: Key) {
        let _ = self.tx.send(key);
    }
}

/// Create a keyboard subscription pair
pub(crate) fn keyboard_channel() -> (KeyboardHandle, mpsc::UnboundedReceiver<Key>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (KeyboardHandle { tx }, rx)
}
