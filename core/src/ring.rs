//! Decoded-character hand-off between execution contexts.

use std::sync::{Mutex, PoisonError};

/// Fixed-capacity character ring shared between the decoding context and a
/// text consumer.
///
/// Write and read cursors wrap modulo the cell count; the ring holds at
/// most `capacity - 1` unread characters so that equal cursors always mean
/// empty. This is the only state shared across execution contexts, and
/// every cursor or cell access happens inside one short mutex critical
/// section per call; the lock is never held across a discriminator read
/// or a framing transition.
///
/// Overflow policy (accepted lossy behavior): `push` never blocks and
/// never fails; when the ring is full the oldest unread character is
/// silently dropped. The timing-critical producer always makes progress;
/// the consumer gets no signal that it fell behind.
pub struct OutputRing {
    inner: Mutex<RingState>,
}

struct RingState {
    cells: Box<[char]>,
    write: usize,
    read: usize,
}

impl RingState {
    fn len(&self) -> usize {
        (self.write + self.cells.len() - self.read) % self.cells.len()
    }
}

impl OutputRing {
    /// `capacity` is the cell count; usable depth is `capacity - 1`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "ring needs at least two cells");
        Self {
            inner: Mutex::new(RingState {
                cells: vec!['\0'; capacity].into_boxed_slice(),
                write: 0,
                read: 0,
            }),
        }
    }

    /// Append one character, dropping the oldest unread character first if
    /// the ring is full. Never blocks beyond the short lock.
    pub fn push(&self, ch: char) {
        let mut state = self.lock();
        let capacity = state.cells.len();
        let next = (state.write + 1) % capacity;
        if next == state.read {
            state.read = (state.read + 1) % capacity;
        }
        let write = state.write;
        state.cells[write] = ch;
        state.write = next;
    }

    /// Drain up to `max` characters in FIFO order, advancing the read
    /// cursor. Never blocks; an empty ring yields an empty string, and
    /// calling again on empty stays empty.
    pub fn drain(&self, max: usize) -> String {
        let mut state = self.lock();
        let capacity = state.cells.len();
        let mut out = String::new();
        for _ in 0..max {
            if state.read == state.write {
                break;
            }
            let read = state.read;
            out.push(state.cells[read]);
            state.read = (read + 1) % capacity;
        }
        out
    }

    /// Unread characters currently buffered.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RingState> {
        // Cursors and cells are valid even if a holder panicked, so a
        // poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
