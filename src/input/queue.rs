//! Lock-free pointer event queue
//!
//! A fixed 64-slot ring buffer shared between one asynchronous producer (the
//! platform pointer callback) and the once-per-frame consumer. One slot is
//! always kept free, so at most 63 events are pending at a time. When the
//! buffer is full the newest event is dropped; pending events are never
//! overwritten.

use std::sync::atomic::{AtomicU8, AtomicU64, AtomicUsize, Ordering};

use tracing::trace;

use super::events::{PointerEvent, PointerEventKind};

/// Number of slots in the ring
pub const QUEUE_CAPACITY: usize = 64;

#[derive(Default)]
struct Slot {
    position: AtomicU64,
    kind: AtomicU8,
}

/// Packs a screen position into one atomic word
pub(crate) fn pack_position(x: i32, y: i32) -> u64 {
    ((x as u32 as u64) << 32) | (y as u32 as u64)
}

pub(crate) fn unpack_position(packed: u64) -> (i32, i32) {
    ((packed >> 32) as u32 as i32, packed as u32 as i32)
}

impl Slot {
    fn store(&self, event: PointerEvent) {
        self.position
            .store(pack_position(event.x, event.y), Ordering::Relaxed);
        self.kind.store(event.kind.to_code(), Ordering::Relaxed);
    }

    fn load(&self) -> PointerEvent {
        let (x, y) = unpack_position(self.position.load(Ordering::Relaxed));
        let kind = PointerEventKind::from_code(self.kind.load(Ordering::Relaxed))
            .unwrap_or(PointerEventKind::Move);
        PointerEvent::new(x, y, kind)
    }
}

/// Single-producer/single-consumer ring of pointer events
///
/// Share it with `Arc`; `push` belongs to the producer, `pop` to the consumer.
pub struct PointerEventQueue {
    slots: Box<[Slot]>,
    write_index: AtomicUsize,
    read_index: AtomicUsize,
}

impl PointerEventQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self {
            slots: (0..QUEUE_CAPACITY).map(|_| Slot::default()).collect(),
            write_index: AtomicUsize::new(0),
            read_index: AtomicUsize::new(0),
        }
    }

    /// Stores an event, silently dropping it if the ring is full
    pub fn push(&self, event: PointerEvent) {
        let write = self.write_index.load(Ordering::Relaxed);
        let next = (write + 1) % QUEUE_CAPACITY;
        if next == self.read_index.load(Ordering::Acquire) {
            trace!(?event, "pointer queue full, dropping event");
            return;
        }

        self.slots[write].store(event);
        self.write_index.store(next, Ordering::Release);
    }

    /// Takes the oldest pending event
    pub fn pop(&self) -> Option<PointerEvent> {
        let read = self.read_index.load(Ordering::Relaxed);
        if read == self.write_index.load(Ordering::Acquire) {
            return None;
        }

        let event = self.slots[read].load();
        self.read_index
            .store((read + 1) % QUEUE_CAPACITY, Ordering::Release);
        Some(event)
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        let write = self.write_index.load(Ordering::Acquire);
        let read = self.read_index.load(Ordering::Acquire);
        (write + QUEUE_CAPACITY - read) % QUEUE_CAPACITY
    }

    /// Returns true if no events are pending
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of slots (one is always left unused)
    pub fn capacity(&self) -> usize {
        QUEUE_CAPACITY
    }
}

impl Default for PointerEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PointerEventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerEventQueue")
            .field("pending", &self.len())
            .finish()
    }
}
